//! Database tests

use chrono::{DateTime, TimeZone, Utc};

use super::*;
use crate::models::*;
use crate::text_analysis::{DetectedEntity, EntityType, TextAnalysisResult};

fn at(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

fn tx(user: &str, category: &str, store: &str, amount: f64, created_at: DateTime<Utc>) -> Transaction {
    let info = ExtractedExpenseInfo {
        amount,
        store: store.to_string(),
        category: category.to_string(),
        transaction_type: TransactionType::Product,
        confidence: 0.7,
        raw_analysis: None,
    };
    Transaction::from_analysis(user, &format!("{} {}", store, amount), info, created_at)
}

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_transactions(None).unwrap(), 0);
    assert!(db.path().contains("financas_test_"));
}

#[test]
fn test_schema_indexes_exist() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name IN ('idx_transactions_user_created', 'idx_transactions_user_month')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 2);
}

#[test]
fn test_create_and_get_transaction() {
    let db = Database::in_memory().unwrap();
    let mut record = tx("ana", "Transport", "Uber", 37.0, at(2024, 3, 10, 8));
    record.transaction_type = TransactionType::Service;
    record.raw_analysis = Some(TextAnalysisResult {
        entities: vec![DetectedEntity {
            text: "Uber".into(),
            entity_type: EntityType::Organization,
            score: 0.95,
            begin_offset: 0,
            end_offset: 4,
        }],
        key_phrases: vec![],
        sentiment: None,
    });
    db.create_transaction(&record).unwrap();

    let loaded = db.get_transaction(&record.id).unwrap().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.month, "2024-03");
}

#[test]
fn test_get_missing_transaction() {
    let db = Database::in_memory().unwrap();
    assert!(db.get_transaction("nope").unwrap().is_none());
}

#[test]
fn test_list_by_user_newest_first_with_limit() {
    let db = Database::in_memory().unwrap();
    let old = tx("ana", "Food", "iFood", 30.0, at(2024, 1, 5, 12));
    let mid = tx("ana", "Food", "iFood", 40.0, at(2024, 2, 5, 12));
    let new = tx("ana", "Food", "iFood", 50.0, at(2024, 3, 5, 12));
    let other = tx("bruno", "Food", "iFood", 60.0, at(2024, 3, 6, 12));
    for t in [&mid, &old, &other, &new] {
        db.create_transaction(t).unwrap();
    }

    let listed = db.list_transactions_by_user("ana", 50).unwrap();
    let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![new.id.as_str(), mid.id.as_str(), old.id.as_str()]);

    let limited = db.list_transactions_by_user("ana", 2).unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].id, new.id);

    assert_eq!(db.count_transactions(Some("ana")).unwrap(), 3);
    assert_eq!(db.count_transactions(None).unwrap(), 4);
}

#[test]
fn test_list_by_user_and_month() {
    let db = Database::in_memory().unwrap();
    db.create_transaction(&tx("ana", "Food", "iFood", 30.0, at(2024, 2, 29, 23)))
        .unwrap();
    db.create_transaction(&tx("ana", "Food", "iFood", 40.0, at(2024, 3, 1, 0)))
        .unwrap();
    db.create_transaction(&tx("bruno", "Food", "iFood", 50.0, at(2024, 3, 2, 0)))
        .unwrap();

    let march = db.list_transactions_by_user_and_month("ana", "2024-03").unwrap();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].amount, 40.0);

    let feb = db.list_transactions_by_user_and_month("ana", "2024-02").unwrap();
    assert_eq!(feb.len(), 1);
    assert!(db
        .list_transactions_by_user_and_month("ana", "2023-12")
        .unwrap()
        .is_empty());
}

#[test]
fn test_update_transaction() {
    let db = Database::in_memory().unwrap();
    let mut record = tx("ana", "Other", "not identified", 10.0, at(2024, 3, 1, 9));
    db.create_transaction(&record).unwrap();

    record.category = "Food".to_string();
    record.store = "Padaria".to_string();
    record.amount = 12.5;
    db.update_transaction(&record).unwrap();

    let loaded = db.get_transaction(&record.id).unwrap().unwrap();
    assert_eq!(loaded.category, "Food");
    assert_eq!(loaded.store, "Padaria");
    assert_eq!(loaded.amount, 12.5);
}

#[test]
fn test_update_missing_transaction_is_not_found() {
    let db = Database::in_memory().unwrap();
    let record = tx("ana", "Food", "iFood", 10.0, at(2024, 3, 1, 9));
    let result = db.update_transaction(&record);
    assert!(matches!(result, Err(crate::error::Error::NotFound(_))));
}

#[test]
fn test_delete_transaction() {
    let db = Database::in_memory().unwrap();
    let record = tx("ana", "Food", "iFood", 10.0, at(2024, 3, 1, 9));
    db.create_transaction(&record).unwrap();

    assert!(db.delete_transaction(&record.id).unwrap());
    assert!(!db.delete_transaction(&record.id).unwrap());
    assert!(db.get_transaction(&record.id).unwrap().is_none());
}

#[test]
fn test_monthly_report() {
    let db = Database::in_memory().unwrap();
    let march = |day| at(2024, 3, day, 10);
    db.create_transaction(&tx("ana", "Transport", "Uber", 37.0, march(1)))
        .unwrap();
    db.create_transaction(&tx("ana", "Transport", "Uber", 23.0, march(2)))
        .unwrap();
    db.create_transaction(&tx("ana", "Entertainment", "Netflix", 40.0, march(3)))
        .unwrap();
    // Other month and other user are excluded
    db.create_transaction(&tx("ana", "Food", "iFood", 99.0, at(2024, 4, 1, 10)))
        .unwrap();
    db.create_transaction(&tx("bruno", "Food", "iFood", 99.0, march(4)))
        .unwrap();

    let report = db.monthly_report("ana", "2024-03").unwrap();
    assert_eq!(report.user_id, "ana");
    assert_eq!(report.month, "2024-03");
    assert_eq!(report.total_spent, 100.0);
    assert_eq!(report.transaction_count, 3);

    let transport = &report.categories["Transport"];
    assert_eq!(transport.total, 60.0);
    assert_eq!(transport.count, 2);
    assert_eq!(transport.percentage, 60.0);
    assert_eq!(report.categories["Entertainment"].percentage, 40.0);
    assert!(!report.categories.contains_key("Food"));

    assert_eq!(report.stores["Uber"], 60.0);
    assert_eq!(report.stores["Netflix"], 40.0);
}

#[test]
fn test_monthly_report_rounds_percentages() {
    let db = Database::in_memory().unwrap();
    for category in ["A", "B", "C"] {
        db.create_transaction(&tx("ana", category, "Loja", 10.0, at(2024, 5, 1, 10)))
            .unwrap();
    }
    let report = db.monthly_report("ana", "2024-05").unwrap();
    assert_eq!(report.categories["A"].percentage, 33.33);
    assert_eq!(report.stores["Loja"], 30.0);
}

#[test]
fn test_monthly_report_empty_month() {
    let db = Database::in_memory().unwrap();
    let report = db.monthly_report("ana", "2024-03").unwrap();
    assert_eq!(report.total_spent, 0.0);
    assert_eq!(report.transaction_count, 0);
    assert!(report.categories.is_empty());
    assert!(report.stores.is_empty());
}

#[test]
fn test_monthly_report_zero_amounts() {
    let db = Database::in_memory().unwrap();
    db.create_transaction(&tx("ana", "Other", "not identified", 0.0, at(2024, 3, 1, 10)))
        .unwrap();
    let report = db.monthly_report("ana", "2024-03").unwrap();
    assert_eq!(report.transaction_count, 1);
    assert_eq!(report.categories["Other"].percentage, 0.0);
}
