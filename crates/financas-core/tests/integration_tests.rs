//! Integration tests for financas-core
//!
//! These tests exercise the full description -> analysis -> record -> report workflow.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use financas_core::{
    text_analysis::Facet, AnalyzerConfig, AnalyzerMode, Database, ExpenseAnalysis,
    ExpenseAnalyzer, ExpenseService, FailurePolicy, KeywordTables, MockTextAnalysisBackend,
    TextAnalysisClient, TransactionType, DEGRADED_CONFIDENCE, STORE_NOT_IDENTIFIED,
};

/// Reference descriptions with their expected (amount, store, category, type)
fn reference_cases() -> Vec<(&'static str, f64, &'static str, &'static str, TransactionType)> {
    vec![
        (
            "Paguei 37 reais no Uber para o trabalho",
            37.0,
            "Uber",
            "Transport",
            TransactionType::Service,
        ),
        (
            "Netflix assinatura mensal 29,90",
            29.9,
            "Netflix",
            "Entertainment",
            TransactionType::Subscription,
        ),
        (
            "Supermercado Extra compras 156,50",
            156.5,
            "Extra",
            "Supermarket",
            TransactionType::Product,
        ),
    ]
}

fn augmented(mock: MockTextAnalysisBackend, policy: FailurePolicy) -> ExpenseAnalyzer {
    let config = AnalyzerConfig {
        mode: AnalyzerMode::Augmented,
        policy,
        ..Default::default()
    };
    ExpenseAnalyzer::build(
        &config,
        Arc::new(KeywordTables::builtin().unwrap()),
        Some(TextAnalysisClient::Mock(mock)),
    )
    .unwrap()
}

// =============================================================================
// Analyzer Integration Tests
// =============================================================================

#[tokio::test]
async fn test_reference_cases_in_every_mode() {
    let analyzers = [
        ExpenseAnalyzer::rules().unwrap(),
        augmented(MockTextAnalysisBackend::new(), FailurePolicy::Substitute),
        augmented(MockTextAnalysisBackend::unavailable(), FailurePolicy::Substitute),
    ];

    for analyzer in &analyzers {
        for (text, amount, store, category, tx_type) in reference_cases() {
            let info = analyzer.analyze(text).await;
            assert_eq!(info.amount, amount, "{} ({})", text, analyzer.mode());
            assert_eq!(info.store, store, "{} ({})", text, analyzer.mode());
            assert_eq!(info.category, category, "{} ({})", text, analyzer.mode());
            assert_eq!(info.transaction_type, tx_type, "{} ({})", text, analyzer.mode());
        }
    }
}

#[tokio::test]
async fn test_unavailable_service_degrades_every_call() {
    let analyzer = augmented(MockTextAnalysisBackend::unavailable(), FailurePolicy::Substitute);

    for (text, ..) in reference_cases() {
        let info = analyzer.analyze(text).await;
        assert_eq!(info.confidence, DEGRADED_CONFIDENCE);
        assert!(info.raw_analysis.is_none());
    }
}

#[tokio::test]
async fn test_failure_policies_differ_on_partial_failure() {
    let partial = || MockTextAnalysisBackend::new().failing(Facet::Sentiment);
    let text = "Paguei 37 reais no Uber para o trabalho";

    let substitute = augmented(partial(), FailurePolicy::Substitute).analyze(text).await;
    assert!(substitute.raw_analysis.is_some());
    assert_eq!(substitute.confidence, 1.0);

    let fallback = augmented(partial(), FailurePolicy::Fallback).analyze(text).await;
    assert!(fallback.raw_analysis.is_none());
    assert_eq!(fallback.confidence, DEGRADED_CONFIDENCE);
}

#[tokio::test]
async fn test_nonsense_input_in_every_mode() {
    for analyzer in [
        ExpenseAnalyzer::rules().unwrap(),
        augmented(MockTextAnalysisBackend::new(), FailurePolicy::Substitute),
    ] {
        let info = analyzer.analyze("oi").await;
        assert_eq!(info.amount, 0.0);
        assert_eq!(info.store, STORE_NOT_IDENTIFIED);
        assert_eq!(info.category, "Other");
        assert_eq!(info.transaction_type, TransactionType::Product);
        assert!((0.0..=1.0).contains(&info.confidence));
    }
}

#[tokio::test]
async fn test_custom_keyword_tables() {
    let tables = KeywordTables::parse(
        r#"
        default_category = "Misc"

        [[categories]]
        name = "Pets"
        keywords = ["ração", "petshop"]

        [[stores]]
        pattern = "petz"
        name = "Petz"
        "#,
    )
    .unwrap();
    let analyzer =
        ExpenseAnalyzer::build(&AnalyzerConfig::default(), Arc::new(tables), None).unwrap();

    let info = analyzer.analyze("Ração na Petz 120 reais").await;
    assert_eq!(info.category, "Pets");
    assert_eq!(info.store, "Petz");
    assert_eq!(info.amount, 120.0);

    let info = analyzer.analyze("nada").await;
    assert_eq!(info.category, "Misc");
}

// =============================================================================
// Service Integration Tests
// =============================================================================

#[tokio::test]
async fn test_record_and_report_workflow() {
    let db = Database::in_memory().expect("Failed to create in-memory database");
    let service = ExpenseService::new(
        augmented(MockTextAnalysisBackend::new(), FailurePolicy::Substitute),
        db.clone(),
    );

    let march = Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap();
    let april = Utc.with_ymd_and_hms(2024, 4, 2, 18, 0, 0).unwrap();

    for (text, ..) in reference_cases() {
        service.record_expense_at("ana", text, march).await.unwrap();
    }
    service
        .record_expense_at("ana", "Uber 20 reais", april)
        .await
        .unwrap();
    service
        .record_expense_at("bruno", "Uber 99 reais", march)
        .await
        .unwrap();

    // Raw analysis survives the round trip
    let listed = db.list_transactions_by_user("ana", 50).unwrap();
    assert_eq!(listed.len(), 4);
    assert_eq!(listed[0].month, "2024-04");
    assert!(listed.iter().all(|t| t.raw_analysis.is_some()));

    let report = service.monthly_report("ana", Some("2024-03")).unwrap();
    assert_eq!(report.transaction_count, 3);
    assert!((report.total_spent - 223.4).abs() < 1e-9);
    assert_eq!(report.categories["Transport"].count, 1);
    assert_eq!(report.stores["Extra"], 156.5);

    let percentages: f64 = report.categories.values().map(|c| c.percentage).sum();
    assert!((percentages - 100.0).abs() < 0.05);
}

#[tokio::test]
async fn test_degraded_records_are_stored_without_raw_analysis() {
    let db = Database::in_memory().unwrap();
    let service = ExpenseService::new(
        augmented(MockTextAnalysisBackend::unavailable(), FailurePolicy::Substitute),
        db.clone(),
    );

    let tx = service
        .record_expense("ana", "Netflix assinatura mensal 29,90")
        .await
        .unwrap();
    let stored = db.get_transaction(&tx.id).unwrap().unwrap();
    assert_eq!(stored.confidence, Some(DEGRADED_CONFIDENCE));
    assert!(stored.raw_analysis.is_none());
    assert_eq!(stored.amount, 29.9);
}
