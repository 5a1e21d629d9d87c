//! Expense service: analyze a description and record the result
//!
//! This is the orchestrator both the HTTP API and the CLI go through.

use chrono::{DateTime, SubsecRound, Utc};
use tracing::info;

use crate::analyzer::{ExpenseAnalysis, ExpenseAnalyzer};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{current_month, is_valid_month, ExtractedExpenseInfo, MonthlyReport, Transaction};

/// User id recorded when the caller does not provide one
pub const DEFAULT_USER_ID: &str = "default-user";

/// Analyzer plus record store
#[derive(Clone)]
pub struct ExpenseService {
    analyzer: ExpenseAnalyzer,
    db: Database,
}

impl ExpenseService {
    pub fn new(analyzer: ExpenseAnalyzer, db: Database) -> Self {
        Self { analyzer, db }
    }

    pub fn analyzer(&self) -> &ExpenseAnalyzer {
        &self.analyzer
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    /// Analyze without recording
    pub async fn analyze(&self, description: &str) -> Result<ExtractedExpenseInfo> {
        let description = validate_description(description)?;
        Ok(self.analyzer.analyze(description).await)
    }

    /// Analyze a description and persist it as a new transaction
    pub async fn record_expense(&self, user_id: &str, description: &str) -> Result<Transaction> {
        // Stored timestamps keep microseconds
        self.record_expense_at(user_id, description, Utc::now().trunc_subsecs(6))
            .await
    }

    /// Same as [`record_expense`](Self::record_expense) with an explicit timestamp
    pub async fn record_expense_at(
        &self,
        user_id: &str,
        description: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        let description = validate_description(description)?;
        let user_id = match user_id.trim() {
            "" => DEFAULT_USER_ID,
            user => user,
        };

        let info = self.analyzer.analyze(description).await;
        let transaction = Transaction::from_analysis(user_id, description, info, created_at);
        self.db.create_transaction(&transaction)?;

        info!(
            id = %transaction.id,
            user_id = %transaction.user_id,
            category = %transaction.category,
            amount = transaction.amount,
            mode = self.analyzer.mode(),
            "Expense recorded"
        );
        Ok(transaction)
    }

    /// Monthly report; `month` defaults to the current UTC month
    pub fn monthly_report(&self, user_id: &str, month: Option<&str>) -> Result<MonthlyReport> {
        let user_id = user_id.trim();
        if user_id.is_empty() {
            return Err(Error::InvalidData("userId is required".to_string()));
        }

        let month = match month.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) if is_valid_month(m) => m.to_string(),
            Some(m) => {
                return Err(Error::InvalidData(format!(
                    "Invalid month '{}', expected YYYY-MM",
                    m
                )))
            }
            None => current_month(),
        };

        self.db.monthly_report(user_id, &month)
    }
}

fn validate_description(description: &str) -> Result<&str> {
    let description = description.trim();
    if description.is_empty() {
        return Err(Error::InvalidData("description is required".to_string()));
    }
    Ok(description)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn service() -> ExpenseService {
        ExpenseService::new(
            ExpenseAnalyzer::rules().unwrap(),
            Database::in_memory().unwrap(),
        )
    }

    #[tokio::test]
    async fn test_record_expense_persists() {
        let service = service();
        let tx = service
            .record_expense("ana", "Paguei 37 reais no Uber para o trabalho")
            .await
            .unwrap();

        assert_eq!(tx.amount, 37.0);
        assert_eq!(tx.category, "Transport");
        assert_eq!(tx.description, "Paguei 37 reais no Uber para o trabalho");
        let stored = service.db().get_transaction(&tx.id).unwrap().unwrap();
        assert_eq!(stored, tx);
    }

    #[tokio::test]
    async fn test_blank_user_gets_default() {
        let tx = service().record_expense("  ", "Uber 10").await.unwrap();
        assert_eq!(tx.user_id, DEFAULT_USER_ID);
    }

    #[tokio::test]
    async fn test_empty_description_rejected() {
        let service = service();
        let result = service.record_expense("ana", "   ").await;
        assert!(matches!(result, Err(Error::InvalidData(_))));
        assert!(service.analyze("").await.is_err());
        assert_eq!(service.db().count_transactions(None).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_monthly_report_through_service() {
        let service = service();
        let march = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        service
            .record_expense_at("ana", "Paguei 37 reais no Uber", march)
            .await
            .unwrap();
        service
            .record_expense_at("ana", "Netflix assinatura mensal 29,90", march)
            .await
            .unwrap();

        let report = service.monthly_report("ana", Some("2024-03")).unwrap();
        assert_eq!(report.transaction_count, 2);
        assert!((report.total_spent - 66.9).abs() < 1e-9);
        assert_eq!(report.categories.len(), 2);
    }

    #[test]
    fn test_monthly_report_validation() {
        let service = service();
        assert!(matches!(
            service.monthly_report("", None),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            service.monthly_report("ana", Some("03/2024")),
            Err(Error::InvalidData(_))
        ));

        // Blank month falls back to the current one
        let report = service.monthly_report("ana", Some(" ")).unwrap();
        assert_eq!(report.month, current_month());
    }
}
