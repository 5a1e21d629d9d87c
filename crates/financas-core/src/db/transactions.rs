//! Transaction operations

use rusqlite::{params, OptionalExtension};

use super::{format_datetime, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Transaction;

const SELECT_COLUMNS: &str = "SELECT id, user_id, description, category, amount, store, type,
        created_at, month, confidence, raw_analysis
 FROM transactions";

impl Database {
    /// Insert a new transaction record
    pub fn create_transaction(&self, tx: &Transaction) -> Result<()> {
        let conn = self.conn()?;
        let raw_analysis = tx
            .raw_analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        conn.execute(
            r#"
            INSERT INTO transactions (id, user_id, description, category, amount, store, type, created_at, month, confidence, raw_analysis)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.id,
                tx.user_id,
                tx.description,
                tx.category,
                tx.amount,
                tx.store,
                tx.transaction_type.as_str(),
                format_datetime(&tx.created_at),
                tx.month,
                tx.confidence,
                raw_analysis,
            ],
        )?;

        Ok(())
    }

    /// Map a row selected with `SELECT_COLUMNS` to a Transaction
    pub(crate) fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let type_str: String = row.get(6)?;
        let created_at_str: String = row.get(7)?;
        let raw_analysis_str: Option<String> = row.get(10)?;
        Ok(Transaction {
            id: row.get(0)?,
            user_id: row.get(1)?,
            description: row.get(2)?,
            category: row.get(3)?,
            amount: row.get(4)?,
            store: row.get(5)?,
            transaction_type: type_str.parse().unwrap_or_default(),
            created_at: parse_datetime(&created_at_str),
            month: row.get(8)?,
            confidence: row.get(9)?,
            raw_analysis: raw_analysis_str.and_then(|s| serde_json::from_str(&s).ok()),
        })
    }

    /// Get a single transaction by ID
    pub fn get_transaction(&self, id: &str) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!("{} WHERE id = ?", SELECT_COLUMNS))?;

        let transaction = stmt
            .query_row(params![id], |row| Self::row_to_transaction(row))
            .optional()?;

        Ok(transaction)
    }

    /// A user's most recent transactions, newest first
    pub fn list_transactions_by_user(&self, user_id: &str, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE user_id = ? ORDER BY created_at DESC, id LIMIT ?",
            SELECT_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, limit], |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// All of a user's transactions in a YYYY-MM month, newest first
    pub fn list_transactions_by_user_and_month(
        &self,
        user_id: &str,
        month: &str,
    ) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "{} WHERE user_id = ? AND month = ? ORDER BY created_at DESC, id",
            SELECT_COLUMNS
        ))?;

        let transactions = stmt
            .query_map(params![user_id, month], |row| Self::row_to_transaction(row))?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Overwrite every mutable field of an existing record
    ///
    /// The month is re-derived by the caller; `id` and `user_id` identify the row.
    pub fn update_transaction(&self, tx: &Transaction) -> Result<()> {
        let conn = self.conn()?;
        let raw_analysis = tx
            .raw_analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let updated = conn.execute(
            r#"
            UPDATE transactions
            SET description = ?, category = ?, amount = ?, store = ?, type = ?,
                created_at = ?, month = ?, confidence = ?, raw_analysis = ?
            WHERE id = ? AND user_id = ?
            "#,
            params![
                tx.description,
                tx.category,
                tx.amount,
                tx.store,
                tx.transaction_type.as_str(),
                format_datetime(&tx.created_at),
                tx.month,
                tx.confidence,
                raw_analysis,
                tx.id,
                tx.user_id,
            ],
        )?;

        if updated == 0 {
            return Err(Error::NotFound(format!("transaction {}", tx.id)));
        }
        Ok(())
    }

    /// Delete a transaction; returns false when it did not exist
    pub fn delete_transaction(&self, id: &str) -> Result<bool> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        Ok(deleted > 0)
    }

    /// Count transactions, optionally for one user
    pub fn count_transactions(&self, user_id: Option<&str>) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 = match user_id {
            Some(user) => conn.query_row(
                "SELECT COUNT(*) FROM transactions WHERE user_id = ?",
                params![user],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?,
        };
        Ok(count)
    }
}
