//! Monthly spending reports

use std::collections::BTreeMap;

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{CategorySummary, MonthlyReport};

/// Round to 2 decimal places
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Database {
    /// Aggregate one user's spending for a YYYY-MM month
    ///
    /// Category percentages are shares of the month total, rounded to 2 decimals.
    /// A month without transactions yields zero totals and empty maps.
    pub fn monthly_report(&self, user_id: &str, month: &str) -> Result<MonthlyReport> {
        let conn = self.conn()?;

        let (total_spent, transaction_count): (f64, i64) = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0), COUNT(*) FROM transactions WHERE user_id = ? AND month = ?",
            params![user_id, month],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt = conn.prepare(
            r#"
            SELECT category, COALESCE(SUM(amount), 0), COUNT(*)
            FROM transactions
            WHERE user_id = ? AND month = ?
            GROUP BY category
            "#,
        )?;
        let categories = stmt
            .query_map(params![user_id, month], |row| {
                let total: f64 = row.get(1)?;
                Ok((
                    row.get::<_, String>(0)?,
                    CategorySummary {
                        total,
                        count: row.get(2)?,
                        percentage: if total_spent > 0.0 {
                            round2(total / total_spent * 100.0)
                        } else {
                            0.0
                        },
                    },
                ))
            })?
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT store, COALESCE(SUM(amount), 0)
            FROM transactions
            WHERE user_id = ? AND month = ?
            GROUP BY store
            "#,
        )?;
        let stores = stmt
            .query_map(params![user_id, month], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<std::result::Result<BTreeMap<_, _>, _>>()?;

        tracing::debug!(
            user_id = %user_id,
            month = %month,
            transaction_count,
            total_spent,
            "Monthly report built"
        );

        Ok(MonthlyReport {
            user_id: user_id.to_string(),
            month: month.to_string(),
            total_spent,
            transaction_count,
            categories,
            stores,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::round2;

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.33333), 33.33);
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(100.0), 100.0);
    }
}
