//! Transaction repository: payout records keyed by caller-supplied ID.

use chrono::Utc;

use mart_core::entities::{NewTransaction, Transaction};
use mart_core::enums::Collection;
use mart_core::responses::WriteStatus;

use crate::error::DatabaseError;
use crate::helpers::parse_datetime;
use crate::repos::rejected;
use crate::service::MartService;

fn row_to_transaction(row: &libsql::Row) -> Result<Transaction, DatabaseError> {
    Ok(Transaction {
        transaction_id: row.get::<String>(0)?,
        project_id: row.get::<String>(1)?,
        seller_id: row.get::<String>(2)?,
        buyer_id: row.get::<String>(3)?,
        amount: row.get::<f64>(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl MartService {
    /// Record a payout. Balances are not touched here; see `workflow::settle_survey`.
    pub async fn pay(&self, tx: &NewTransaction) -> Result<WriteStatus, DatabaseError> {
        if let Err(e) = tx.validate() {
            return Ok(rejected(Collection::Transactions, e.to_string()));
        }

        let inserted = self
            .db()
            .conn()
            .execute(
                "INSERT INTO transactions
                    (transaction_id, project_id, seller_id, buyer_id, amount, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT(transaction_id) DO NOTHING",
                libsql::params![
                    tx.transaction_id.as_str(),
                    tx.project_id.as_str(),
                    tx.seller_id.as_str(),
                    tx.buyer_id.as_str(),
                    tx.amount,
                    Utc::now().to_rfc3339()
                ],
            )
            .await?;

        if inserted == 0 {
            return Ok(rejected(
                Collection::Transactions,
                format!("transaction '{}' already recorded", tx.transaction_id),
            ));
        }

        tracing::debug!(
            transaction_id = %tx.transaction_id,
            project_id = %tx.project_id,
            amount = tx.amount,
            "transaction recorded"
        );
        Ok(WriteStatus::Success)
    }

    pub async fn get_transaction(
        &self,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT transaction_id, project_id, seller_id, buyer_id, amount, created_at
                 FROM transactions WHERE transaction_id = ?1",
                [transaction_id],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_transaction(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn list_transactions_for_project(
        &self,
        project_id: &str,
    ) -> Result<Vec<Transaction>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT transaction_id, project_id, seller_id, buyer_id, amount, created_at
                 FROM transactions WHERE project_id = ?1 ORDER BY created_at, transaction_id",
                [project_id],
            )
            .await?;
        let mut txs = Vec::new();
        while let Some(row) = rows.next().await? {
            txs.push(row_to_transaction(&row)?);
        }
        Ok(txs)
    }

    /// Returns whether a transaction was removed.
    pub async fn delete_transaction(&self, transaction_id: &str) -> Result<bool, DatabaseError> {
        let deleted = self
            .db()
            .conn()
            .execute(
                "DELETE FROM transactions WHERE transaction_id = ?1",
                [transaction_id],
            )
            .await?;
        tracing::debug!(transaction_id, deleted, "delete transaction");
        Ok(deleted > 0)
    }
}
