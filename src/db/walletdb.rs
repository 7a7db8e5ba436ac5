// db/walletdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::walletmodels::{Transaction, TransactionStatus, TransactionType};

const TRANSACTION_COLUMNS: &str = r#"
    id, worker_id, job_id, amount, transaction_type, status, description, created_at
"#;

#[async_trait]
pub trait WalletExt {
    /// Pure append; ledger rows are never rewritten.
    async fn append_transaction(
        &self,
        worker_id: Uuid,
        job_id: Option<Uuid>,
        amount: BigDecimal,
        transaction_type: TransactionType,
        status: TransactionStatus,
        description: String,
    ) -> Result<Transaction, Error>;

    async fn get_transactions_for_worker(&self, worker_id: Uuid)
        -> Result<Vec<Transaction>, Error>;

    /// Derived balance: fold of non-failed rows, computed in SQL. Never
    /// read from a stored column.
    async fn compute_balance(&self, worker_id: Uuid) -> Result<BigDecimal, Error>;

    /// Single status advance Pending -> Completed/Failed; the conditional
    /// WHERE makes a second advance return `None`.
    async fn advance_transaction_status(
        &self,
        transaction_id: Uuid,
        to_status: TransactionStatus,
    ) -> Result<Option<Transaction>, Error>;

    async fn get_all_withdrawals(&self) -> Result<Vec<Transaction>, Error>;
}

#[async_trait]
impl WalletExt for DBClient {
    async fn append_transaction(
        &self,
        worker_id: Uuid,
        job_id: Option<Uuid>,
        amount: BigDecimal,
        transaction_type: TransactionType,
        status: TransactionStatus,
        description: String,
    ) -> Result<Transaction, Error> {
        sqlx::query_as::<_, Transaction>(&format!(
            r#"
            INSERT INTO transactions
            (worker_id, job_id, amount, transaction_type, status, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(worker_id)
        .bind(job_id)
        .bind(amount)
        .bind(transaction_type)
        .bind(status)
        .bind(description)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_transactions_for_worker(
        &self,
        worker_id: Uuid,
    ) -> Result<Vec<Transaction>, Error> {
        sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE worker_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn compute_balance(&self, worker_id: Uuid) -> Result<BigDecimal, Error> {
        let balance: Option<BigDecimal> = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(
                CASE WHEN transaction_type = 'credit'::transaction_type
                     THEN amount ELSE -amount END
            ), 0)
            FROM transactions
            WHERE worker_id = $1
              AND status != 'failed'::transaction_status
            "#,
        )
        .bind(worker_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance.unwrap_or_else(|| BigDecimal::from(0)))
    }

    async fn advance_transaction_status(
        &self,
        transaction_id: Uuid,
        to_status: TransactionStatus,
    ) -> Result<Option<Transaction>, Error> {
        sqlx::query_as::<_, Transaction>(&format!(
            r#"
            UPDATE transactions
            SET status = $2
            WHERE id = $1
              AND status = 'pending'::transaction_status
            RETURNING {TRANSACTION_COLUMNS}
            "#
        ))
        .bind(transaction_id)
        .bind(to_status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_all_withdrawals(&self) -> Result<Vec<Transaction>, Error> {
        sqlx::query_as::<_, Transaction>(&format!(
            r#"
            SELECT {TRANSACTION_COLUMNS} FROM transactions
            WHERE transaction_type = 'debit'::transaction_type
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }
}
