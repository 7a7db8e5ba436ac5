use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, walletdb::WalletExt},
    dtos::walletdtos::{TransactionDto, WalletSummaryDto},
    models::walletmodels::{derive_balance, Transaction, TransactionStatus, TransactionType},
    service::{
        error::ServiceError,
        notification_service::{best_effort, NotificationService},
    },
};

/// Wallet operations over the append-only ledger. The balance is always a
/// fold of the rows; no stored counter exists to drift.
#[derive(Debug, Clone)]
pub struct WalletService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl WalletService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    /// One fetch backs both the list and the derived figures, so the
    /// summary can never disagree with the rows it shows.
    pub async fn summary(&self, worker_id: Uuid) -> Result<WalletSummaryDto, ServiceError> {
        let transactions = self
            .db_client
            .get_transactions_for_worker(worker_id)
            .await?;

        Ok(build_summary(&transactions))
    }

    /// Reject-before-insert: an over-balance or non-positive request
    /// writes nothing.
    pub async fn request_withdrawal(
        &self,
        worker_id: Uuid,
        amount: f64,
    ) -> Result<Transaction, ServiceError> {
        if amount <= 0.0 {
            return Err(ServiceError::Validation(
                "Withdrawal amount must be positive".to_string(),
            ));
        }

        let amount_bd = BigDecimal::try_from(amount)
            .map_err(|_| ServiceError::Validation("Invalid amount".to_string()))?;

        let balance = self.db_client.compute_balance(worker_id).await?;
        if amount_bd > balance {
            return Err(ServiceError::InsufficientBalance {
                requested: amount,
                available: balance.to_f64().unwrap_or(0.0),
            });
        }

        let transaction = self
            .db_client
            .append_transaction(
                worker_id,
                None,
                amount_bd,
                TransactionType::Debit,
                TransactionStatus::Pending,
                "Withdrawal Request".to_string(),
            )
            .await?;

        tracing::info!(worker_id = %worker_id, amount = amount, "withdrawal requested");
        Ok(transaction)
    }

    /// Operator settlement of a pending withdrawal; the conditional update
    /// makes a second settlement attempt fail rather than double-advance.
    pub async fn settle_withdrawal(
        &self,
        transaction_id: Uuid,
        approve: bool,
    ) -> Result<Transaction, ServiceError> {
        let to_status = if approve {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Failed
        };

        let transaction = self
            .db_client
            .advance_transaction_status(transaction_id, to_status)
            .await?
            .ok_or(ServiceError::WithdrawalNotPending(transaction_id))?;

        best_effort(
            self.notification_service
                .notify_withdrawal_settled(
                    transaction.worker_id,
                    transaction.amount.to_f64().unwrap_or(0.0),
                    approve,
                )
                .await,
            "withdrawal settled",
        );
        Ok(transaction)
    }

    pub async fn all_withdrawals(&self) -> Result<Vec<Transaction>, ServiceError> {
        Ok(self.db_client.get_all_withdrawals().await?)
    }
}

/// Fold a worker's rows into the summary figures. Pending debits reduce
/// the spendable balance; failed rows count nowhere.
pub fn build_summary(transactions: &[Transaction]) -> WalletSummaryDto {
    let balance = derive_balance(transactions);

    let total_earned: BigDecimal = transactions
        .iter()
        .filter(|t| {
            t.transaction_type == TransactionType::Credit
                && t.status == TransactionStatus::Completed
        })
        .fold(BigDecimal::from(0), |acc, t| acc + &t.amount);

    let pending_withdrawals: BigDecimal = transactions
        .iter()
        .filter(|t| {
            t.transaction_type == TransactionType::Debit
                && t.status == TransactionStatus::Pending
        })
        .fold(BigDecimal::from(0), |acc, t| acc + &t.amount);

    WalletSummaryDto {
        balance: balance.to_f64().unwrap_or(0.0),
        total_earned: total_earned.to_f64().unwrap_or(0.0),
        pending_withdrawals: pending_withdrawals.to_f64().unwrap_or(0.0),
        transactions: transactions.iter().map(TransactionDto::from_transaction).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn row(amount: &str, kind: TransactionType, status: TransactionStatus) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            worker_id: Uuid::nil(),
            job_id: None,
            amount: BigDecimal::from_str(amount).unwrap(),
            transaction_type: kind,
            status,
            description: String::new(),
            created_at: None,
        }
    }

    #[test]
    fn summary_figures_agree_with_rows() {
        let rows = vec![
            row("350", TransactionType::Credit, TransactionStatus::Completed),
            row("500", TransactionType::Credit, TransactionStatus::Completed),
            row("200", TransactionType::Debit, TransactionStatus::Pending),
            row("100", TransactionType::Debit, TransactionStatus::Failed),
        ];

        let summary = build_summary(&rows);

        assert_eq!(summary.total_earned, 850.0);
        assert_eq!(summary.pending_withdrawals, 200.0);
        // Failed debit ignored, pending debit reserved: 850 - 200.
        assert_eq!(summary.balance, 650.0);
        assert_eq!(summary.transactions.len(), 4);
    }

    #[test]
    fn empty_wallet_summary_is_all_zero() {
        let summary = build_summary(&[]);
        assert_eq!(summary.balance, 0.0);
        assert_eq!(summary.total_earned, 0.0);
        assert_eq!(summary.pending_withdrawals, 0.0);
        assert!(summary.transactions.is_empty());
    }
}
