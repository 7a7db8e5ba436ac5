use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::walletmodels::{Transaction, TransactionStatus, TransactionType};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct WithdrawDto {
    #[validate(range(min = 1.0, message = "Withdrawal amount must be positive"))]
    pub amount: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SettleWithdrawalDto {
    pub approve: bool,
}

#[derive(Debug, Serialize)]
pub struct TransactionDto {
    pub id: Uuid,
    pub job_id: Option<Uuid>,
    pub amount: f64,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl TransactionDto {
    pub fn from_transaction(t: &Transaction) -> Self {
        use num_traits::ToPrimitive;
        TransactionDto {
            id: t.id,
            job_id: t.job_id,
            amount: t.amount.to_f64().unwrap_or(0.0),
            transaction_type: t.transaction_type,
            status: t.status,
            description: t.description.clone(),
            created_at: t.created_at,
        }
    }
}

/// Balance is derived from the rows below, never read from a stored field.
#[derive(Debug, Serialize)]
pub struct WalletSummaryDto {
    pub balance: f64,
    pub total_earned: f64,
    pub pending_withdrawals: f64,
    pub transactions: Vec<TransactionDto>,
}
