use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
pub enum TransactionType {
    Credit,
    Debit,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "transaction_status", rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

/// Append-only ledger row. `amount` is always positive; direction is
/// carried by `transaction_type`. The only permitted mutation is a single
/// status advance Pending -> Completed/Failed.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub worker_id: Uuid,
    pub job_id: Option<Uuid>,
    pub amount: BigDecimal,
    pub transaction_type: TransactionType,
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: Option<DateTime<Utc>>,
}

/// Fold a worker's ledger into a balance: credits add, debits subtract,
/// failed rows are ignored. The balance is never stored.
pub fn derive_balance(transactions: &[Transaction]) -> BigDecimal {
    transactions
        .iter()
        .filter(|t| t.status != TransactionStatus::Failed)
        .fold(BigDecimal::zero(), |acc, t| match t.transaction_type {
            TransactionType::Credit => acc + &t.amount,
            TransactionType::Debit => acc - &t.amount,
        })
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
    fn credit_then_equal_debit_restores_balance() {
        let before = vec![row("500", TransactionType::Credit, TransactionStatus::Completed)];
        let base = derive_balance(&before);

        let mut after = before;
        after.push(row("350", TransactionType::Credit, TransactionStatus::Completed));
        after.push(row("350", TransactionType::Debit, TransactionStatus::Completed));

        assert_eq!(derive_balance(&after), base);
    }

    #[test]
    fn failed_rows_do_not_count() {
        let rows = vec![
            row("1000", TransactionType::Credit, TransactionStatus::Completed),
            row("400", TransactionType::Debit, TransactionStatus::Failed),
            row("250", TransactionType::Credit, TransactionStatus::Failed),
        ];
        assert_eq!(derive_balance(&rows), BigDecimal::from_str("1000").unwrap());
    }

    #[test]
    fn pending_debits_reserve_funds() {
        let rows = vec![
            row("1000", TransactionType::Credit, TransactionStatus::Completed),
            row("600", TransactionType::Debit, TransactionStatus::Pending),
        ];
        assert_eq!(derive_balance(&rows), BigDecimal::from_str("400").unwrap());
    }

    #[test]
    fn empty_ledger_is_zero() {
        assert_eq!(derive_balance(&[]), BigDecimal::zero());
    }
}
