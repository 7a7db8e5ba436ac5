// service/dispute_service.rs
use std::sync::Arc;

use num_traits::ToPrimitive;
use uuid::Uuid;

use crate::{
    db::{categorydb::CategoryExt, db::DBClient, jobdb::JobExt, walletdb::WalletExt},
    dtos::jobdtos::DisputeResolution,
    models::{
        jobmodel::{Job, JobStatus},
        walletmodels::{TransactionStatus, TransactionType},
    },
    service::{
        error::ServiceError,
        notification_service::{best_effort, NotificationService},
    },
};

/// Administrative override of the normal lifecycle: a disputed job is
/// forced to exactly Completed (pay the worker) or Cancelled (refund the
/// customer), never back to an active state.
#[derive(Debug, Clone)]
pub struct DisputeService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl DisputeService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn list_disputes(&self) -> Result<Vec<Job>, ServiceError> {
        Ok(self.db_client.get_disputed_jobs().await?)
    }

    pub async fn resolve(
        &self,
        job_id: Uuid,
        resolution: DisputeResolution,
    ) -> Result<Job, ServiceError> {
        let job = self
            .db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))?;

        let target = match resolution {
            DisputeResolution::Payout => JobStatus::Completed,
            DisputeResolution::Refund => JobStatus::Cancelled,
        };

        if job.status != JobStatus::Disputed || !job.status.can_transition_to(target) {
            return Err(ServiceError::InvalidTransition {
                job: job_id,
                from: job.status,
                to: target,
            });
        }

        let updated = self.db_client.update_job_status(job_id, target).await?;

        match resolution {
            DisputeResolution::Payout => {
                self.credit_worker_for(&updated).await;
            }
            DisputeResolution::Refund => {
                // No ledger row on the refund path; the resolution
                // notification is the audit record.
                tracing::info!(job_id = %job_id, "dispute resolved as refund, no payout recorded");
            }
        }

        let outcome = match resolution {
            DisputeResolution::Payout => "the worker was paid",
            DisputeResolution::Refund => "the customer was refunded",
        };
        best_effort(
            self.notification_service
                .notify_dispute_resolved(updated.customer_id, &updated, outcome)
                .await,
            "dispute resolved (customer)",
        );
        if let Some(worker_id) = updated.worker_id {
            best_effort(
                self.notification_service
                    .notify_dispute_resolved(worker_id, &updated, outcome)
                    .await,
                "dispute resolved (worker)",
            );
        }

        Ok(updated)
    }

    /// Payout credit: the job amount when the worker got as far as
    /// entering one, else the category base price. Logged, not rolled
    /// back, on failure, like the settlement credit.
    async fn credit_worker_for(&self, job: &Job) {
        let Some(worker_id) = job.worker_id else {
            tracing::error!(job_id = %job.id, "payout resolution on a job with no worker");
            return;
        };

        let amount = match &job.amount {
            Some(amount) => Some(amount.clone()),
            None => match self.db_client.get_category_by_id(job.category_id).await {
                Ok(Some(category)) => Some(category.base_price),
                Ok(None) => None,
                Err(e) => {
                    tracing::error!(job_id = %job.id, "category lookup failed during payout: {}", e);
                    None
                }
            },
        };

        let Some(amount) = amount else {
            tracing::error!(job_id = %job.id, "no payable amount for dispute payout");
            return;
        };

        let short_id = &job.id.to_string()[..8];
        match self
            .db_client
            .append_transaction(
                worker_id,
                Some(job.id),
                amount.clone(),
                TransactionType::Credit,
                TransactionStatus::Completed,
                format!("Dispute payout for Job {}", short_id),
            )
            .await
        {
            Ok(_) => {
                best_effort(
                    self.notification_service
                        .notify_payment_received(worker_id, job, amount.to_f64().unwrap_or(0.0))
                        .await,
                    "dispute payout",
                );
            }
            Err(e) => {
                tracing::error!(
                    job_id = %job.id,
                    worker_id = %worker_id,
                    "ledger credit failed after dispute payout: {}", e
                );
            }
        }
    }
}
