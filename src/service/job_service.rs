// service/job_service.rs
use std::sync::Arc;

use bigdecimal::BigDecimal;
use num_traits::ToPrimitive;
use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::{
    db::{categorydb::CategoryExt, db::DBClient, jobdb::JobExt},
    dtos::jobdtos::CreateJobDto,
    models::jobmodel::{Job, JobStatus},
    service::{
        error::ServiceError,
        notification_service::{best_effort, NotificationService},
    },
    utils::otp_generator::generate_otp,
};

/// Drives the job lifecycle. Every transition is validated against the
/// `JobStatus` relation before any row is touched, so an out-of-order
/// request can never corrupt a job.
#[derive(Debug, Clone)]
pub struct JobService {
    db_client: Arc<DBClient>,
    notification_service: Arc<NotificationService>,
}

impl JobService {
    pub fn new(db_client: Arc<DBClient>, notification_service: Arc<NotificationService>) -> Self {
        Self {
            db_client,
            notification_service,
        }
    }

    pub async fn create_job(
        &self,
        customer_id: Uuid,
        job_data: CreateJobDto,
    ) -> Result<Job, ServiceError> {
        // The category must exist at creation; it may be deleted later.
        self.db_client
            .get_category_by_id(job_data.category_id)
            .await?
            .ok_or(ServiceError::CategoryNotFound(job_data.category_id))?;

        let otp = generate_otp();

        let job = self
            .db_client
            .create_job(
                customer_id,
                job_data.category_id,
                job_data.description,
                job_data.images,
                job_data.location_address,
                job_data.location_lat,
                job_data.location_lng,
                job_data.scheduled_time,
                otp,
            )
            .await?;

        tracing::info!(job_id = %job.id, customer_id = %customer_id, "job created, searching for workers");
        Ok(job)
    }

    /// Accepted -> Arrived, by the assigned worker.
    pub async fn mark_arrived(&self, job_id: Uuid, worker_id: Uuid) -> Result<Job, ServiceError> {
        let job = self.load_for_worker(job_id, worker_id).await?;
        self.ensure_transition(&job, JobStatus::Arrived)?;

        let updated = self
            .db_client
            .update_job_status(job_id, JobStatus::Arrived)
            .await?;

        tracing::info!(job_id = %job_id, status = updated.status.to_str(), "worker marked arrival");
        best_effort(
            self.notification_service.notify_worker_arrived(&updated).await,
            "worker arrived",
        );
        Ok(updated)
    }

    /// Arrived -> InProgress, gated by the 4-digit start code. A mismatch
    /// changes nothing and reports `InvalidOtp`; retries are unlimited.
    pub async fn start_work(
        &self,
        job_id: Uuid,
        worker_id: Uuid,
        submitted_otp: &str,
    ) -> Result<Job, ServiceError> {
        let job = self.load_for_worker(job_id, worker_id).await?;
        self.ensure_transition(&job, JobStatus::InProgress)?;

        let otp_matches: bool = job
            .otp
            .as_bytes()
            .ct_eq(submitted_otp.as_bytes())
            .into();
        if !otp_matches {
            tracing::warn!(job_id = %job_id, worker_id = %worker_id, "start code mismatch");
            return Err(ServiceError::InvalidOtp);
        }

        let updated = self
            .db_client
            .update_job_status(job_id, JobStatus::InProgress)
            .await?;

        tracing::info!(job_id = %job_id, status = updated.status.to_str(), "start code verified");
        best_effort(
            self.notification_service.notify_work_started(&updated).await,
            "work started",
        );
        Ok(updated)
    }

    /// InProgress -> CompletedPendingPayment with the worker-entered
    /// amount. Undershooting the category base price is allowed but logged.
    pub async fn complete_work(
        &self,
        job_id: Uuid,
        worker_id: Uuid,
        amount: f64,
    ) -> Result<Job, ServiceError> {
        let job = self.load_for_worker(job_id, worker_id).await?;
        self.ensure_transition(&job, JobStatus::CompletedPendingPayment)?;

        let amount = BigDecimal::try_from(amount)
            .map_err(|_| ServiceError::Validation("Invalid amount".to_string()))?;

        if let Some(category) = self.db_client.get_category_by_id(job.category_id).await? {
            if amount < category.base_price {
                tracing::warn!(
                    job_id = %job_id,
                    amount = %amount,
                    base_price = %category.base_price,
                    "final amount is below the category base price"
                );
            }
        }

        let updated = self.db_client.complete_work(job_id, amount).await?;

        let due = updated
            .amount
            .as_ref()
            .and_then(|a| a.to_f64())
            .unwrap_or(0.0);
        best_effort(
            self.notification_service.notify_payment_due(&updated, due).await,
            "payment due",
        );
        Ok(updated)
    }

    /// Customer cancellation, legal from Searching or Accepted only.
    pub async fn cancel_job(&self, job_id: Uuid, customer_id: Uuid) -> Result<Job, ServiceError> {
        let job = self.load_for_customer(job_id, customer_id).await?;

        if !job.status.is_cancellable_by_customer() {
            return Err(ServiceError::InvalidTransition {
                job: job_id,
                from: job.status,
                to: JobStatus::Cancelled,
            });
        }

        let updated = self
            .db_client
            .update_job_status(job_id, JobStatus::Cancelled)
            .await?;

        tracing::info!(job_id = %job_id, from = job.status.to_str(), "job cancelled by customer");

        if let Some(worker_id) = updated.worker_id {
            best_effort(
                self.notification_service
                    .notify_job_cancelled(&updated, worker_id)
                    .await,
                "job cancelled",
            );
        }
        Ok(updated)
    }

    /// Customer issue report: Accepted/Arrived/InProgress -> Disputed.
    pub async fn report_issue(
        &self,
        job_id: Uuid,
        customer_id: Uuid,
        reason: String,
    ) -> Result<Job, ServiceError> {
        let job = self.load_for_customer(job_id, customer_id).await?;

        if !job.status.is_disputable() {
            return Err(ServiceError::InvalidTransition {
                job: job_id,
                from: job.status,
                to: JobStatus::Disputed,
            });
        }

        let updated = self.db_client.set_dispute(job_id, reason).await?;

        if let Some(worker_id) = updated.worker_id {
            best_effort(
                self.notification_service
                    .notify_dispute_opened(&updated, worker_id)
                    .await,
                "dispute opened",
            );
        }
        Ok(updated)
    }

    pub async fn get_job(&self, job_id: Uuid) -> Result<Job, ServiceError> {
        self.db_client
            .get_job_by_id(job_id)
            .await?
            .ok_or(ServiceError::JobNotFound(job_id))
    }

    async fn load_for_worker(&self, job_id: Uuid, worker_id: Uuid) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;
        if job.worker_id != Some(worker_id) {
            return Err(ServiceError::UnauthorizedJobAccess(worker_id, job_id));
        }
        Ok(job)
    }

    async fn load_for_customer(&self, job_id: Uuid, customer_id: Uuid) -> Result<Job, ServiceError> {
        let job = self.get_job(job_id).await?;
        if job.customer_id != customer_id {
            return Err(ServiceError::UnauthorizedJobAccess(customer_id, job_id));
        }
        Ok(job)
    }

    fn ensure_transition(&self, job: &Job, to: JobStatus) -> Result<(), ServiceError> {
        if !job.status.can_transition_to(to) {
            return Err(ServiceError::InvalidTransition {
                job: job.id,
                from: job.status,
                to,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[tokio::test]
    async fn job_service_api_is_callable() {
        let pool = PgPool::connect_lazy("postgres://localhost/fixlink").unwrap();
        let db_client = Arc::new(DBClient::new(pool));
        let notifications = Arc::new(NotificationService::new(db_client.clone()));
        let svc = JobService::new(db_client, notifications);

        // No live database here; just make sure the surface holds together.
        let _ = svc.get_job(Uuid::nil());
    }
}

