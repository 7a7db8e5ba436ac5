// service/notification_service.rs
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    db::{db::DBClient, notificationdb::NotificationExt},
    models::{jobmodel::Job, notificationmodel::NotificationKind},
    service::error::ServiceError,
};

/// Writes per-user alert rows for lifecycle events. Delivery transport
/// (push, realtime) is the client's concern; these rows are the record.
/// Callers treat failures as best-effort secondary writes.
#[derive(Debug, Clone)]
pub struct NotificationService {
    db_client: Arc<DBClient>,
}

impl NotificationService {
    pub fn new(db_client: Arc<DBClient>) -> Self {
        Self { db_client }
    }

    async fn store(
        &self,
        user_id: Uuid,
        title: &str,
        message: String,
        kind: NotificationKind,
        link: Option<String>,
    ) -> Result<(), ServiceError> {
        self.db_client
            .insert_notification(user_id, title.to_string(), message, kind, link)
            .await
            .map_err(|e| ServiceError::Notification(e.to_string()))?;
        Ok(())
    }

    fn job_link(job: &Job) -> Option<String> {
        Some(format!("/jobs/{}", job.id))
    }

    pub async fn notify_job_accepted(
        &self,
        job: &Job,
        worker_name: &str,
    ) -> Result<(), ServiceError> {
        self.store(
            job.customer_id,
            "Worker found",
            format!("{} accepted your job and is on the way.", worker_name),
            NotificationKind::Success,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_worker_arrived(&self, job: &Job) -> Result<(), ServiceError> {
        self.store(
            job.customer_id,
            "Worker arrived",
            "Your worker has arrived. Share the start code to begin.".to_string(),
            NotificationKind::Info,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_work_started(&self, job: &Job) -> Result<(), ServiceError> {
        self.store(
            job.customer_id,
            "Work started",
            "The start code was verified and work is underway.".to_string(),
            NotificationKind::Info,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_payment_due(&self, job: &Job, amount: f64) -> Result<(), ServiceError> {
        self.store(
            job.customer_id,
            "Payment due",
            format!("Work is done. Please pay \u{20b9}{:.2} to close the job.", amount),
            NotificationKind::Warning,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_payment_received(
        &self,
        worker_id: Uuid,
        job: &Job,
        amount: f64,
    ) -> Result<(), ServiceError> {
        self.store(
            worker_id,
            "Payment received",
            format!("\u{20b9}{:.2} was credited to your wallet.", amount),
            NotificationKind::Success,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_job_cancelled(&self, job: &Job, worker_id: Uuid) -> Result<(), ServiceError> {
        self.store(
            worker_id,
            "Job cancelled",
            "The customer cancelled this job.".to_string(),
            NotificationKind::Warning,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_dispute_opened(&self, job: &Job, worker_id: Uuid) -> Result<(), ServiceError> {
        self.store(
            worker_id,
            "Issue reported",
            "The customer reported an issue with this job. An admin will review it.".to_string(),
            NotificationKind::Warning,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_dispute_resolved(
        &self,
        user_id: Uuid,
        job: &Job,
        outcome: &str,
    ) -> Result<(), ServiceError> {
        self.store(
            user_id,
            "Dispute resolved",
            format!("An admin resolved the dispute: {}.", outcome),
            NotificationKind::Info,
            Self::job_link(job),
        )
        .await
    }

    pub async fn notify_withdrawal_settled(
        &self,
        worker_id: Uuid,
        amount: f64,
        approved: bool,
    ) -> Result<(), ServiceError> {
        let (title, message, kind) = if approved {
            (
                "Withdrawal processed",
                format!("Your withdrawal of \u{20b9}{:.2} was paid out.", amount),
                NotificationKind::Success,
            )
        } else {
            (
                "Withdrawal rejected",
                format!("Your withdrawal of \u{20b9}{:.2} was rejected.", amount),
                NotificationKind::Error,
            )
        };
        self.store(worker_id, title, message, kind, Some("/wallet".to_string()))
            .await
    }

    pub async fn notify_verification_reviewed(
        &self,
        worker_id: Uuid,
        approved: bool,
    ) -> Result<(), ServiceError> {
        let (title, message, kind) = if approved {
            (
                "Verification approved",
                "You are verified. Go online to start receiving jobs.".to_string(),
                NotificationKind::Success,
            )
        } else {
            (
                "Verification rejected",
                "Your documents could not be verified. Please resubmit.".to_string(),
                NotificationKind::Error,
            )
        };
        self.store(worker_id, title, message, kind, Some("/profile".to_string()))
            .await
    }
}

/// Log-and-drop helper for best-effort notification writes; a failed
/// alert never fails the transition that triggered it.
pub fn best_effort(result: Result<(), ServiceError>, context: &str) {
    if let Err(e) = result {
        tracing::warn!("notification write failed ({}): {}", context, e);
    }
}
