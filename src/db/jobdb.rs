// db/jobdb.rs
use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{Job, JobStatus};

const JOB_COLUMNS: &str = r#"
    id, customer_id, worker_id, category_id, description, images,
    location_address, location_lat, location_lng, status, scheduled_time,
    amount, otp, dispute_reason, created_at, updated_at
"#;

#[async_trait]
pub trait JobExt {
    #[allow(clippy::too_many_arguments)]
    async fn create_job(
        &self,
        customer_id: Uuid,
        category_id: Uuid,
        description: String,
        images: Option<Vec<String>>,
        location_address: String,
        location_lat: Option<f64>,
        location_lng: Option<f64>,
        scheduled_time: Option<DateTime<Utc>>,
        otp: String,
    ) -> Result<Job, Error>;

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error>;

    /// Snapshot of the matching feed: searching jobs with no worker,
    /// optionally restricted to the given category ids.
    async fn get_available_jobs(&self, skills: Option<&[Uuid]>) -> Result<Vec<Job>, Error>;

    /// Conditional acceptance write. Returns `None` when another worker
    /// got there first (zero rows matched); the caller maps that to a
    /// domain error, never to success.
    async fn accept_job(&self, job_id: Uuid, worker_id: Uuid) -> Result<Option<Job>, Error>;

    async fn update_job_status(&self, job_id: Uuid, status: JobStatus) -> Result<Job, Error>;

    /// InProgress -> CompletedPendingPayment with the worker-entered amount.
    async fn complete_work(&self, job_id: Uuid, amount: BigDecimal) -> Result<Job, Error>;

    async fn set_dispute(&self, job_id: Uuid, reason: String) -> Result<Job, Error>;

    async fn get_active_job_for_customer(&self, customer_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_active_job_for_worker(&self, worker_id: Uuid) -> Result<Option<Job>, Error>;

    async fn get_history_for_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error>;

    async fn get_history_for_worker(&self, worker_id: Uuid) -> Result<Vec<Job>, Error>;

    /// Every non-terminal assigned job plus open disputes, for admin view.
    async fn get_all_active_jobs(&self) -> Result<Vec<Job>, Error>;

    async fn get_disputed_jobs(&self) -> Result<Vec<Job>, Error>;

    /// (sum of amounts, count) over completed jobs, for platform stats.
    async fn sum_completed_amounts(&self) -> Result<(BigDecimal, i64), Error>;
}

#[async_trait]
impl JobExt for DBClient {
    async fn create_job(
        &self,
        customer_id: Uuid,
        category_id: Uuid,
        description: String,
        images: Option<Vec<String>>,
        location_address: String,
        location_lat: Option<f64>,
        location_lng: Option<f64>,
        scheduled_time: Option<DateTime<Utc>>,
        otp: String,
    ) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            INSERT INTO jobs
            (customer_id, category_id, description, images, location_address,
             location_lat, location_lng, scheduled_time, otp, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'searching'::job_status)
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(customer_id)
        .bind(category_id)
        .bind(description)
        .bind(images)
        .bind(location_address)
        .bind(location_lat)
        .bind(location_lng)
        .bind(scheduled_time)
        .bind(otp)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_job_by_id(&self, job_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1"))
            .bind(job_id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn get_available_jobs(&self, skills: Option<&[Uuid]>) -> Result<Vec<Job>, Error> {
        match skills {
            Some(skills) if !skills.is_empty() => {
                sqlx::query_as::<_, Job>(&format!(
                    r#"
                    SELECT {JOB_COLUMNS} FROM jobs
                    WHERE status = 'searching'::job_status
                      AND worker_id IS NULL
                      AND category_id = ANY($1)
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(skills)
                .fetch_all(&self.pool)
                .await
            }
            _ => {
                sqlx::query_as::<_, Job>(&format!(
                    r#"
                    SELECT {JOB_COLUMNS} FROM jobs
                    WHERE status = 'searching'::job_status
                      AND worker_id IS NULL
                    ORDER BY created_at DESC
                    "#
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
    }

    async fn accept_job(&self, job_id: Uuid, worker_id: Uuid) -> Result<Option<Job>, Error> {
        // The WHERE clause is the synchronization primitive: of N racing
        // workers exactly one matches the still-searching row.
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET worker_id = $2, status = 'accepted'::job_status, updated_at = NOW()
            WHERE id = $1
              AND status = 'searching'::job_status
              AND worker_id IS NULL
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_job_status(&self, job_id: Uuid, status: JobStatus) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn complete_work(&self, job_id: Uuid, amount: BigDecimal) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'completed_pending_payment'::job_status,
                amount = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(amount)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_dispute(&self, job_id: Uuid, reason: String) -> Result<Job, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            UPDATE jobs
            SET status = 'disputed'::job_status,
                dispute_reason = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {JOB_COLUMNS}
            "#
        ))
        .bind(job_id)
        .bind(reason)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_active_job_for_customer(&self, customer_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE customer_id = $1
              AND status NOT IN ('completed'::job_status, 'cancelled'::job_status)
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_active_job_for_worker(&self, worker_id: Uuid) -> Result<Option<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE worker_id = $1
              AND status NOT IN ('completed'::job_status, 'cancelled'::job_status)
            ORDER BY created_at DESC
            LIMIT 1
            "#
        ))
        .bind(worker_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_history_for_customer(&self, customer_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE customer_id = $1
              AND status IN ('completed'::job_status, 'cancelled'::job_status)
            ORDER BY created_at DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_history_for_worker(&self, worker_id: Uuid) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE worker_id = $1
              AND status IN ('completed'::job_status, 'cancelled'::job_status)
            ORDER BY created_at DESC
            "#
        ))
        .bind(worker_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_active_jobs(&self) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE status IN (
                'accepted'::job_status, 'arrived'::job_status,
                'in_progress'::job_status, 'completed_pending_payment'::job_status,
                'disputed'::job_status
            )
            ORDER BY created_at DESC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_disputed_jobs(&self) -> Result<Vec<Job>, Error> {
        sqlx::query_as::<_, Job>(&format!(
            r#"
            SELECT {JOB_COLUMNS} FROM jobs
            WHERE status = 'disputed'::job_status
            ORDER BY updated_at ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn sum_completed_amounts(&self) -> Result<(BigDecimal, i64), Error> {
        let row: (Option<BigDecimal>, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(amount), 0), COUNT(*)
            FROM jobs
            WHERE status = 'completed'::job_status AND amount IS NOT NULL
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok((row.0.unwrap_or_else(|| BigDecimal::from(0)), row.1))
    }
}
