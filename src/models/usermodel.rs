use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Default)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
    Worker,
}

/// Worker verification lifecycle. Customers carry NULL; a suspended account
/// (any role) carries `Suspended` and is rejected by the auth middleware.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq)]
#[sqlx(type_name = "worker_status", rename_all = "snake_case")]
pub enum WorkerStatus {
    Unverified,
    PendingReview,
    Verified,
    Suspended,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub worker_status: Option<WorkerStatus>,
    pub skills: Option<Vec<Uuid>>,
    pub verification_docs: Option<Vec<String>>,
    pub bio: Option<String>,
    pub experience_years: Option<i32>,
    pub service_radius_km: Option<f64>,
    pub is_online: Option<bool>,
    pub rating: Option<f32>, // derived from reviews, refreshed on insert
    pub review_count: Option<i32>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_suspended(&self) -> bool {
        self.worker_status == Some(WorkerStatus::Suspended)
    }

    /// Only online, verified workers may see or accept jobs from the feed.
    pub fn can_take_jobs(&self) -> bool {
        self.role == UserRole::Worker
            && self.worker_status == Some(WorkerStatus::Verified)
            && self.is_online.unwrap_or(false)
    }
}
