use axum::http::StatusCode;
use thiserror::Error;
use uuid::Uuid;

use crate::{error::HttpError, models::jobmodel::JobStatus};

/// Domain errors, distinguishable by kind so callers can branch (a lost
/// accept race is not a generic failure).
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Job {0} not found")]
    JobNotFound(Uuid),

    #[error("Service category {0} not found")]
    CategoryNotFound(Uuid),

    #[error("Job {job} cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        job: Uuid,
        from: JobStatus,
        to: JobStatus,
    },

    #[error("This job has already been accepted by another worker")]
    AlreadyAccepted(Uuid),

    #[error("Invalid OTP")]
    InvalidOtp,

    #[error("Invalid payment signature")]
    InvalidSignature,

    #[error("User {0} is not authorized to perform this action on job {1}")]
    UnauthorizedJobAccess(Uuid, Uuid),

    #[error("Worker {0} is not eligible to take jobs (must be verified and online)")]
    WorkerNotEligible(Uuid),

    #[error("Insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance { requested: f64, available: f64 },

    #[error("Withdrawal {0} is not pending")]
    WithdrawalNotPending(Uuid),

    #[error("Payment gateway error: {0}")]
    Gateway(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Notification error: {0}")]
    Notification(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Gateway(err.to_string())
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::JobNotFound(_)
            | ServiceError::CategoryNotFound(_) => StatusCode::NOT_FOUND,

            ServiceError::InvalidTransition { .. }
            | ServiceError::InvalidOtp
            | ServiceError::InvalidSignature
            | ServiceError::WithdrawalNotPending(_)
            | ServiceError::Validation(_) => StatusCode::BAD_REQUEST,

            ServiceError::AlreadyAccepted(_) => StatusCode::CONFLICT,

            ServiceError::UnauthorizedJobAccess(_, _) => StatusCode::UNAUTHORIZED,

            ServiceError::WorkerNotEligible(_) => StatusCode::FORBIDDEN,

            ServiceError::InsufficientBalance { .. } => StatusCode::PAYMENT_REQUIRED,

            ServiceError::Gateway(_)
            | ServiceError::Database(_)
            | ServiceError::Notification(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        HttpError::new(error.to_string(), error.status_code())
    }
}
