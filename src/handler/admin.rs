use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use num_traits::ToPrimitive;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{jobdb::JobExt, settingsdb::SettingsExt, userdb::UserExt},
    dtos::{
        jobdtos::{PlatformStatsDto, ResolveDisputeDto, UpdateSettingsDto},
        userdtos::{FilterUserDto, ReviewWorkerVerificationDto, SuspendUserDto},
        walletdtos::{SettleWithdrawalDto, TransactionDto},
    },
    error::HttpError,
    handler::jobs::join_job_details,
    middleware::JWTAuthMiddeware,
    models::usermodel::{UserRole, WorkerStatus},
    service::notification_service::best_effort,
    AppState,
};

/// Mounted behind the auth middleware plus the admin role gate.
pub fn admin_handler() -> Router {
    Router::new()
        .route("/users", get(get_all_users))
        .route("/users/:user_id/suspend", put(set_suspension))
        .route("/workers/pending", get(get_pending_workers))
        .route("/workers/:user_id/verification", put(review_verification))
        .route("/jobs/active", get(get_all_active_jobs))
        .route("/disputes", get(get_disputes))
        .route("/disputes/:job_id/resolve", put(resolve_dispute))
        .route("/withdrawals", get(get_withdrawals))
        .route("/withdrawals/:transaction_id/settle", put(settle_withdrawal))
        .route("/stats", get(get_platform_stats))
        .route("/settings", get(get_settings).put(update_settings))
}

pub async fn get_all_users(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let users = app_state
        .db_client
        .get_all_users()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let users = FilterUserDto::filter_users(&users);

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": users.len(),
        "data": { "users": users }
    })))
}

pub async fn get_pending_workers(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let workers = app_state
        .db_client
        .get_pending_workers()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Verification docs stay admin-only; expose them beside the filtered
    // profile rather than widening FilterUserDto.
    let workers: Vec<serde_json::Value> = workers
        .iter()
        .map(|w| {
            serde_json::json!({
                "user": FilterUserDto::filter_user(w),
                "verification_docs": w.verification_docs,
            })
        })
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": workers.len(),
        "data": { "workers": workers }
    })))
}

pub async fn review_verification(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<ReviewWorkerVerificationDto>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    if user.role != UserRole::Worker {
        return Err(HttpError::bad_request("User is not a worker"));
    }

    if user.worker_status != Some(WorkerStatus::PendingReview) {
        return Err(HttpError::bad_request(
            "Worker has no verification awaiting review",
        ));
    }

    let new_status = if body.approve {
        WorkerStatus::Verified
    } else {
        WorkerStatus::Unverified
    };

    let user = app_state
        .db_client
        .update_worker_status(user_id, Some(new_status))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    best_effort(
        app_state
            .notification_service
            .notify_verification_reviewed(user_id, body.approve)
            .await,
        "verification reviewed",
    );

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "user": FilterUserDto::filter_user(&user) }
    })))
}

pub async fn set_suspension(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<SuspendUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    let user = app_state
        .db_client
        .get_user(Some(user_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::not_found("User not found"))?;

    if user.role == UserRole::Admin {
        return Err(HttpError::bad_request("Admins cannot be suspended"));
    }

    // Reinstating a worker lands on Verified; customers go back to no
    // status at all.
    let new_status = if body.suspend {
        Some(WorkerStatus::Suspended)
    } else if user.role == UserRole::Worker {
        Some(WorkerStatus::Verified)
    } else {
        None
    };

    let user = app_state
        .db_client
        .update_worker_status(user_id, new_status)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    tracing::info!(user_id = %user_id, suspended = body.suspend, "suspension toggled");

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "user": FilterUserDto::filter_user(&user) }
    })))
}

pub async fn get_all_active_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state
        .db_client
        .get_all_active_jobs()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let mut details = Vec::with_capacity(jobs.len());
    for job in jobs {
        details.push(join_job_details(&app_state, job, auth.user.id).await?);
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": details.len(),
        "data": { "jobs": details }
    })))
}

pub async fn get_disputes(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = app_state.dispute_service.list_disputes().await?;

    let mut details = Vec::with_capacity(jobs.len());
    for job in jobs {
        details.push(join_job_details(&app_state, job, auth.user.id).await?);
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": details.len(),
        "data": { "disputes": details }
    })))
}

pub async fn resolve_dispute(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<ResolveDisputeDto>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .dispute_service
        .resolve(job_id, body.resolution)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": join_job_details(&app_state, job, auth.user.id).await?
    })))
}

pub async fn get_withdrawals(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let withdrawals = app_state.wallet_service.all_withdrawals().await?;

    let withdrawals: Vec<TransactionDto> = withdrawals
        .iter()
        .map(TransactionDto::from_transaction)
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": withdrawals.len(),
        "data": { "withdrawals": withdrawals }
    })))
}

pub async fn settle_withdrawal(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(transaction_id): Path<Uuid>,
    Json(body): Json<SettleWithdrawalDto>,
) -> Result<impl IntoResponse, HttpError> {
    let transaction = app_state
        .wallet_service
        .settle_withdrawal(transaction_id, body.approve)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "transaction": TransactionDto::from_transaction(&transaction) }
    })))
}

/// GMV is the sum of completed job amounts; platform revenue applies the
/// commission rate from the settings singleton.
pub async fn get_platform_stats(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let (total, completed_jobs) = app_state
        .db_client
        .sum_completed_amounts()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let settings = app_state
        .db_client
        .get_settings(app_state.settings_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let commission_rate = settings
        .map(|s| s.commission_rate)
        .unwrap_or(app_state.env.default_commission_rate)
        / 100.0;

    let total_gmv = total.to_f64().unwrap_or(0.0);

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": PlatformStatsDto {
            total_gmv,
            total_revenue: total_gmv * commission_rate,
            completed_jobs,
        }
    })))
}

pub async fn get_settings(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let settings = app_state
        .db_client
        .get_settings(app_state.settings_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .ok_or_else(|| HttpError::server_error("Settings row is missing"))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "settings": settings }
    })))
}

pub async fn update_settings(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<UpdateSettingsDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let settings = app_state
        .db_client
        .update_settings(
            app_state.settings_id,
            body.maintenance_mode,
            body.allow_registration,
            body.commission_rate,
            body.support_phone,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "settings": settings }
    })))
}
