use std::sync::Arc;

use axum::{response::IntoResponse, routing::post, Extension, Json, Router};
use validator::Validate;

use crate::{
    dtos::paymentdtos::{CreateOrderDto, VerifyPaymentDto},
    error::HttpError,
    handler::jobs::join_job_details,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn payments_handler() -> Router {
    Router::new()
        .route("/order", post(create_order))
        .route("/verify", post(verify_payment))
}

pub async fn create_order(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateOrderDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Only the paying customer may open an order for their job.
    let job = app_state.job_service.get_job(body.job_id).await?;
    if job.customer_id != auth.user.id {
        return Err(HttpError::forbidden("Only the job's customer can pay"));
    }

    let order = app_state
        .payment_service
        .create_order(body.job_id, body.amount)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": order
    })))
}

pub async fn verify_payment(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<VerifyPaymentDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state.job_service.get_job(body.job_id).await?;
    if job.customer_id != auth.user.id {
        return Err(HttpError::forbidden("Only the job's customer can pay"));
    }

    let job = app_state.payment_service.verify_payment(body).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": join_job_details(&app_state, job, auth.user.id).await?
    })))
}
