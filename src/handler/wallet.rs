use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::walletdtos::{TransactionDto, WithdrawDto},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::usermodel::UserRole,
    AppState,
};

pub fn wallet_handler() -> Router {
    Router::new()
        .route("/", get(get_wallet_summary))
        .route("/withdraw", post(request_withdrawal))
}

pub async fn get_wallet_summary(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Worker {
        return Err(HttpError::forbidden("Only workers have a wallet"));
    }

    let summary = app_state.wallet_service.summary(auth.user.id).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": summary
    })))
}

pub async fn request_withdrawal(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<WithdrawDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Worker {
        return Err(HttpError::forbidden("Only workers have a wallet"));
    }

    let transaction = app_state
        .wallet_service
        .request_withdrawal(auth.user.id, body.amount)
        .await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "transaction": TransactionDto::from_transaction(&transaction) }
        })),
    ))
}
