use std::sync::Arc;

use axum::{
    extract::Path,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::messagedb::MessageExt,
    dtos::jobdtos::SendMessageDto,
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn chat_handler() -> Router {
    Router::new().route("/:job_id/messages", get(list_messages).post(send_message))
}

pub async fn list_messages(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    ensure_participant(&app_state, &auth, job_id).await?;

    let messages = app_state
        .db_client
        .list_messages(job_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": messages.len(),
        "data": { "messages": messages }
    })))
}

pub async fn send_message(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<SendMessageDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    ensure_participant(&app_state, &auth, job_id).await?;

    // Chat text is rendered verbatim by clients; strip any markup here.
    let clean_text = ammonia::Builder::empty().clean(&body.text).to_string();

    let message = app_state
        .db_client
        .insert_message(job_id, auth.user.id, clean_text)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "message": message }
        })),
    ))
}

async fn ensure_participant(
    app_state: &Arc<AppState>,
    auth: &JWTAuthMiddeware,
    job_id: Uuid,
) -> Result<(), HttpError> {
    let job = app_state.job_service.get_job(job_id).await?;

    let is_participant =
        auth.user.id == job.customer_id || job.worker_id == Some(auth.user.id);
    if !is_participant {
        return Err(HttpError::forbidden(
            "Only job participants can use this chat",
        ));
    }
    Ok(())
}
