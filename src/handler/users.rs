use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    db::{reviewdb::ReviewExt, userdb::UserExt},
    dtos::userdtos::{
        FilterUserDto, SubmitVerificationDto, UpdateAvailabilityDto, UpdateProfileDto, UserData,
        UserResponseDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::usermodel::{UserRole, WorkerStatus},
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route("/me", get(get_me).put(update_me))
        .route("/me/availability", put(update_availability))
        .route("/me/verification", post(submit_verification))
        .route("/:user_id/reviews", get(get_user_reviews))
}

pub async fn get_me(
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&auth.user),
        },
    }))
}

pub async fn update_me(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    body.validate_phone_number()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    // Skills only mean something on a worker profile.
    if body.skills.is_some() && auth.user.role != UserRole::Worker {
        return Err(HttpError::bad_request(
            "Only workers can declare skill categories",
        ));
    }

    let user = app_state
        .db_client
        .update_profile(
            auth.user.id,
            body.name,
            body.phone,
            body.avatar_url,
            body.bio,
            body.experience_years,
            body.service_radius_km,
            body.skills,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn update_availability(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateAvailabilityDto>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Worker {
        return Err(HttpError::forbidden("Only workers can toggle availability"));
    }

    let user = app_state
        .db_client
        .set_online(auth.user.id, body.is_online)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn submit_verification(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<SubmitVerificationDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Worker {
        return Err(HttpError::forbidden("Only workers submit verification"));
    }

    // A verified or in-review worker has nothing to resubmit.
    match auth.user.worker_status {
        Some(WorkerStatus::Verified) => {
            return Err(HttpError::bad_request("You are already verified"));
        }
        Some(WorkerStatus::PendingReview) => {
            return Err(HttpError::bad_request(
                "Your verification is already under review",
            ));
        }
        _ => {}
    }

    let user = app_state
        .db_client
        .submit_verification(auth.user.id, body.doc_paths)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(UserResponseDto {
        status: "success".to_string(),
        data: UserData {
            user: FilterUserDto::filter_user(&user),
        },
    }))
}

pub async fn get_user_reviews(
    Extension(app_state): Extension<Arc<AppState>>,
    axum::extract::Path(user_id): axum::extract::Path<uuid::Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let reviews = app_state
        .db_client
        .get_reviews_for_user(user_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "reviews": reviews }
    })))
}
