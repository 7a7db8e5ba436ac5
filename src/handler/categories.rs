use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use bigdecimal::BigDecimal;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::categorydb::CategoryExt,
    dtos::jobdtos::{CategoryDto, CreateCategoryDto, SearchCategoryQuery},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::{jobmodel::CategoryIcon, usermodel::UserRole},
    AppState,
};

/// Public catalog reads; guests browse categories before signing up.
pub fn categories_public_handler() -> Router {
    Router::new()
        .route("/", get(list_categories))
        .route("/search", get(search_categories))
}

/// Admin CMS writes, mounted behind auth.
pub fn categories_admin_handler() -> Router {
    Router::new()
        .route("/", post(create_category))
        .route("/:category_id", delete(delete_category))
}

pub async fn list_categories(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = app_state
        .db_client
        .list_categories()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let categories: Vec<CategoryDto> = categories.iter().map(CategoryDto::from_category).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": categories.len(),
        "data": { "categories": categories }
    })))
}

pub async fn search_categories(
    Extension(app_state): Extension<Arc<AppState>>,
    Query(query): Query<SearchCategoryQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = app_state
        .db_client
        .search_categories(&query.keyword)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let categories: Vec<CategoryDto> = categories.iter().map(CategoryDto::from_category).collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": categories.len(),
        "data": { "categories": categories }
    })))
}

pub async fn create_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateCategoryDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Admin {
        return Err(HttpError::forbidden("Only admins manage the catalog"));
    }

    let base_price = BigDecimal::try_from(body.base_price)
        .map_err(|_| HttpError::bad_request("Invalid base price"))?;

    let category = app_state
        .db_client
        .create_category(
            body.name,
            body.icon.unwrap_or_else(CategoryIcon::fallback),
            body.description.unwrap_or_else(|| "Service".to_string()),
            base_price,
        )
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "category": CategoryDto::from_category(&category) }
        })),
    ))
}

/// Jobs referencing the category keep their id; readers render "Unknown
/// Service" for the dangling reference.
pub async fn delete_category(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(category_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    if auth.user.role != UserRole::Admin {
        return Err(HttpError::forbidden("Only admins manage the catalog"));
    }

    let deleted = app_state
        .db_client
        .delete_category(category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if !deleted {
        return Err(HttpError::not_found("Category not found"));
    }

    Ok(Json(serde_json::json!({
        "status": "success",
        "message": "Category deleted"
    })))
}
