use std::sync::Arc;

use axum::{
    http::{header, HeaderMap},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use validator::Validate;

use crate::{
    db::{settingsdb::SettingsExt, userdb::UserExt},
    dtos::userdtos::{
        FilterUserDto, LoginUserDto, RegisterUserDto, Response, UserData, UserLoginResponseDto,
        UserResponseDto,
    },
    error::{ErrorMessage, HttpError},
    models::usermodel::UserRole,
    utils::{password, token},
    AppState,
};

pub fn auth_handler() -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn register(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;
    body.validate_phone_number()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if body.role == UserRole::Admin {
        return Err(HttpError::bad_request(
            "Admin accounts cannot be self-registered",
        ));
    }

    let settings = app_state
        .db_client
        .get_settings(app_state.settings_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Some(settings) = settings {
        if !settings.allow_registration {
            return Err(HttpError::forbidden(
                "Registration is currently closed".to_string(),
            ));
        }
    }

    let hashed_password =
        password::hash(&body.password).map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = app_state
        .db_client
        .save_user(body.name, body.email, body.phone, hashed_password, body.role)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // The insert is conflict-do-nothing; a taken email surfaces here.
    let user = user.ok_or_else(|| HttpError::conflict(ErrorMessage::EmailExist.to_string()))?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(UserResponseDto {
            status: "success".to_string(),
            data: UserData {
                user: FilterUserDto::filter_user(&user),
            },
        }),
    ))
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let result = app_state
        .db_client
        .get_user(None, Some(&body.email))
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    let user = result.ok_or(HttpError::bad_request(
        ErrorMessage::WrongCredentials.to_string(),
    ))?;

    let password_matched = password::compare(&body.password, &user.password)
        .map_err(|_| HttpError::bad_request(ErrorMessage::WrongCredentials.to_string()))?;

    if !password_matched {
        return Err(HttpError::bad_request(
            ErrorMessage::WrongCredentials.to_string(),
        ));
    }

    if user.is_suspended() {
        return Err(HttpError::forbidden(
            ErrorMessage::AccountSuspended.to_string(),
        ));
    }

    let settings = app_state
        .db_client
        .get_settings(app_state.settings_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    if let Some(settings) = settings {
        if settings.maintenance_mode && user.role != UserRole::Admin {
            return Err(HttpError::forbidden(
                ErrorMessage::MaintenanceMode.to_string(),
            ));
        }
    }

    let token = token::create_token(
        &user.id.to_string(),
        app_state.env.jwt_secret.as_bytes(),
        app_state.env.jwt_maxage,
    )
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage * 60);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        token,
    });

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie.to_string().parse().unwrap());

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn logout(
    cookie_jar: CookieJar,
    Extension(app_state): Extension<Arc<AppState>>,
    headers_in: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            headers_in
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| {
                    auth_value
                        .strip_prefix("Bearer ")
                        .map(|t| t.to_owned())
                })
        });

    // Revoke the live token so a stolen copy dies with the session.
    if let (Some(token), Some(redis_client)) = (&token, &app_state.db_client.redis_client) {
        let blacklist_key = format!("token_blacklist:{}", token);
        let ttl_seconds = app_state.env.jwt_maxage * 60 * 60;
        let mut conn = redis_client.lock().await;

        let result: Result<(), redis::RedisError> = redis::cmd("SET")
            .arg(&blacklist_key)
            .arg("revoked")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut *conn)
            .await;

        if let Err(e) = result {
            tracing::warn!("failed to blacklist token on logout: {}", e);
        }
    }

    let cookie = Cookie::build(("token", ""))
        .path("/")
        .max_age(time::Duration::minutes(-1))
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(header::SET_COOKIE, cookie.to_string().parse().unwrap());

    let response = Json(Response {
        status: "success".to_string(),
        message: "Logged out".to_string(),
    });

    let mut response = response.into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}
