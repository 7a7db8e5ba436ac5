use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{categorydb::CategoryExt, jobdb::JobExt, reviewdb::ReviewExt, userdb::UserExt},
    dtos::{
        jobdtos::{
            AvailableJobDto, CategoryDto, CompleteJobDto, CreateJobDto, CreateReviewDto,
            DisputeJobDto, FeedQuery, JobDetailsDto, JobResponseDto, StartJobDto,
        },
        userdtos::FilterUserDto,
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    models::{
        jobmodel::{Job, JobStatus},
        usermodel::UserRole,
    },
    AppState,
};

pub fn jobs_handler() -> Router {
    Router::new()
        .route("/", post(create_job))
        .route("/active", get(get_active_job))
        .route("/history", get(get_job_history))
        .route("/available", get(get_available_jobs))
        .route("/:job_id", get(get_job_details))
        .route("/:job_id/accept", post(accept_job))
        .route("/:job_id/arrive", put(mark_arrived))
        .route("/:job_id/start", put(start_work))
        .route("/:job_id/complete", put(complete_work))
        .route("/:job_id/cancel", put(cancel_job))
        .route("/:job_id/dispute", post(report_issue))
        .route("/:job_id/review", post(create_review))
}

pub async fn create_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    if auth.user.role != UserRole::Customer {
        return Err(HttpError::forbidden("Only customers can request a service"));
    }

    let job = app_state
        .job_service
        .create_job(auth.user.id, body)
        .await?;

    let details = join_job_details(&app_state, job, auth.user.id).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(JobResponseDto {
            status: "success".to_string(),
            data: details,
        }),
    ))
}

pub async fn get_active_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let job = match auth.user.role {
        UserRole::Worker => {
            app_state
                .db_client
                .get_active_job_for_worker(auth.user.id)
                .await
        }
        _ => {
            app_state
                .db_client
                .get_active_job_for_customer(auth.user.id)
                .await
        }
    }
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let data = match job {
        Some(job) => Some(join_job_details(&app_state, job, auth.user.id).await?),
        None => None,
    };

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "job": data }
    })))
}

pub async fn get_job_history(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let jobs = match auth.user.role {
        UserRole::Worker => {
            app_state
                .db_client
                .get_history_for_worker(auth.user.id)
                .await
        }
        _ => {
            app_state
                .db_client
                .get_history_for_customer(auth.user.id)
                .await
        }
    }
    .map_err(|e| HttpError::server_error(e.to_string()))?;

    let jobs = join_categories(&app_state, jobs).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": { "jobs": jobs }
    })))
}

/// The matching feed: searching, unassigned, skill-filtered, sorted by
/// proximity when the worker sends coordinates.
pub async fn get_available_jobs(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, HttpError> {
    let scored = app_state
        .matching_service
        .list_available(&auth.user, query.lat, query.lng)
        .await?;

    let categories = category_map(&app_state).await?;

    let jobs: Vec<AvailableJobDto> = scored
        .into_iter()
        .map(|s| {
            let category = categories
                .get(&s.job.category_id)
                .cloned()
                .unwrap_or_else(|| CategoryDto::unknown(s.job.category_id));
            AvailableJobDto {
                category,
                distance_km: s.distance_km,
                job: s.job,
            }
        })
        .collect();

    Ok(Json(serde_json::json!({
        "status": "success",
        "results": jobs.len(),
        "data": { "jobs": jobs }
    })))
}

pub async fn get_job_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state.job_service.get_job(job_id).await?;

    ensure_participant_or_admin(&auth, &job)?;

    let details = join_job_details(&app_state, job, auth.user.id).await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: details,
    }))
}

pub async fn accept_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .matching_service
        .accept_job(job_id, &auth.user)
        .await?;

    let details = join_job_details(&app_state, job, auth.user.id).await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: details,
    }))
}

pub async fn mark_arrived(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .mark_arrived(job_id, auth.user.id)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: join_job_details(&app_state, job, auth.user.id).await?,
    }))
}

pub async fn start_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<StartJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .start_work(job_id, auth.user.id, &body.otp)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: join_job_details(&app_state, job, auth.user.id).await?,
    }))
}

pub async fn complete_work(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CompleteJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .complete_work(job_id, auth.user.id, body.amount)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: join_job_details(&app_state, job, auth.user.id).await?,
    }))
}

pub async fn cancel_job(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let job = app_state
        .job_service
        .cancel_job(job_id, auth.user.id)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: join_job_details(&app_state, job, auth.user.id).await?,
    }))
}

pub async fn report_issue(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<DisputeJobDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state
        .job_service
        .report_issue(job_id, auth.user.id, body.reason)
        .await?;

    Ok(Json(JobResponseDto {
        status: "success".to_string(),
        data: join_job_details(&app_state, job, auth.user.id).await?,
    }))
}

pub async fn create_review(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(auth): Extension<JWTAuthMiddeware>,
    Path(job_id): Path<Uuid>,
    Json(body): Json<CreateReviewDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let job = app_state.job_service.get_job(job_id).await?;

    if job.status != JobStatus::Completed {
        return Err(HttpError::bad_request(
            "Reviews can only be left on completed jobs",
        ));
    }

    // The reviewer must be one side of the job; the reviewee is the other.
    let reviewee_id = if auth.user.id == job.customer_id {
        job.worker_id
            .ok_or_else(|| HttpError::bad_request("Job has no worker to review"))?
    } else if job.worker_id == Some(auth.user.id) {
        job.customer_id
    } else {
        return Err(HttpError::forbidden(
            "Only job participants can leave a review",
        ));
    };

    let review = app_state
        .db_client
        .create_review(job_id, auth.user.id, reviewee_id, body.rating, body.comment)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    // Keep the displayed aggregate in step with the rows.
    if let Err(e) = app_state.db_client.refresh_user_rating(reviewee_id).await {
        tracing::warn!("failed to refresh rating for {}: {}", reviewee_id, e);
    }

    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::json!({
            "status": "success",
            "data": { "review": review }
        })),
    ))
}

fn ensure_participant_or_admin(auth: &JWTAuthMiddeware, job: &Job) -> Result<(), HttpError> {
    let is_participant =
        auth.user.id == job.customer_id || job.worker_id == Some(auth.user.id);
    if !is_participant && auth.user.role != UserRole::Admin {
        return Err(HttpError::forbidden(
            "You are not a participant in this job",
        ));
    }
    Ok(())
}

async fn category_map(
    app_state: &Arc<AppState>,
) -> Result<HashMap<Uuid, CategoryDto>, HttpError> {
    let categories = app_state
        .db_client
        .list_categories()
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?;

    Ok(categories
        .iter()
        .map(|c| (c.id, CategoryDto::from_category(c)))
        .collect())
}

async fn join_categories(
    app_state: &Arc<AppState>,
    jobs: Vec<Job>,
) -> Result<Vec<AvailableJobDto>, HttpError> {
    let categories = category_map(app_state).await?;

    Ok(jobs
        .into_iter()
        .map(|job| {
            let category = categories
                .get(&job.category_id)
                .cloned()
                .unwrap_or_else(|| CategoryDto::unknown(job.category_id));
            AvailableJobDto {
                category,
                distance_km: None,
                job,
            }
        })
        .collect())
}

/// Resolve the rows clients render next to a job. A deleted category
/// degrades to the Unknown stand-in instead of failing the request. The
/// start code is disclosed only to the job's customer.
pub async fn join_job_details(
    app_state: &Arc<AppState>,
    job: Job,
    viewer_id: Uuid,
) -> Result<JobDetailsDto, HttpError> {
    let category = app_state
        .db_client
        .get_category_by_id(job.category_id)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .map(|c| CategoryDto::from_category(&c))
        .unwrap_or_else(|| CategoryDto::unknown(job.category_id));

    let customer = app_state
        .db_client
        .get_user(Some(job.customer_id), None)
        .await
        .map_err(|e| HttpError::server_error(e.to_string()))?
        .map(|u| FilterUserDto::filter_user(&u));

    let worker = match job.worker_id {
        Some(worker_id) => app_state
            .db_client
            .get_user(Some(worker_id), None)
            .await
            .map_err(|e| HttpError::server_error(e.to_string()))?
            .map(|u| FilterUserDto::filter_user(&u)),
        None => None,
    };

    let start_code = if viewer_id == job.customer_id {
        Some(job.otp.clone())
    } else {
        None
    };

    Ok(JobDetailsDto {
        job,
        category,
        customer,
        worker,
        start_code,
    })
}
