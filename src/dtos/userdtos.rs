use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::usermodel::{User, UserRole, WorkerStatus};

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegisterUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 10, max = 20, message = "Phone number must be between 10-20 characters"))]
    pub phone: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub password_confirm: String,

    /// Customer or Worker; admin accounts are never self-served.
    pub role: UserRole,
}

impl RegisterUserDto {
    pub fn validate_phone_number(&self) -> Result<(), ValidationError> {
        validate_phone(&self.phone)
    }
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let phone_regex = regex::Regex::new(r"^(\+?[0-9]{1,3}[- ]?)?[0-9]{3}[- ]?[0-9]{3}[- ]?[0-9]{4}$")
        .map_err(|_| ValidationError::new("invalid_phone_regex"))?;

    if !phone_regex.is_match(phone) {
        let mut error = ValidationError::new("invalid_phone");
        error.message = Some(Cow::from(
            "Phone number must be in a valid format (e.g., +919876543210 or 987-654-3210)",
        ));
        return Err(error);
    }
    Ok(())
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(
        length(min = 1, message = "Email is required"),
        email(message = "Email is invalid")
    )]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 100, message = "Name must be between 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(min = 10, max = 20, message = "Phone number must be between 10-20 characters"))]
    pub phone: Option<String>,

    pub avatar_url: Option<String>,

    #[validate(length(max = 1000, message = "Bio must not exceed 1000 characters"))]
    pub bio: Option<String>,

    #[validate(range(min = 0, max = 60, message = "Experience must be between 0 and 60 years"))]
    pub experience_years: Option<i32>,

    #[validate(range(min = 0.5, max = 200.0, message = "Service radius must be between 0.5 and 200 km"))]
    pub service_radius_km: Option<f64>,

    /// Category ids the worker serves; drives the job feed filter.
    pub skills: Option<Vec<Uuid>>,
}

impl UpdateProfileDto {
    pub fn validate_phone_number(&self) -> Result<(), ValidationError> {
        match &self.phone {
            Some(phone) => validate_phone(phone),
            None => Ok(()),
        }
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SubmitVerificationDto {
    #[validate(length(min = 1, message = "At least one document is required"))]
    pub doc_paths: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAvailabilityDto {
    pub is_online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewWorkerVerificationDto {
    pub approve: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuspendUserDto {
    pub suspend: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub worker_status: Option<WorkerStatus>,
    pub skills: Option<Vec<Uuid>>,
    pub bio: Option<String>,
    pub experience_years: Option<i32>,
    pub service_radius_km: Option<f64>,
    pub is_online: bool,
    pub rating: f32,
    pub review_count: i32,
    pub created_at: Option<DateTime<Utc>>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            avatar_url: user.avatar_url.clone(),
            worker_status: user.worker_status,
            skills: user.skills.clone(),
            bio: user.bio.clone(),
            experience_years: user.experience_years,
            service_radius_km: user.service_radius_km,
            is_online: user.is_online.unwrap_or(false),
            rating: user.rating.unwrap_or(0.0),
            review_count: user.review_count.unwrap_or(0),
            created_at: user.created_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<Self> {
        users.iter().map(Self::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserData {
    pub user: FilterUserDto,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponseDto {
    pub status: String,
    pub data: UserData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub status: String,
    pub message: String,
}
