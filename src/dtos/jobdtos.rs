use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::userdtos::FilterUserDto,
    models::jobmodel::{CategoryIcon, Job, ServiceCategory},
};

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateJobDto {
    pub category_id: Uuid,

    #[validate(length(min = 10, max = 2000, message = "Description must be between 10 and 2000 characters"))]
    pub description: String,

    #[validate(length(min = 5, max = 500, message = "Address must be between 5 and 500 characters"))]
    pub location_address: String,

    #[validate(range(min = -90.0, max = 90.0, message = "Latitude out of range"))]
    pub location_lat: Option<f64>,

    #[validate(range(min = -180.0, max = 180.0, message = "Longitude out of range"))]
    pub location_lng: Option<f64>,

    pub images: Option<Vec<String>>,

    pub scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct StartJobDto {
    #[validate(length(equal = 4, message = "OTP must be exactly 4 digits"))]
    pub otp: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CompleteJobDto {
    #[validate(range(min = 1.0, message = "Amount must be positive"))]
    pub amount: f64,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct DisputeJobDto {
    #[validate(length(min = 10, max = 1000, message = "Reason must be between 10 and 1000 characters"))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeResolution {
    /// Pay the worker: job closes as Completed, worker is credited.
    Payout,
    /// Refund the customer: job closes as Cancelled, no ledger row.
    Refund,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ResolveDisputeDto {
    pub resolution: DisputeResolution,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateCategoryDto {
    #[validate(length(min = 2, max = 100, message = "Name must be between 2 and 100 characters"))]
    pub name: String,

    #[validate(range(min = 1.0, message = "Base price must be positive"))]
    pub base_price: f64,

    pub icon: Option<CategoryIcon>,

    #[validate(length(max = 500, message = "Description must not exceed 500 characters"))]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchCategoryQuery {
    pub keyword: String,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct CreateReviewDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(length(max = 1000, message = "Comment must not exceed 1000 characters"))]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDto {
    pub id: Uuid,
    pub name: String,
    pub icon: CategoryIcon,
    pub description: String,
    pub base_price: f64,
}

impl CategoryDto {
    pub fn from_category(category: &ServiceCategory) -> Self {
        use num_traits::ToPrimitive;
        CategoryDto {
            id: category.id,
            name: category.name.clone(),
            icon: category.icon,
            description: category.description.clone(),
            base_price: category.base_price.to_f64().unwrap_or(0.0),
        }
    }

    /// Stand-in for a job whose category row was deleted from the catalog.
    pub fn unknown(category_id: Uuid) -> Self {
        CategoryDto {
            id: category_id,
            name: "Unknown Service".to_string(),
            icon: CategoryIcon::fallback(),
            description: String::new(),
            base_price: 0.0,
        }
    }
}

/// Job plus the joined rows the clients render. The category may have been
/// deleted out from under the job; `category` is then the Unknown stand-in.
/// `start_code` is present only when the viewer is the job's customer, who
/// reads it to the worker on arrival.
#[derive(Debug, Serialize)]
pub struct JobDetailsDto {
    #[serde(flatten)]
    pub job: Job,
    pub category: CategoryDto,
    pub customer: Option<FilterUserDto>,
    pub worker: Option<FilterUserDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_code: Option<String>,
}

/// Feed entry for the worker dashboard; `distance_km` present only when
/// both the worker and the job carry coordinates.
#[derive(Debug, Serialize)]
pub struct AvailableJobDto {
    #[serde(flatten)]
    pub job: Job,
    pub category: CategoryDto,
    pub distance_km: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct JobResponseDto {
    pub status: String,
    pub data: JobDetailsDto,
}

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct PlatformStatsDto {
    pub total_gmv: f64,
    pub total_revenue: f64,
    pub completed_jobs: i64,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct UpdateSettingsDto {
    pub maintenance_mode: Option<bool>,
    pub allow_registration: Option<bool>,

    #[validate(range(min = 0.0, max = 100.0, message = "Commission rate must be between 0 and 100"))]
    pub commission_rate: Option<f64>,

    #[validate(length(max = 20, message = "Support phone must not exceed 20 characters"))]
    pub support_phone: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct SendMessageDto {
    #[validate(length(min = 1, max = 2000, message = "Message must be between 1 and 2000 characters"))]
    pub text: String,
}
