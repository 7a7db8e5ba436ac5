use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Singleton configuration row. The id is fetched-or-created once at
/// startup and reused for every update; never blind-upserted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SystemSettings {
    pub id: Uuid,
    pub maintenance_mode: bool,
    pub allow_registration: bool,
    pub commission_rate: f64,
    pub support_phone: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
