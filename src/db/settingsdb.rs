use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::settingsmodel::SystemSettings;

const SETTINGS_COLUMNS: &str = r#"
    id, maintenance_mode, allow_registration, commission_rate, support_phone, updated_at
"#;

#[async_trait]
pub trait SettingsExt {
    /// Fetch the singleton row, inserting defaults if the table is empty.
    /// Callers keep the returned id and update by it; there is no blind
    /// upsert path that could race a second row into existence.
    async fn get_or_create_settings(
        &self,
        default_commission_rate: f64,
    ) -> Result<SystemSettings, Error>;

    async fn get_settings(&self, id: Uuid) -> Result<Option<SystemSettings>, Error>;

    async fn update_settings(
        &self,
        id: Uuid,
        maintenance_mode: Option<bool>,
        allow_registration: Option<bool>,
        commission_rate: Option<f64>,
        support_phone: Option<String>,
    ) -> Result<SystemSettings, Error>;
}

#[async_trait]
impl SettingsExt for DBClient {
    async fn get_or_create_settings(
        &self,
        default_commission_rate: f64,
    ) -> Result<SystemSettings, Error> {
        let existing = sqlx::query_as::<_, SystemSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM system_settings ORDER BY updated_at ASC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        if let Some(settings) = existing {
            return Ok(settings);
        }

        sqlx::query_as::<_, SystemSettings>(&format!(
            r#"
            INSERT INTO system_settings (maintenance_mode, allow_registration, commission_rate)
            VALUES (FALSE, TRUE, $1)
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(default_commission_rate)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_settings(&self, id: Uuid) -> Result<Option<SystemSettings>, Error> {
        sqlx::query_as::<_, SystemSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM system_settings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_settings(
        &self,
        id: Uuid,
        maintenance_mode: Option<bool>,
        allow_registration: Option<bool>,
        commission_rate: Option<f64>,
        support_phone: Option<String>,
    ) -> Result<SystemSettings, Error> {
        sqlx::query_as::<_, SystemSettings>(&format!(
            r#"
            UPDATE system_settings SET
                maintenance_mode = COALESCE($2, maintenance_mode),
                allow_registration = COALESCE($3, allow_registration),
                commission_rate = COALESCE($4, commission_rate),
                support_phone = COALESCE($5, support_phone),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {SETTINGS_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(maintenance_mode)
        .bind(allow_registration)
        .bind(commission_rate)
        .bind(support_phone)
        .fetch_one(&self.pool)
        .await
    }
}
