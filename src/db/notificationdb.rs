use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::notificationmodel::{NotificationItem, NotificationKind};

const NOTIFICATION_COLUMNS: &str = r#"
    id, user_id, title, message, kind, is_read, link, created_at
"#;

#[async_trait]
pub trait NotificationExt {
    async fn insert_notification(
        &self,
        user_id: Uuid,
        title: String,
        message: String,
        kind: NotificationKind,
        link: Option<String>,
    ) -> Result<NotificationItem, Error>;

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<NotificationItem>, Error>;

    /// Marks one of the user's own notifications read; false when the row
    /// does not exist or belongs to someone else.
    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, Error>;
}

#[async_trait]
impl NotificationExt for DBClient {
    async fn insert_notification(
        &self,
        user_id: Uuid,
        title: String,
        message: String,
        kind: NotificationKind,
        link: Option<String>,
    ) -> Result<NotificationItem, Error> {
        sqlx::query_as::<_, NotificationItem>(&format!(
            r#"
            INSERT INTO notifications (user_id, title, message, kind, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(title)
        .bind(message)
        .bind(kind)
        .bind(link)
        .fetch_one(&self.pool)
        .await
    }

    async fn list_notifications(&self, user_id: Uuid) -> Result<Vec<NotificationItem>, Error> {
        sqlx::query_as::<_, NotificationItem>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS} FROM notifications
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn mark_notification_read(
        &self,
        notification_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            r#"
            UPDATE notifications SET is_read = TRUE
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
