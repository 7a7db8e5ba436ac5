use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::chatmodel::Message;

#[async_trait]
pub trait MessageExt {
    async fn list_messages(&self, job_id: Uuid) -> Result<Vec<Message>, Error>;

    async fn insert_message(
        &self,
        job_id: Uuid,
        sender_id: Uuid,
        text: String,
    ) -> Result<Message, Error>;
}

#[async_trait]
impl MessageExt for DBClient {
    async fn list_messages(&self, job_id: Uuid) -> Result<Vec<Message>, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            SELECT id, job_id, sender_id, text, created_at
            FROM messages
            WHERE job_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(job_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn insert_message(
        &self,
        job_id: Uuid,
        sender_id: Uuid,
        text: String,
    ) -> Result<Message, Error> {
        sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (job_id, sender_id, text)
            VALUES ($1, $2, $3)
            RETURNING id, job_id, sender_id, text, created_at
            "#,
        )
        .bind(job_id)
        .bind(sender_id)
        .bind(text)
        .fetch_one(&self.pool)
        .await
    }
}
