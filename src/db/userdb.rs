// db/userdb.rs
use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{User, UserRole, WorkerStatus};

pub const USER_COLUMNS: &str = r#"
    id, name, email, phone, password, role, avatar_url, worker_status,
    skills, verification_docs, bio, experience_years, service_radius_km,
    is_online, rating, review_count, created_at, updated_at
"#;

#[async_trait]
pub trait UserExt {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, Error>;

    /// Idempotent registration insert: an existing email makes this a
    /// no-op and the caller observes `None` instead of a unique-violation.
    async fn save_user(
        &self,
        name: String,
        email: String,
        phone: String,
        password: String,
        role: UserRole,
    ) -> Result<Option<User>, Error>;

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        phone: Option<String>,
        avatar_url: Option<String>,
        bio: Option<String>,
        experience_years: Option<i32>,
        service_radius_km: Option<f64>,
        skills: Option<Vec<Uuid>>,
    ) -> Result<User, Error>;

    async fn update_worker_status(
        &self,
        user_id: Uuid,
        status: Option<WorkerStatus>,
    ) -> Result<User, Error>;

    async fn submit_verification(
        &self,
        user_id: Uuid,
        doc_paths: Vec<String>,
    ) -> Result<User, Error>;

    async fn set_online(&self, user_id: Uuid, is_online: bool) -> Result<User, Error>;

    async fn get_pending_workers(&self) -> Result<Vec<User>, Error>;

    async fn get_all_users(&self) -> Result<Vec<User>, Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(
        &self,
        user_id: Option<Uuid>,
        email: Option<&str>,
    ) -> Result<Option<User>, Error> {
        let mut user: Option<User> = None;

        if let Some(user_id) = user_id {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
            ))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        } else if let Some(email) = email {
            user = sqlx::query_as::<_, User>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
            ))
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        }

        Ok(user)
    }

    async fn save_user(
        &self,
        name: String,
        email: String,
        phone: String,
        password: String,
        role: UserRole,
    ) -> Result<Option<User>, Error> {
        let worker_status = match role {
            UserRole::Worker => Some(WorkerStatus::Unverified),
            _ => None,
        };

        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, phone, password, role, worker_status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (email) DO NOTHING
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(phone)
        .bind(password)
        .bind(role)
        .bind(worker_status)
        .fetch_optional(&self.pool)
        .await
    }

    async fn update_profile(
        &self,
        user_id: Uuid,
        name: Option<String>,
        phone: Option<String>,
        avatar_url: Option<String>,
        bio: Option<String>,
        experience_years: Option<i32>,
        service_radius_km: Option<f64>,
        skills: Option<Vec<Uuid>>,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                avatar_url = COALESCE($4, avatar_url),
                bio = COALESCE($5, bio),
                experience_years = COALESCE($6, experience_years),
                service_radius_km = COALESCE($7, service_radius_km),
                skills = COALESCE($8, skills),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(name)
        .bind(phone)
        .bind(avatar_url)
        .bind(bio)
        .bind(experience_years)
        .bind(service_radius_km)
        .bind(skills)
        .fetch_one(&self.pool)
        .await
    }

    async fn update_worker_status(
        &self,
        user_id: Uuid,
        status: Option<WorkerStatus>,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET worker_status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
    }

    async fn submit_verification(
        &self,
        user_id: Uuid,
        doc_paths: Vec<String>,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET
                worker_status = 'pending_review'::worker_status,
                verification_docs = $2,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(doc_paths)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_online(&self, user_id: Uuid, is_online: bool) -> Result<User, Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users SET is_online = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(is_online)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_pending_workers(&self) -> Result<Vec<User>, Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE worker_status = 'pending_review'::worker_status
            ORDER BY updated_at ASC
            "#
        ))
        .fetch_all(&self.pool)
        .await
    }

    async fn get_all_users(&self) -> Result<Vec<User>, Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
    }
}
