use async_trait::async_trait;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::Review;

#[async_trait]
pub trait ReviewExt {
    async fn create_review(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        comment: String,
    ) -> Result<Review, Error>;

    async fn get_reviews_for_user(&self, user_id: Uuid) -> Result<Vec<Review>, Error>;

    /// Recompute the reviewee's stored aggregates from the reviews table.
    /// The aggregates are a display cache; the reviews are authoritative.
    async fn refresh_user_rating(&self, user_id: Uuid) -> Result<(), Error>;
}

#[async_trait]
impl ReviewExt for DBClient {
    async fn create_review(
        &self,
        job_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        rating: i32,
        comment: String,
    ) -> Result<Review, Error> {
        sqlx::query_as::<_, Review>(
            r#"
            INSERT INTO reviews (job_id, reviewer_id, reviewee_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, job_id, reviewer_id, reviewee_id, rating, comment, created_at
            "#,
        )
        .bind(job_id)
        .bind(reviewer_id)
        .bind(reviewee_id)
        .bind(rating)
        .bind(comment)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_reviews_for_user(&self, user_id: Uuid) -> Result<Vec<Review>, Error> {
        sqlx::query_as::<_, Review>(
            r#"
            SELECT id, job_id, reviewer_id, reviewee_id, rating, comment, created_at
            FROM reviews
            WHERE reviewee_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn refresh_user_rating(&self, user_id: Uuid) -> Result<(), Error> {
        sqlx::query(
            r#"
            UPDATE users SET
                rating = sub.avg_rating,
                review_count = sub.review_count,
                updated_at = NOW()
            FROM (
                SELECT AVG(rating)::REAL AS avg_rating, COUNT(*)::INT AS review_count
                FROM reviews WHERE reviewee_id = $1
            ) AS sub
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
