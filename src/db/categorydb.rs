use async_trait::async_trait;
use bigdecimal::BigDecimal;
use sqlx::Error;
use uuid::Uuid;

use super::db::DBClient;
use crate::models::jobmodel::{CategoryIcon, ServiceCategory};

#[async_trait]
pub trait CategoryExt {
    async fn list_categories(&self) -> Result<Vec<ServiceCategory>, Error>;

    async fn search_categories(&self, keyword: &str) -> Result<Vec<ServiceCategory>, Error>;

    async fn get_category_by_id(&self, id: Uuid) -> Result<Option<ServiceCategory>, Error>;

    async fn create_category(
        &self,
        name: String,
        icon: CategoryIcon,
        description: String,
        base_price: BigDecimal,
    ) -> Result<ServiceCategory, Error>;

    /// Jobs keep their (possibly dangling) category_id; deletion never
    /// cascades.
    async fn delete_category(&self, id: Uuid) -> Result<bool, Error>;
}

#[async_trait]
impl CategoryExt for DBClient {
    async fn list_categories(&self) -> Result<Vec<ServiceCategory>, Error> {
        sqlx::query_as::<_, ServiceCategory>(
            r#"
            SELECT id, name, icon, description, base_price, created_at
            FROM service_categories
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    async fn search_categories(&self, keyword: &str) -> Result<Vec<ServiceCategory>, Error> {
        sqlx::query_as::<_, ServiceCategory>(
            r#"
            SELECT id, name, icon, description, base_price, created_at
            FROM service_categories
            WHERE name ILIKE '%' || $1 || '%'
            ORDER BY name ASC
            "#,
        )
        .bind(keyword)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_category_by_id(&self, id: Uuid) -> Result<Option<ServiceCategory>, Error> {
        sqlx::query_as::<_, ServiceCategory>(
            r#"
            SELECT id, name, icon, description, base_price, created_at
            FROM service_categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn create_category(
        &self,
        name: String,
        icon: CategoryIcon,
        description: String,
        base_price: BigDecimal,
    ) -> Result<ServiceCategory, Error> {
        sqlx::query_as::<_, ServiceCategory>(
            r#"
            INSERT INTO service_categories (name, icon, description, base_price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, icon, description, base_price, created_at
            "#,
        )
        .bind(name)
        .bind(icon)
        .bind(description)
        .bind(base_price)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_category(&self, id: Uuid) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM service_categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
