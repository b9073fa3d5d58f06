use std::borrow::Cow;

use sqlx::postgres::PgPool;

use super::item::Item;
use super::ItemStore;
use crate::error::OpError;

/// Postgres-backed item store.
pub struct Connection {
    pool: PgPool,
}

impl Connection {
    pub async fn connect<'a>(connection_string: Cow<'a, str>) -> Self {
        let pool = PgPool::connect(&connection_string)
            .await
            .expect("Failed to connect to database");
        Self { pool }
    }

    pub async fn run_migrations(&self) {
        sqlx::migrate!()
            .run(&self.pool)
            .await
            .expect("Failed to run migrations");
    }
}

impl ItemStore for Connection {
    async fn save(&self, item: &Item) -> Result<(), OpError> {
        sqlx::query("INSERT INTO items (hash, user_name, name, content) VALUES ($1, $2, $3, $4)")
            .bind(item.storage_key())
            .bind(&item.user_name)
            .bind(&item.name)
            .bind(&item.content)
            .execute(&self.pool)
            .await
            .map_err(|e| OpError::wrap("save item", e))?;
        Ok(())
    }

    async fn get(&self, user: &str, name: &str) -> Result<Option<Item>, OpError> {
        let content: Option<String> =
            sqlx::query_scalar("SELECT content FROM items WHERE user_name = $1 AND name = $2")
                .bind(user)
                .bind(name)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| OpError::wrap("get item", e))?;

        Ok(content.map(|content| Item::new(user, name, content)))
    }

    async fn is_exists(&self, user: &str, name: &str) -> Result<bool, OpError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM items WHERE user_name = $1 AND name = $2")
                .bind(user)
                .bind(name)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| OpError::wrap("check if item exists", e))?;

        Ok(count > 0)
    }

    async fn remove(&self, user: &str, name: &str) -> Result<(), OpError> {
        sqlx::query("DELETE FROM items WHERE user_name = $1 AND name = $2")
            .bind(user)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| OpError::wrap("remove item", e))?;
        Ok(())
    }

    async fn list(&self, user: &str) -> Result<Vec<String>, OpError> {
        sqlx::query_scalar("SELECT name FROM items WHERE user_name = $1 ORDER BY name")
            .bind(user)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| OpError::wrap("list items", e))
    }
}
