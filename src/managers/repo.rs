use async_trait::async_trait;
use sqlx::PgPool;

use crate::managers::repo_types::{Manager, ManagerUserRow, ManagerWithUser};

#[async_trait]
pub trait ManagerStore: Send + Sync {
    /// Managers of a todo with their users attached, in insertion order.
    async fn find_by_todo_id_with_user(&self, todo_id: i64)
        -> anyhow::Result<Vec<ManagerWithUser>>;
    async fn create(&self, todo_id: i64, user_id: i64) -> anyhow::Result<Manager>;
    /// Returns the number of rows removed.
    async fn delete(&self, todo_id: i64, user_id: i64) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgManagerStore {
    db: PgPool,
}

impl PgManagerStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ManagerStore for PgManagerStore {
    async fn find_by_todo_id_with_user(
        &self,
        todo_id: i64,
    ) -> anyhow::Result<Vec<ManagerWithUser>> {
        let rows = sqlx::query_as::<_, ManagerUserRow>(
            r#"
            SELECT m.id, m.todo_id, m.user_id, u.email AS user_email, u.role AS user_role
              FROM managers m
              JOIN users u ON u.id = m.user_id
             WHERE m.todo_id = $1
             ORDER BY m.id ASC
            "#,
        )
        .bind(todo_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, todo_id: i64, user_id: i64) -> anyhow::Result<Manager> {
        let manager = sqlx::query_as::<_, Manager>(
            r#"
            INSERT INTO managers (todo_id, user_id)
            VALUES ($1, $2)
            RETURNING id, todo_id, user_id, created_at
            "#,
        )
        .bind(todo_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(manager)
    }

    async fn delete(&self, todo_id: i64, user_id: i64) -> anyhow::Result<u64> {
        let res = sqlx::query(r#"DELETE FROM managers WHERE todo_id = $1 AND user_id = $2"#)
            .bind(todo_id)
            .bind(user_id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected())
    }
}
