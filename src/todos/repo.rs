use async_trait::async_trait;
use sqlx::PgPool;

use crate::todos::repo_types::{NewTodo, Todo, TodoUserRow, TodoWithUser};

#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Todo>>;
    /// Same as `find_by_id` with the creator attached.
    async fn find_by_id_with_user(&self, id: i64) -> anyhow::Result<Option<TodoWithUser>>;
    async fn list_with_user(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<TodoWithUser>>;
    async fn create(&self, new_todo: NewTodo<'_>) -> anyhow::Result<Todo>;
}

#[derive(Clone)]
pub struct PgTodoStore {
    db: PgPool,
}

impl PgTodoStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

const TODO_WITH_USER: &str = r#"
    SELECT t.id, t.title, t.contents, t.weather, t.user_id, t.created_at, t.modified_at,
           u.email AS user_email, u.role AS user_role
      FROM todos t
      LEFT JOIN users u ON u.id = t.user_id
"#;

#[async_trait]
impl TodoStore for PgTodoStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Todo>> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            SELECT id, title, contents, weather, user_id, created_at, modified_at
            FROM todos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(todo)
    }

    async fn find_by_id_with_user(&self, id: i64) -> anyhow::Result<Option<TodoWithUser>> {
        let row = sqlx::query_as::<_, TodoUserRow>(&format!("{TODO_WITH_USER} WHERE t.id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn list_with_user(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<TodoWithUser>> {
        let rows = sqlx::query_as::<_, TodoUserRow>(&format!(
            "{TODO_WITH_USER} ORDER BY t.id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_todo: NewTodo<'_>) -> anyhow::Result<Todo> {
        let todo = sqlx::query_as::<_, Todo>(
            r#"
            INSERT INTO todos (title, contents, weather, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, contents, weather, user_id, created_at, modified_at
            "#,
        )
        .bind(new_todo.title)
        .bind(new_todo.contents)
        .bind(new_todo.weather)
        .bind(new_todo.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(todo)
    }
}
