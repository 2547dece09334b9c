use async_trait::async_trait;
use sqlx::PgPool;

use crate::comments::repo_types::{Comment, CommentUserRow, CommentWithUser, NewComment};

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Comments of a todo with their authors attached, in insertion order.
    async fn find_by_todo_id_with_user(&self, todo_id: i64)
        -> anyhow::Result<Vec<CommentWithUser>>;
    async fn create(&self, new_comment: NewComment<'_>) -> anyhow::Result<Comment>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgCommentStore {
    db: PgPool,
}

impl PgCommentStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CommentStore for PgCommentStore {
    async fn find_by_todo_id_with_user(
        &self,
        todo_id: i64,
    ) -> anyhow::Result<Vec<CommentWithUser>> {
        let rows = sqlx::query_as::<_, CommentUserRow>(
            r#"
            SELECT c.id, c.contents, c.todo_id, c.user_id, c.created_at,
                   u.email AS user_email, u.role AS user_role
              FROM comments c
              JOIN users u ON u.id = c.user_id
             WHERE c.todo_id = $1
             ORDER BY c.id ASC
            "#,
        )
        .bind(todo_id)
        .fetch_all(&self.db)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_comment: NewComment<'_>) -> anyhow::Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (contents, todo_id, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, contents, todo_id, user_id, created_at
            "#,
        )
        .bind(new_comment.contents)
        .bind(new_comment.todo_id)
        .bind(new_comment.user_id)
        .fetch_one(&self.db)
        .await?;
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM comments WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
