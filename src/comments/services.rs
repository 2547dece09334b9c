use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::AuthUser,
    comments::{
        repo::CommentStore,
        repo_types::{CommentWithUser, NewComment},
    },
    error::{AppError, AppResult},
    todos::repo::TodoStore,
    users::repo_types::UserSummary,
};

pub struct CommentService {
    comments: Arc<dyn CommentStore>,
    todos: Arc<dyn TodoStore>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentStore>, todos: Arc<dyn TodoStore>) -> Self {
        Self { comments, todos }
    }

    /// Attaches a comment authored by `caller` to a todo.
    ///
    /// Only an absent `contents` is rejected; an empty string is stored as is.
    pub async fn save_comment(
        &self,
        caller: Option<&AuthUser>,
        todo_id: i64,
        contents: Option<&str>,
    ) -> AppResult<CommentWithUser> {
        let Some(caller) = caller else {
            warn!(todo_id, "comment without caller");
            return Err(AppError::validation("user is null"));
        };
        let Some(contents) = contents else {
            warn!(todo_id, user_id = caller.id, "comment without contents");
            return Err(AppError::validation("comment contents is null"));
        };

        let todo = self
            .todos
            .find_by_id(todo_id)
            .await?
            .ok_or_else(|| AppError::not_found("Todo not found"))?;

        let comment = self
            .comments
            .create(NewComment {
                contents,
                todo_id: todo.id,
                user_id: caller.id,
            })
            .await?;

        info!(comment_id = comment.id, todo_id, user_id = caller.id, "comment saved");
        Ok(CommentWithUser {
            id: comment.id,
            contents: comment.contents,
            todo_id: comment.todo_id,
            user: UserSummary {
                id: caller.id,
                email: caller.email.clone(),
                role: caller.role,
            },
            created_at: comment.created_at,
        })
    }

    /// Lists comments without checking the todo exists; an unknown id yields
    /// an empty list.
    pub async fn get_comments(&self, todo_id: i64) -> AppResult<Vec<CommentWithUser>> {
        Ok(self.comments.find_by_todo_id_with_user(todo_id).await?)
    }

    /// Administrative deletion. Callers wrap it with the audit notifier.
    pub async fn delete_comment(&self, caller: &AuthUser, comment_id: i64) -> AppResult<()> {
        if !caller.role.is_admin() {
            warn!(user_id = caller.id, role = %caller.role, comment_id, "non-admin deleting comment");
            return Err(AppError::forbidden("Admin role required"));
        }
        if !self.comments.delete(comment_id).await? {
            return Err(AppError::not_found("Comment not found"));
        }
        info!(comment_id, user_id = caller.id, "comment deleted by admin");
        Ok(())
    }
}
