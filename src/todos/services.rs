use std::sync::Arc;

use tracing::{info, warn};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    todos::{
        repo::TodoStore,
        repo_types::{NewTodo, TodoWithUser},
        weather::WeatherClient,
    },
    users::repo_types::UserSummary,
};

const MAX_PAGE: i64 = 100;

pub struct TodoService {
    todos: Arc<dyn TodoStore>,
    weather: Arc<dyn WeatherClient>,
}

impl TodoService {
    pub fn new(todos: Arc<dyn TodoStore>, weather: Arc<dyn WeatherClient>) -> Self {
        Self { todos, weather }
    }

    /// Creates a todo owned by `caller`, tagged with today's weather.
    ///
    /// The weather lookup is only consulted once `contents` is present; a
    /// missing tag fails the request and is not retried.
    pub async fn create_todo(
        &self,
        caller: &AuthUser,
        title: &str,
        contents: Option<&str>,
    ) -> AppResult<TodoWithUser> {
        let Some(contents) = contents else {
            warn!(user_id = caller.id, "todo without contents");
            return Err(AppError::validation("Contents is required"));
        };

        let Some(weather) = self.weather.today().await else {
            warn!(user_id = caller.id, "todo without weather");
            return Err(AppError::validation("Weather is required"));
        };

        let todo = self
            .todos
            .create(NewTodo {
                title,
                contents,
                weather: &weather,
                user_id: caller.id,
            })
            .await?;

        info!(todo_id = todo.id, user_id = caller.id, %weather, "todo created");
        Ok(TodoWithUser {
            todo,
            user: Some(UserSummary {
                id: caller.id,
                email: caller.email.clone(),
                role: caller.role,
            }),
        })
    }

    pub async fn get_todo(&self, todo_id: i64) -> AppResult<TodoWithUser> {
        self.todos
            .find_by_id_with_user(todo_id)
            .await?
            .ok_or_else(|| AppError::not_found("Todo not found"))
    }

    pub async fn list_todos(&self, limit: i64, offset: i64) -> AppResult<Vec<TodoWithUser>> {
        let limit = limit.clamp(1, MAX_PAGE);
        let offset = offset.max(0);
        Ok(self.todos.list_with_user(limit, offset).await?)
    }
}
