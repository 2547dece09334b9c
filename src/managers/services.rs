use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    auth::AuthUser,
    error::{AppError, AppResult},
    managers::{repo::ManagerStore, repo_types::ManagerWithUser},
    todos::{repo::TodoStore, repo_types::Todo},
    users::{repo::UserStore, repo_types::UserSummary},
};

/// Decides who may be added to or removed from a todo's managers.
///
/// Check order is observable through the error returned: the todo must exist
/// before authorization is considered, and the candidate user must exist
/// before the self-assignment rule is applied.
pub struct ManagerService {
    managers: Arc<dyn ManagerStore>,
    todos: Arc<dyn TodoStore>,
    users: Arc<dyn UserStore>,
}

impl ManagerService {
    pub fn new(
        managers: Arc<dyn ManagerStore>,
        todos: Arc<dyn TodoStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            managers,
            todos,
            users,
        }
    }

    async fn find_todo(&self, todo_id: i64) -> AppResult<Todo> {
        self.todos
            .find_by_id(todo_id)
            .await?
            .ok_or_else(|| AppError::not_found("Todo not found"))
    }

    fn creator_of(todo: &Todo) -> AppResult<i64> {
        todo.user_id.ok_or_else(|| {
            warn!(todo_id = todo.id, "todo has no creator");
            AppError::validation("Todo has no creator on record")
        })
    }

    pub async fn save_manager(
        &self,
        caller: &AuthUser,
        todo_id: i64,
        manager_user_id: i64,
    ) -> AppResult<ManagerWithUser> {
        let todo = self.find_todo(todo_id).await?;
        let creator_id = Self::creator_of(&todo)?;

        if creator_id != caller.id {
            warn!(todo_id, user_id = caller.id, creator_id, "non-creator registering manager");
            return Err(AppError::forbidden(
                "Only the todo's creator may register a manager",
            ));
        }

        let candidate = self
            .users
            .find_by_id(manager_user_id)
            .await?
            .ok_or_else(|| {
                warn!(todo_id, manager_user_id, "manager user missing");
                AppError::not_found("Manager user does not exist")
            })?;

        if candidate.id == creator_id {
            warn!(todo_id, creator_id, "creator registering self as manager");
            return Err(AppError::validation(
                "Todo creator cannot register themselves as manager",
            ));
        }

        let manager = self.managers.create(todo.id, candidate.id).await?;
        info!(manager_id = manager.id, todo_id, manager_user_id, "manager registered");
        Ok(ManagerWithUser {
            id: manager.id,
            todo_id: manager.todo_id,
            user: UserSummary::from(&candidate),
        })
    }

    pub async fn get_managers(&self, todo_id: i64) -> AppResult<Vec<ManagerWithUser>> {
        let todo = self.find_todo(todo_id).await?;
        Ok(self.managers.find_by_todo_id_with_user(todo.id).await?)
    }

    /// Removing a (todo, user) pair that is not registered is a no-op.
    pub async fn delete_manager(
        &self,
        caller: &AuthUser,
        todo_id: i64,
        manager_user_id: i64,
    ) -> AppResult<()> {
        let user = self
            .users
            .find_by_id(caller.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let todo = self.find_todo(todo_id).await?;
        let creator_id = Self::creator_of(&todo)?;

        if creator_id != user.id {
            warn!(todo_id, user_id = user.id, creator_id, "non-creator removing manager");
            return Err(AppError::forbidden(
                "Only the todo's creator may remove a manager",
            ));
        }

        let removed = self.managers.delete(todo.id, manager_user_id).await?;
        if removed == 0 {
            debug!(todo_id, manager_user_id, "no manager row to remove");
        } else {
            info!(todo_id, manager_user_id, "manager removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{testing::MemoryStore, users::repo_types::UserRole};

    fn auth(id: i64) -> AuthUser {
        AuthUser {
            id,
            email: format!("user{id}@a.com"),
            role: UserRole::User,
        }
    }

    fn service(store: &MemoryStore) -> ManagerService {
        let s = Arc::new(store.clone());
        ManagerService::new(s.clone(), s.clone(), s)
    }

    #[tokio::test]
    async fn save_manager_rejects_missing_todo() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let err = service(&store)
            .save_manager(&auth(a.id), 1, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Todo not found");
    }

    #[tokio::test]
    async fn save_manager_rejects_non_creator() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let b = store.seed_user("b@b.com", "pw", UserRole::User);
        let c = store.seed_user("c@c.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));

        let err = service(&store)
            .save_manager(&auth(b.id), todo.id, c.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(store.manager_count(), 0);
    }

    #[tokio::test]
    async fn authorization_is_checked_before_candidate_lookup() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let b = store.seed_user("b@b.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));

        let err = service(&store)
            .save_manager(&auth(b.id), todo.id, 999)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn save_manager_rejects_unknown_candidate() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));

        let err = service(&store)
            .save_manager(&auth(a.id), todo.id, 999)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "Manager user does not exist");
    }

    #[tokio::test]
    async fn save_manager_rejects_self_assignment() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));

        let err = service(&store)
            .save_manager(&auth(a.id), todo.id, a.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Todo creator cannot register themselves as manager"
        );
        assert_eq!(store.manager_count(), 0);
    }

    #[tokio::test]
    async fn save_manager_rejects_todo_without_creator() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let b = store.seed_user("b@b.com", "pw", UserRole::User);
        let todo = store.seed_todo(None);

        let err = service(&store)
            .save_manager(&auth(a.id), todo.id, b.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Todo has no creator on record");
    }

    #[tokio::test]
    async fn save_manager_persists_and_lists() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let c = store.seed_user("c@c.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));
        let svc = service(&store);

        let saved = svc.save_manager(&auth(a.id), todo.id, c.id).await.unwrap();
        assert_eq!(saved.todo_id, todo.id);
        assert_eq!(saved.user.id, c.id);
        assert_eq!(saved.user.email, "c@c.com");

        let managers = svc.get_managers(todo.id).await.unwrap();
        assert_eq!(managers, vec![saved]);
    }

    #[tokio::test]
    async fn get_managers_missing_todo_is_not_found() {
        let store = MemoryStore::new();
        let err = service(&store).get_managers(1).await.unwrap_err();
        assert_eq!(err.to_string(), "Todo not found");
    }

    #[tokio::test]
    async fn get_managers_is_stable_and_insertion_ordered() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let b = store.seed_user("b@b.com", "pw", UserRole::User);
        let c = store.seed_user("c@c.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));
        let svc = service(&store);
        svc.save_manager(&auth(a.id), todo.id, c.id).await.unwrap();
        svc.save_manager(&auth(a.id), todo.id, b.id).await.unwrap();

        let first = svc.get_managers(todo.id).await.unwrap();
        let second = svc.get_managers(todo.id).await.unwrap();
        assert_eq!(first, second);
        let users: Vec<i64> = first.iter().map(|m| m.user.id).collect();
        assert_eq!(users, vec![c.id, b.id]);
    }

    #[tokio::test]
    async fn delete_manager_requires_existing_caller() {
        let store = MemoryStore::new();
        let err = service(&store)
            .delete_manager(&auth(3), 1, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.to_string(), "User not found");
    }

    #[tokio::test]
    async fn delete_manager_requires_existing_todo() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let err = service(&store)
            .delete_manager(&auth(a.id), 1, 2)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Todo not found");
    }

    #[tokio::test]
    async fn delete_manager_rejects_todo_without_creator() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let todo = store.seed_todo(None);
        let err = service(&store)
            .delete_manager(&auth(a.id), todo.id, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Todo has no creator on record");
    }

    #[tokio::test]
    async fn delete_manager_rejects_non_creator() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let b = store.seed_user("b@b.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));
        let svc = service(&store);
        svc.save_manager(&auth(a.id), todo.id, b.id).await.unwrap();

        let err = svc.delete_manager(&auth(b.id), todo.id, b.id).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(store.manager_count(), 1);
    }

    #[tokio::test]
    async fn delete_manager_removes_row_and_tolerates_absent_one() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@a.com", "pw", UserRole::User);
        let b = store.seed_user("b@b.com", "pw", UserRole::User);
        let todo = store.seed_todo(Some(a.id));
        let svc = service(&store);
        svc.save_manager(&auth(a.id), todo.id, b.id).await.unwrap();

        svc.delete_manager(&auth(a.id), todo.id, b.id).await.unwrap();
        assert!(svc.get_managers(todo.id).await.unwrap().is_empty());

        svc.delete_manager(&auth(a.id), todo.id, b.id).await.unwrap();
    }
}
