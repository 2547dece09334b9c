//! In-memory collaborators for unit and router tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    admin::audit::{AuditEntry, AuditSink},
    auth::password::PasswordEncoder,
    comments::{
        repo::CommentStore,
        repo_types::{Comment, CommentWithUser, NewComment},
    },
    managers::{
        repo::ManagerStore,
        repo_types::{Manager, ManagerWithUser},
    },
    todos::{
        repo::TodoStore,
        repo_types::{NewTodo, Todo, TodoWithUser},
        weather::WeatherClient,
    },
    users::{
        repo::{DuplicateEmail, UserStore},
        repo_types::{NewUser, User, UserRole, UserSummary},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    todos: Vec<Todo>,
    managers: Vec<Manager>,
    comments: Vec<Comment>,
    user_seq: i64,
    todo_seq: i64,
    manager_seq: i64,
    comment_seq: i64,
}

impl Tables {
    fn summary(&self, user_id: i64) -> Option<UserSummary> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .map(UserSummary::from)
    }

    fn insert_user(&mut self, email: &str, password_hash: &str, role: UserRole) -> User {
        self.user_seq += 1;
        let user = User {
            id: self.user_seq,
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            role,
            created_at: OffsetDateTime::now_utc(),
        };
        self.users.push(user.clone());
        user
    }

    fn insert_todo(&mut self, title: &str, contents: &str, weather: &str, user_id: Option<i64>) -> Todo {
        self.todo_seq += 1;
        let now = OffsetDateTime::now_utc();
        let todo = Todo {
            id: self.todo_seq,
            title: title.to_string(),
            contents: contents.to_string(),
            weather: weather.to_string(),
            user_id,
            created_at: now,
            modified_at: now,
        };
        self.todos.push(todo.clone());
        todo
    }

    fn check_refs(&self, todo_id: i64, user_id: i64) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.todos.iter().any(|t| t.id == todo_id),
            "foreign key violation: todo {todo_id}"
        );
        anyhow::ensure!(
            self.users.iter().any(|u| u.id == user_id),
            "foreign key violation: user {user_id}"
        );
        Ok(())
    }

    fn with_user(&self, todo: &Todo) -> TodoWithUser {
        TodoWithUser {
            todo: todo.clone(),
            user: todo.user_id.and_then(|id| self.summary(id)),
        }
    }
}

/// All four stores over shared vectors; rows come back in insertion order.
/// Inserts reject unknown `todo_id`/`user_id` the way the foreign keys do.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    user_calls: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user whose hash matches `password` under [`PlainEncoder`].
    pub fn seed_user(&self, email: &str, password: &str, role: UserRole) -> User {
        let hash = PlainEncoder::hash_of(password);
        self.tables.lock().unwrap().insert_user(email, &hash, role)
    }

    pub fn seed_todo(&self, creator: Option<i64>) -> Todo {
        self.tables
            .lock()
            .unwrap()
            .insert_todo("title", "contents", "Sunny", creator)
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let tables = self.tables.lock().unwrap();
        tables.users.iter().find(|u| u.email == email).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.tables.lock().unwrap().users.len()
    }

    pub fn todo_count(&self) -> usize {
        self.tables.lock().unwrap().todos.len()
    }

    pub fn manager_count(&self) -> usize {
        self.tables.lock().unwrap().managers.len()
    }

    /// Number of [`UserStore`] calls made so far; seeding is not counted.
    pub fn user_store_calls(&self) -> usize {
        self.user_calls.load(Ordering::SeqCst)
    }

    fn count_user_call(&self) {
        self.user_calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<User>> {
        self.count_user_call();
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.count_user_call();
        Ok(self.user_by_email(email))
    }

    async fn exists_by_email(&self, email: &str) -> anyhow::Result<bool> {
        self.count_user_call();
        Ok(self.user_by_email(email).is_some())
    }

    async fn create(&self, new_user: NewUser<'_>) -> anyhow::Result<User> {
        self.count_user_call();
        let mut tables = self.tables.lock().unwrap();
        if tables.users.iter().any(|u| u.email == new_user.email) {
            return Err(DuplicateEmail.into());
        }
        Ok(tables.insert_user(new_user.email, new_user.password_hash, new_user.role))
    }
}

#[async_trait]
impl TodoStore for MemoryStore {
    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Todo>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.todos.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_id_with_user(&self, id: i64) -> anyhow::Result<Option<TodoWithUser>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .todos
            .iter()
            .find(|t| t.id == id)
            .map(|t| tables.with_user(t)))
    }

    async fn list_with_user(&self, limit: i64, offset: i64) -> anyhow::Result<Vec<TodoWithUser>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .todos
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|t| tables.with_user(t))
            .collect())
    }

    async fn create(&self, new_todo: NewTodo<'_>) -> anyhow::Result<Todo> {
        let mut tables = self.tables.lock().unwrap();
        Ok(tables.insert_todo(
            new_todo.title,
            new_todo.contents,
            new_todo.weather,
            Some(new_todo.user_id),
        ))
    }
}

#[async_trait]
impl ManagerStore for MemoryStore {
    async fn find_by_todo_id_with_user(
        &self,
        todo_id: i64,
    ) -> anyhow::Result<Vec<ManagerWithUser>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .managers
            .iter()
            .filter(|m| m.todo_id == todo_id)
            .filter_map(|m| {
                tables.summary(m.user_id).map(|user| ManagerWithUser {
                    id: m.id,
                    todo_id: m.todo_id,
                    user,
                })
            })
            .collect())
    }

    async fn create(&self, todo_id: i64, user_id: i64) -> anyhow::Result<Manager> {
        let mut tables = self.tables.lock().unwrap();
        tables.check_refs(todo_id, user_id)?;
        tables.manager_seq += 1;
        let manager = Manager {
            id: tables.manager_seq,
            todo_id,
            user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.managers.push(manager.clone());
        Ok(manager)
    }

    async fn delete(&self, todo_id: i64, user_id: i64) -> anyhow::Result<u64> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.managers.len();
        tables
            .managers
            .retain(|m| !(m.todo_id == todo_id && m.user_id == user_id));
        Ok((before - tables.managers.len()) as u64)
    }
}

#[async_trait]
impl CommentStore for MemoryStore {
    async fn find_by_todo_id_with_user(
        &self,
        todo_id: i64,
    ) -> anyhow::Result<Vec<CommentWithUser>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .comments
            .iter()
            .filter(|c| c.todo_id == todo_id)
            .filter_map(|c| {
                tables.summary(c.user_id).map(|user| CommentWithUser {
                    id: c.id,
                    contents: c.contents.clone(),
                    todo_id: c.todo_id,
                    user,
                    created_at: c.created_at,
                })
            })
            .collect())
    }

    async fn create(&self, new_comment: NewComment<'_>) -> anyhow::Result<Comment> {
        let mut tables = self.tables.lock().unwrap();
        tables.check_refs(new_comment.todo_id, new_comment.user_id)?;
        tables.comment_seq += 1;
        let comment = Comment {
            id: tables.comment_seq,
            contents: new_comment.contents.to_string(),
            todo_id: new_comment.todo_id,
            user_id: new_comment.user_id,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.comments.push(comment.clone());
        Ok(comment)
    }

    async fn delete(&self, id: i64) -> anyhow::Result<bool> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.comments.len();
        tables.comments.retain(|c| c.id != id);
        Ok(tables.comments.len() < before)
    }
}

/// Reversible stand-in for Argon2 that counts how often it is asked to hash.
#[derive(Debug, Default)]
pub struct PlainEncoder {
    encodes: AtomicUsize,
}

impl PlainEncoder {
    fn hash_of(plain: &str) -> String {
        format!("plain${plain}")
    }

    pub fn encode_calls(&self) -> usize {
        self.encodes.load(Ordering::SeqCst)
    }
}

impl PasswordEncoder for PlainEncoder {
    fn encode(&self, plain: &str) -> anyhow::Result<String> {
        self.encodes.fetch_add(1, Ordering::SeqCst);
        Ok(Self::hash_of(plain))
    }

    fn matches(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        Ok(Self::hash_of(plain) == hash)
    }
}

/// Weather client returning a fixed tag and counting lookups.
#[derive(Debug)]
pub struct FixedWeather {
    value: Option<String>,
    calls: AtomicUsize,
}

impl FixedWeather {
    pub fn new(value: Option<&str>) -> Self {
        Self {
            value: value.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherClient for FixedWeather {
    async fn today(&self) -> Option<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.value.clone()
    }
}

#[derive(Debug, Default)]
pub struct RecordingAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl RecordingAuditSink {
    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl AuditSink for RecordingAuditSink {
    fn record(&self, entry: &AuditEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}
