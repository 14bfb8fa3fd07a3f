use crate::domain::task::Task;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn save_user(&self, user: User) -> Result<()>;
    /// Lookup is case-insensitive; email uniqueness is enforced against it.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
}

/// Every accessor that names a task takes the owner identity and filters on
/// it inside the lookup itself, never after the fetch.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn save(&self, task: Task) -> Result<()>;
    /// Owner's tasks ordered by creation time, most recent first.
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Task>>;
    async fn find_by_id_and_owner(&self, id: &str, user_id: &str) -> Result<Option<Task>>;
    async fn update(&self, task: Task) -> Result<()>;
    /// Returns false when the task is absent or owned by someone else.
    async fn delete_by_id_and_owner(&self, id: &str, user_id: &str) -> Result<bool>;
}
