use crate::domain::repository::TaskRepository;
use crate::domain::task::Task;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

#[derive(Clone)]
pub struct InMemoryTaskRepository {
    storage: Arc<RwLock<HashMap<String, Task>>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    #[instrument(skip(self, task), fields(task_id = %task.id, user_id = %task.user_id))]
    async fn save(&self, task: Task) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(task.id.clone(), task);
        debug!("Task saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    async fn find_by_owner(&self, user_id: &str) -> Result<Vec<Task>> {
        let storage = self.storage.read().await;
        let mut tasks: Vec<Task> = storage
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        debug!(count = tasks.len(), "Tasks loaded for owner");
        Ok(tasks)
    }

    #[instrument(skip(self), fields(task_id = id, user_id = user_id))]
    async fn find_by_id_and_owner(&self, id: &str, user_id: &str) -> Result<Option<Task>> {
        let storage = self.storage.read().await;
        // Ownership is part of the lookup predicate itself
        let task = storage.get(id).filter(|t| t.user_id == user_id).cloned();
        match &task {
            Some(_) => debug!("Task found for owner"),
            None => trace!("Task absent or owned by another user"),
        }
        Ok(task)
    }

    #[instrument(skip(self, task), fields(task_id = %task.id, user_id = %task.user_id))]
    async fn update(&self, task: Task) -> Result<()> {
        let mut storage = self.storage.write().await;
        storage.insert(task.id.clone(), task);
        debug!("Task updated in memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(task_id = id, user_id = user_id))]
    async fn delete_by_id_and_owner(&self, id: &str, user_id: &str) -> Result<bool> {
        let mut storage = self.storage.write().await;
        match storage.get(id) {
            Some(task) if task.user_id == user_id => {
                storage.remove(id);
                debug!("Task deleted from memory storage");
                Ok(true)
            }
            _ => {
                trace!("Nothing to delete for this owner");
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::Priority;
    use chrono::{Duration, Utc};

    fn task(id: &str, user_id: &str, minutes_ago: i64) -> Task {
        let at = Utc::now() - Duration::minutes(minutes_ago);
        Task {
            id: id.to_string(),
            title: format!("Task {id}"),
            description: None,
            priority: Priority::Medium,
            deadline: None,
            is_completed: false,
            created_at: at,
            updated_at: at,
            user_id: user_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_owner_filters_other_users() {
        let repo = InMemoryTaskRepository::new();
        repo.save(task("t1", "alice", 1)).await.unwrap();
        repo.save(task("t2", "bob", 1)).await.unwrap();

        let tasks = repo.find_by_owner("alice").await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, "t1");
    }

    #[tokio::test]
    async fn test_find_by_owner_orders_most_recent_first() {
        let repo = InMemoryTaskRepository::new();
        repo.save(task("old", "alice", 30)).await.unwrap();
        repo.save(task("new", "alice", 1)).await.unwrap();
        repo.save(task("middle", "alice", 10)).await.unwrap();

        let tasks = repo.find_by_owner("alice").await.unwrap();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "middle", "old"]);
    }

    #[tokio::test]
    async fn test_find_by_id_and_owner_hides_foreign_tasks() {
        let repo = InMemoryTaskRepository::new();
        repo.save(task("t1", "bob", 1)).await.unwrap();

        // Same answer for "not mine" and "does not exist"
        assert!(
            repo.find_by_id_and_owner("t1", "alice")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.find_by_id_and_owner("missing", "alice")
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            repo.find_by_id_and_owner("t1", "bob")
                .await
                .unwrap()
                .is_some()
        );
    }

    #[tokio::test]
    async fn test_delete_refuses_foreign_tasks() {
        let repo = InMemoryTaskRepository::new();
        repo.save(task("t1", "bob", 1)).await.unwrap();

        assert!(!repo.delete_by_id_and_owner("t1", "alice").await.unwrap());
        assert!(
            repo.find_by_id_and_owner("t1", "bob")
                .await
                .unwrap()
                .is_some()
        );

        assert!(repo.delete_by_id_and_owner("t1", "bob").await.unwrap());
        assert!(
            repo.find_by_id_and_owner("t1", "bob")
                .await
                .unwrap()
                .is_none()
        );
    }
}
