use crate::domain::error::DomainError;
use crate::domain::repository::TaskRepository;
use crate::domain::task::{CreateTask, Task, UpdateTask};
use anyhow::Result;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, trace, warn};
use uuid::Uuid;

/// Ownership-scoped task CRUD. Every operation takes the authenticated
/// caller's identity explicitly; the repository filters on it in the lookup,
/// so a foreign task and a missing task are indistinguishable here.
pub struct TaskService<R: TaskRepository> {
    repository: Arc<R>,
}

impl<R: TaskRepository> TaskService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self), fields(user_id = user_id))]
    pub async fn list_tasks(&self, user_id: &str) -> Result<Vec<Task>> {
        let tasks = self.repository.find_by_owner(user_id).await?;
        trace!(count = tasks.len(), "Tasks listed");
        Ok(tasks)
    }

    #[instrument(skip(self), fields(task_id = task_id, user_id = user_id))]
    pub async fn get_task(&self, task_id: &str, user_id: &str) -> Result<Option<Task>> {
        self.repository.find_by_id_and_owner(task_id, user_id).await
    }

    #[instrument(skip(self, req), fields(user_id = user_id, task_id))]
    pub async fn create_task(&self, req: CreateTask, user_id: &str) -> Result<Task> {
        req.validate()?;

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: req.title,
            description: req.description,
            priority: req.priority,
            deadline: req.deadline,
            is_completed: req.is_completed,
            created_at: now,
            updated_at: now,
            user_id: user_id.to_string(),
        };

        self.repository.save(task.clone()).await?;

        tracing::Span::current().record("task_id", task.id.as_str());
        info!("Task created");
        Ok(task)
    }

    /// Full replacement of the mutable fields; `updated_at` is refreshed,
    /// `created_at` and ownership are untouched.
    #[instrument(skip(self, req), fields(task_id = task_id, user_id = user_id))]
    pub async fn update_task(&self, task_id: &str, req: UpdateTask, user_id: &str) -> Result<Task> {
        req.validate()?;

        let mut task = self
            .repository
            .find_by_id_and_owner(task_id, user_id)
            .await?
            .ok_or_else(|| {
                warn!("Update rejected, task absent for this owner");
                DomainError::TaskNotFound
            })?;

        task.title = req.title;
        task.description = req.description;
        task.priority = req.priority;
        task.deadline = req.deadline;
        task.is_completed = req.is_completed;
        task.updated_at = Utc::now();

        self.repository.update(task.clone()).await?;

        info!("Task updated");
        Ok(task)
    }

    #[instrument(skip(self), fields(task_id = task_id, user_id = user_id))]
    pub async fn delete_task(&self, task_id: &str, user_id: &str) -> Result<()> {
        let removed = self
            .repository
            .delete_by_id_and_owner(task_id, user_id)
            .await?;
        if !removed {
            warn!("Delete rejected, task absent for this owner");
            return Err(DomainError::TaskNotFound.into());
        }

        info!("Task deleted");
        Ok(())
    }
}
