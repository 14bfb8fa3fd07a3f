use crate::application::auth_service::AuthService;
use crate::application::priority_service::{AnalyzePriority, PriorityClient};
use crate::application::task_service::TaskService;
use crate::data::task_repository::InMemoryTaskRepository;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::domain::task::{CreateTask, UpdateTask};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{FromRequest, HttpMessage, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

// AppState holding the services
pub struct AppState {
    pub task_service: TaskService<InMemoryTaskRepository>,
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub priority_client: PriorityClient,
}

#[derive(Serialize)]
struct ErrorResponse {
    message: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// API Error Types
//
// Business-rule failures keep their own message and status; internal faults
// are logged with their cause but answered with an opaque message.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Internal server error")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match self {
            ApiError::Validation(_) => actix_web::http::StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => actix_web::http::StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => actix_web::http::StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        match self {
            ApiError::Validation(msg) => {
                warn!(error = %msg, status = %status, "Request rejected")
            }
            ApiError::NotFound(msg) => {
                warn!(error = %msg, status = %status, "Resource not found")
            }
            ApiError::Unauthorized(msg) => {
                warn!(error = %msg, status = %status, "Unauthorized request")
            }
            ApiError::Internal(detail) => {
                error!(error = %detail, status = %status, "Internal error")
            }
        }

        HttpResponse::build(status).json(ErrorResponse {
            message: self.to_string(),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(e @ DomainError::DuplicateEmail) => ApiError::Validation(e.to_string()),
            Some(e @ DomainError::InvalidCredentials) => ApiError::Validation(e.to_string()),
            Some(e @ DomainError::TaskNotFound) => ApiError::NotFound(e.to_string()),
            Some(DomainError::Internal(detail)) => ApiError::Internal(detail.clone()),
            None => ApiError::Internal(err.to_string()),
        }
    }
}

// AuthenticatedUser extractor
impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        Box::pin(async move {
            user.ok_or_else(|| ApiError::Unauthorized("User not authenticated".to_string()))
        })
    }
}

// Handlers

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    };
    HttpResponse::Ok().json(response)
}

#[instrument(skip(state, user), fields(user_id = %user.user_id))]
pub async fn list_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let tasks = state
        .task_service
        .list_tasks(&user.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to list tasks");
            ApiError::from(e)
        })?;

    info!(count = tasks.len(), "Tasks listed");
    Ok(HttpResponse::Ok().json(tasks))
}

#[instrument(skip(state, user), fields(task_id = %*path, user_id = %user.user_id))]
pub async fn get_task(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();
    let task = state
        .task_service
        .get_task(&task_id, &user.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to get task");
            ApiError::from(e)
        })?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    info!("Task retrieved");
    Ok(HttpResponse::Ok().json(task))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id, task_id))]
pub async fn create_task(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<CreateTask>,
) -> Result<HttpResponse, ApiError> {
    let task = state
        .task_service
        .create_task(req.into_inner(), &user.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create task");
            ApiError::from(e)
        })?;

    tracing::Span::current().record("task_id", task.id.as_str());
    info!("Task created");
    Ok(HttpResponse::Created().json(task))
}

#[instrument(skip(state, user, req), fields(task_id = %*path, user_id = %user.user_id))]
pub async fn update_task(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: AuthenticatedUser,
    req: web::Json<UpdateTask>,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();
    let task = state
        .task_service
        .update_task(&task_id, req.into_inner(), &user.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to update task");
            ApiError::from(e)
        })?;

    info!("Task updated");
    Ok(HttpResponse::Ok().json(task))
}

#[instrument(skip(state, user), fields(task_id = %*path, user_id = %user.user_id))]
pub async fn delete_task(
    state: web::Data<AppState>,
    path: web::Path<String>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let task_id = path.into_inner();
    state
        .task_service
        .delete_task(&task_id, &user.user_id)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to delete task");
            ApiError::from(e)
        })?;

    info!("Task deleted");
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

#[instrument(skip(state, user, req), fields(user_id = %user.user_id))]
pub async fn analyze_priority(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<AnalyzePriority>,
) -> Result<HttpResponse, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("Title is required".to_string()));
    }

    // Advisory call; always answers, falling back to the default suggestion
    let suggestion = state.priority_client.analyze(&req.into_inner()).await;
    Ok(HttpResponse::Ok().json(suggestion))
}
