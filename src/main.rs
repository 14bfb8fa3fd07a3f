use actix_cors::Cors;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use task_manager_api::application::auth_service::AuthService;
use task_manager_api::application::priority_service::PriorityClient;
use task_manager_api::application::task_service::TaskService;
use task_manager_api::data::task_repository::InMemoryTaskRepository;
use task_manager_api::data::user_repository::InMemoryUserRepository;
use task_manager_api::infrastructure::config::AppConfig;
use task_manager_api::infrastructure::logging::init_logging;
use task_manager_api::presentation::auth::{login, register};
use task_manager_api::presentation::handlers::{
    AppState, analyze_priority, create_task, delete_task, get_task, health_check, list_tasks,
    update_task,
};
use task_manager_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    init_logging();
    info!("Logging initialized");

    let config = AppConfig::from_env()?;
    info!(
        host = %config.host,
        port = config.port,
        issuer = %config.jwt.issuer,
        "Configuration loaded"
    );

    let task_repository = InMemoryTaskRepository::new();
    let user_repository = InMemoryUserRepository::new();

    let task_service = TaskService::new(Arc::new(task_repository));
    let auth_service = Arc::new(AuthService::new(
        Arc::new(user_repository),
        config.jwt.clone(),
    ));
    let priority_client = PriorityClient::new(config.priority_service_url.clone())?;
    info!("Services created");

    let state = web::Data::new(AppState {
        task_service,
        auth_service,
        priority_client,
    });

    let jwt_settings = config.jwt.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_settings.clone()))
            .wrap(Cors::permissive())
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .route("/health", web::get().to(health_check))
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(register))
                    .route("/login", web::post().to(login)),
            )
            .service(
                web::scope("/tasks")
                    .route("", web::get().to(list_tasks))
                    .route("", web::post().to(create_task))
                    .route("/analyze", web::post().to(analyze_priority))
                    .route("/{id}", web::get().to(get_task))
                    .route("/{id}", web::put().to(update_task))
                    .route("/{id}", web::delete().to(delete_task)),
            )
    });

    let server = server.bind((config.host.as_str(), config.port))?;
    info!(
        address = %format!("{}:{}", config.host, config.port),
        "Starting HTTP server"
    );
    server.run().await?;

    Ok(())
}
