use floatchat::api::{self, app_state::AppState};
use floatchat::config::loader::ConfigLoader;
use floatchat::dataset::FloatDataset;
use floatchat::observability::{
    HealthCheckResult, ObservabilityState, create_observability_router, init_tracing,
    metrics_middleware,
};
use floatchat::services::{
    ChatService, DashboardService, SessionService, create_chat_service, create_dashboard_service,
    create_session_service,
};
use floatchat::storage::memory::{InMemorySessionRepository, SessionRepository};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load()?;
    // 守卫决定后台日志线程的生命周期，保持到进程退出
    let _log_guard = init_tracing(&config.logging);

    info!("Starting FloatChat...");
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let dataset = match &config.dataset.source_path {
        Some(path) => {
            let dataset = FloatDataset::from_csv_path(path)?;
            info!(
                "Dataset loaded from {}: {} rows",
                path.display(),
                dataset.len()
            );
            dataset
        }
        None => {
            let dataset = FloatDataset::sample();
            info!("Built-in sample dataset loaded: {} rows", dataset.len());
            dataset
        }
    };
    let dataset = Arc::new(dataset);

    let session_repository: Arc<dyn SessionRepository> =
        Arc::new(InMemorySessionRepository::new());
    info!("Session repository initialized");

    let session_service: Arc<dyn SessionService> =
        Arc::from(create_session_service(session_repository.clone()));
    let chat_service: Arc<dyn ChatService> = Arc::from(create_chat_service(
        session_repository.clone(),
        config.chat.max_query_length,
    ));
    let dashboard_service: Arc<dyn DashboardService> = Arc::from(create_dashboard_service(
        dataset.clone(),
        session_repository.clone(),
        chat_service.clone(),
    ));
    info!("Services initialized");

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
    ));
    observability_state
        .add_health_check(HealthCheckResult {
            name: "dataset".to_string(),
            healthy: !dataset.is_empty(),
            message: format!("{} rows loaded", dataset.len()),
            latency_ms: 0,
        })
        .await;

    let app_state = AppState::new(
        dataset,
        session_repository,
        session_service,
        chat_service,
        dashboard_service,
        observability_state.metrics.clone(),
    );
    info!("Application state created");

    let api_router = api::initialize_api(app_state).await?;
    let router = create_observability_router(observability_state.clone())
        .merge(api_router)
        .layer(axum::middleware::from_fn_with_state(
            observability_state,
            metrics_middleware,
        ));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
