use crate::config::config::AppConfig;
use crate::dataset::FloatDataset;
use crate::observability::AppMetrics;
use crate::services::chat::ChatService;
use crate::services::dashboard::DashboardService;
use crate::services::session::SessionService;
use crate::storage::memory::SessionRepository;
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Read-only float dataset
    pub dataset: Arc<FloatDataset>,
    /// Session repository for raw session access
    pub session_repository: Arc<dyn SessionRepository>,
    /// Session service for session lifecycle
    pub session_service: Arc<dyn SessionService>,
    /// Chat service for conversation log writes
    pub chat_service: Arc<dyn ChatService>,
    /// Dashboard service for command dispatch
    pub dashboard_service: Arc<dyn DashboardService>,
    /// Application metrics
    pub metrics: Arc<AppMetrics>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("dataset", &format!("FloatDataset({} rows)", self.dataset.len()))
            .field("session_repository", &"Arc<dyn SessionRepository>")
            .field("session_service", &"Arc<dyn SessionService>")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("dashboard_service", &"Arc<dyn DashboardService>")
            .field("metrics", &"Arc<AppMetrics>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        dataset: Arc<FloatDataset>,
        session_repository: Arc<dyn SessionRepository>,
        session_service: Arc<dyn SessionService>,
        chat_service: Arc<dyn ChatService>,
        dashboard_service: Arc<dyn DashboardService>,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            dataset,
            session_repository,
            session_service,
            chat_service,
            dashboard_service,
            metrics,
        }
    }

    /// Create development application state backed by the sample dataset
    pub fn development() -> Self {
        use crate::services::{create_chat_service, create_dashboard_service, create_session_service};
        use crate::storage::memory::InMemorySessionRepository;

        let config = AppConfig::development();
        let dataset = Arc::new(FloatDataset::sample());
        let session_repository: Arc<dyn SessionRepository> =
            Arc::new(InMemorySessionRepository::new());
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

        Self::new(
            dataset,
            session_repository,
            session_service,
            chat_service,
            dashboard_service,
            Arc::new(AppMetrics::default()),
        )
    }
}
