use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::error::AppError;
use crate::log_info;
use crate::providers::ProviderRegistry;
use crate::repositories::chat_repo::ChatRepo;
use crate::repositories::user_repo::UserRepo;
use crate::repositories::writing_repo::WritingRepo;
use crate::services::dispatch::DispatchService;

/// Shared application state: pools, repositories, the frozen provider
/// registry, and the dispatcher. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub user_repo: Arc<UserRepo>,
    pub chat_repo: Arc<ChatRepo>,
    pub writing_repo: Arc<WritingRepo>,
    pub registry: Arc<ProviderRegistry>,
    pub dispatch: Arc<DispatchService>,
}

impl AppState {
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        let registry = Arc::new(ProviderRegistry::from_config(config)?);
        let db = Arc::new(Database::connect(&config.database_url, 4).await?);
        Self::from_parts(db, registry).await
    }

    /// Wires repositories and the dispatcher around an existing database and
    /// registry. Tests use this with in-memory pools and stub providers.
    pub async fn from_parts(
        db: Arc<Database>,
        registry: Arc<ProviderRegistry>,
    ) -> Result<Self, AppError> {
        let read_pool = db.read_pool().clone();
        let write_pool = db.write_pool().clone();

        let user_repo = Arc::new(UserRepo::with_pools(read_pool.clone(), write_pool.clone()));
        let chat_repo = Arc::new(ChatRepo::with_pools(read_pool.clone(), write_pool.clone()));
        let writing_repo = Arc::new(WritingRepo::with_pools(read_pool, write_pool));

        let _ = user_repo.get_or_create_default_user().await?;

        if registry.is_mock_only() {
            log_info!(
                "writeflow.state",
                "No provider credentials configured; all capabilities served by the mock generator"
            );
        } else {
            log_info!(
                "writeflow.state",
                "Live providers: {}",
                registry.live_providers().join(", ")
            );
        }

        let dispatch = Arc::new(DispatchService::new(Arc::clone(&registry)));

        Ok(Self {
            db,
            user_repo,
            chat_repo,
            writing_repo,
            registry,
            dispatch,
        })
    }
}
