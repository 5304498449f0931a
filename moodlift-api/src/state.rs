//! Application state for the API server

use std::sync::Arc;

use moodlift_db::{
    AccountService, AdminService, CheckinService, ContentService, DailyService, Datastore,
    DatastoreConfig, EngagementService, StoreError,
};

use crate::middleware::auth::JwtConfig;

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub checkins: Arc<CheckinService>,
    pub content: Arc<ContentService>,
    pub daily: Arc<DailyService>,
    pub engagement: Arc<EngagementService>,
    pub admin: Arc<AdminService>,
    pub jwt: Arc<JwtConfig>,
    /// Shared datastore handle, kept for health checks
    pub datastore: Arc<Datastore>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create new app state from a connected datastore
    pub async fn new(datastore: Arc<Datastore>, jwt: JwtConfig) -> Result<Self, StoreError> {
        // Initialize schema
        datastore.init_schema().await?;

        Ok(Self {
            accounts: Arc::new(AccountService::new(datastore.clone())),
            checkins: Arc::new(CheckinService::new(datastore.clone())),
            content: Arc::new(ContentService::new(datastore.clone())),
            daily: Arc::new(DailyService::new(datastore.clone())),
            engagement: Arc::new(EngagementService::new(datastore.clone())),
            admin: Arc::new(AdminService::new(datastore.clone())),
            jwt: Arc::new(jwt),
            datastore,
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub datastore: DatastoreConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            datastore: DatastoreConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from the environment, falling back to the
    /// development defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let datastore = DatastoreConfig {
            endpoint: env_or("DB_ENDPOINT", &defaults.datastore.endpoint),
            namespace: env_or("DB_NAMESPACE", &defaults.datastore.namespace),
            database: env_or("DB_DATABASE", &defaults.datastore.database),
        };
        Self {
            host: env_or("HOST", &defaults.host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            enable_cors: true,
            datastore,
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
