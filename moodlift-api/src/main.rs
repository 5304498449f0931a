//! MoodLift API server binary

use std::sync::Arc;

use moodlift_api::{run_server, ApiConfig};
use moodlift_db::Datastore;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = ApiConfig::from_env();

    info!("Connecting to datastore at {}", config.datastore.endpoint);
    let datastore = Arc::new(
        Datastore::connect(&config.datastore)
            .await
            .expect("Failed to connect to datastore"),
    );

    if let Err(e) = run_server(config, datastore).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
