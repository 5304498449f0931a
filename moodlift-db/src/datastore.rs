//! SurrealDB datastore handle
//!
//! A process-wide handle to the persistence layer with an explicit
//! lifecycle: connect at startup, initialize the schema, then inject the
//! handle into each service. The `any` engine lets the same code run
//! against an embedded in-memory store (`mem://`, used by tests) or a
//! remote endpoint.

use surrealdb::engine::any::{connect, Any};
use surrealdb::Surreal;

use crate::error::{StoreError, StoreResult};
use crate::schema::MOODLIFT_SCHEMA;

/// Datastore connection configuration
#[derive(Debug, Clone)]
pub struct DatastoreConfig {
    /// Endpoint address, e.g. `mem://` or `ws://localhost:8000`
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
}

impl Default for DatastoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "moodlift".to_string(),
            database: "app".to_string(),
        }
    }
}

/// Shared SurrealDB datastore
pub struct Datastore {
    client: Surreal<Any>,
}

impl Datastore {
    /// Connect to the datastore and select the namespace/database
    pub async fn connect(config: &DatastoreConfig) -> StoreResult<Self> {
        let client = connect(config.endpoint.as_str())
            .await
            .map_err(|e| StoreError::Query(format!("Failed to connect: {e}")))?;

        client
            .use_ns(config.namespace.as_str())
            .use_db(config.database.as_str())
            .await
            .map_err(|e| StoreError::Query(format!("Failed to select database: {e}")))?;

        Ok(Self { client })
    }

    /// Initialize the schema (tables, fields, unique indexes)
    pub async fn init_schema(&self) -> StoreResult<()> {
        self.client
            .query(MOODLIFT_SCHEMA)
            .await
            .map_err(|e| StoreError::Query(format!("Schema init failed: {e}")))?
            .check()
            .map_err(|e| StoreError::Query(format!("Schema init failed: {e}")))?;
        Ok(())
    }

    /// Raw client access for services
    pub fn client(&self) -> &Surreal<Any> {
        &self.client
    }

    /// Verify connectivity, for health checks
    pub async fn ping(&self) -> bool {
        self.client.query("RETURN 1").await.is_ok()
    }
}
