//! MongoDB client ownership and index bootstrap.
//!
//! One [`StoreClient`] is created at process start and shared (by `Arc`)
//! for the process lifetime; the driver pools connections internally, so
//! there is no per-request reconnect.

use bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::info;

use solo_models::{Bid, Job};

use crate::error::StoreResult;

/// Default database name.
const DEFAULT_DATABASE: &str = "solo-db";

/// Collection names.
pub(crate) const JOBS_COLLECTION: &str = "jobs";
pub(crate) const BIDS_COLLECTION: &str = "bids";

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// MongoDB connection string
    pub uri: String,
    /// Database name
    pub database: String,
}

impl StoreConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            uri: std::env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database: std::env::var("MONGODB_DB").unwrap_or_else(|_| DEFAULT_DATABASE.to_string()),
        }
    }
}

/// Owned handle to the MongoDB deployment.
#[derive(Clone)]
pub struct StoreClient {
    client: Client,
    database: Database,
}

impl StoreClient {
    /// Connect using the given configuration.
    ///
    /// The driver connects lazily; failures surface on first use, or via
    /// [`StoreClient::ping`].
    pub async fn connect(config: &StoreConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await?;
        let database = client.database(&config.database);
        info!("Storage handle opened for database '{}'", config.database);
        Ok(Self { client, database })
    }

    /// Connect using environment configuration.
    pub async fn from_env() -> StoreResult<Self> {
        Self::connect(&StoreConfig::from_env()).await
    }

    /// The jobs collection.
    pub fn jobs(&self) -> Collection<Job> {
        self.database.collection(JOBS_COLLECTION)
    }

    /// The bids collection.
    pub fn bids(&self) -> Collection<Bid> {
        self.database.collection(BIDS_COLLECTION)
    }

    /// Round-trip to the deployment (readiness probe).
    pub async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! {"ping": 1}).await?;
        Ok(())
    }

    /// Create the indexes the data model relies on.
    ///
    /// The unique (email, jobId) index is what actually closes the
    /// duplicate-bid race: the application-level existence check alone has a
    /// check-then-insert window under concurrency.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        let unique_bid = IndexModel::builder()
            .keys(doc! {"email": 1, "jobId": 1})
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.bids().create_index(unique_bid).await?;

        // Ownership-scoped listings filter on these fields.
        self.jobs()
            .create_index(IndexModel::builder().keys(doc! {"buyer.email": 1}).build())
            .await?;
        self.bids()
            .create_index(IndexModel::builder().keys(doc! {"buyer": 1}).build())
            .await?;

        info!("Storage indexes ensured");
        Ok(())
    }

    /// Close the client, draining pooled connections.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("Storage handle closed");
    }
}
