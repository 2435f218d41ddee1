//! MongoDB-backed document store.
//!
//! One long-lived client per process; the driver owns connection pooling.
//! The client is built on first use, so an unreachable cluster (including a
//! failed SRV lookup) surfaces as a failed operation rather than a failed
//! startup. Collections are resolved by name on each call, and MongoDB
//! creates them on first insert.

use std::future::Future;
use std::time::Instant;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, ConnectionString, FindOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database};
use tokio::sync::OnceCell;
use tracing::{debug, error, info, info_span, Instrument};

use orbit_models::{Collection, DeleteAck, DocId, InsertAck, UpdateAck};

use crate::config::MongoConfig;
use crate::error::{StoreError, StoreResult};
use crate::metrics::record_request;
use crate::query::FindQuery;
use crate::store::{id_filter, DocumentStore};

/// MongoDB document store.
pub struct MongoStore {
    config: MongoConfig,
    client: OnceCell<Client>,
}

impl MongoStore {
    /// Validate configuration without touching the network.
    ///
    /// A malformed connection string is a [`StoreError::Config`]. Host
    /// resolution and connection happen on first use; call
    /// [`DocumentStore::ping`] to check connectivity.
    pub fn new(config: MongoConfig) -> StoreResult<Self> {
        ConnectionString::parse(&config.uri)
            .map_err(|e| StoreError::config(format!("invalid MongoDB connection string: {}", e)))?;

        info!(database = %config.database, "MongoDB store configured");
        Ok(Self {
            config,
            client: OnceCell::new(),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> StoreResult<Self> {
        Self::new(MongoConfig::from_env()?)
    }

    /// The shared client, built on first successful call.
    async fn client(&self) -> StoreResult<&Client> {
        self.client
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(&self.config.uri).await.map_err(|e| {
                    error!("MongoDB client setup failed: {}", e);
                    StoreError::from(e)
                })?;
                options.app_name = Some(self.config.app_name.clone());
                options.server_selection_timeout = Some(self.config.server_selection_timeout);
                options.server_api = Some(
                    ServerApi::builder()
                        .version(ServerApiVersion::V1)
                        .strict(true)
                        .deprecation_errors(true)
                        .build(),
                );

                let client = Client::with_options(options)?;
                info!(database = %self.config.database, "MongoDB client connected");
                Ok(client)
            })
            .await
    }

    async fn database(&self) -> StoreResult<Database> {
        Ok(self.client().await?.database(&self.config.database))
    }

    async fn collection(&self, collection: Collection) -> StoreResult<mongodb::Collection<Document>> {
        Ok(self.database().await?.collection::<Document>(collection.name()))
    }

    async fn execute<T, F>(&self, operation: &str, collection: &str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let span = info_span!("store_request", operation = %operation, collection = %collection);

        let start = Instant::now();
        let result = fut.instrument(span).await;
        let latency_ms = start.elapsed().as_millis() as f64;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        record_request(operation, collection, outcome, latency_ms);

        result
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find(&self, collection: Collection, query: FindQuery) -> StoreResult<Vec<Document>> {
        self.execute("find", collection.name(), async {
            let mut options = FindOptions::default();
            options.sort = query.sort.as_ref().map(|s| s.to_document());
            options.limit = query.limit;

            let cursor = self
                .collection(collection)
                .await?
                .find(query.filter_document(), options)
                .await?;
            let docs: Vec<Document> = cursor.try_collect().await?;
            debug!(count = docs.len(), "find returned documents");
            Ok(docs)
        })
        .await
    }

    async fn find_one(&self, collection: Collection, filter: Document) -> StoreResult<Option<Document>> {
        self.execute("find_one", collection.name(), async {
            Ok(self.collection(collection).await?.find_one(filter, None).await?)
        })
        .await
    }

    async fn insert_one(&self, collection: Collection, document: Document) -> StoreResult<InsertAck> {
        self.execute("insert_one", collection.name(), async {
            let result = self.collection(collection).await?.insert_one(document, None).await?;
            Ok(InsertAck::new(&result.inserted_id))
        })
        .await
    }

    async fn set_fields(&self, collection: Collection, id: DocId, set: Document) -> StoreResult<UpdateAck> {
        self.execute("set_fields", collection.name(), async {
            let result = self
                .collection(collection)
                .await?
                .update_one(id_filter(id), doc! { "$set": set }, None)
                .await?;
            Ok(UpdateAck::new(result.matched_count, result.modified_count))
        })
        .await
    }

    async fn delete_one(&self, collection: Collection, id: DocId) -> StoreResult<DeleteAck> {
        self.execute("delete_one", collection.name(), async {
            let result = self.collection(collection).await?.delete_one(id_filter(id), None).await?;
            Ok(DeleteAck::new(result.deleted_count))
        })
        .await
    }

    async fn count(&self, collection: Collection, filter: Document) -> StoreResult<u64> {
        self.execute("count", collection.name(), async {
            Ok(self.collection(collection).await?.count_documents(filter, None).await?)
        })
        .await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.execute("ping", "admin", async {
            self.client()
                .await?
                .database("admin")
                .run_command(doc! { "ping": 1 }, None)
                .await
                .map_err(StoreError::from)?;
            Ok(())
        })
        .await
    }
}
