/// Document store persistence for contact submissions
use crate::error::IntakeError;
use crate::models::{ContactRecord, StoreSettings, StoredRecord, Submission};
use async_trait::async_trait;
use mongodb::bson::{self, Document, doc};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

/// Opens a handle to the submissions collection
#[async_trait]
pub trait StoreConnector: Send + Sync {
    async fn connect(&self, uri: &str) -> Result<Arc<dyn SubmissionCollection>, IntakeError>;
}

/// Append-only view of the submissions collection
#[async_trait]
pub trait SubmissionCollection: Send + Sync {
    /// Inserts one record and returns once the store acknowledged it
    async fn insert(&self, record: &ContactRecord) -> Result<StoredRecord, IntakeError>;
}

/// Lazily connected, process-wide persistence gateway.
///
/// The first caller establishes the connection; concurrent first callers
/// wait on the same initialisation. A failed connect leaves the cell empty
/// so the next request tries again.
pub struct PersistenceGateway {
    connector: Arc<dyn StoreConnector>,
    handle: OnceCell<Arc<dyn SubmissionCollection>>,
}

impl PersistenceGateway {
    pub fn new(connector: Arc<dyn StoreConnector>) -> Self {
        Self {
            connector,
            handle: OnceCell::new(),
        }
    }

    /// Returns the cached handle, connecting on first use
    pub async fn connect(&self, uri: &str) -> Result<Arc<dyn SubmissionCollection>, IntakeError> {
        let handle = self
            .handle
            .get_or_try_init(|| async {
                info!("Connecting to document store");
                self.connector.connect(uri).await.map_err(|e| {
                    error!(error = %e, "Document store connection failed");
                    e
                })
            })
            .await?;

        Ok(Arc::clone(handle))
    }

    /// Persists a submission; the request fails if this fails
    pub async fn save(
        &self,
        uri: &str,
        submission: &Submission,
    ) -> Result<StoredRecord, IntakeError> {
        let collection = self.connect(uri).await?;
        let stored = collection.insert(&submission.to_record()).await?;

        info!(record_id = %stored.id, "Contact saved to database successfully");
        Ok(stored)
    }
}

/// MongoDB connector
pub struct MongoConnector {
    settings: StoreSettings,
}

impl MongoConnector {
    pub fn new(settings: StoreSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl StoreConnector for MongoConnector {
    async fn connect(&self, uri: &str) -> Result<Arc<dyn SubmissionCollection>, IntakeError> {
        let client = mongodb::Client::with_uri_str(uri).await?;

        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(&self.settings.database));

        // The driver connects lazily; ping so a bad URI fails here
        database.run_command(doc! { "ping": 1 }, None).await?;

        debug!(
            database = %database.name(),
            collection = %self.settings.collection,
            "Document store reachable"
        );

        Ok(Arc::new(MongoSubmissions {
            collection: database.collection(&self.settings.collection),
        }))
    }
}

struct MongoSubmissions {
    collection: mongodb::Collection<Document>,
}

#[async_trait]
impl SubmissionCollection for MongoSubmissions {
    async fn insert(&self, record: &ContactRecord) -> Result<StoredRecord, IntakeError> {
        let document = doc! {
            "name": record.name.as_str(),
            "email": record.email.as_str(),
            "message": record.message.as_str(),
            "createdAt": bson::DateTime::from_chrono(record.created_at),
        };

        let result = self.collection.insert_one(document, None).await?;

        let id = match result.inserted_id {
            bson::Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };

        Ok(StoredRecord {
            id,
            record: record.clone(),
        })
    }
}

/// In-memory store for testing.
///
/// Counts connects so callers can observe connection reuse.
#[derive(Default)]
pub struct InMemoryStore {
    records: Arc<tokio::sync::Mutex<Vec<ContactRecord>>>,
    connects: AtomicUsize,
    fail_connect: bool,
    fail_insert: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every connect attempt fails
    pub fn unreachable() -> Self {
        Self {
            fail_connect: true,
            ..Self::default()
        }
    }

    /// Connects, but every insert is rejected
    pub fn rejecting_writes() -> Self {
        Self {
            fail_insert: true,
            ..Self::default()
        }
    }

    pub async fn records(&self) -> Vec<ContactRecord> {
        self.records.lock().await.clone()
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnector for InMemoryStore {
    async fn connect(&self, _uri: &str) -> Result<Arc<dyn SubmissionCollection>, IntakeError> {
        self.connects.fetch_add(1, Ordering::SeqCst);

        if self.fail_connect {
            return Err(IntakeError::Persistence("connection refused".to_string()));
        }

        Ok(Arc::new(InMemorySubmissions {
            records: Arc::clone(&self.records),
            fail_insert: self.fail_insert,
        }))
    }
}

struct InMemorySubmissions {
    records: Arc<tokio::sync::Mutex<Vec<ContactRecord>>>,
    fail_insert: bool,
}

#[async_trait]
impl SubmissionCollection for InMemorySubmissions {
    async fn insert(&self, record: &ContactRecord) -> Result<StoredRecord, IntakeError> {
        if self.fail_insert {
            return Err(IntakeError::Persistence("write not acknowledged".to_string()));
        }

        let mut records = self.records.lock().await;
        records.push(record.clone());

        Ok(StoredRecord {
            id: format!("mem-{}", records.len()),
            record: record.clone(),
        })
    }
}
