//! Typed repository for job documents.

use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::TryStreamExt;
use mongodb::Collection;
use tracing::info;

use solo_models::Job;

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use crate::query::JobQuery;

/// Repository for job documents.
#[derive(Clone)]
pub struct JobRepository {
    jobs: Collection<Job>,
}

impl JobRepository {
    /// Create a new job repository over the shared client.
    pub fn new(store: &StoreClient) -> Self {
        Self { jobs: store.jobs() }
    }

    /// Insert a new job document as-is. No field validation is performed.
    pub async fn create(&self, job: &Job) -> StoreResult<ObjectId> {
        let result = self.jobs.insert_one(job).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::invalid_id("storage returned a non-ObjectId key"))?;
        info!("Created job {}", id.to_hex());
        Ok(id)
    }

    /// List jobs matching the composed filter/search/sort query.
    pub async fn get_all(&self, query: &JobQuery) -> StoreResult<Vec<Job>> {
        let mut find = self.jobs.find(query.filter());
        if let Some(sort) = query.sort_doc() {
            find = find.sort(sort);
        }
        let jobs = find.await?.try_collect().await?;
        Ok(jobs)
    }

    /// List jobs owned by the given buyer email.
    ///
    /// Ownership-scoped: callers must pass a verified email.
    pub async fn get_by_owner(&self, email: &str) -> StoreResult<Vec<Job>> {
        let cursor = self.jobs.find(doc! {"buyer.email": email}).await?;
        let jobs = cursor.try_collect().await?;
        Ok(jobs)
    }

    /// Fetch a single job by id.
    pub async fn get_by_id(&self, id: &ObjectId) -> StoreResult<Option<Job>> {
        let job = self.jobs.find_one(doc! {"_id": id}).await?;
        Ok(job)
    }

    /// Upsert the supplied fields onto the document at `id`.
    ///
    /// `$set` semantics: only the fields present in the payload are written,
    /// the rest are retained on an existing document; a missing document is
    /// created. The payload is taken verbatim, with no field validation.
    pub async fn upsert(&self, id: &ObjectId, mut fields: Document) -> StoreResult<()> {
        // The path id wins; never rewrite the primary key.
        fields.remove("_id");

        self.jobs
            .update_one(doc! {"_id": id}, doc! {"$set": fields})
            .upsert(true)
            .await?;
        info!("Upserted job {}", id.to_hex());
        Ok(())
    }

    /// Delete a job by id, returning how many documents were removed.
    pub async fn delete(&self, id: &ObjectId) -> StoreResult<u64> {
        let result = self.jobs.delete_one(doc! {"_id": id}).await?;
        info!("Deleted job {} (matched {})", id.to_hex(), result.deleted_count);
        Ok(result.deleted_count)
    }

    /// Increment the derived bid counter by one.
    ///
    /// Called after a successful bid insert; the two writes are not wrapped
    /// in a transaction, so the counter is eventually consistent with the
    /// bids collection.
    pub async fn inc_bid_count(&self, id: &ObjectId) -> StoreResult<()> {
        self.jobs
            .update_one(doc! {"_id": id}, doc! {"$inc": {"bid_count": 1}})
            .await?;
        Ok(())
    }
}

/// Parse a path id into an ObjectId, mapping failures to [`StoreError::InvalidId`].
pub fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::invalid_id(id))
}
