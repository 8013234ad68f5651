//! Typed repository for bid documents.
//!
//! Owns the duplicate-bid guard and the derived job bid counter.

use bson::oid::ObjectId;
use bson::{doc, Document};
use futures::stream::TryStreamExt;
use mongodb::Collection;
use tracing::info;

use solo_models::Bid;

use crate::client::StoreClient;
use crate::error::{StoreError, StoreResult};
use crate::job_repo::{parse_object_id, JobRepository};

/// Repository for bid documents.
#[derive(Clone)]
pub struct BidRepository {
    bids: Collection<Bid>,
    jobs: JobRepository,
}

impl BidRepository {
    /// Create a new bid repository over the shared client.
    pub fn new(store: &StoreClient) -> Self {
        Self {
            bids: store.bids(),
            jobs: JobRepository::new(store),
        }
    }

    /// Place a bid: duplicate guard, insert, then bump the job's counter.
    ///
    /// The existence check and the insert are separate storage operations;
    /// the unique (email, jobId) index is what actually closes the race, and
    /// a violation there also surfaces as [`StoreError::DuplicateBid`].
    /// Insert and counter increment are likewise independent writes, so the
    /// counter lags the bids collection if the process dies between them.
    pub async fn place(&self, bid: &Bid) -> StoreResult<ObjectId> {
        // Reject malformed job references before touching storage, so a bad
        // bid never lands as an orphan the counter update cannot reach.
        let job_id = parse_object_id(&bid.job_id)?;

        let guard = doc! {"email": bid.email.as_str(), "jobId": bid.job_id.as_str()};
        if self.bids.find_one(guard).await?.is_some() {
            return Err(StoreError::DuplicateBid);
        }

        let result = self
            .bids
            .insert_one(bid)
            .await
            .map_err(StoreError::from_write)?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::invalid_id("storage returned a non-ObjectId key"))?;

        self.jobs.inc_bid_count(&job_id).await?;

        info!(
            "Placed bid {} by {} on job {}",
            id.to_hex(),
            bid.email,
            bid.job_id
        );
        Ok(id)
    }

    /// Fetch a single bid by id.
    pub async fn get_by_id(&self, id: &ObjectId) -> StoreResult<Option<Bid>> {
        let bid = self.bids.find_one(doc! {"_id": id}).await?;
        Ok(bid)
    }

    /// List bids for a user.
    ///
    /// `as_buyer` selects bids received on the caller's jobs
    /// (`buyer == email`); otherwise bids the caller placed
    /// (`email == email`).
    pub async fn list_for_user(&self, email: &str, as_buyer: bool) -> StoreResult<Vec<Bid>> {
        let cursor = self.bids.find(user_filter(email, as_buyer)).await?;
        let bids = cursor.try_collect().await?;
        Ok(bids)
    }

    /// Set a bid's status field.
    ///
    /// Unconditional patch: the value is not validated against the
    /// recognized set and no caller-ownership check happens here. Gating, if
    /// any, is the router's authorization policy.
    pub async fn update_status(&self, id: &ObjectId, status: &str) -> StoreResult<u64> {
        let result = self
            .bids
            .update_one(doc! {"_id": id}, doc! {"$set": {"status": status}})
            .await?;
        Ok(result.matched_count)
    }
}

fn user_filter(email: &str, as_buyer: bool) -> Document {
    if as_buyer {
        doc! {"buyer": email}
    } else {
        doc! {"email": email}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{StoreClient, StoreConfig};

    #[tokio::test]
    async fn malformed_job_id_is_rejected_before_any_write() {
        // Lazy client: nothing here reaches a live deployment, which is the
        // point — the parse must fail before the first storage call.
        let store = StoreClient::connect(&StoreConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "solo-test".to_string(),
        })
        .await
        .unwrap();
        let bids = BidRepository::new(&store);

        let bid = Bid {
            id: None,
            email: "a@x.com".to_string(),
            job_id: "not-an-object-id".to_string(),
            buyer: None,
            status: "pending".to_string(),
            extra: Document::new(),
        };

        assert!(matches!(
            bids.place(&bid).await,
            Err(StoreError::InvalidId(_))
        ));
    }

    #[test]
    fn buyer_listing_filters_on_buyer_field() {
        let f = user_filter("b@x.com", true);
        assert_eq!(f.get_str("buyer").unwrap(), "b@x.com");
        assert!(!f.contains_key("email"));
    }

    #[test]
    fn bidder_listing_filters_on_email_field() {
        let f = user_filter("a@x.com", false);
        assert_eq!(f.get_str("email").unwrap(), "a@x.com");
        assert!(!f.contains_key("buyer"));
    }
}
