//! Bid documents placed by workers against jobs.

use bson::oid::ObjectId;
use bson::Document;
use serde::{Deserialize, Serialize};

/// Recognized bid states.
///
/// The stored `status` field is a caller-supplied string and is not
/// validated against this set; the enum only names the values the
/// marketplace UI actually produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        }
    }
}

fn default_status() -> String {
    BidStatus::Pending.as_str().to_string()
}

/// A worker's offer against a specific job.
///
/// `email` identifies the bidder, `job_id` references the job (hex string,
/// wire name `jobId`), and `buyer` denormalizes the job owner's email so
/// received-bid queries need no join. At most one bid may exist per
/// (`email`, `jobId`) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    /// Price, comment, title and whatever else the client sent, verbatim.
    #[serde(flatten)]
    pub extra: Document,
}

impl Bid {
    pub fn id_hex(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn job_id_uses_wire_name() {
        let bid = Bid {
            id: None,
            email: "worker@x.com".into(),
            job_id: "64b0c0ffee00112233445566".into(),
            buyer: Some("buyer@x.com".into()),
            status: "pending".into(),
            extra: doc! {"price": 120},
        };

        let d = bson::to_document(&bid).unwrap();
        assert_eq!(d.get_str("jobId").unwrap(), "64b0c0ffee00112233445566");
        assert!(!d.contains_key("job_id"));
    }

    #[test]
    fn status_defaults_to_pending() {
        let json = serde_json::json!({
            "email": "worker@x.com",
            "jobId": "64b0c0ffee00112233445566",
            "price": 120
        });

        let bid: Bid = serde_json::from_value(json).unwrap();
        assert_eq!(bid.status, BidStatus::Pending.as_str());
        assert_eq!(bid.extra.get_i64("price").unwrap(), 120);
    }

    #[test]
    fn caller_supplied_status_is_kept_verbatim() {
        let json = serde_json::json!({
            "email": "worker@x.com",
            "jobId": "64b0c0ffee00112233445566",
            "status": "in progress"
        });

        // Unrecognized values pass through; the store does not validate them.
        let bid: Bid = serde_json::from_value(json).unwrap();
        assert_eq!(bid.status, "in progress");
    }
}
