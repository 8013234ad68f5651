//! Job documents posted by buyers.

use bson::oid::ObjectId;
use bson::Document;
use serde::{Deserialize, Serialize};

/// Buyer identity embedded in a job document.
///
/// `email` is the ownership key for identity-scoped queries; the display
/// fields are whatever the client supplied at creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl Buyer {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            name: None,
            photo: None,
        }
    }
}

/// A posted job, open to bids.
///
/// Only the fields the backend itself reads are typed; everything else the
/// client sends (min/max price, description, ...) passes through `extra`
/// untouched. Documents are accepted as-is with no field validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Storage-generated identifier; absent until inserted.
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// ISO date string as supplied by the client. Lexicographic order
    /// equals chronological order, which is what deadline sorting relies on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    /// Derived counter: number of bids referencing this job. Maintained by
    /// bid placement, not recomputed on read.
    #[serde(default)]
    pub bid_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<Buyer>,
    /// Remaining descriptive fields, preserved verbatim.
    #[serde(flatten)]
    pub extra: Document,
}

impl Job {
    /// Hex form of the storage identifier, if assigned.
    pub fn id_hex(&self) -> Option<String> {
        self.id.map(|id| id.to_hex())
    }

    /// Email of the owning buyer, if the document carries one.
    pub fn owner_email(&self) -> Option<&str> {
        self.buyer.as_ref().map(|b| b.email.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn deserializes_with_extra_fields_preserved() {
        let json = serde_json::json!({
            "title": "Build a web scraper",
            "category": "Web Development",
            "deadline": "2026-09-01",
            "buyer": {"email": "buyer@x.com", "name": "Buyer"},
            "min_price": 100,
            "max_price": 250,
            "description": "scrape things"
        });

        let job: Job = serde_json::from_value(json).unwrap();
        assert_eq!(job.title.as_deref(), Some("Build a web scraper"));
        assert_eq!(job.bid_count, 0);
        assert_eq!(job.owner_email(), Some("buyer@x.com"));
        assert_eq!(job.extra.get_str("description").unwrap(), "scrape things");
    }

    #[test]
    fn missing_id_is_not_serialized() {
        let job = Job {
            id: None,
            title: Some("t".into()),
            category: None,
            deadline: None,
            bid_count: 0,
            buyer: Some(Buyer::new("a@x.com")),
            extra: doc! {},
        };

        let d = bson::to_document(&job).unwrap();
        assert!(!d.contains_key("_id"));
        assert_eq!(d.get_i64("bid_count").unwrap(), 0);
    }

    #[test]
    fn bson_round_trip_keeps_object_id() {
        let id = ObjectId::new();
        let job = Job {
            id: Some(id),
            title: None,
            category: None,
            deadline: Some("2026-01-15".into()),
            bid_count: 3,
            buyer: None,
            extra: doc! {"budget": 500},
        };

        let d = bson::to_document(&job).unwrap();
        let back: Job = bson::from_document(d).unwrap();
        assert_eq!(back.id, Some(id));
        assert_eq!(back.bid_count, 3);
        assert_eq!(back.extra.get_i32("budget").unwrap(), 500);
    }
}
