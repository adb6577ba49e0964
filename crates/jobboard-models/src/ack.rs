//! Write acknowledgments.
//!
//! These mirror the result documents of the store's write operations and are
//! returned to clients as-is.

use serde::{Deserialize, Serialize};

use crate::DocumentId;

/// Result of inserting one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: DocumentId,
}

impl InsertAck {
    pub fn new(inserted_id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Result of updating at most one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_count: u64,
    pub upserted_id: Option<DocumentId>,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_count: 0,
            upserted_id: None,
        }
    }

    /// Nothing matched the filter.
    pub fn unmatched() -> Self {
        Self::new(0, 0)
    }
}

/// Result of deleting at most one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_update_ack_wire_shape() {
        let json = serde_json::to_value(UpdateAck::new(1, 1)).unwrap();
        assert_eq!(
            json,
            json!({
                "acknowledged": true,
                "matchedCount": 1,
                "modifiedCount": 1,
                "upsertedCount": 0,
                "upsertedId": null
            })
        );
    }

    #[test]
    fn test_insert_ack_wire_shape() {
        let id = DocumentId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let json = serde_json::to_value(InsertAck::new(id)).unwrap();
        assert_eq!(
            json,
            json!({ "acknowledged": true, "insertedId": "65a1b2c3d4e5f60718293a4b" })
        );
    }

    #[test]
    fn test_delete_ack_wire_shape() {
        let json = serde_json::to_value(DeleteAck::new(0)).unwrap();
        assert_eq!(json, json!({ "acknowledged": true, "deletedCount": 0 }));
    }
}
