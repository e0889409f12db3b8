use crate::domain::ids::RecordId;
use serde::{Deserialize, Serialize};

/// A persisted submission. One per normalized email within a kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord<F> {
    pub id: RecordId,
    pub email: String,
    pub source: String,
    #[serde(flatten)]
    pub fields: F,
    pub created_at: i64,
    pub updated_at: i64,
}
