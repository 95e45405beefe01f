use chrono::{DateTime, Utc};
use notestack_core::NotestackResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Version of the on-disk envelope written by [`crate::JsonFileStore`].
pub const FORMAT_VERSION: u32 = 1;

/// Metadata stamped on every persisted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistenceMetadata {
    /// ID of the store instance that performed the save
    pub instance_id: Uuid,
    /// When this value was saved
    pub saved_at: DateTime<Utc>,
}

impl PersistenceMetadata {
    pub fn new(instance_id: Uuid, saved_at: DateTime<Utc>) -> Self {
        Self {
            instance_id,
            saved_at,
        }
    }
}

/// Trait for serialization/deserialization strategies
pub trait Serializer<T> {
    /// Serialize data to bytes
    fn serialize(&self, data: &T) -> NotestackResult<Vec<u8>>;

    /// Deserialize data from bytes
    fn deserialize(&self, bytes: &[u8]) -> NotestackResult<T>;
}
