use crate::traits::Serializer;
use notestack_core::{NotestackError, NotestackResult};

/// Pretty-printed JSON, so persisted files stay readable and diffable
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl<T: serde::Serialize + serde::de::DeserializeOwned> Serializer<T> for JsonSerializer {
    fn serialize(&self, data: &T) -> NotestackResult<Vec<u8>> {
        serde_json::to_vec_pretty(data).map_err(|e| NotestackError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> NotestackResult<T> {
        serde_json::from_slice(bytes).map_err(|e| NotestackError::Serialization(e.to_string()))
    }
}
