use crate::serialization::JsonSerializer;
use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{PersistenceMetadata, Serializer, FORMAT_VERSION};
use chrono::Utc;
use notestack_core::{KeyValueStore, NotestackError, NotestackResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// One `<key>.json` file per key inside a directory.
///
/// Each file holds a [`JsonEnvelope`] around the stored value, so values
/// must themselves be JSON.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
    instance_id: Uuid,
}

/// On-disk wrapper around a stored value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub value: serde_json::Value,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
        }
    }

    /// Create a store with a specific instance ID
    pub fn with_instance_id(dir: impl AsRef<Path>, instance_id: Uuid) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            instance_id,
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path backing `key`. Keys are plain identifiers, never paths.
    pub fn path_for(&self, key: &str) -> NotestackResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(NotestackError::Validation(format!(
                "invalid store key '{}'",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }

    /// Read the full envelope for `key`, metadata included.
    pub fn load_envelope(&self, key: &str) -> NotestackResult<Option<JsonEnvelope>> {
        let path = self.path_for(key)?;
        let Some(bytes) = AtomicWriter::read_optional(&path)? else {
            return Ok(None);
        };
        let envelope: JsonEnvelope = JsonSerializer.deserialize(&bytes)?;
        if envelope.version != FORMAT_VERSION {
            return Err(NotestackError::Serialization(format!(
                "Unsupported format version {} in {}",
                envelope.version,
                path.display()
            )));
        }
        Ok(Some(envelope))
    }

    fn write(&self, key: &str, value: &str) -> NotestackResult<()> {
        let path = self.path_for(key)?;
        let value: serde_json::Value = serde_json::from_str(value)
            .map_err(|e| NotestackError::Serialization(format!("value for '{}' is not JSON: {}", key, e)))?;
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: PersistenceMetadata::new(self.instance_id, Utc::now()),
            value,
        };
        let bytes = JsonSerializer.serialize(&envelope)?;

        std::fs::create_dir_all(&self.dir)?;
        AtomicWriter::write_atomic(&path, &bytes)?;
        tracing::info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> NotestackResult<Option<String>> {
        match self.load_envelope(key)? {
            Some(envelope) => Ok(Some(envelope.value.to_string())),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> NotestackResult<()> {
        self.write(key, value).map_err(|e| match e {
            NotestackError::Io(io) => NotestackError::persistence(key, io),
            other => other,
        })
    }
}
