//! Full-state snapshot handed to (and received from) the backup exporter.

use chrono::{DateTime, Utc};
use notestack_core::{NotestackError, NotestackResult};
use serde::{Deserialize, Serialize};

use crate::note::Note;
use crate::stack::Stack;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    #[serde(default)]
    pub notes: Vec<Note>,
    #[serde(default)]
    pub stacks: Vec<Stack>,
    pub timestamp: DateTime<Utc>,
}

impl BackupSnapshot {
    pub fn to_json(&self) -> NotestackResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| NotestackError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> NotestackResult<Self> {
        serde_json::from_str(json).map_err(|e| NotestackError::Serialization(e.to_string()))
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty() && self.stacks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_backup_defaults() {
        let snapshot = BackupSnapshot::from_json(r#"{"timestamp": "2024-02-02T08:00:00Z"}"#).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_malformed_backup_is_serialization_error() {
        let err = BackupSnapshot::from_json("{\"notes\": 3}").unwrap_err();
        assert!(matches!(err, NotestackError::Serialization(_)));
    }
}
