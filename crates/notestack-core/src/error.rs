use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotestackError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Persistence error: failed to write '{key}'")]
    Persistence {
        key: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl NotestackError {
    /// Wrap any store failure for `key` as a persistence error.
    pub fn persistence(
        key: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Persistence {
            key: key.into(),
            source: Some(source.into()),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Persistence { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_persistence_error_keeps_source() {
        let io = std::io::Error::other("quota exceeded");
        let err = NotestackError::persistence("notes", io);

        assert!(err.is_persistence());
        assert!(!err.is_validation());
        assert_eq!(err.to_string(), "Persistence error: failed to write 'notes'");
        assert_eq!(err.source().unwrap().to_string(), "quota exceeded");
    }
}
