use thiserror::Error;

/// Core analysis errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Source unavailable: {message}")]
    SourceUnavailable { message: String },

    #[error("Malformed record in '{key}': {message}")]
    MalformedRecord { key: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AnalysisError {
    pub fn source_unavailable(message: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: message.into(),
        }
    }

    pub fn malformed_record(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            key: key.into(),
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the error should abort a whole scan rather than skip one file.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MalformedRecord { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_unavailable_error() {
        let error = AnalysisError::source_unavailable("bucket 'billing' is not reachable");
        assert_eq!(
            error.to_string(),
            "Source unavailable: bucket 'billing' is not reachable"
        );
        assert!(error.is_fatal());
    }

    #[test]
    fn test_malformed_record_error() {
        let error = AnalysisError::malformed_record("cur-2024-01/shard-3.csv", "bad header");
        assert_eq!(
            error.to_string(),
            "Malformed record in 'cur-2024-01/shard-3.csv': bad header"
        );
        assert!(!error.is_fatal());
    }

    #[test]
    fn test_configuration_error() {
        let error = AnalysisError::configuration("invalid billing period '2024-13'");
        assert_eq!(
            error.to_string(),
            "Configuration error: invalid billing period '2024-13'"
        );
    }
}
