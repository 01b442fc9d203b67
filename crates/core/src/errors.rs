use std::path::PathBuf;

/// Result type alias for satellite-inventory operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for satellite-inventory operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Credentials rejected by the management API
    #[error("authentication failed for '{endpoint}': {message}")]
    Authentication { endpoint: String, message: String },

    /// API unreachable or failing after retry exhaustion
    #[error("management API unavailable at '{endpoint}': {message}")]
    ApiUnavailable { endpoint: String, message: String },

    /// API reachable but the response body was not what we expect
    #[error("unexpected response from '{endpoint}': {message}")]
    ApiResponse { endpoint: String, message: String },

    /// Cache file exists but cannot be read back as a snapshot
    #[error("cache file '{path}' is corrupt: {message}")]
    CacheCorrupt { path: PathBuf, message: String },

    /// Missing or invalid configuration, detected before any network call
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },
}

// Conversion implementations
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::FileSystem {
            path: PathBuf::new(),
            operation: "unknown".to_string(),
            source: error,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Json {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create an authentication error
    #[must_use]
    pub fn authentication(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Authentication {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create an API-unavailable error
    #[must_use]
    pub fn api_unavailable(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ApiUnavailable {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-response error
    #[must_use]
    pub fn api_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ApiResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a corrupt-cache error
    #[must_use]
    pub fn cache_corrupt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::CacheCorrupt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Create a file system error with context
    #[must_use]
    pub fn file_system(
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        Error::FileSystem {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Whether the error is worth another fetch attempt.
    ///
    /// Only endpoint unavailability is transient; rejected credentials and
    /// malformed responses will not improve on retry.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::ApiUnavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(Error::api_unavailable("https://sat.example.com", "connect timeout").is_transient());
        assert!(!Error::authentication("https://sat.example.com", "401").is_transient());
        assert!(!Error::api_response("https://sat.example.com", "missing 'results'").is_transient());
        assert!(!Error::configuration("no url").is_transient());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::cache_corrupt("/var/cache/satinv/inventory.json", "truncated");
        let rendered = err.to_string();
        assert!(rendered.contains("/var/cache/satinv/inventory.json"));
        assert!(rendered.contains("truncated"));
    }
}
