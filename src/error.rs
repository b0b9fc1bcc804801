//! Error types for Edge Monitor

use std::io;
use thiserror::Error;

/// Result type alias for Edge Monitor operations
pub type Result<T> = std::result::Result<T, EmonError>;

/// Main error type for Edge Monitor
///
/// Nothing in the sampling or overlay subsystems is fatal to the process:
/// provider errors degrade to stale labels or placeholder text, and the only
/// fatal path is an explicit user exit.
#[derive(Error, Debug)]
pub enum EmonError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An optional subsystem (e.g. the GPU backend) is not present at all.
    /// Checked once at startup; degrades to a placeholder, never fatal.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// A single reading failed for this tick. The metric keeps its last
    /// displayed value and the tick continues with the remaining metrics.
    #[error("Provider failure: {0}")]
    ProviderTransient(String),

    /// The primary disk path is missing; the caller should try the fallback.
    #[error("Path unavailable: {0}")]
    PathUnavailable(String),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// NVML error (NVIDIA GPUs)
    #[cfg(feature = "nvidia")]
    #[error("NVML error: {0}")]
    Nvml(#[from] nvml_wrapper::error::NvmlError),

    /// GUI error
    #[error("GUI error: {0}")]
    Gui(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_provider_unavailable() {
        let err = EmonError::ProviderUnavailable("no GPU backend".to_string());
        assert_eq!(err.to_string(), "Provider unavailable: no GPU backend");
    }

    #[test]
    fn test_error_display_provider_transient() {
        let err = EmonError::ProviderTransient("read failed".to_string());
        assert_eq!(err.to_string(), "Provider failure: read failed");
    }

    #[test]
    fn test_error_display_path_unavailable() {
        let err = EmonError::PathUnavailable("C:\\".to_string());
        assert_eq!(err.to_string(), "Path unavailable: C:\\");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let err: EmonError = io_err.into();
        assert!(err.to_string().contains("file missing"));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{ nope }}").unwrap_err();
        let err: EmonError = json_err.into();
        assert!(err.to_string().contains("JSON error"));
    }
}
