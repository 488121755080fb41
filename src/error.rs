//! # Error Types
//!
//! This module defines error types used throughout the analysekarte library.

use thiserror::Error;

/// Main error type for compositing and report operations
#[derive(Debug, Error)]
pub enum ReportError {
    /// Invalid input (empty layer list, malformed color or job file)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Image could not be decoded or encoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// PDF serialization error
    #[error("PDF error: {0}")]
    Pdf(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for ReportError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => ReportError::Io(e),
            other => ReportError::Decode(other.to_string()),
        }
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        ReportError::Pdf(err.to_string())
    }
}

/// Result alias for analysekarte operations.
pub type Result<T> = std::result::Result<T, ReportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_io_error_maps_to_io() {
        let err = image::open("/nonexistent/layer.png").unwrap_err();
        assert!(matches!(ReportError::from(err), ReportError::Io(_)));
    }

    #[test]
    fn test_image_decode_error_maps_to_decode() {
        let err = image::load_from_memory(b"definitely not an image").unwrap_err();
        assert!(matches!(ReportError::from(err), ReportError::Decode(_)));
    }

    #[test]
    fn test_display_includes_message() {
        let err = ReportError::Validation("no layers".into());
        assert_eq!(err.to_string(), "Validation error: no layers");
    }
}
