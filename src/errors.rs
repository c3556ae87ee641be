use std::path::PathBuf;
use thiserror::Error;

/// Structured error types for the segmentation inference pipeline.
///
/// Each variant captures context specific to its error domain (filesystem,
/// image processing, model operations, etc.) so callers never have to parse
/// error strings. Display implementations come from thiserror's format
/// strings.
#[derive(Error, Debug)]
pub enum DoubleUnetError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Filesystem error: {operation} failed for {path:?}")]
    FileSystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Image processing error: {operation} failed (file: {path})")]
    ImageProcessing {
        path: String,
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Model error: {operation} failed")]
    Model {
        operation: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {field} {reason}")]
    Validation { field: String, reason: String },
}

pub type Result<T> = std::result::Result<T, DoubleUnetError>;

/// Convert anyhow errors to configuration errors.
///
/// Some dependencies return anyhow::Error which lacks structured error
/// information; the conversion happens once at the boundary instead of
/// leaking the generic type through the crate.
impl From<anyhow::Error> for DoubleUnetError {
    fn from(err: anyhow::Error) -> Self {
        DoubleUnetError::Configuration {
            message: err.to_string(),
        }
    }
}

/// Convert I/O errors to filesystem errors.
///
/// Code that knows the path and operation should construct
/// DoubleUnetError::FileSystem directly; this fallback covers the callsites
/// that have no such context.
impl From<std::io::Error> for DoubleUnetError {
    fn from(err: std::io::Error) -> Self {
        Self::FileSystem {
            path: PathBuf::from("unknown"),
            operation: "unknown".to_string(),
            source: err,
        }
    }
}

/// Convert image crate errors to image processing errors.
impl From<image::ImageError> for DoubleUnetError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageProcessing {
            path: "unknown".to_string(),
            operation: "image processing".to_string(),
            source: Box::new(err),
        }
    }
}

/// Convert ONNX Runtime errors to model errors.
impl From<ort::Error> for DoubleUnetError {
    fn from(err: ort::Error) -> Self {
        Self::Model {
            operation: "ort operation".to_string(),
            source: Box::new(err),
        }
    }
}

/// Convert ndarray shape errors to model errors.
///
/// Shape errors occur during tensor operations which are part of model
/// inference. The most important case is the reshape to the model's fixed
/// `[1, 128, 128, 3]` input, which is required to fail loudly when the
/// pixel count does not match.
impl From<ndarray::ShapeError> for DoubleUnetError {
    fn from(err: ndarray::ShapeError) -> Self {
        Self::Model {
            operation: "tensor shape conversion".to_string(),
            source: Box::new(err),
        }
    }
}
