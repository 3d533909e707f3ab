//! Error types for the Lumen3D engine
//!
//! This module defines the error types used throughout the engine,
//! including render target creation, framebuffer validation and
//! backend failures.

use std::fmt;
use crate::graphics_device::FramebufferStatus;

/// Result type for Lumen3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lumen3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (OpenGL, lock poisoning, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, framebuffer, renderbuffer, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, driver, subsystems)
    InitializationFailed(String),

    /// A viewport with a non-positive size (or negative origin) was used
    /// where a drawable area is required
    InvalidViewport(String),

    /// An operation was issued before its resources exist
    InvalidState(String),

    /// The operation is not defined for this kind of render target
    UnsupportedOperation(String),

    /// An array layer index past the end of a layered texture
    LayerOutOfRange {
        /// Requested layer
        index: u32,
        /// Number of layers in the texture
        layer_count: u32,
    },

    /// The framebuffer failed its completeness check
    IncompleteFramebuffer(FramebufferStatus),

    /// A texture created by one backend was handed to another
    WrongBackend {
        /// Backend of the device performing the operation
        expected: &'static str,
        /// Backend that created the texture
        found: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidViewport(msg) => write!(f, "Invalid viewport: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::UnsupportedOperation(msg) => write!(f, "Unsupported operation: {}", msg),
            Error::LayerOutOfRange { index, layer_count } => write!(
                f,
                "Layer index {} out of range (layer count = {})",
                index, layer_count
            ),
            Error::IncompleteFramebuffer(status) => {
                write!(f, "Incomplete framebuffer: {}", status)
            }
            Error::WrongBackend { expected, found } => write!(
                f,
                "Wrong backend: texture belongs to '{}', device is '{}'",
                found, expected
            ),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Log an ERROR message and build an `Error::BackendError` from it
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("lumen3d::gl", "Failed to create framebuffer: {}", reason);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::lumen3d::Error::BackendError(message)
    }};
}

/// Log an ERROR message and return `Err(Error::BackendError)` from the
/// enclosing function
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

/// Log a typed error at ERROR severity and return it from the enclosing
/// function
///
/// # Example
///
/// ```ignore
/// engine_bail_err!("lumen3d::RenderTarget", Error::LayerOutOfRange { index, layer_count });
/// ```
#[macro_export]
macro_rules! engine_bail_err {
    ($source:expr, $error:expr) => {{
        let error: $crate::lumen3d::Error = $error;
        $crate::engine_error!($source, "{}", error);
        return Err(error);
    }};
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
