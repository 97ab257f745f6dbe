//! Error types for the `compass-world` crate.
//!
//! Queries and mutations on the exploration grid never fail: invalid ids
//! and wrong-length masks degrade to `false` or a no-op. [`WorldError`] is
//! reserved for the explicitly fallible entry points (strict constructors
//! and terrain-file loading).

use std::path::PathBuf;

/// Errors that can occur while building or loading world-map state.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// A mask did not have exactly one byte per global cell.
    #[error("{mask} mask has {actual} bytes, expected {expected}")]
    MaskLength {
        /// Which mask was rejected (`reveal`, `land`, `terrain`).
        mask: &'static str,
        /// Required length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },

    /// The terrain image could not be read from disk.
    #[error("failed to read terrain image {path}: {source}")]
    Io {
        /// Path of the image.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The terrain image is not a 256x256 8-bit grayscale image.
    #[error("unsupported terrain image: {reason}")]
    TerrainFormat {
        /// What was wrong with the image.
        reason: String,
    },
}
