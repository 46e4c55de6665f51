//! Error types for the harness: everything outside the LIC core that can fail.

use lic_core::LicError;
use thiserror::Error;

/// Errors produced while building fields, reading specs or writing snapshots.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The core rejected a grid, parameter set or render call.
    #[error(transparent)]
    Lic(#[from] LicError),

    /// A vector field name was not found in the registry.
    #[error("unknown vector field: {0}")]
    UnknownField(String),

    /// A noise kind name was not recognised.
    #[error("unknown noise kind: {0}")]
    UnknownNoise(String),

    /// A render spec was structurally valid JSON but unusable.
    #[error("invalid render spec: {0}")]
    InvalidSpec(String),

    /// The band-rendering thread pool could not be created.
    #[error("thread pool error: {0}")]
    ThreadPool(String),

    /// Writing an image or creating an output directory failed.
    #[error("I/O error: {0}")]
    Io(String),
}
