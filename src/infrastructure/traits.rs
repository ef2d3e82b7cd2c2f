//! I/O boundary traits for testability
//!
//! These traits abstract the filesystem and the remote server, allowing
//! services to be tested with fake implementations.

use std::io;
use std::path::Path;

use serde_json::Value;

use crate::domain::{ConfigurationItem, TypeDescriptor};
use crate::infrastructure::ApiError;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Write string content to file, replacing it.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// The subset of the XL Deploy REST API this tool talks to.
///
/// Every call is a single blocking request.
pub trait XldApi: Send + Sync {
    /// Check that the server is reachable and accepts the credentials.
    fn probe(&self) -> Result<(), ApiError>;

    /// All known CI types.
    fn type_list(&self) -> Result<Vec<TypeDescriptor>, ApiError>;

    /// One CI type by its fully qualified name, e.g. `udm.Environment`.
    fn type_descriptor(&self, type_name: &str) -> Result<TypeDescriptor, ApiError>;

    /// Orchestrator names, as sent by the server.
    fn orchestrators(&self) -> Result<Value, ApiError>;

    /// Permission metadata, as sent by the server.
    fn permissions(&self) -> Result<Value, ApiError>;

    /// Read a CI from the repository.
    fn get_ci(&self, id: &str) -> Result<ConfigurationItem, ApiError>;

    /// Store a new CI; returns the CI as persisted by the server.
    fn create_ci(&self, ci: &ConfigurationItem) -> Result<ConfigurationItem, ApiError>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
