//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::Path;
use std::sync::Arc;

use crate::application::services::{ConnectionService, MetadataService, RepositoryService};
use crate::application::Renderer;
use crate::domain::ConnectionProfile;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, XldApi};
use crate::infrastructure::{InfraResult, XldClient};

/// Container holding everything a command handler needs.
///
/// Built once per invocation from the resolved profile; services are
/// cheap views over the shared dependencies and created on demand.
pub struct ServiceContainer {
    /// Resolved connection profile
    pub profile: Arc<ConnectionProfile>,

    /// Remote API abstraction
    pub api: Arc<dyn XldApi>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container talking to the real server.
    pub fn new(profile: ConnectionProfile) -> InfraResult<Self> {
        let api = XldClient::new(&profile)?;
        Ok(Self::with_deps(
            profile,
            Arc::new(api),
            Arc::new(RealFileSystem),
        ))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        profile: ConnectionProfile,
        api: Arc<dyn XldApi>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            profile: Arc::new(profile),
            api,
            fs,
        }
    }

    pub fn connection(&self) -> ConnectionService {
        ConnectionService::new(self.api.clone(), self.profile.clone())
    }

    pub fn metadata(&self) -> MetadataService {
        MetadataService::new(self.api.clone())
    }

    pub fn repository(&self) -> RepositoryService {
        RepositoryService::new(self.api.clone())
    }

    /// Renderer writing to `out`, or to stdout when `None`.
    pub fn renderer(&self, out: Option<&Path>) -> Renderer {
        Renderer::new(self.fs.clone(), out)
    }
}
