//! Connectivity check against the configured server

use std::sync::Arc;

use tracing::{info, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::ConnectionProfile;
use crate::infrastructure::traits::XldApi;

/// Verifies that the resolved profile reaches a server that accepts it.
pub struct ConnectionService {
    api: Arc<dyn XldApi>,
    profile: Arc<ConnectionProfile>,
}

impl ConnectionService {
    pub fn new(api: Arc<dyn XldApi>, profile: Arc<ConnectionProfile>) -> Self {
        Self { api, profile }
    }

    #[instrument(skip(self))]
    pub fn verify(&self) -> ApplicationResult<()> {
        self.api
            .probe()
            .map_err(|source| ApplicationError::ConnectionFailed {
                server: self.profile.server_url(),
                source,
            })?;
        info!("Connection to XL-Deploy verified");
        Ok(())
    }
}
