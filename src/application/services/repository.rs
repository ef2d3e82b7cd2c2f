//! Configuration item reads and writes

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{parse_properties, ConfigurationItem};
use crate::infrastructure::traits::XldApi;

/// CRUD on configuration items in the remote repository.
pub struct RepositoryService {
    api: Arc<dyn XldApi>,
}

impl RepositoryService {
    pub fn new(api: Arc<dyn XldApi>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub fn get(&self, id: &str) -> ApplicationResult<ConfigurationItem> {
        self.api.get_ci(id).map_err(|e| {
            ApplicationError::remote(format!("retrieving configuration item {}", id), e)
        })
    }

    /// Create a CI of `ci_type` at `id`.
    ///
    /// `properties` (`key=value,...`) is validated but not submitted: the CI
    /// is always created with an empty property set.
    #[instrument(skip(self))]
    pub fn create(
        &self,
        id: &str,
        ci_type: &str,
        properties: Option<&str>,
    ) -> ApplicationResult<ConfigurationItem> {
        discard_properties(id, properties)?;
        let ci = ConfigurationItem::new(id, ci_type);
        self.api.create_ci(&ci).map_err(|e| {
            ApplicationError::remote(format!("creating configuration item {}", id), e)
        })
    }

    /// Update goes through the create endpoint with an empty property set;
    /// `merge` is accepted but has no effect.
    #[instrument(skip(self))]
    pub fn update(
        &self,
        id: &str,
        ci_type: &str,
        properties: Option<&str>,
        merge: bool,
    ) -> ApplicationResult<ConfigurationItem> {
        if merge {
            debug!("update: merge requested, not supported by the create endpoint");
        }
        self.create(id, ci_type, properties)
    }
}

fn discard_properties(id: &str, properties: Option<&str>) -> ApplicationResult<()> {
    let Some(raw) = properties else {
        return Ok(());
    };
    let parsed = parse_properties(raw)?;
    if !parsed.is_empty() {
        warn!(
            "{} property assignment(s) for {} are not submitted; the CI is sent without properties",
            parsed.len(),
            id
        );
    }
    Ok(())
}
