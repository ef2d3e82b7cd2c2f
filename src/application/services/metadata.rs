//! Type, orchestrator and permission metadata

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{Shape, Template, TypeDescriptor};
use crate::infrastructure::traits::XldApi;

/// Read-only access to the server's metadata endpoints.
pub struct MetadataService {
    api: Arc<dyn XldApi>,
}

impl MetadataService {
    pub fn new(api: Arc<dyn XldApi>) -> Self {
        Self { api }
    }

    /// One type by name, or every type when `name` is `None`.
    #[instrument(skip(self))]
    pub fn types(&self, name: Option<&str>) -> ApplicationResult<Shape<TypeDescriptor>> {
        match name {
            Some(name) => self
                .api
                .type_descriptor(name)
                .map(Shape::One)
                .map_err(|e| ApplicationError::remote(format!("retrieving metadata for {}", name), e)),
            None => {
                let types = self
                    .api
                    .type_list()
                    .map_err(|e| ApplicationError::remote("retrieving metadata", e))?;
                debug!("types: {} received", types.len());
                Ok(Shape::Many(types))
            }
        }
    }

    /// Creation templates for the given types, in input order.
    ///
    /// The first type that cannot be fetched aborts the whole call.
    #[instrument(skip(self))]
    pub fn templates(
        &self,
        type_names: &[String],
        include_optional: bool,
    ) -> ApplicationResult<Shape<Template>> {
        if type_names.is_empty() {
            return Err(ApplicationError::Usage(
                "at least one type name is required".to_string(),
            ));
        }

        let templates = type_names
            .iter()
            .map(|name| {
                self.api
                    .type_descriptor(name)
                    .map(|descriptor| Template::synthesize(&descriptor, include_optional))
                    .map_err(|e| {
                        ApplicationError::remote(format!("retrieving metadata for {}", name), e)
                    })
            })
            .collect::<ApplicationResult<Vec<_>>>()?;

        Ok(Shape::from_vec(templates))
    }

    pub fn orchestrators(&self) -> ApplicationResult<Value> {
        self.api
            .orchestrators()
            .map_err(|e| ApplicationError::remote("retrieving orchestrators", e))
    }

    pub fn permissions(&self) -> ApplicationResult<Value> {
        self.api
            .permissions()
            .map_err(|e| ApplicationError::remote("retrieving permissions", e))
    }
}
