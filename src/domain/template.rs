//! Creation templates derived from type descriptors

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::TypeDescriptor;

/// Placeholder for a required property without a default.
pub const REQUIRED_MARKER: &str = "required";

/// Placeholder for an optional property, only emitted on request.
pub const OPTIONAL_MARKER: &str = "very optional";

/// Skeleton CI for a type, to be filled in by hand and fed to `repository create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Template(Map<String, Value>);

impl Template {
    /// Build a template from a type's property schema.
    ///
    /// Required properties carry their default, or [`REQUIRED_MARKER`].
    /// Optional properties carry [`OPTIONAL_MARKER`] when `include_optional`
    /// is set and are left out otherwise. `name` and `type` are always set
    /// and win over properties of the same name.
    pub fn synthesize(descriptor: &TypeDescriptor, include_optional: bool) -> Self {
        let mut fields = Map::new();

        for property in descriptor.properties() {
            let value = if property.required {
                property
                    .default
                    .clone()
                    .unwrap_or_else(|| Value::String(REQUIRED_MARKER.to_string()))
            } else if include_optional {
                Value::String(OPTIONAL_MARKER.to_string())
            } else {
                continue;
            };
            fields.insert(property.name.clone(), value);
        }

        fields.insert("name".to_string(), Value::String(String::new()));
        fields.insert(
            "type".to_string(),
            Value::String(descriptor.type_name().to_string()),
        );

        Self(fields)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
