//! Output rendering: indented JSON on stdout or in a file

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{Shape, TypeDescriptor, TypeSummary};
use crate::infrastructure::traits::FileSystem;

/// Where rendered output goes.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputTarget {
    Stdout,
    File(PathBuf),
}

/// Renders response values as two-space indented JSON.
pub struct Renderer {
    fs: Arc<dyn FileSystem>,
    target: OutputTarget,
}

impl Renderer {
    pub fn new(fs: Arc<dyn FileSystem>, out: Option<&Path>) -> Self {
        let target = match out {
            Some(path) => OutputTarget::File(path.to_path_buf()),
            None => OutputTarget::Stdout,
        };
        Self { fs, target }
    }

    /// Serialize `value` and emit it, followed by a newline.
    ///
    /// A file target is overwritten.
    pub fn render<T: Serialize + ?Sized>(&self, value: &T) -> ApplicationResult<()> {
        let text = to_pretty_json(value)?;
        match &self.target {
            OutputTarget::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", text).with_context("write to stdout")
            }
            OutputTarget::File(path) => {
                debug!("render: writing {} bytes to {}", text.len() + 1, path.display());
                self.fs
                    .write(path, &format!("{}\n", text))
                    .with_path_context("write output", path)
            }
        }
    }

    /// Render type metadata, projected to name and description when `condensed`.
    pub fn render_types(
        &self,
        types: Shape<TypeDescriptor>,
        condensed: bool,
    ) -> ApplicationResult<()> {
        if condensed {
            self.render(&condense(types))
        } else {
            self.render(&types)
        }
    }
}

/// Two-space indented JSON.
///
/// Failure here means a value that cannot be represented as JSON was built,
/// which is a bug rather than a runtime condition.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> ApplicationResult<String> {
    serde_json::to_string_pretty(value).map_err(ApplicationError::Serialize)
}

/// Drop everything but type name and description.
pub fn condense(types: Shape<TypeDescriptor>) -> Shape<TypeSummary> {
    types.map(TypeSummary::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::traits::RealFileSystem;
    use serde_json::json;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn host_type() -> TypeDescriptor {
        serde_json::from_value(json!({
            "type": "Host",
            "description": "A host",
            "properties": [
                {"name": "address", "required": true},
                {"name": "os", "required": true, "default": "UNIX"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn given_single_type_when_condensed_then_only_type_and_description_remain() {
        let text = to_pretty_json(&condense(Shape::One(host_type()))).unwrap();

        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&text).unwrap(),
            json!({"type": "Host", "description": "A host"})
        );
        assert_eq!(
            serde_json::to_string(&condense(Shape::One(host_type()))).unwrap(),
            r#"{"type":"Host","description":"A host"}"#
        );
    }

    #[test]
    fn given_type_list_when_condensed_then_each_entry_is_projected() {
        let other: TypeDescriptor = serde_json::from_value(json!({
            "type": "Environment",
            "description": "A set of hosts",
            "properties": [{"name": "members", "required": false, "default": null}]
        }))
        .unwrap();

        let condensed = condense(Shape::Many(vec![host_type(), other]));

        assert_eq!(
            serde_json::to_value(&condensed).unwrap(),
            json!([
                {"type": "Host", "description": "A host"},
                {"type": "Environment", "description": "A set of hosts"}
            ])
        );
    }

    #[test]
    fn given_value_when_pretty_printed_then_uses_two_space_indent() {
        let text = to_pretty_json(&json!({"a": {"b": 1}})).unwrap();
        assert_eq!(text, "{\n  \"a\": {\n    \"b\": 1\n  }\n}");
    }

    #[test]
    fn given_file_target_when_rendering_then_writes_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out.json");
        let renderer = Renderer::new(Arc::new(RealFileSystem), Some(&out));

        renderer.render(&json!({"id": "Environments/dev"})).unwrap();

        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "{\n  \"id\": \"Environments/dev\"\n}\n");
    }

    #[test]
    fn given_full_mode_when_rendering_types_then_properties_are_kept() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("types.json");
        let renderer = Renderer::new(Arc::new(RealFileSystem), Some(&out));

        renderer.render_types(Shape::One(host_type()), false).unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["properties"][1]["default"], json!("UNIX"));
    }

    #[test]
    fn given_unwritable_path_when_rendering_then_reports_path() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("missing").join("out.json");
        let renderer = Renderer::new(Arc::new(RealFileSystem), Some(&out));

        let err = renderer.render(&json!({})).unwrap_err();

        assert!(err.to_string().contains("out.json"));
    }

    #[test]
    fn given_non_string_map_keys_when_rendering_then_reports_serialize_error() {
        let mut bad = BTreeMap::new();
        bad.insert((1u8, 2u8), 3u8);

        let err = to_pretty_json(&bad).unwrap_err();

        assert!(matches!(err, ApplicationError::Serialize(_)));
    }
}
