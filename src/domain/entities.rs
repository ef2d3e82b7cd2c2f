//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// URL scheme used to reach the server.
///
/// Never configured directly; derived from the SSL switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn from_ssl(ssl: bool) -> Self {
        if ssl {
            Scheme::Https
        } else {
            Scheme::Http
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Connection settings that must be present before any remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Username,
    Password,
    Host,
    Port,
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Setting::Username => "Username",
            Setting::Password => "Password",
            Setting::Host => "Host",
            Setting::Port => "Port",
        };
        f.write_str(name)
    }
}

impl Setting {
    /// Lowercase key as used in the config file and as flag name.
    pub fn key(&self) -> &'static str {
        match self {
            Setting::Username => "username",
            Setting::Password => "password",
            Setting::Host => "host",
            Setting::Port => "port",
        }
    }
}

/// Resolved, validated connection to one XL Deploy server.
///
/// Built once per invocation and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    user: String,
    password: String,
    host: String,
    port: u16,
    context: String,
    scheme: Scheme,
}

impl ConnectionProfile {
    /// Validate layered values into a profile.
    ///
    /// Fields are checked in a fixed order (username, password, host, port)
    /// and the first missing one is reported. Blank strings and port 0 count
    /// as missing. A blank context becomes `/`.
    pub fn resolve(
        user: Option<&str>,
        password: Option<&str>,
        host: Option<&str>,
        port: Option<u16>,
        context: Option<&str>,
        ssl: bool,
    ) -> Result<Self, DomainError> {
        let user = present(user).ok_or(DomainError::MissingSetting(Setting::Username))?;
        let password = present(password).ok_or(DomainError::MissingSetting(Setting::Password))?;
        let host = present(host).ok_or(DomainError::MissingSetting(Setting::Host))?;
        let port = port
            .filter(|p| *p != 0)
            .ok_or(DomainError::MissingSetting(Setting::Port))?;
        let context = present(context).unwrap_or("/");

        Ok(Self {
            user: user.to_string(),
            password: password.to_string(),
            host: host.to_string(),
            port,
            context: context.to_string(),
            scheme: Scheme::from_ssl(ssl),
        })
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Server root including the context path, always ending in `/`.
    ///
    /// `http://xld:4516/` for context `/`, `http://xld:4516/xld/` for `/xld`.
    pub fn server_url(&self) -> String {
        let context = self.context.trim_matches('/');
        if context.is_empty() {
            format!("{}://{}:{}/", self.scheme, self.host, self.port)
        } else {
            format!("{}://{}:{}/{}/", self.scheme, self.host, self.port, context)
        }
    }
}

impl fmt::Debug for ConnectionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionProfile")
            .field("user", &self.user)
            .field("password", &"********")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("context", &self.context)
            .field("scheme", &self.scheme)
            .finish()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Schema of a CI type as served by the metadata endpoint.
///
/// Serializes back to exactly the object the server sent. Only the fields
/// needed for summaries and templates are decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct TypeDescriptor {
    raw: Value,
    type_name: String,
    description: String,
    properties: Vec<PropertyDescriptor>,
}

impl TypeDescriptor {
    /// Fully qualified type name, e.g. `udm.Environment`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Empty when the server sent none.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

impl TryFrom<Value> for TypeDescriptor {
    type Error = DomainError;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        #[derive(Deserialize)]
        struct Known {
            #[serde(rename = "type")]
            type_name: String,
            #[serde(default)]
            description: Option<String>,
            #[serde(default)]
            properties: Option<Vec<PropertyDescriptor>>,
        }

        let known =
            Known::deserialize(&raw).map_err(|e| DomainError::MalformedType(e.to_string()))?;
        Ok(Self {
            type_name: known.type_name,
            description: known.description.unwrap_or_default(),
            properties: known.properties.unwrap_or_default(),
            raw,
        })
    }
}

impl Serialize for TypeDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

/// The part of a property definition templates are built from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PropertyDescriptor {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default: Option<Value>,
}

/// Condensed view of a type: name and description only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeSummary {
    #[serde(rename = "type")]
    pub type_name: String,
    pub description: String,
}

impl From<&TypeDescriptor> for TypeSummary {
    fn from(descriptor: &TypeDescriptor) -> Self {
        Self {
            type_name: descriptor.type_name.clone(),
            description: descriptor.description.clone(),
        }
    }
}

impl From<TypeDescriptor> for TypeSummary {
    fn from(descriptor: TypeDescriptor) -> Self {
        Self {
            type_name: descriptor.type_name,
            description: descriptor.description,
        }
    }
}

/// A configuration item: `{"id": .., "type": .., <properties>}` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationItem {
    pub id: String,
    #[serde(rename = "type")]
    pub ci_type: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl ConfigurationItem {
    /// A CI with no properties set.
    pub fn new(id: impl Into<String>, ci_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ci_type: ci_type.into(),
            properties: Map::new(),
        }
    }
}

/// Parse `key=value,key=value` property assignments.
///
/// Empty segments are skipped; a segment without `=` or with an empty key is
/// rejected. Everything after the first `=` is the value.
pub fn parse_properties(input: &str) -> Result<Map<String, Value>, DomainError> {
    let mut properties = Map::new();
    for segment in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (key, value) = segment
            .split_once('=')
            .ok_or_else(|| DomainError::MalformedProperty(segment.to_string()))?;
        let key = key.trim();
        if key.is_empty() {
            return Err(DomainError::MalformedProperty(segment.to_string()));
        }
        properties.insert(key.to_string(), Value::String(value.trim().to_string()));
    }
    Ok(properties)
}

/// A response that is either one item or a list of items.
///
/// Serializes as the bare item or as a JSON array.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Shape<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Shape<T> {
    /// Exactly one element becomes `One`, anything else `Many`.
    pub fn from_vec(mut items: Vec<T>) -> Self {
        if items.len() == 1 {
            if let Some(item) = items.pop() {
                return Shape::One(item);
            }
        }
        Shape::Many(items)
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Shape<U> {
        match self {
            Shape::One(item) => Shape::One(f(item)),
            Shape::Many(items) => Shape::Many(items.into_iter().map(f).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Shape::One(_) => 1,
            Shape::Many(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(true, Scheme::Https, "https")]
    #[case(false, Scheme::Http, "http")]
    fn given_ssl_flag_when_deriving_scheme_then_maps_directly(
        #[case] ssl: bool,
        #[case] expected: Scheme,
        #[case] text: &str,
    ) {
        let scheme = Scheme::from_ssl(ssl);
        assert_eq!(scheme, expected);
        assert_eq!(scheme.to_string(), text);
    }

    #[rstest]
    #[case(None, Some("pw"), Some("h"), Some(4516), Setting::Username)]
    #[case(Some("u"), None, Some("h"), Some(4516), Setting::Password)]
    #[case(Some("u"), Some("pw"), None, Some(4516), Setting::Host)]
    #[case(Some("u"), Some("pw"), Some("h"), None, Setting::Port)]
    #[case(Some("u"), Some("pw"), Some("h"), Some(0), Setting::Port)]
    #[case(Some(""), Some("pw"), Some("h"), Some(4516), Setting::Username)]
    #[case(None, None, None, None, Setting::Username)]
    #[case(Some("u"), None, None, None, Setting::Password)]
    fn given_missing_setting_when_resolving_then_first_missing_is_reported(
        #[case] user: Option<&str>,
        #[case] password: Option<&str>,
        #[case] host: Option<&str>,
        #[case] port: Option<u16>,
        #[case] expected: Setting,
    ) {
        let err = ConnectionProfile::resolve(user, password, host, port, None, false).unwrap_err();
        assert_eq!(err, DomainError::MissingSetting(expected));
        assert_eq!(err.to_string(), format!("{} is required", expected));
    }

    #[test]
    fn given_blank_context_when_resolving_then_defaults_to_root() {
        let profile =
            ConnectionProfile::resolve(Some("admin"), Some("pw"), Some("xld"), Some(4516), Some(""), true)
                .unwrap();
        assert_eq!(profile.context(), "/");
        assert_eq!(profile.scheme(), Scheme::Https);
        assert_eq!(profile.server_url(), "https://xld:4516/");
    }

    #[test]
    fn given_nested_context_when_building_server_url_then_wraps_in_slashes() {
        let profile =
            ConnectionProfile::resolve(Some("admin"), Some("pw"), Some("xld"), Some(80), Some("xld/"), false)
                .unwrap();
        assert_eq!(profile.server_url(), "http://xld:80/xld/");
    }

    #[test]
    fn given_profile_when_debug_printed_then_password_is_redacted() {
        let profile =
            ConnectionProfile::resolve(Some("admin"), Some("s3cret"), Some("xld"), Some(4516), None, false)
                .unwrap();
        let printed = format!("{:?}", profile);
        assert!(!printed.contains("s3cret"));
        assert!(printed.contains("admin"));
    }

    #[test]
    fn given_descriptor_when_summarized_then_properties_are_dropped() {
        let descriptor: TypeDescriptor = serde_json::from_value(json!({
            "type": "Host",
            "description": "A host",
            "virtual": false,
            "properties": [{"name": "address", "required": true, "kind": "STRING"}]
        }))
        .unwrap();

        let summary = TypeSummary::from(&descriptor);

        assert_eq!(
            serde_json::to_value(&summary).unwrap(),
            json!({"type": "Host", "description": "A host"})
        );
    }

    #[test]
    fn given_descriptor_with_unknown_fields_when_round_tripped_then_keeps_them() {
        let wire = json!({
            "type": "overthere.SshHost",
            "description": "A host reachable over SSH",
            "virtual": false,
            "superTypes": ["udm.BaseContainer"],
            "properties": [
                {"name": "os", "required": true, "kind": "ENUM", "default": "UNIX"}
            ]
        });
        let descriptor: TypeDescriptor = serde_json::from_value(wire.clone()).unwrap();

        assert_eq!(descriptor.properties()[0].default, Some(json!("UNIX")));
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), wire);
    }

    #[test]
    fn given_sparse_descriptor_when_round_tripped_then_nothing_is_added_or_dropped() {
        let wire = json!({
            "type": "udm.Environment",
            "properties": [{"name": "members", "required": false, "default": null}]
        });
        let descriptor: TypeDescriptor = serde_json::from_value(wire.clone()).unwrap();

        assert_eq!(descriptor.description(), "");
        assert_eq!(descriptor.properties()[0].default, None);
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), wire);
    }

    #[test]
    fn given_descriptor_without_properties_when_round_tripped_then_none_appear() {
        let wire = json!({"type": "udm.Application", "description": null});
        let descriptor: TypeDescriptor = serde_json::from_value(wire.clone()).unwrap();

        assert!(descriptor.properties().is_empty());
        assert_eq!(serde_json::to_value(&descriptor).unwrap(), wire);
    }

    #[test]
    fn given_descriptor_without_type_when_decoding_then_fails() {
        let result = serde_json::from_value::<TypeDescriptor>(json!({"description": "x"}));

        assert!(result.is_err());
    }

    #[test]
    fn given_ci_when_serialized_then_properties_are_flattened() {
        let mut ci = ConfigurationItem::new("Infrastructure/web", "overthere.LocalHost");
        ci.properties.insert("os".into(), json!("UNIX"));

        assert_eq!(
            serde_json::to_value(&ci).unwrap(),
            json!({"id": "Infrastructure/web", "type": "overthere.LocalHost", "os": "UNIX"})
        );
    }

    #[test]
    fn given_property_list_when_parsing_then_returns_assignments() {
        let props = parse_properties("os=UNIX, address = 10.0.0.1,,url=http://x?a=b").unwrap();
        assert_eq!(props.get("os"), Some(&json!("UNIX")));
        assert_eq!(props.get("address"), Some(&json!("10.0.0.1")));
        assert_eq!(props.get("url"), Some(&json!("http://x?a=b")));
        assert_eq!(props.len(), 3);
    }

    #[rstest]
    #[case("os")]
    #[case("os=UNIX,address")]
    #[case("=UNIX")]
    fn given_malformed_property_list_when_parsing_then_rejects(#[case] input: &str) {
        assert!(matches!(
            parse_properties(input),
            Err(DomainError::MalformedProperty(_))
        ));
    }

    #[test]
    fn given_single_item_when_shaping_then_is_one() {
        assert_eq!(Shape::from_vec(vec![1]), Shape::One(1));
        assert_eq!(Shape::from_vec(vec![1, 2]), Shape::Many(vec![1, 2]));
        assert!(Shape::<i32>::from_vec(vec![]).is_empty());
    }

    #[test]
    fn given_shape_when_serialized_then_is_bare_object_or_array() {
        assert_eq!(serde_json::to_value(Shape::One(json!({"a": 1}))).unwrap(), json!({"a": 1}));
        assert_eq!(
            serde_json::to_value(Shape::Many(vec![json!({"a": 1})])).unwrap(),
            json!([{"a": 1}])
        );
    }
}
