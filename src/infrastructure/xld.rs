//! Blocking REST client for the XL Deploy server

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::ACCEPT;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::domain::{ConfigurationItem, ConnectionProfile, TypeDescriptor};
use crate::infrastructure::traits::XldApi;
use crate::infrastructure::{ApiError, InfraError, InfraResult};

/// Path of the REST API below the server's context root.
const API_ROOT: &str = "deployit/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// XL Deploy REST client bound to one connection profile.
pub struct XldClient {
    http: Client,
    base: Url,
    user: String,
    password: String,
}

impl XldClient {
    pub fn new(profile: &ConnectionProfile) -> InfraResult<Self> {
        let server = profile.server_url();
        let base = Url::parse(&server)
            .and_then(|url| url.join(API_ROOT))
            .map_err(|e| InfraError::HttpClient {
                message: format!("invalid server URL {server}: {e}"),
            })?;

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("xldc/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| InfraError::HttpClient {
                message: e.to_string(),
            })?;

        debug!("XldClient: base={}", base);
        Ok(Self {
            http,
            base,
            user: profile.user().to_string(),
            password: profile.password().to_string(),
        })
    }

    /// API root of this client, e.g. `http://xld:4516/deployit/`.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Append path segments to the API root, percent-encoding each one.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn ci_endpoint(&self, id: &str) -> Result<Url, ApiError> {
        let segments = ["repository", "ci"]
            .into_iter()
            .chain(id.split('/').filter(|s| !s.is_empty()));
        self.endpoint(segments)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .basic_auth(&self.user, Some(&self.password))
            .header(ACCEPT, "application/json")
    }

    fn send(&self, url: &Url, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self
            .authorized(request)
            .send()
            .map_err(|source| ApiError::Transport {
                url: url.to_string(),
                source,
            })?;
        trace!("{} -> {}", url, response.status());

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        Err(ApiError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }

    fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> Result<T, ApiError> {
        let body = response.text().map_err(|source| ApiError::Transport {
            url: url.to_string(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| ApiError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);
        let response = self.send(&url, self.http.get(url.clone()))?;
        Self::decode(&url, response)
    }
}

impl XldApi for XldClient {
    #[instrument(level = "debug", skip(self))]
    fn probe(&self) -> Result<(), ApiError> {
        let url = self.endpoint(["server", "info"])?;
        debug!("GET {}", url);
        self.send(&url, self.http.get(url.clone()))?;
        Ok(())
    }

    fn type_list(&self) -> Result<Vec<TypeDescriptor>, ApiError> {
        self.get_json(self.endpoint(["metadata", "type"])?)
    }

    fn type_descriptor(&self, type_name: &str) -> Result<TypeDescriptor, ApiError> {
        self.get_json(self.endpoint(["metadata", "type", type_name])?)
    }

    fn orchestrators(&self) -> Result<Value, ApiError> {
        self.get_json(self.endpoint(["metadata", "orchestrators"])?)
    }

    fn permissions(&self) -> Result<Value, ApiError> {
        self.get_json(self.endpoint(["metadata", "permissions"])?)
    }

    fn get_ci(&self, id: &str) -> Result<ConfigurationItem, ApiError> {
        self.get_json(self.ci_endpoint(id)?)
    }

    #[instrument(level = "debug", skip(self, ci), fields(id = %ci.id))]
    fn create_ci(&self, ci: &ConfigurationItem) -> Result<ConfigurationItem, ApiError> {
        let url = self.ci_endpoint(&ci.id)?;
        debug!("POST {}", url);
        let response = self.send(&url, self.http.post(url.clone()).json(ci))?;
        Self::decode(&url, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn profile(server: &MockServer, context: &str) -> ConnectionProfile {
        ConnectionProfile::resolve(
            Some("admin"),
            Some("admin"),
            Some(server.host().as_str()),
            Some(server.port()),
            Some(context),
            false,
        )
        .expect("valid profile")
    }

    #[test]
    fn given_context_when_building_client_then_api_root_is_below_context() {
        let server = MockServer::start();
        let client = XldClient::new(&profile(&server, "/xld")).unwrap();
        assert!(client.base_url().as_str().ends_with("/xld/deployit/"));
    }

    #[test]
    fn given_ci_id_with_slashes_when_building_endpoint_then_segments_are_kept() {
        let server = MockServer::start();
        let client = XldClient::new(&profile(&server, "/")).unwrap();

        let url = client.ci_endpoint("Infrastructure/dev hosts/web1").unwrap();

        assert_eq!(url.path(), "/deployit/repository/ci/Infrastructure/dev%20hosts/web1");
    }

    #[test]
    fn given_reachable_server_when_probing_then_sends_basic_auth() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/deployit/server/info")
                .header("Authorization", "Basic YWRtaW46YWRtaW4=");
            then.status(200).json_body(json!({"version": "9.0.0"}));
        });
        let client = XldClient::new(&profile(&server, "/")).unwrap();

        client.probe().unwrap();

        mock.assert();
    }

    #[test]
    fn given_unauthorized_when_probing_then_returns_status_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/deployit/server/info");
            then.status(401).body("Unauthorized");
        });
        let client = XldClient::new(&profile(&server, "/")).unwrap();

        let err = client.probe().unwrap_err();

        assert!(matches!(err, ApiError::Status { status: 401, .. }));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn given_garbage_body_when_fetching_type_then_returns_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/deployit/metadata/type/udm.Environment");
            then.status(200).body("<html/>");
        });
        let client = XldClient::new(&profile(&server, "/")).unwrap();

        let err = client.type_descriptor("udm.Environment").unwrap_err();

        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn given_ci_when_creating_then_posts_flat_json() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/deployit/repository/ci/Environments/dev")
                .json_body(json!({"id": "Environments/dev", "type": "udm.Environment"}));
            then.status(200)
                .json_body(json!({"id": "Environments/dev", "type": "udm.Environment", "members": []}));
        });
        let client = XldClient::new(&profile(&server, "/")).unwrap();

        let created = client
            .create_ci(&ConfigurationItem::new("Environments/dev", "udm.Environment"))
            .unwrap();

        mock.assert();
        assert_eq!(created.properties.get("members"), Some(&json!([])));
    }
}
