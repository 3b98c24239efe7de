//! HTTP client for the NDEx v2 REST API

use crate::error::{IngestError, Result};
use crate::network::CxNetwork;
use crate::publish::endpoints;
use crate::publish::types::{NdexCredentials, NdexUser, NetworkSummary};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

// ============================================================================
// NDEx Client Constants
// ============================================================================

/// Default timeout for NDEx requests in seconds.
/// Can be overridden via GHL_HTTP_TIMEOUT_SECS environment variable.
/// Uploads of full GeneHancer releases take minutes.
pub const DEFAULT_NDEX_TIMEOUT_SECS: u64 = 300;

/// Page size used when listing a user's networks
pub const SUMMARY_PAGE_LIMIT: usize = 1000;

/// Multipart field carrying the CX document
const CX_STREAM_FIELD: &str = "CXNetworkStream";

pub struct NdexClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl NdexClient {
    pub fn new(credentials: &NdexCredentials) -> Result<Self> {
        let timeout_secs = std::env::var("GHL_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_NDEX_TIMEOUT_SECS);

        Self::with_timeout(credentials, Duration::from_secs(timeout_secs))
    }

    pub fn with_timeout(credentials: &NdexCredentials, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: endpoints::normalize_server(&credentials.server),
            username: credentials.username.clone(),
            password: credentials.password.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.username, Some(&self.password))
    }

    /// Account record of the configured user
    pub async fn current_user(&self) -> Result<NdexUser> {
        let url = endpoints::user_url(&self.base_url);

        let response = self
            .authed(self.client.get(&url))
            .query(&[("username", self.username.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// First page of network summaries owned by `user_id`
    pub async fn network_summaries(&self, user_id: &str) -> Result<Vec<NetworkSummary>> {
        let url = endpoints::network_summary_url(&self.base_url, user_id);
        let limit = SUMMARY_PAGE_LIMIT.to_string();

        let response = self
            .authed(self.client.get(&url))
            .query(&[("offset", "0"), ("limit", limit.as_str())])
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }

    /// Upload a new network and return its UUID
    pub async fn create_network(&self, cx: Vec<u8>) -> Result<String> {
        let url = endpoints::networks_url(&self.base_url);

        let response = self
            .authed(self.client.post(&url))
            .multipart(cx_form(cx)?)
            .send()
            .await?
            .error_for_status()?;

        let location = response.text().await?;
        uuid_from_location(&location)
            .ok_or_else(|| IngestError::Publish(format!("unexpected create response '{}'", location)))
    }

    /// Replace the content of an existing network
    pub async fn update_network(&self, uuid: &str, cx: Vec<u8>) -> Result<()> {
        let url = endpoints::network_url(&self.base_url, uuid);

        self.authed(self.client.put(&url))
            .multipart(cx_form(cx)?)
            .send()
            .await?
            .error_for_status()?;

        debug!(uuid, "Updated network");
        Ok(())
    }

    /// Download a network as CX
    pub async fn get_network(&self, uuid: &str) -> Result<CxNetwork> {
        let url = endpoints::network_url(&self.base_url, uuid);

        let response = self
            .authed(self.client.get(&url))
            .send()
            .await?
            .error_for_status()?;

        CxNetwork::from_value(response.json().await?)
    }
}

fn cx_form(cx: Vec<u8>) -> Result<Form> {
    let part = Part::bytes(cx)
        .file_name("network.cx")
        .mime_str("application/octet-stream")?;
    Ok(Form::new().part(CX_STREAM_FIELD, part))
}

/// NDEx answers a create with the new network's URL
fn uuid_from_location(location: &str) -> Option<String> {
    location
        .trim()
        .trim_matches('"')
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use wiremock::matchers::{basic_auth, body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn credentials(server: &str) -> NdexCredentials {
        NdexCredentials {
            server: server.to_string(),
            username: "loader".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn test_uuid_from_location() {
        assert_eq!(
            uuid_from_location("http://public.ndexbio.org/v2/network/0a1b-2c3d\n").as_deref(),
            Some("0a1b-2c3d")
        );
        assert_eq!(uuid_from_location("\"/v2/network/abc\"").as_deref(), Some("abc"));
        assert_eq!(uuid_from_location("abc").as_deref(), Some("abc"));
        assert_eq!(uuid_from_location("  "), None);
    }

    #[test]
    fn test_client_adds_scheme() {
        let client = NdexClient::new(&credentials("public.ndexbio.org")).unwrap();
        assert_eq!(client.base_url(), "http://public.ndexbio.org");
        assert_eq!(client.username(), "loader");
    }

    #[tokio::test]
    async fn test_current_user_and_summaries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/user"))
            .and(query_param("username", "loader"))
            .and(basic_auth("loader", "secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"externalId": "user-1", "userName": "loader"}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v2/user/user-1/networksummary"))
            .and(query_param("offset", "0"))
            .and(query_param("limit", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"externalId": "net-1", "name": "GeneHancer_v4.4"}
            ])))
            .mount(&server)
            .await;

        let client = NdexClient::new(&credentials(&server.uri())).unwrap();
        let user = client.current_user().await.unwrap();
        assert_eq!(user.external_id, "user-1");

        let summaries = client.network_summaries(&user.external_id).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].name.as_deref(), Some("GeneHancer_v4.4"));
    }

    #[tokio::test]
    async fn test_create_and_update_send_cx_stream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/network"))
            .and(body_string_contains("CXNetworkStream"))
            .respond_with(
                ResponseTemplate::new(201).set_body_string(format!("{}/v2/network/new-uuid", server.uri())),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v2/network/old-uuid"))
            .and(body_string_contains("CXNetworkStream"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = NdexClient::new(&credentials(&server.uri())).unwrap();
        let uuid = client.create_network(b"[]".to_vec()).await.unwrap();
        assert_eq!(uuid, "new-uuid");
        client.update_network("old-uuid", b"[]".to_vec()).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_network_parses_cx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/network/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"networkAttributes": [{"n": "name", "v": "existing"}]},
                {"cyVisualProperties": [{"properties_of": "network", "properties": {}}]}
            ])))
            .mount(&server)
            .await;

        let client = NdexClient::new(&credentials(&server.uri())).unwrap();
        let network = client.get_network("abc").await.unwrap();
        assert_eq!(network.name(), Some("existing"));
        assert!(network.opaque_aspect("cyVisualProperties").is_some());
    }

    #[tokio::test]
    async fn test_rejected_upload_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/network"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = NdexClient::new(&credentials(&server.uri())).unwrap();
        assert!(client.create_network(b"[]".to_vec()).await.is_err());
    }
}
