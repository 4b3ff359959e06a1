use super::models::{ApiResponse, RequestDescriptor};
use crate::config::Config;
use crate::error::{config_error, transport_error, AppResult, Error};
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};
use url::Url;
use uuid::Uuid;

/// Issues authenticated requests against the Calendly API.
///
/// Cloning is cheap: clones share the connection pool and the credential.
/// Nothing is mutated between calls, so concurrent dispatches need no locking.
#[derive(Clone)]
pub struct Dispatcher {
    client: Client,
    base_url: Arc<str>,
    credential: Arc<SecretString>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Build the shared client from configuration
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| config_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            credential: Arc::new(SecretString::new(config.bearer_token().to_string())),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a request, query parameters included
    pub fn url_for(&self, request: &RequestDescriptor) -> AppResult<Url> {
        let url_str = format!("{}/{}", self.base_url, request.path.trim_start_matches('/'));

        let mut url = Url::parse(&url_str)
            .map_err(|e| Error::Other(format!("Failed to parse URL {}: {}", url_str, e)))?;

        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Perform exactly one request and normalize the outcome.
    ///
    /// Non-2xx statuses become [`Error::Remote`] with the body untouched;
    /// failures before a status arrives become [`Error::Transport`].
    pub async fn dispatch(&self, request: &RequestDescriptor) -> AppResult<ApiResponse> {
        let url = self.url_for(request)?;
        let call_id = Uuid::new_v4();

        debug!(%call_id, method = %request.method, path = %request.path, "Dispatching Calendly request");

        let mut builder = self
            .client
            .request(request.method.into(), url)
            .bearer_auth(self.credential.expose_secret())
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(%call_id, "Request to {} failed: {}", request.path, e);
            transport_error(&describe_transport_failure(&e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(%call_id, "Failed to read response body: {}", e);
            transport_error(&format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            warn!(%call_id, status = status.as_u16(), "Calendly rejected {} {}", request.method, request.path);
            return Err(Error::Remote {
                status: status.as_u16(),
                body,
            });
        }

        debug!(%call_id, status = status.as_u16(), bytes = body.len(), "Calendly request completed");

        Ok(normalize_body(status, body))
    }
}

fn normalize_body(status: StatusCode, body: String) -> ApiResponse {
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return ApiResponse::NoContent;
    }

    match serde_json::from_str(&body) {
        Ok(value) => ApiResponse::Json(value),
        Err(_) => ApiResponse::Text(body),
    }
}

fn describe_transport_failure(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("Request timed out: {}", err)
    } else if err.is_connect() {
        format!("Connection failed: {}", err)
    } else {
        format!("Request failed: {}", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::calendly::models::Method;
    use serde_json::json;

    fn dispatcher(base_url: &str) -> Dispatcher {
        Dispatcher::new(&Config::new("test-token").with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let d = dispatcher("https://api.calendly.com/");
        let url = d
            .url_for(&RequestDescriptor::get("/event_types/abc123"))
            .unwrap();
        assert_eq!(url.as_str(), "https://api.calendly.com/event_types/abc123");
    }

    #[test]
    fn test_url_encodes_query() {
        let d = dispatcher("https://api.calendly.com");
        let request = RequestDescriptor::get("event_types")
            .with_query("user", "https://api.calendly.com/users/U1")
            .with_query("count", "20");
        let url = d.url_for(&request).unwrap();

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("count".to_string(), "20".to_string())));
        assert!(pairs.contains(&(
            "user".to_string(),
            "https://api.calendly.com/users/U1".to_string()
        )));
    }

    #[test]
    fn test_normalize_body() {
        assert_eq!(
            normalize_body(StatusCode::NO_CONTENT, String::new()),
            ApiResponse::NoContent
        );
        assert_eq!(
            normalize_body(StatusCode::OK, "  ".to_string()),
            ApiResponse::NoContent
        );
        assert_eq!(
            normalize_body(StatusCode::OK, r#"{"resource":{}}"#.to_string()),
            ApiResponse::Json(json!({"resource": {}}))
        );
        assert_eq!(
            normalize_body(StatusCode::OK, "not json".to_string()),
            ApiResponse::Text("not json".to_string())
        );
    }

    #[test]
    fn test_debug_hides_credential() {
        let d = dispatcher("https://api.calendly.com");
        assert!(!format!("{:?}", d).contains("test-token"));
    }

    #[tokio::test]
    async fn test_sends_auth_and_content_type() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/scheduling_links")
            .match_header("authorization", "Bearer test-token")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(json!({"owner": "o"})))
            .with_status(201)
            .with_body(r#"{"resource":{"booking_url":"https://calendly.com/d/x"}}"#)
            .create_async()
            .await;

        let mut request = RequestDescriptor::new(Method::Post, "scheduling_links");
        request.insert_body("owner", json!("o"));

        let result = dispatcher(&server.url()).dispatch(&request).await.unwrap();
        assert_eq!(
            result.as_json().unwrap()["resource"]["booking_url"],
            "https://calendly.com/d/x"
        );
        mock.assert_async().await;
    }
}
