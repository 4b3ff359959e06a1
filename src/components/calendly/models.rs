use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// HTTP methods the Calendly API is addressed with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body
    pub fn has_body(&self) -> bool {
        matches!(self, Method::Post | Method::Patch | Method::Put)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Patch => reqwest::Method::PATCH,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// One request against the remote API, built fresh for every call
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Path relative to the base URL, identifiers already encoded
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub body: Option<Map<String, Value>>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: BTreeMap::new(),
            body: method.has_body().then(Map::new),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn with_query(mut self, name: &str, value: impl Into<String>) -> Self {
        self.query.insert(name.to_string(), value.into());
        self
    }

    /// Insert a body field, creating the body if the method had none
    pub fn insert_body(&mut self, name: &str, value: Value) {
        self.body
            .get_or_insert_with(Map::new)
            .insert(name.to_string(), value);
    }
}

/// Message used for the success sentinel, matching what agents already expect
pub const NO_CONTENT_MESSAGE: &str = "Operation completed successfully";

/// Normalized successful response
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    /// Parsed JSON payload
    Json(Value),
    /// Body that was not JSON, returned verbatim
    Text(String),
    /// Empty successful response (204 or zero-length body)
    NoContent,
}

impl ApiResponse {
    pub fn is_no_content(&self) -> bool {
        matches!(self, ApiResponse::NoContent)
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ApiResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    /// JSON rendering handed to front ends
    pub fn to_value(&self) -> Value {
        match self {
            ApiResponse::Json(value) => value.clone(),
            ApiResponse::Text(text) => Value::String(text.clone()),
            ApiResponse::NoContent => json!({
                "success": true,
                "message": NO_CONTENT_MESSAGE,
            }),
        }
    }

    /// Text rendering used for MCP tool content
    pub fn to_text(&self) -> String {
        match self {
            ApiResponse::Text(text) => text.clone(),
            other => {
                let value = other.to_value();
                serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_presence_follows_method() {
        assert!(RequestDescriptor::new(Method::Get, "users/me").body.is_none());
        assert!(RequestDescriptor::new(Method::Delete, "event_types/x").body.is_none());
        assert_eq!(
            RequestDescriptor::new(Method::Post, "scheduling_links").body,
            Some(Map::new())
        );
    }

    #[test]
    fn test_sentinel_is_distinct_from_empty_payload() {
        let sentinel = ApiResponse::NoContent;
        let empty = ApiResponse::Json(json!({}));

        assert_ne!(sentinel, empty);
        assert!(sentinel.is_no_content());
        assert_eq!(sentinel.to_value()["success"], true);
        assert!(empty.as_json().is_some());
    }

    #[test]
    fn test_text_passes_through() {
        let text = ApiResponse::Text("plain body".to_string());
        assert_eq!(text.to_text(), "plain body");
    }
}
