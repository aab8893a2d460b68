//! Request descriptors

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::NetError;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
    Head,
    Options,
    Patch,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = NetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            "HEAD" => Ok(Method::Head),
            "OPTIONS" => Ok(Method::Options),
            "PATCH" => Ok(Method::Patch),
            _ => Err(NetError::UnsupportedMethod(s.to_string())),
        }
    }
}

impl TryFrom<String> for Method {
    type Error = NetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Method> for String {
    fn from(method: Method) -> Self {
        method.as_str().to_string()
    }
}

/// Request descriptor: `{method, url, headers?, payload?}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub method: Method,
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            ..Default::default()
        }
    }

    pub fn get(url: &str) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: &str) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Serialize `value` as the payload and mark it as JSON
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, NetError> {
        let json = serde_json::to_string(value).map_err(|e| NetError::Client(e.to_string()))?;
        Ok(self
            .with_header("Content-Type", "application/json")
            .with_payload(json))
    }

    /// Parse a JSON request descriptor
    pub fn from_json(json: &str) -> Result<Self, NetError> {
        serde_json::from_str(json).map_err(|e| NetError::Client(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let req = Request::get("https://example.com").with_header("Accept", "application/json");

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.headers.get("Accept").unwrap(), "application/json");
        assert!(req.payload.is_none());
    }

    #[test]
    fn test_post_request() {
        let req = Request::post("https://api.example.com")
            .with_json(&serde_json::json!({"key": "value"}))
            .unwrap();

        assert_eq!(req.method, Method::Post);
        assert_eq!(req.headers.get("Content-Type").unwrap(), "application/json");
        assert_eq!(req.payload.as_deref(), Some(r#"{"key":"value"}"#));
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("Patch".parse::<Method>().unwrap(), Method::Patch);
        assert!(matches!("BREW".parse::<Method>(), Err(NetError::UnsupportedMethod(m)) if m == "BREW"));
    }

    #[test]
    fn test_descriptor_from_json() {
        let req = Request::from_json(r#"{"method": "post", "url": "/save", "payload": "a=1"}"#).unwrap();
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.url, "/save");
        assert!(req.headers.is_empty());
        assert_eq!(req.payload.as_deref(), Some("a=1"));

        let req = Request::from_json(r#"{"url": "/x"}"#).unwrap();
        assert_eq!(req.method, Method::Get);

        assert!(Request::from_json(r#"{"method": "BREW", "url": "/x"}"#).is_err());
    }
}
