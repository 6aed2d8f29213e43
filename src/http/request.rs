//! Request method and the per-call request descriptor handed to a transport.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Content type attached whenever a request carries a body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP verb sent to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RequestMethod {
    Post,
    Get,
    Put,
    Delete,
}

impl RequestMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Post => "POST",
            RequestMethod::Get => "GET",
            RequestMethod::Put => "PUT",
            RequestMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "http")]
impl From<RequestMethod> for reqwest::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Everything a transport needs to perform one request.
///
/// Built fresh for every helper call and moved into the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    url: String,
    method: RequestMethod,
    body: Option<Bytes>,
    auth_token: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(url: impl Into<String>, method: RequestMethod) -> Self {
        Self {
            url: url.into(),
            method,
            body: None,
            auth_token: None,
            headers: Vec::new(),
        }
    }

    /// Attach a JSON payload, sent as the exact UTF-8 bytes of `json`.
    pub fn json(mut self, json: impl Into<String>) -> Self {
        self.body = Some(Bytes::from(json.into().into_bytes()));
        self
    }

    /// Attach `Authorization: Token <token>`.
    pub fn auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> RequestMethod {
        self.method
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// The body as text, when present and valid UTF-8. Used for logging.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|body| std::str::from_utf8(body).ok())
    }

    pub fn token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }

    /// All headers to put on the wire: content type when a body is present,
    /// the token header when a token is set, then any extra headers.
    pub fn headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::with_capacity(self.headers.len() + 2);
        if self.body.is_some() {
            headers.push(("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string()));
        }
        if let Some(token) = &self.auth_token {
            headers.push(("Authorization".to_string(), format!("Token {}", token)));
        }
        headers.extend(self.headers.iter().cloned());
        headers
    }
}
