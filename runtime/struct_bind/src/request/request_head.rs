use http::{HeaderMap, Method, Uri, Version};

#[derive(Debug, Clone)]
/// Everything a request carries before its body.
pub struct RequestHead {
    pub method: Method,
    /// Path and query, plus scheme and authority for absolute-form targets.
    pub target: Uri,
    pub version: Version,
    pub headers: HeaderMap,
}

impl RequestHead {
    /// The raw query string, without the leading `?`.
    pub fn query(&self) -> Option<&str> {
        self.target.query()
    }

    /// The `Content-Type` header, if present and valid ASCII.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }
}

impl From<http::request::Parts> for RequestHead {
    fn from(parts: http::request::Parts) -> Self {
        let http::request::Parts {
            method,
            uri,
            version,
            headers,
            ..
        } = parts;
        Self {
            method,
            target: uri,
            version,
            headers,
        }
    }
}
