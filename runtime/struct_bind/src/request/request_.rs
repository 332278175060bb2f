use bytes::Bytes;
use http::{HeaderMap, Method, Uri};

use super::{
    QueryParams, RequestHead,
    body::{
        BodySizeLimit, RawIncomingBody, buffer,
        errors::{BodyAlreadyConsumed, ExtractBufferedBodyError},
    },
};

/// An incoming HTTP request, as seen by a wrapped endpoint handler.
///
/// The body is read lazily: it is buffered in memory the first time
/// [`Request::body`] is awaited and the bytes are kept around for later calls.
/// A body wrapper can therefore consume it before your handler runs, and your
/// handler can still look at it afterwards.
#[derive(Debug)]
pub struct Request {
    head: RequestHead,
    body: BodyState,
    body_size_limit: BodySizeLimit,
}

#[derive(Debug)]
enum BodyState {
    Streaming(RawIncomingBody),
    Buffered(Bytes),
    /// A buffering attempt failed after taking the stream.
    Consumed,
}

impl Request {
    /// Assemble a request from its head and its (not yet buffered) body.
    ///
    /// The [default body size limit](BodySizeLimit::default) applies until
    /// [`Request::set_body_size_limit`] is called.
    pub fn new(head: RequestHead, body: impl Into<RawIncomingBody>) -> Self {
        Self {
            head,
            body: BodyState::Streaming(body.into()),
            body_size_limit: BodySizeLimit::default(),
        }
    }

    pub fn head(&self) -> &RequestHead {
        &self.head
    }

    pub fn method(&self) -> &Method {
        &self.head.method
    }

    pub fn target(&self) -> &Uri {
        &self.head.target
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.head.headers
    }

    /// The query parameters of the request, as raw percent-decoded strings.
    ///
    /// An absent query string yields an empty set of parameters.
    pub fn query_params(&self) -> QueryParams<'_> {
        QueryParams::parse(self.head.query().unwrap_or_default())
    }

    pub fn body_size_limit(&self) -> BodySizeLimit {
        self.body_size_limit
    }

    /// Change the limit enforced when the body gets buffered.
    ///
    /// It has no effect if the body has already been buffered.
    pub fn set_body_size_limit(&mut self, body_size_limit: BodySizeLimit) {
        self.body_size_limit = body_size_limit;
    }

    /// Buffer the entire body in memory and return it.
    ///
    /// The first call reads the stream, enforcing the body size limit;
    /// subsequent calls return the cached bytes.
    /// If the first read fails, every later call fails with
    /// [`BodyAlreadyConsumed`].
    pub async fn body(&mut self) -> Result<&Bytes, ExtractBufferedBodyError> {
        let state = std::mem::replace(&mut self.body, BodyState::Consumed);
        self.body = match state {
            BodyState::Streaming(raw) => {
                BodyState::Buffered(buffer(&self.head, raw, self.body_size_limit).await?)
            }
            other => other,
        };
        match &self.body {
            BodyState::Buffered(bytes) => Ok(bytes),
            _ => Err(BodyAlreadyConsumed.into()),
        }
    }
}

impl<B> From<http::Request<B>> for Request
where
    B: Into<RawIncomingBody>,
{
    fn from(request: http::Request<B>) -> Self {
        let (parts, body) = request.into_parts();
        Self::new(parts.into(), body)
    }
}

#[cfg(test)]
mod tests {
    use ubyte::ToByteUnit;

    use super::Request;
    use crate::request::body::{BodySizeLimit, errors::ExtractBufferedBodyError};

    #[tokio::test]
    async fn body_is_cached_after_the_first_read() {
        let mut request: Request = http::Request::post("/")
            .body(r#"{"x": 1}"#)
            .unwrap()
            .into();
        let first = request.body().await.unwrap().clone();
        let second = request.body().await.unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(&first[..], br#"{"x": 1}"#);
    }

    #[tokio::test]
    async fn a_failed_read_consumes_the_body() {
        let mut request: Request = http::Request::post("/")
            .body(vec![0u8; 64])
            .unwrap()
            .into();
        request.set_body_size_limit(BodySizeLimit::Enabled {
            max_size: 16.bytes(),
        });

        let err = request.body().await.unwrap_err();
        assert!(matches!(err, ExtractBufferedBodyError::SizeLimitExceeded(_)));
        let err = request.body().await.unwrap_err();
        assert!(matches!(err, ExtractBufferedBodyError::BodyAlreadyConsumed(_)));
    }

    #[test]
    fn missing_query_string_yields_no_params() {
        let request: Request = http::Request::get("/items").body(()).unwrap().into();
        assert!(request.query_params().is_empty());

        let request: Request = http::Request::get("/items?page=2")
            .body(())
            .unwrap()
            .into();
        assert_eq!(request.query_params().get("page"), Some("2"));
    }
}
