//! The response side of a wrapped endpoint: just enough to report binding failures
//! and to plug wrapped endpoints into a `hyper` server.
use bytes::Bytes;
use http::{HeaderValue, StatusCode, header::CONTENT_TYPE};
use http_body_util::Full;

/// The response type produced by [`IntoResponse`] and by the `into_response`
/// method of every error in this crate.
pub type Response = http::Response<Full<Bytes>>;

/// Convert a type into a [`Response`].
///
/// Handlers wrapped by [`parse_wrap`](crate::parse_wrap) can return anything;
/// their output must implement `IntoResponse` only when they are served through
/// [`EndpointService`](crate::service::EndpointService).
//
// We implement `IntoResponse` for a narrow range of types: no tuples, no `()`,
// nothing for which we'd have to infer a status code.
pub trait IntoResponse {
    /// Convert `self` into an HTTP response.
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response {
        self
    }
}

impl IntoResponse for StatusCode {
    fn into_response(self) -> Response {
        let mut response = Response::new(Full::default());
        *response.status_mut() = self;
        response
    }
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        plain_text(StatusCode::OK, self)
    }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response {
        plain_text(StatusCode::OK, self)
    }
}

/// A `text/plain; charset=utf-8` response with the given status.
pub(crate) fn plain_text(status: StatusCode, body: impl Into<Bytes>) -> Response {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response
}
