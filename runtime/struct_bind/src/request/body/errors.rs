//! What can go wrong when a request body is buffered or parsed as JSON.
use ubyte::ByteUnit;

use crate::response::Response;

/// The body of the request couldn't be turned into an unstructured value.
///
/// Either the bytes couldn't be read ([`ExtractBufferedBodyError`]) or they
/// weren't the JSON document we expected ([`ExtractJsonBodyError`]).
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ExtractBodyError {
    #[error(transparent)]
    /// See [`ExtractBufferedBodyError`] for details.
    BufferedBody(#[from] ExtractBufferedBodyError),
    #[error(transparent)]
    /// See [`ExtractJsonBodyError`] for details.
    Json(#[from] ExtractJsonBodyError),
}

impl ExtractBodyError {
    /// The response returned to the caller when the body can't be bound.
    pub fn into_response(&self) -> Response {
        match self {
            ExtractBodyError::BufferedBody(e) => e.into_response(),
            ExtractBodyError::Json(e) => e.into_response(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Returned by [`JsonBody::extract`].
///
/// [`JsonBody::extract`]: crate::request::body::JsonBody::extract
pub enum ExtractJsonBodyError {
    #[error(transparent)]
    /// See [`MissingJsonContentType`] for details.
    MissingContentType(#[from] MissingJsonContentType),
    #[error(transparent)]
    /// See [`JsonContentTypeMismatch`] for details.
    ContentTypeMismatch(#[from] JsonContentTypeMismatch),
    #[error(transparent)]
    /// See [`JsonDeserializationError`] for details.
    DeserializationError(#[from] JsonDeserializationError),
}

impl ExtractJsonBodyError {
    /// `415 Unsupported Media Type` for `Content-Type` problems, `400 Bad Request` otherwise.
    pub fn into_response(&self) -> Response {
        let status = match self {
            ExtractJsonBodyError::MissingContentType(_)
            | ExtractJsonBodyError::ContentTypeMismatch(_) => {
                http::StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            ExtractJsonBodyError::DeserializationError(_) => http::StatusCode::BAD_REQUEST,
        };
        crate::response::plain_text(status, self.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
/// Returned by [`Request::body`].
///
/// [`Request::body`]: crate::request::Request::body
pub enum ExtractBufferedBodyError {
    #[error(transparent)]
    /// See [`SizeLimitExceeded`] for details.
    SizeLimitExceeded(#[from] SizeLimitExceeded),
    #[error(transparent)]
    /// See [`UnexpectedBufferError`] for details.
    UnexpectedBufferError(#[from] UnexpectedBufferError),
    #[error(transparent)]
    /// See [`BodyAlreadyConsumed`] for details.
    BodyAlreadyConsumed(#[from] BodyAlreadyConsumed),
}

impl ExtractBufferedBodyError {
    /// `413 Payload Too Large` if the body is over the limit,
    /// `500 Internal Server Error` if the stream itself failed.
    pub fn into_response(&self) -> Response {
        let status = match self {
            ExtractBufferedBodyError::SizeLimitExceeded(_) => http::StatusCode::PAYLOAD_TOO_LARGE,
            ExtractBufferedBodyError::UnexpectedBufferError(_)
            | ExtractBufferedBodyError::BodyAlreadyConsumed(_) => {
                http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        crate::response::plain_text(status, self.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("The request body exceeds the size limit configured for this endpoint.")]
#[non_exhaustive]
/// The body is bigger than the configured [`BodySizeLimit`](super::BodySizeLimit).
pub struct SizeLimitExceeded {
    /// The limit that was breached.
    pub max_size: ByteUnit,
    /// The declared `Content-Length`, if the header was present and parseable.
    ///
    /// A value below `max_size` means the client under-reported the body size.
    pub content_length: Option<usize>,
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to read the request body.")]
#[non_exhaustive]
/// The body stream returned an error (e.g. the connection dropped mid-body).
pub struct UnexpectedBufferError {
    #[source]
    pub(super) source: Box<dyn std::error::Error + Send + Sync>,
}

#[derive(Debug, thiserror::Error)]
#[error("The request body is no longer available: an earlier read failed.")]
#[non_exhaustive]
/// A previous call to [`Request::body`](crate::request::Request::body) failed
/// midway, so the stream is gone.
pub struct BodyAlreadyConsumed;

#[derive(Debug, thiserror::Error)]
#[error(
    "Missing `Content-Type` header. Expected `application/json` or another `application/*+json` type."
)]
#[non_exhaustive]
/// A JSON `Content-Type` was required and the request had none.
pub struct MissingJsonContentType;

#[derive(Debug, thiserror::Error)]
#[error("Failed to deserialize the body as a JSON document.\n{}{source}", path_prefix(.path))]
#[non_exhaustive]
/// The request body is not a valid JSON document, or it doesn't match the expected shape.
pub struct JsonDeserializationError {
    /// Where in the document the failure happened, as a `.`-separated path.
    ///
    /// It's `None` for failures that aren't tied to a specific location
    /// (e.g. syntax errors at the top level).
    pub path: Option<String>,
    #[source]
    source: serde_json::Error,
}

impl JsonDeserializationError {
    pub(super) fn new(source: serde_json::Error) -> Self {
        Self { path: None, source }
    }

    pub(super) fn from_path_error(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = e.path().to_string();
        Self {
            // An empty path renders as `.`.
            path: (path != ".").then_some(path),
            source: e.into_inner(),
        }
    }
}

fn path_prefix(path: &Option<String>) -> String {
    match path {
        Some(path) => format!("{path}: "),
        None => String::new(),
    }
}

#[derive(Debug, thiserror::Error)]
#[error(
    "Unexpected `Content-Type`: `{actual}`. Expected `application/json` or another `application/*+json` type."
)]
#[non_exhaustive]
/// A JSON `Content-Type` was required and the request carried something else.
pub struct JsonContentTypeMismatch {
    /// The `Content-Type` the request was sent with.
    pub actual: String,
}
