use crate::{
    converter::StructureError, request::body::errors::ExtractBodyError, response::Response,
};

/// Something went wrong while binding request data to a handler's custom parameter.
///
/// Each variant maps to a sensible HTTP response via [`BindError::into_response`].
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum BindError {
    #[error(transparent)]
    /// The body could not be read or parsed. See [`ExtractBodyError`] for details.
    Body(#[from] ExtractBodyError),
    #[error(transparent)]
    /// See [`EmptyInput`] for details.
    EmptyInput(#[from] EmptyInput),
    #[error(transparent)]
    /// See [`StructureError`] for details.
    Structure(#[from] StructureError),
    #[error(transparent)]
    /// See [`SourceError`] for details.
    Source(#[from] SourceError),
}

impl BindError {
    /// Wrap an error raised by a custom [`Source`](crate::source::Source).
    pub fn custom<E>(e: E) -> Self
    where
        E: Into<anyhow::Error>,
    {
        Self::Source(SourceError { inner: e.into() })
    }

    /// Convert a [`BindError`] into an HTTP response.
    ///
    /// - `413 Payload Too Large` if the body exceeds the size limit;
    /// - `415 Unsupported Media Type` if a JSON `Content-Type` was required but missing;
    /// - `500 Internal Server Error` if the body stream failed;
    /// - `400 Bad Request` otherwise.
    pub fn into_response(&self) -> Response {
        match self {
            BindError::Body(e) => e.into_response(),
            BindError::Structure(e) => e.into_response(),
            BindError::EmptyInput(_) | BindError::Source(_) => {
                crate::response::plain_text(http::StatusCode::BAD_REQUEST, self.to_string())
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Failed to extract any data from the request.")]
#[non_exhaustive]
/// The source produced nothing to structure: `null`, `false`, `0`, an empty string,
/// an empty object or an empty array.
///
/// This happens, for example, when a handler expects query parameters and the
/// request has no query string.
pub struct EmptyInput;

#[derive(Debug, thiserror::Error)]
#[error("Failed to extract data from the request.\n{inner}")]
/// A custom [`Source`](crate::source::Source) failed.
pub struct SourceError {
    inner: anyhow::Error,
}

impl SourceError {
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }
}
