//! Errors that can happen when structuring request data.
use crate::response::Response;

#[derive(Debug, thiserror::Error)]
#[error("Failed to structure the request data.\n{inner}")]
/// Something went wrong when trying to structure the unstructured request data into
/// the target type you specified.
///
/// The error is path-aware: [`StructureError::path`] points at the field that
/// could not be structured.
pub struct StructureError {
    inner: serde_path_to_error::Error<serde_json::Error>,
}

impl StructureError {
    pub fn new(e: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self { inner: e }
    }

    /// The path to the field that failed to structure, e.g. `address.zip_code`
    /// or `tags[2]`.
    ///
    /// It's `.` if the failure is not tied to a specific field.
    pub fn path(&self) -> String {
        self.inner.path().to_string()
    }

    /// The underlying error, without location information.
    pub fn inner(&self) -> &serde_json::Error {
        self.inner.inner()
    }

    /// Convert a [`StructureError`] into an HTTP response.
    ///
    /// It returns a `400 Bad Request` to the caller.
    pub fn into_response(&self) -> Response {
        crate::response::plain_text(http::StatusCode::BAD_REQUEST, self.to_string())
    }
}
