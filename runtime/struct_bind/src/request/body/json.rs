use serde::Deserialize;

use super::errors::{
    ExtractJsonBodyError, JsonContentTypeMismatch, JsonDeserializationError,
    MissingJsonContentType,
};
use crate::request::RequestHead;

#[derive(Debug)]
/// Parse the (already buffered) body of an incoming request as JSON.
///
/// [`JsonBodySource`](crate::source::JsonBodySource) uses it with `T = serde_json::Value`
/// to hand a generic document over to the converter, but any `T: Deserialize` works.
pub struct JsonBody<T>(pub T);

impl<T> JsonBody<T> {
    /// Parse `body` as a JSON document.
    ///
    /// If `require_content_type` is set, the `Content-Type` header must be set
    /// to `application/json` or another `application/*+json` MIME type.
    // Two lifetimes: the output never borrows from the head.
    pub fn extract<'head, 'body>(
        request_head: &'head RequestHead,
        body: &'body [u8],
        require_content_type: bool,
    ) -> Result<Self, ExtractJsonBodyError>
    where
        T: Deserialize<'body>,
    {
        if require_content_type {
            check_json_content_type(request_head)?;
        }
        let mut deserializer = serde_json::Deserializer::from_slice(body);
        let value = serde_path_to_error::deserialize(&mut deserializer)
            .map_err(JsonDeserializationError::from_path_error)?;
        // Trailing characters after the document are an error, not something to ignore.
        deserializer.end().map_err(JsonDeserializationError::new)?;
        Ok(JsonBody(value))
    }
}

/// Check that the `Content-Type` header is set to `application/json`, or another
/// `application/*+json` MIME type.
pub(crate) fn check_json_content_type(
    request_head: &RequestHead,
) -> Result<(), ExtractJsonBodyError> {
    let Some(content_type) = request_head.content_type() else {
        return Err(MissingJsonContentType.into());
    };

    let mismatch = || JsonContentTypeMismatch {
        actual: content_type.to_string(),
    };
    let Ok(mime) = content_type.parse::<mime::Mime>() else {
        return Err(mismatch().into());
    };

    let is_json_content_type = mime.type_() == "application"
        && (mime.subtype() == "json" || mime.suffix().is_some_and(|name| name == "json"));
    if !is_json_content_type {
        return Err(mismatch().into());
    }
    Ok(())
}
