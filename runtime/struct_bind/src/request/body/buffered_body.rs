use bytes::Bytes;
use http::header::CONTENT_LENGTH;
use http_body_util::{BodyExt, Limited};
use ubyte::ByteUnit;

use super::{
    BodySizeLimit,
    errors::{ExtractBufferedBodyError, SizeLimitExceeded, UnexpectedBufferError},
};
use crate::request::RequestHead;

/// Drain `body` into a single contiguous buffer, honouring `body_size_limit`.
pub(crate) async fn buffer<B>(
    request_head: &RequestHead,
    body: B,
    body_size_limit: BodySizeLimit,
) -> Result<Bytes, ExtractBufferedBodyError>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match body_size_limit {
        BodySizeLimit::Enabled { max_size } => buffer_with_limit(request_head, body, max_size).await,
        BodySizeLimit::Disabled => match body.collect().await {
            Ok(collected) => Ok(collected.to_bytes()),
            Err(e) => Err(UnexpectedBufferError { source: e.into() }.into()),
        },
    }
}

async fn buffer_with_limit<B>(
    request_head: &RequestHead,
    body: B,
    max_size: ByteUnit,
) -> Result<Bytes, ExtractBufferedBodyError>
where
    B: hyper::body::Body,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let content_length = request_head
        .headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok()?.parse::<usize>().ok());

    let limit_error = || SizeLimitExceeded {
        max_size,
        content_length,
    };

    // A declared length above the limit lets us bail out without touching the stream.
    if let Some(len) = content_length {
        if len > max_size {
            return Err(limit_error().into());
        }
    }

    // Saturate on platforms where `usize` is narrower than `u64`.
    let max_n_bytes = max_size.as_u64().try_into().unwrap_or(usize::MAX);
    match Limited::new(body, max_n_bytes).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) => {
            if e.downcast_ref::<http_body_util::LengthLimitError>().is_some() {
                Err(limit_error().into())
            } else {
                Err(UnexpectedBufferError { source: e }.into())
            }
        }
    }
}
