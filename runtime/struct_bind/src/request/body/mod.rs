//! Extract data from the body of incoming requests.
//!
//! The body is handled in layers:
//!
//! 1. [`RawIncomingBody`] is the stream of bytes received by the server.
//! 2. [`Request::body`](crate::request::Request::body) buffers it in memory,
//!    enforcing a [`BodySizeLimit`].
//! 3. [`JsonBody`] parses the buffered bytes as a JSON document.
pub use json::JsonBody;
pub use limit::BodySizeLimit;
pub use raw_body::RawIncomingBody;

pub(crate) use buffered_body::buffer;
pub(crate) use json::check_json_content_type;

mod buffered_body;
pub mod errors;
mod json;
mod limit;
mod raw_body;
