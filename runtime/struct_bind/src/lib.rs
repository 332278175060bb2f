//! # struct_bind
//!
//! Bind the query parameters or the JSON body of an incoming request to a
//! typed argument of your endpoint handler.
//!
//! The crate is a thin adapter layer: it pulls an unstructured value out of a
//! [`Request`](request::Request) and hands it over to a pluggable
//! [`Converter`](converter::Converter) to turn it into the type your handler
//! asks for. Deserialization itself is delegated to `serde`.
//!
//! ```rust
//! use struct_bind::{query_wrap, converter::SerdeConverter, request::Request};
//!
//! #[derive(serde::Deserialize)]
//! pub struct Page {
//!     number: u32,
//! }
//!
//! pub async fn list(_request: Request, page: Page) -> String {
//!     format!("Page {}", page.number)
//! }
//!
//! let endpoint = query_wrap(SerdeConverter::default()).wrap(list);
//! # let _ = endpoint;
//! ```
//!
//! A handler takes the request as its first parameter and, optionally, a
//! single custom parameter. Handlers without a custom parameter are invoked
//! with the request alone and never touch the request data.
//!
//! Asking for more than one custom parameter is rejected at compile time:
//!
//! ```rust,compile_fail
//! use struct_bind::{query_wrap, converter::SerdeConverter, request::Request};
//!
//! pub async fn two(_request: Request, a: u32, b: u32) -> String {
//!     format!("{a} {b}")
//! }
//!
//! let endpoint = query_wrap(SerdeConverter::default()).wrap(two);
//! ```
pub use error::{BindError, EmptyInput, SourceError};
pub use wrap::{Wrapped, Wrapper, body_wrap, body_wrap_with, parse_wrap, query_wrap};

pub mod config;
pub mod converter;
mod error;
pub mod request;
pub mod response;
pub mod service;
pub mod source;
pub mod wrap;
