//! Serve a [`Wrapped`] endpoint with `hyper`.
//!
//! ```rust,no_run
//! use hyper_util::{rt::{TokioExecutor, TokioIo}, server::conn::auto::Builder};
//! use struct_bind::{converter::SerdeConverter, query_wrap, request::Request, service::EndpointService};
//!
//! #[derive(serde::Deserialize)]
//! struct Greet { name: String }
//!
//! async fn greet(_request: Request, greet: Greet) -> String {
//!     format!("Hello, {}!", greet.name)
//! }
//!
//! # async fn run() -> anyhow::Result<()> {
//! let service = EndpointService::new(query_wrap(SerdeConverter::default()).wrap(greet));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! loop {
//!     let (stream, _) = listener.accept().await?;
//!     let service = service.clone();
//!     tokio::spawn(async move {
//!         let _ = Builder::new(TokioExecutor::new())
//!             .serve_connection(TokioIo::new(stream), service)
//!             .await;
//!     });
//! }
//! # }
//! ```
use std::convert::Infallible;

use futures_util::future::{BoxFuture, FutureExt};
use tracing_log_error::log_error;

use crate::{
    Wrapped,
    converter::Converter,
    request::{
        Request,
        body::{BodySizeLimit, RawIncomingBody},
    },
    response::{IntoResponse, Response},
    source::Source,
    wrap::{EndpointArgs, UserEndpoint},
};

/// A [`hyper::service::Service`] that invokes a [`Wrapped`] endpoint for every request.
///
/// Binding failures are logged at `WARN` level and turned into a response using
/// [`BindError::into_response`](crate::BindError::into_response).
/// The handler output is converted with [`IntoResponse`].
pub struct EndpointService<H, Args, C, S> {
    endpoint: Wrapped<H, Args, C, S>,
    body_size_limit: BodySizeLimit,
}

impl<H, Args, C, S> Clone for EndpointService<H, Args, C, S> {
    fn clone(&self) -> Self {
        Self {
            endpoint: self.endpoint.clone(),
            body_size_limit: self.body_size_limit,
        }
    }
}

impl<H, Args, C, S> EndpointService<H, Args, C, S> {
    /// Serve `endpoint`, using the default [`BodySizeLimit`].
    pub fn new(endpoint: Wrapped<H, Args, C, S>) -> Self {
        Self {
            endpoint,
            body_size_limit: BodySizeLimit::default(),
        }
    }

    /// Set the [`BodySizeLimit`] applied to every incoming request.
    pub fn body_size_limit(mut self, limit: BodySizeLimit) -> Self {
        self.body_size_limit = limit;
        self
    }
}

impl<B, H, Args, C, S> hyper::service::Service<http::Request<B>> for EndpointService<H, Args, C, S>
where
    B: Into<RawIncomingBody>,
    H: UserEndpoint<Args>,
    H::Output: IntoResponse,
    Args: EndpointArgs,
    C: Converter,
    S: Source,
{
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn call(&self, request: http::Request<B>) -> Self::Future {
        let mut request = Request::from(request);
        request.set_body_size_limit(self.body_size_limit);
        let handling = self.endpoint.handle(request);
        async move {
            let response = match handling.await {
                Ok(output) => output.into_response(),
                Err(e) => {
                    log_error!(e, level: tracing::Level::WARN, "Failed to bind request data");
                    e.into_response()
                }
            };
            Ok(response)
        }
        .boxed()
    }
}
