//! Wrap endpoint handlers so that their custom parameter is bound from the request.
//!
//! [`parse_wrap`] is the general form: give it a [`Converter`] and a [`Source`] and it
//! returns a [`Wrapper`] you can apply to as many handlers as you like.
//! [`query_wrap`] and [`body_wrap`] come with the source already picked.
//!
//! # Handler shape
//!
//! A handler is an async function (or closure) whose first parameter is the
//! [`Request`]. It can take **at most one** extra parameter, the custom parameter:
//!
//! - `async fn(Request) -> R`: called with the request alone, the source is never consulted;
//! - `async fn(Request, T) -> R`: `T` is structured from the source's output before the call.
//!
//! `T` can be any type implementing [`serde::de::DeserializeOwned`].
//! Handlers with more parameters don't implement [`UserEndpoint`] and are rejected
//! at compile time.
use std::{future::Future, marker::PhantomData, sync::Arc};

use futures_util::future::{BoxFuture, FutureExt};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::Instrument;

use crate::{
    BindError, EmptyInput,
    converter::Converter,
    request::Request,
    source::{JsonBodyConfig, JsonBodySource, QuerySource, Source},
};

/// Build a [`Wrapper`] that binds a handler's custom parameter using `source`
/// to pull data out of the request and `converter` to structure it.
///
/// `source` can be synchronous or asynchronous. See [`source::from_fn`] and
/// [`source::from_async_fn`] to build one from a closure.
///
/// Prefer [`query_wrap`] and [`body_wrap`] for the common cases.
///
/// [`source::from_fn`]: crate::source::from_fn
/// [`source::from_async_fn`]: crate::source::from_async_fn
pub fn parse_wrap<C, S>(converter: C, source: S) -> Wrapper<C, S>
where
    C: Converter,
    S: Source,
{
    Wrapper {
        converter: Arc::new(converter),
        source: Arc::new(source),
    }
}

/// Bind the query parameters of the request to the handler's custom parameter.
///
/// ```rust
/// use struct_bind::{converter::SerdeConverter, query_wrap, request::Request};
///
/// #[derive(serde::Deserialize)]
/// pub struct Search {
///     q: String,
///     // `?tag=a&tag=b` and `?tag=a,b` both work.
///     #[serde(rename = "tag", default)]
///     tags: Vec<String>,
/// }
///
/// pub async fn search(_request: Request, search: Search) -> String {
///     format!("Searching for {} in {:?}", search.q, search.tags)
/// }
///
/// let endpoint = query_wrap(SerdeConverter::default()).wrap(search);
/// # let _ = endpoint;
/// ```
pub fn query_wrap<C>(converter: C) -> Wrapper<C, QuerySource>
where
    C: Converter,
{
    parse_wrap(converter, QuerySource)
}

/// Bind the JSON body of the request to the handler's custom parameter.
///
/// The body is parsed as JSON regardless of the `Content-Type` header. Use
/// [`body_wrap_with`] to require a JSON `Content-Type`.
///
/// ```rust
/// use struct_bind::{body_wrap, converter::SerdeConverter, request::Request};
///
/// #[derive(serde::Deserialize)]
/// pub struct Listing {
///     address: String,
///     price: u64,
/// }
///
/// pub async fn sell(_request: Request, listing: Listing) -> String {
///     format!("Selling {} for {}", listing.address, listing.price)
/// }
///
/// let endpoint = body_wrap(SerdeConverter::default()).wrap(sell);
/// # let _ = endpoint;
/// ```
pub fn body_wrap<C>(converter: C) -> Wrapper<C, JsonBodySource>
where
    C: Converter,
{
    body_wrap_with(converter, JsonBodyConfig::default())
}

/// Like [`body_wrap`], with explicit settings for the JSON source.
pub fn body_wrap_with<C>(converter: C, config: JsonBodyConfig) -> Wrapper<C, JsonBodySource>
where
    C: Converter,
{
    parse_wrap(converter, JsonBodySource::new(config))
}

/// Turns handlers into [`Wrapped`] endpoints. Built by [`parse_wrap`].
pub struct Wrapper<C, S> {
    converter: Arc<C>,
    source: Arc<S>,
}

impl<C, S> Clone for Wrapper<C, S> {
    fn clone(&self) -> Self {
        Self {
            converter: Arc::clone(&self.converter),
            source: Arc::clone(&self.source),
        }
    }
}

impl<C, S> Wrapper<C, S>
where
    C: Converter,
    S: Source,
{
    /// Wrap `handler`.
    ///
    /// The converter and the source are shared by every handler wrapped
    /// by the same [`Wrapper`].
    pub fn wrap<H, Args>(&self, handler: H) -> Wrapped<H, Args, C, S>
    where
        H: UserEndpoint<Args>,
        Args: EndpointArgs,
    {
        tracing::trace!(endpoint = std::any::type_name::<H>(), "Wrapping endpoint");
        Wrapped {
            inner: Arc::new(Inner {
                handler,
                converter: Arc::clone(&self.converter),
                source: Arc::clone(&self.source),
            }),
            _args: PhantomData,
        }
    }
}

/// An endpoint handler whose custom parameter (if any) is bound from the request.
///
/// Cloning is cheap: the handler, converter and source are shared.
pub struct Wrapped<H, Args, C, S> {
    inner: Arc<Inner<H, C, S>>,
    _args: PhantomData<fn() -> Args>,
}

struct Inner<H, C, S> {
    handler: H,
    converter: Arc<C>,
    source: Arc<S>,
}

impl<H, Args, C, S> Clone for Wrapped<H, Args, C, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _args: PhantomData,
        }
    }
}

impl<H, Args, C, S> std::fmt::Debug for Wrapped<H, Args, C, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wrapped")
            .field("handler", &std::any::type_name::<H>())
            .finish_non_exhaustive()
    }
}

impl<H, Args, C, S> Wrapped<H, Args, C, S>
where
    H: UserEndpoint<Args>,
    Args: EndpointArgs,
    C: Converter,
    S: Source,
{
    /// The type name of the wrapped handler, e.g. `my_app::routes::list_homes`.
    pub fn name(&self) -> &'static str {
        std::any::type_name::<H>()
    }

    /// Bind the custom parameter from `request` and invoke the handler.
    ///
    /// Binding failures are returned as a [`BindError`]; the handler is not called.
    pub fn handle(&self, mut request: Request) -> BoxFuture<'static, Result<H::Output, BindError>> {
        let inner = Arc::clone(&self.inner);
        let span = tracing::debug_span!("bind", endpoint = self.name());
        async move {
            let args = Args::bind(&mut request, &*inner.converter, &*inner.source).await?;
            Ok(inner.handler.call(request, args).await)
        }
        .instrument(span)
        .boxed()
    }
}

/// A handler that can be wrapped, see the [module documentation](self).
///
/// `Args` is `()` for handlers without a custom parameter and `(T,)` for handlers
/// with a custom parameter of type `T`.
pub trait UserEndpoint<Args>: Send + Sync + 'static {
    /// What the handler returns.
    type Output;
    type Future: Future<Output = Self::Output> + Send + 'static;

    fn call(&self, request: Request, args: Args) -> Self::Future;
}

impl<F, Fut> UserEndpoint<()> for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
{
    type Output = Fut::Output;
    type Future = Fut;

    fn call(&self, request: Request, _args: ()) -> Self::Future {
        (self)(request)
    }
}

impl<F, Fut, T> UserEndpoint<(T,)> for F
where
    F: Fn(Request, T) -> Fut + Send + Sync + 'static,
    Fut: Future + Send + 'static,
{
    type Output = Fut::Output;
    type Future = Fut;

    fn call(&self, request: Request, (custom,): (T,)) -> Self::Future {
        (self)(request, custom)
    }
}

/// The arguments a [`UserEndpoint`] takes on top of the request.
pub trait EndpointArgs: Sized + Send + 'static {
    /// Build the arguments from `request`.
    fn bind<'a, C, S>(
        request: &'a mut Request,
        converter: &'a C,
        source: &'a S,
    ) -> BoxFuture<'a, Result<Self, BindError>>
    where
        C: Converter,
        S: Source;
}

impl EndpointArgs for () {
    fn bind<'a, C, S>(
        _request: &'a mut Request,
        _converter: &'a C,
        _source: &'a S,
    ) -> BoxFuture<'a, Result<Self, BindError>>
    where
        C: Converter,
        S: Source,
    {
        futures_util::future::ready(Ok(())).boxed()
    }
}

impl<T> EndpointArgs for (T,)
where
    T: DeserializeOwned + Send + 'static,
{
    fn bind<'a, C, S>(
        request: &'a mut Request,
        converter: &'a C,
        source: &'a S,
    ) -> BoxFuture<'a, Result<Self, BindError>>
    where
        C: Converter,
        S: Source,
    {
        async move {
            let unstructured = source.extract(request).await?;
            if is_empty(&unstructured) {
                return Err(EmptyInput.into());
            }
            tracing::debug!(
                target_type = std::any::type_name::<T>(),
                "Structuring request data"
            );
            let structured = converter.structure::<T>(unstructured)?;
            Ok((structured,))
        }
        .boxed()
    }
}

/// Falsy values carry nothing to structure: `null`, `false`, `0`, `""`, `[]` and `{}`.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => true,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Array(values) => values.is_empty(),
        Value::Bool(true) => false,
    }
}
