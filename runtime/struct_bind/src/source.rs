//! Pull an unstructured value out of an incoming request.
//!
//! A [`Source`] is the first half of a binding: it decides *where* the data comes from
//! (the query string, the body, a header, ...) and turns it into a [`serde_json::Value`].
//! The [`Converter`](crate::converter::Converter) then structures that value into
//! the handler's type.
//!
//! [`QuerySource`] and [`JsonBodySource`] cover the common cases. Use [`from_fn`] and
//! [`from_async_fn`] to build a source out of a closure.
use futures_util::future::{BoxFuture, FutureExt};
use serde_json::Value;

use crate::{
    BindError,
    request::{
        Request,
        body::{
            JsonBody, check_json_content_type,
            errors::ExtractBodyError,
        },
    },
};

/// Extract an unstructured value from a request.
///
/// Sources receive the request mutably so that they can buffer its body.
/// Whatever they buffer stays available to the handler.
pub trait Source: Send + Sync + 'static {
    fn extract<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Value, BindError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Use the query parameters of the request.
///
/// Keys that appear once map to a string, repeated keys map to an array of strings.
/// See [`QueryParams::group_repeated_keys`](crate::request::QueryParams::group_repeated_keys).
pub struct QuerySource;

impl Source for QuerySource {
    fn extract<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Value, BindError>> {
        let grouped = request.query_params().group_repeated_keys();
        futures_util::future::ready(Ok(Value::Object(grouped))).boxed()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
/// Knobs for [`JsonBodySource`].
pub struct JsonBodyConfig {
    /// Reject requests whose `Content-Type` isn't `application/json` or
    /// another `application/*+json` MIME type.
    ///
    /// Off by default: the body is parsed as JSON whatever the header says.
    pub require_content_type: bool,
}

#[derive(Debug, Clone, Copy, Default)]
/// Use the body of the request, parsed as a JSON document.
///
/// The body is buffered in memory first, subject to the request's
/// [`BodySizeLimit`](crate::request::body::BodySizeLimit).
pub struct JsonBodySource {
    config: JsonBodyConfig,
}

impl JsonBodySource {
    pub fn new(config: JsonBodyConfig) -> Self {
        Self { config }
    }
}

impl Source for JsonBodySource {
    fn extract<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Value, BindError>> {
        async move {
            if self.config.require_content_type {
                check_json_content_type(request.head()).map_err(ExtractBodyError::from)?;
            }
            get_body(request).await
        }
        .boxed()
    }
}

/// Buffer the body of `request` and parse it as a JSON document.
///
/// No `Content-Type` check is performed.
pub async fn get_body(request: &mut Request) -> Result<Value, BindError> {
    let bytes = request.body().await.map_err(ExtractBodyError::from)?.clone();
    let JsonBody(value) =
        JsonBody::extract(request.head(), &bytes, false).map_err(ExtractBodyError::from)?;
    Ok(value)
}

/// Build a [`Source`] from a synchronous closure.
///
/// ```rust
/// use struct_bind::source::from_fn;
///
/// // Bind the request headers rather than the query string.
/// let headers = from_fn(|request| {
///     let mut map = serde_json::Map::new();
///     for (name, value) in request.headers() {
///         if let Ok(value) = value.to_str() {
///             map.insert(name.as_str().to_owned(), value.into());
///         }
///     }
///     Ok(serde_json::Value::Object(map))
/// });
/// # let _ = headers;
/// ```
pub fn from_fn<F>(f: F) -> FnSource<F>
where
    F: Fn(&Request) -> Result<Value, BindError> + Send + Sync + 'static,
{
    FnSource { f }
}

/// Build a [`Source`] from an asynchronous closure.
///
/// The closure must box its future, since it borrows the request:
///
/// ```rust
/// use futures_util::FutureExt;
/// use struct_bind::source::{from_async_fn, get_body};
///
/// let body = from_async_fn(|request| get_body(request).boxed());
/// # let _ = body;
/// ```
pub fn from_async_fn<F>(f: F) -> AsyncFnSource<F>
where
    F: for<'a> Fn(&'a mut Request) -> BoxFuture<'a, Result<Value, BindError>>
        + Send
        + Sync
        + 'static,
{
    AsyncFnSource { f }
}

#[derive(Clone)]
/// A [`Source`] backed by a synchronous closure. See [`from_fn`].
pub struct FnSource<F> {
    f: F,
}

impl<F> Source for FnSource<F>
where
    F: Fn(&Request) -> Result<Value, BindError> + Send + Sync + 'static,
{
    fn extract<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Value, BindError>> {
        futures_util::future::ready((self.f)(request)).boxed()
    }
}

#[derive(Clone)]
/// A [`Source`] backed by an asynchronous closure. See [`from_async_fn`].
pub struct AsyncFnSource<F> {
    f: F,
}

impl<F> Source for AsyncFnSource<F>
where
    F: for<'a> Fn(&'a mut Request) -> BoxFuture<'a, Result<Value, BindError>>
        + Send
        + Sync
        + 'static,
{
    fn extract<'a>(&'a self, request: &'a mut Request) -> BoxFuture<'a, Result<Value, BindError>> {
        (self.f)(request)
    }
}

#[cfg(test)]
mod tests {
    use futures_util::FutureExt;
    use serde_json::json;

    use super::{JsonBodyConfig, JsonBodySource, QuerySource, Source, from_async_fn, from_fn};
    use crate::{BindError, request::Request};

    fn post(body: &'static str, content_type: Option<&str>) -> Request {
        let mut builder = http::Request::post("/homes");
        if let Some(content_type) = content_type {
            builder = builder.header(http::header::CONTENT_TYPE, content_type);
        }
        builder.body(body).unwrap().into()
    }

    #[tokio::test]
    async fn query_source_groups_repeated_keys() {
        let mut request: Request = http::Request::get("/?a=1&b=2&b=3")
            .body(())
            .unwrap()
            .into();
        let value = QuerySource.extract(&mut request).await.unwrap();
        assert_eq!(value, json!({"a": "1", "b": ["2", "3"]}));
    }

    #[tokio::test]
    async fn body_source_parses_json_and_leaves_body_readable() {
        let mut request = post(r#"{"price": 10}"#, None);
        let value = JsonBodySource::default()
            .extract(&mut request)
            .await
            .unwrap();
        assert_eq!(value, json!({"price": 10}));
        assert_eq!(&request.body().await.unwrap()[..], br#"{"price": 10}"#);
    }

    #[tokio::test]
    async fn body_source_can_require_a_json_content_type() {
        let source = JsonBodySource::new(JsonBodyConfig {
            require_content_type: true,
        });

        let mut request = post(r#"{"price": 10}"#, Some("text/plain"));
        let err = source.extract(&mut request).await.unwrap_err();
        assert_eq!(
            err.into_response().status(),
            http::StatusCode::UNSUPPORTED_MEDIA_TYPE
        );

        let mut request = post(r#"{"price": 10}"#, Some("application/json"));
        assert!(source.extract(&mut request).await.is_ok());
    }

    #[tokio::test]
    async fn invalid_json_is_a_bad_request() {
        let mut request = post("not json", None);
        let err = JsonBodySource::default()
            .extract(&mut request)
            .await
            .unwrap_err();
        assert!(matches!(err, BindError::Body(_)));
        assert_eq!(err.into_response().status(), http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn closures_can_be_sources() {
        let sync = from_fn(|request| Ok(json!({"path": request.target().path()})));
        let asynchronous = from_async_fn(|request| {
            async move {
                let len = request.body().await.map(|b| b.len()).unwrap_or_default();
                Ok(json!({"len": len}))
            }
            .boxed()
        });

        let mut request = post("12345", None);
        assert_eq!(
            sync.extract(&mut request).await.unwrap(),
            json!({"path": "/homes"})
        );
        assert_eq!(
            asynchronous.extract(&mut request).await.unwrap(),
            json!({"len": 5})
        );
    }
}
