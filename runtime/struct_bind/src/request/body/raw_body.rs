use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use http_body::{Body, Frame, SizeHint};
use http_body_util::{BodyExt, Empty, Full, combinators::UnsyncBoxBody};
use hyper::body::Incoming;
use pin_project_lite::pin_project;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pin_project! {
    /// The raw body of the incoming HTTP request.
    ///
    /// You're looking at the stream of bytes coming from the network.
    /// Use [`Request::body`](crate::request::Request::body) to buffer it in memory
    /// with a size limit.
    pub struct RawIncomingBody {
        #[pin] inner: UnsyncBoxBody<Bytes, BoxError>,
    }
}

impl RawIncomingBody {
    /// Type-erase any body that yields [`Bytes`].
    pub fn new<B>(body: B) -> Self
    where
        B: Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        Self {
            inner: body.map_err(Into::into).boxed_unsync(),
        }
    }

    /// A body with no content.
    pub fn empty() -> Self {
        Self::new(Empty::<Bytes>::new())
    }
}

impl std::fmt::Debug for RawIncomingBody {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawIncomingBody").finish_non_exhaustive()
    }
}

impl Default for RawIncomingBody {
    fn default() -> Self {
        Self::empty()
    }
}

// We just delegate to the underlying `Body` implementation.
impl Body for RawIncomingBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        self.project().inner.poll_frame(cx)
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl From<Incoming> for RawIncomingBody {
    fn from(inner: Incoming) -> Self {
        Self::new(inner)
    }
}

impl From<Bytes> for RawIncomingBody {
    fn from(bytes: Bytes) -> Self {
        Self::new(Full::new(bytes))
    }
}

impl From<Vec<u8>> for RawIncomingBody {
    fn from(bytes: Vec<u8>) -> Self {
        Bytes::from(bytes).into()
    }
}

impl From<String> for RawIncomingBody {
    fn from(s: String) -> Self {
        Bytes::from(s).into()
    }
}

impl From<&'static str> for RawIncomingBody {
    fn from(s: &'static str) -> Self {
        Bytes::from_static(s.as_bytes()).into()
    }
}

impl From<()> for RawIncomingBody {
    fn from(_: ()) -> Self {
        Self::empty()
    }
}
