//! Request body handed to authenticated handlers.
//!
//! When the body digest is checked the service has to read the whole body
//! first, so the handler receives it buffered. In skip-body mode the service
//! never touches the body and the handler receives the original stream.

use std::fmt;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Buf, Bytes};
use http_body::{Body, Frame, SizeHint};
use http_body_util::BodyExt;
use http_body_util::combinators::UnsyncBoxBody;

/// Error type of a streamed request body.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Body of a request that passed authentication.
pub struct RequestBody {
    inner: Inner,
}

enum Inner {
    Buffered(Option<Bytes>),
    Streaming(UnsyncBoxBody<Bytes, BoxError>),
}

impl RequestBody {
    /// Wrap a body that was already read and checked.
    #[must_use]
    pub fn buffered(data: impl Into<Bytes>) -> Self {
        Self {
            inner: Inner::Buffered(Some(data.into())),
        }
    }

    /// Wrap an unread body stream.
    #[must_use]
    pub fn streaming<B>(body: B) -> Self
    where
        B: Body + Send + 'static,
        B::Data: Send,
        B::Error: Into<BoxError>,
    {
        let body = body
            .map_frame(|frame| frame.map_data(|mut data| data.copy_to_bytes(data.remaining())))
            .map_err(Into::into)
            .boxed_unsync();
        Self {
            inner: Inner::Streaming(body),
        }
    }

    /// The buffered bytes, or `None` for a stream.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.inner {
            Inner::Buffered(data) => data.as_ref(),
            Inner::Streaming(_) => None,
        }
    }

    /// Whether the body was read before reaching the handler.
    #[must_use]
    pub fn is_buffered(&self) -> bool {
        matches!(self.inner, Inner::Buffered(_))
    }

    /// Read the rest of the body into one buffer.
    pub async fn into_bytes(self) -> Result<Bytes, BoxError> {
        match self.inner {
            Inner::Buffered(data) => Ok(data.unwrap_or_default()),
            Inner::Streaming(body) => Ok(body.collect().await?.to_bytes()),
        }
    }
}

impl Body for RequestBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match &mut self.get_mut().inner {
            Inner::Buffered(data) => {
                Poll::Ready(data.take().filter(|d| !d.is_empty()).map(|d| Ok(Frame::data(d))))
            }
            Inner::Streaming(body) => Pin::new(body).poll_frame(cx),
        }
    }

    fn is_end_stream(&self) -> bool {
        match &self.inner {
            Inner::Buffered(data) => data.as_ref().is_none_or(Bytes::is_empty),
            Inner::Streaming(body) => body.is_end_stream(),
        }
    }

    fn size_hint(&self) -> SizeHint {
        match &self.inner {
            Inner::Buffered(data) => {
                SizeHint::with_exact(data.as_ref().map_or(0, |d| d.len() as u64))
            }
            Inner::Streaming(body) => body.size_hint(),
        }
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner {
            Inner::Buffered(data) => f
                .debug_tuple("Buffered")
                .field(&data.as_ref().map_or(0, Bytes::len))
                .finish(),
            Inner::Streaming(_) => f.write_str("Streaming"),
        }
    }
}
