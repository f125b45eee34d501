use bytes::{Buf, Bytes, BytesMut};
use http_body::{Body, Frame};
use http_body_util::Full;
use pin_project_lite::pin_project;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// A response body from either the file server or the fallback service.
    #[project = StaticBodyProj]
    #[allow(missing_docs)]
    pub enum StaticBody<B> {
        /// A negotiated static file body.
        File {
            #[pin]
            inner: Full<Bytes>,
        },
        /// The fallback service's body, passed through.
        Fallback {
            #[pin]
            inner: B,
        },
    }
}

impl<B> StaticBody<B> {
    /// Wraps a negotiated file body.
    pub fn file(inner: Full<Bytes>) -> Self {
        Self::File { inner }
    }

    /// Wraps a fallback body.
    pub fn fallback(inner: B) -> Self {
        Self::Fallback { inner }
    }
}

impl<B> Body for StaticBody<B>
where
    B: Body,
    B::Data: Buf,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    type Data = Bytes;
    type Error = io::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        match self.project() {
            StaticBodyProj::File { inner } => match inner.poll_frame(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Ready(Some(Ok(frame))) => Poll::Ready(Some(Ok(frame))),
                Poll::Ready(Some(Err(never))) => match never {},
            },
            StaticBodyProj::Fallback { inner } => {
                // Pass through frames, converting data to Bytes
                match inner.poll_frame(cx) {
                    Poll::Pending => Poll::Pending,
                    Poll::Ready(None) => Poll::Ready(None),
                    Poll::Ready(Some(Ok(frame))) => {
                        let frame = frame.map_data(|data| {
                            let mut bytes = BytesMut::with_capacity(data.remaining());
                            let mut chunk = data;
                            while chunk.has_remaining() {
                                let slice = chunk.chunk();
                                bytes.extend_from_slice(slice);
                                chunk.advance(slice.len());
                            }
                            bytes.freeze()
                        });
                        Poll::Ready(Some(Ok(frame)))
                    }
                    Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(io::Error::other(e.into())))),
                }
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        match self {
            StaticBody::File { inner } => inner.is_end_stream(),
            StaticBody::Fallback { inner } => inner.is_end_stream(),
        }
    }

    fn size_hint(&self) -> http_body::SizeHint {
        match self {
            StaticBody::File { inner } => inner.size_hint(),
            StaticBody::Fallback { inner } => inner.size_hint(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderMap;
    use std::collections::VecDeque;

    /// A test body that yields predefined frames.
    struct TestBody {
        frames: VecDeque<Frame<&'static [u8]>>,
    }

    impl TestBody {
        fn new(frames: Vec<Frame<&'static [u8]>>) -> Self {
            Self {
                frames: frames.into(),
            }
        }
    }

    impl Body for TestBody {
        type Data = &'static [u8];
        type Error = std::convert::Infallible;

        fn poll_frame(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
            match self.frames.pop_front() {
                Some(frame) => Poll::Ready(Some(Ok(frame))),
                None => Poll::Ready(None),
            }
        }
    }

    fn poll_body<B: Body + Unpin>(body: &mut B) -> Option<Result<Frame<B::Data>, B::Error>> {
        let waker = std::task::Waker::noop();
        let mut cx = Context::from_waker(waker);
        match Pin::new(body).poll_frame(&mut cx) {
            Poll::Ready(result) => result,
            Poll::Pending => None,
        }
    }

    #[test]
    fn test_file_body() {
        let mut body: StaticBody<TestBody> = StaticBody::file(Full::new(Bytes::from("hello")));
        assert_eq!(body.size_hint().exact(), Some(5));

        let frame = poll_body(&mut body).unwrap().unwrap();
        assert_eq!(frame.into_data().unwrap(), Bytes::from("hello"));

        assert!(poll_body(&mut body).is_none());
        assert!(body.is_end_stream());
    }

    #[test]
    fn test_fallback_data() {
        let inner = TestBody::new(vec![Frame::data(&b"hello world"[..])]);
        let mut body = StaticBody::fallback(inner);

        let frame = poll_body(&mut body).unwrap().unwrap();
        assert!(frame.is_data());
        assert_eq!(frame.into_data().unwrap(), Bytes::from("hello world"));

        assert!(poll_body(&mut body).is_none());
    }

    #[test]
    fn test_fallback_trailers() {
        let mut trailers = HeaderMap::new();
        trailers.insert("x-checksum", "abc123".parse().unwrap());

        let inner = TestBody::new(vec![
            Frame::data(&b"data"[..]),
            Frame::trailers(trailers.clone()),
        ]);
        let mut body = StaticBody::fallback(inner);

        // First frame is data
        let frame = poll_body(&mut body).unwrap().unwrap();
        assert!(frame.is_data());

        // Second frame is trailers
        let frame = poll_body(&mut body).unwrap().unwrap();
        assert!(frame.is_trailers());
        let received_trailers = frame.into_trailers().unwrap();
        assert_eq!(received_trailers.get("x-checksum").unwrap(), "abc123");

        assert!(poll_body(&mut body).is_none());
    }

    /// A body whose first poll fails.
    struct BrokenBody;

    impl Body for BrokenBody {
        type Data = Bytes;
        type Error = &'static str;

        fn poll_frame(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
        ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
            Poll::Ready(Some(Err("upstream reset")))
        }
    }

    #[test]
    fn test_fallback_error_becomes_io_error() {
        let mut body = StaticBody::fallback(BrokenBody);

        let err = poll_body(&mut body).unwrap().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
        assert_eq!(err.to_string(), "upstream reset");
    }
}
