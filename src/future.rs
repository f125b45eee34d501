use crate::body::StaticBody;
use bytes::Bytes;
use http::Response;
use http_body_util::Full;
use pin_project_lite::pin_project;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

pin_project! {
    /// Future for static file service responses.
    #[project = ResponseFutureProj]
    #[allow(missing_docs)]
    pub enum ResponseFuture<F> {
        /// A file was negotiated synchronously.
        Ready {
            response: Option<Response<Full<Bytes>>>,
        },
        /// The request went to the fallback service.
        Fallback {
            #[pin]
            future: F,
        },
    }
}

impl<F> ResponseFuture<F> {
    pub(crate) fn ready(response: Response<Full<Bytes>>) -> Self {
        Self::Ready {
            response: Some(response),
        }
    }

    pub(crate) fn fallback(future: F) -> Self {
        Self::Fallback { future }
    }
}

impl<F, B, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<B>, E>>,
{
    type Output = Result<Response<StaticBody<B>>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.project() {
            ResponseFutureProj::Ready { response } => {
                let response = response
                    .take()
                    .expect("ResponseFuture polled after completion");
                Poll::Ready(Ok(response.map(StaticBody::file)))
            }
            ResponseFutureProj::Fallback { future } => match future.poll(cx) {
                Poll::Pending => Poll::Pending,
                Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
                Poll::Ready(Ok(response)) => Poll::Ready(Ok(response.map(StaticBody::fallback))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{collect_body, now};
    use std::convert::Infallible;
    use std::future::{Ready, ready};

    #[test]
    fn test_ready_response() {
        let fut: ResponseFuture<Ready<Result<Response<Full<Bytes>>, Infallible>>> =
            ResponseFuture::ready(Response::new(Full::new(Bytes::from("file"))));

        let response = now(fut).unwrap();
        assert!(matches!(response.body(), StaticBody::File { .. }));
        assert_eq!(collect_body(response.into_body()), Bytes::from("file"));
    }

    #[test]
    fn test_fallback_response() {
        let fut = ResponseFuture::fallback(ready(Ok::<_, Infallible>(Response::new(Full::new(
            Bytes::from("fallback"),
        )))));

        let response = now(fut).unwrap();
        assert!(matches!(response.body(), StaticBody::Fallback { .. }));
        assert_eq!(collect_body(response.into_body()), Bytes::from("fallback"));
    }

    #[test]
    fn test_fallback_error() {
        let fut = ResponseFuture::fallback(ready(Err::<Response<Full<Bytes>>, _>("boom")));
        assert!(matches!(now(fut), Err("boom")));
    }
}
