use crate::resource::ReadSeek;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Response, StatusCode, header, request};
use http_body_util::Full;
use std::io::{Read, Seek, SeekFrom};
use std::time::SystemTime;

/// Delivers a chosen byte stream once negotiation has settled the headers.
///
/// This is where conditional requests, ranges and status codes belong.
/// Implementations must deliver `content` from its start and must not alter
/// `Content-Encoding`, `Content-Type` or `Vary` in `headers`.
pub trait ServeContent {
    /// Builds the response for `content`.
    fn serve_content(
        &self,
        request: &request::Parts,
        headers: HeaderMap,
        name: &str,
        modified: SystemTime,
        content: &mut dyn ReadSeek,
    ) -> Response<Full<Bytes>>;
}

/// A content server that buffers the whole stream into a `200 OK` response.
///
/// It sets `Content-Length` and `Last-Modified`, answers `HEAD` without a
/// body and turns read failures into `500 Internal Server Error`. It does
/// not evaluate conditional or range headers.
#[derive(Debug, Clone, Copy, Default)]
pub struct BufferedContent;

impl ServeContent for BufferedContent {
    fn serve_content(
        &self,
        request: &request::Parts,
        mut headers: HeaderMap,
        name: &str,
        modified: SystemTime,
        content: &mut dyn ReadSeek,
    ) -> Response<Full<Bytes>> {
        let mut body = Vec::new();
        let read = content
            .seek(SeekFrom::Start(0))
            .and_then(|_| content.read_to_end(&mut body));
        if let Err(e) = read {
            tracing::warn!(resource = name, error = %e, "failed to read content");
            return internal_error("500 Internal Server Error\n\ncontent unreadable\n");
        }

        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(body.len()));
        if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
            headers.insert(header::LAST_MODIFIED, value);
        }

        let body = if request.method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(body)
        };

        let mut response = Response::new(Full::new(body));
        *response.headers_mut() = headers;
        response
    }
}

/// A plain-text `500 Internal Server Error` response.
pub(crate) fn internal_error(message: &'static str) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    response.headers_mut().insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    response
}
