use crate::codec::Encoding;
use http::{HeaderMap, HeaderValue, header};

/// Response headers as they are built up before the body is delivered.
///
/// `Content-Encoding` holds at most one value and `Content-Type` is only
/// written when absent.
#[derive(Debug, Clone, Default)]
pub struct ResponseHeaders {
    headers: HeaderMap,
}

impl ResponseHeaders {
    /// Creates an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether an earlier stage already decided the response encoding.
    pub fn has_encoding(&self) -> bool {
        self.headers.contains_key(header::CONTENT_ENCODING)
    }

    /// Sets `Content-Encoding`, replacing any previous value.
    pub fn set_encoding(&mut self, encoding: Encoding) {
        self.headers
            .insert(header::CONTENT_ENCODING, encoding.header_value());
    }

    /// Removes every `Content-Encoding` value.
    pub fn clear_encoding(&mut self) {
        self.headers.remove(header::CONTENT_ENCODING);
    }

    /// Appends a `Vary` value, keeping existing ones.
    pub fn append_vary(&mut self, value: HeaderValue) {
        self.headers.append(header::VARY, value);
    }

    /// Returns whether a `Content-Type` has been declared.
    pub fn has_content_type(&self) -> bool {
        self.headers.contains_key(header::CONTENT_TYPE)
    }

    /// Declares `Content-Type` unless one is already present.
    ///
    /// Returns whether the value was written.
    pub fn set_content_type_if_absent(&mut self, value: HeaderValue) -> bool {
        if self.has_content_type() {
            return false;
        }
        self.headers.insert(header::CONTENT_TYPE, value);
        true
    }

    /// Returns a reference to the underlying map.
    pub fn as_map(&self) -> &HeaderMap {
        &self.headers
    }

    /// Consumes the wrapper, returning the underlying map.
    pub fn into_inner(self) -> HeaderMap {
        self.headers
    }
}

impl From<HeaderMap> for ResponseHeaders {
    fn from(headers: HeaderMap) -> Self {
        Self { headers }
    }
}
