use compression_codecs::{EncodeV2, gzip::GzipEncoder};
use compression_core::Level;
use http::{HeaderMap, HeaderValue, header};

/// Content codings this crate knows how to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Brotli. Only ever served from a precompressed sibling.
    Brotli,
    /// Gzip. Served from a sibling, from precomputed bytes, or compressed on the fly.
    Gzip,
}

impl Encoding {
    /// Returns the Content-Encoding header value for this encoding.
    pub fn content_encoding(&self) -> &'static str {
        match self {
            Encoding::Brotli => "br",
            Encoding::Gzip => "gzip",
        }
    }

    /// Returns the file extension used by precompressed siblings.
    pub fn extension(&self) -> &'static str {
        match self {
            Encoding::Brotli => "br",
            Encoding::Gzip => "gz",
        }
    }

    pub(crate) fn header_value(&self) -> HeaderValue {
        HeaderValue::from_static(self.content_encoding())
    }

    fn from_token(token: &str) -> Option<Encoding> {
        if token.eq_ignore_ascii_case("br") || token.eq_ignore_ascii_case("brotli") {
            Some(Encoding::Brotli)
        } else if token.eq_ignore_ascii_case("gzip") || token.eq_ignore_ascii_case("x-gzip") {
            Some(Encoding::Gzip)
        } else {
            None
        }
    }
}

/// Creates the gzip encoder used for on-the-fly compression.
pub(crate) fn gzip_encoder(level: Level) -> Box<dyn EncodeV2 + Send> {
    Box::new(GzipEncoder::new(level.into()))
}

/// The encodings a client declared acceptable via `Accept-Encoding`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptEncoding {
    gzip: bool,
    brotli: bool,
    raw: Option<HeaderValue>,
}

impl AcceptEncoding {
    /// Reads the `Accept-Encoding` values of a request.
    ///
    /// Multiple header lines are treated as one comma-separated list. Values
    /// that are not valid visible ASCII are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut accept = AcceptEncoding {
            raw: headers.get(header::ACCEPT_ENCODING).cloned(),
            ..Default::default()
        };

        for value in headers.get_all(header::ACCEPT_ENCODING) {
            if let Ok(value) = value.to_str() {
                accept.merge(value);
            }
        }

        accept
    }

    /// Parses a single header value, e.g. `"br, gzip;q=0.8"`.
    pub fn parse(value: &str) -> Self {
        let mut accept = AcceptEncoding {
            raw: HeaderValue::from_str(value).ok(),
            ..Default::default()
        };
        accept.merge(value);
        accept
    }

    fn merge(&mut self, value: &str) {
        for part in value.split(',') {
            let (token, quality) = parse_encoding_with_quality(part.trim());

            // q=0 means "not acceptable"
            if quality == 0.0 {
                continue;
            }

            match Encoding::from_token(token) {
                Some(Encoding::Brotli) => self.brotli = true,
                Some(Encoding::Gzip) => self.gzip = true,
                None => {}
            }
        }
    }

    /// Returns whether the client accepts the given encoding.
    pub fn accepts(&self, encoding: Encoding) -> bool {
        match encoding {
            Encoding::Brotli => self.brotli,
            Encoding::Gzip => self.gzip,
        }
    }

    /// The first `Accept-Encoding` value as the client sent it, used for `Vary`.
    pub fn raw(&self) -> Option<&HeaderValue> {
        self.raw.as_ref()
    }
}

/// Parses an encoding entry like "gzip" or "br;q=0.8" into (encoding, quality).
fn parse_encoding_with_quality(s: &str) -> (&str, f32) {
    let mut parts = s.split(';');
    let encoding = parts.next().unwrap_or("").trim();

    let quality = parts
        .map(str::trim)
        .find_map(|param| {
            param
                .strip_prefix("q=")
                .or_else(|| param.strip_prefix("Q="))
                .map(|q| q.trim().parse::<f32>().unwrap_or(1.0))
        })
        .unwrap_or(1.0);

    (encoding, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_encoding() {
        assert_eq!(Encoding::Brotli.content_encoding(), "br");
        assert_eq!(Encoding::Gzip.content_encoding(), "gzip");
        assert_eq!(Encoding::Brotli.extension(), "br");
        assert_eq!(Encoding::Gzip.extension(), "gz");
    }

    #[test]
    fn test_accept_simple() {
        let accept = AcceptEncoding::parse("gzip");
        assert!(accept.accepts(Encoding::Gzip));
        assert!(!accept.accepts(Encoding::Brotli));

        let accept = AcceptEncoding::parse("br");
        assert!(accept.accepts(Encoding::Brotli));
        assert!(!accept.accepts(Encoding::Gzip));
    }

    #[test]
    fn test_accept_multiple_and_case() {
        let accept = AcceptEncoding::parse("deflate, BR ,GZip");
        assert!(accept.accepts(Encoding::Brotli));
        assert!(accept.accepts(Encoding::Gzip));
    }

    #[test]
    fn test_accept_aliases() {
        let accept = AcceptEncoding::parse("x-gzip, brotli");
        assert!(accept.accepts(Encoding::Gzip));
        assert!(accept.accepts(Encoding::Brotli));
    }

    #[test]
    fn test_accept_quality_zero() {
        let accept = AcceptEncoding::parse("gzip;q=0, br");
        assert!(!accept.accepts(Encoding::Gzip));
        assert!(accept.accepts(Encoding::Brotli));

        let accept = AcceptEncoding::parse("gzip; q=0.0");
        assert!(!accept.accepts(Encoding::Gzip));
    }

    #[test]
    fn test_accept_quality_nonzero() {
        let accept = AcceptEncoding::parse("gzip;q=0.5, br;Q=1");
        assert!(accept.accepts(Encoding::Gzip));
        assert!(accept.accepts(Encoding::Brotli));
    }

    #[test]
    fn test_accept_unsupported_and_wildcard() {
        let accept = AcceptEncoding::parse("identity, compress, *");
        assert!(!accept.accepts(Encoding::Gzip));
        assert!(!accept.accepts(Encoding::Brotli));
    }

    #[test]
    fn test_accept_empty() {
        let accept = AcceptEncoding::from_headers(&HeaderMap::new());
        assert!(!accept.accepts(Encoding::Gzip));
        assert!(accept.raw().is_none());
    }

    #[test]
    fn test_from_headers_merges_lines() {
        let mut headers = HeaderMap::new();
        headers.append(header::ACCEPT_ENCODING, HeaderValue::from_static("br"));
        headers.append(header::ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let accept = AcceptEncoding::from_headers(&headers);
        assert!(accept.accepts(Encoding::Brotli));
        assert!(accept.accepts(Encoding::Gzip));
        assert_eq!(accept.raw().unwrap(), "br");
    }

    #[test]
    fn test_parse_encoding_with_quality() {
        assert_eq!(parse_encoding_with_quality("gzip"), ("gzip", 1.0));
        assert_eq!(parse_encoding_with_quality("br;q=0.8"), ("br", 0.8));
        assert_eq!(parse_encoding_with_quality("br;level=3;q=0"), ("br", 0.0));
        assert_eq!(parse_encoding_with_quality("gzip;q=bogus"), ("gzip", 1.0));
    }
}
