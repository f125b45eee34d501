use crate::codec::{AcceptEncoding, Encoding};
use crate::compress::gzip_compress;
use crate::content::{ServeContent, internal_error};
use crate::error::{CompressError, NegotiationError};
use crate::headers::ResponseHeaders;
use crate::observe::{Observer, Strategy, TracingObserver};
use crate::resource::{Capability, ReadSeek, Resource};
use crate::sniff::{content_type_by_extension, detect_content_type, read_prefix};
use crate::variant::{PrecompressedLocator, SiblingFiles};
use bytes::Bytes;
use compression_core::Level;
use http::{HeaderValue, Response, request};
use http_body_util::Full;
use std::io::{Cursor, Seek, SeekFrom};

/// Chooses how a static resource is encoded on the wire.
///
/// Strategies are tried in a fixed order and the first one that applies
/// commits the response:
///
/// 1. `Content-Encoding` already set: serve untouched.
/// 2. Client accepts `br` and a Brotli sibling exists: serve it.
/// 3. Client accepts `gzip` and a gzip sibling exists: serve it.
/// 4. Client does not accept `gzip`: serve uncompressed.
/// 5. Resource is marked not worth compressing: serve uncompressed.
/// 6. Resource carries precomputed gzip bytes: serve them.
/// 7. Gzip on the fly if that makes the body strictly smaller.
/// 8. Otherwise serve uncompressed.
///
/// `Content-Type` is settled before 6 because sniffing compressed bytes
/// would be meaningless.
#[derive(Debug, Clone)]
pub struct Negotiator<L = SiblingFiles, O = TracingObserver> {
    locator: L,
    observer: O,
    level: Level,
}

impl Negotiator {
    /// Creates a negotiator that looks for `.br`/`.gz` siblings and logs
    /// through `tracing`.
    pub fn new() -> Self {
        Self {
            locator: SiblingFiles,
            observer: TracingObserver,
            level: Level::Default,
        }
    }
}

impl Default for Negotiator {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, O> Negotiator<L, O> {
    /// Sets how precompressed variants are found.
    pub fn locator<T>(self, locator: T) -> Negotiator<T, O> {
        Negotiator {
            locator,
            observer: self.observer,
            level: self.level,
        }
    }

    /// Sets the receiver of negotiation events.
    pub fn observer<T>(self, observer: T) -> Negotiator<L, T> {
        Negotiator {
            locator: self.locator,
            observer,
            level: self.level,
        }
    }

    /// Sets the gzip level used for on-the-fly compression.
    pub fn gzip_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }
}

impl<L, O> Negotiator<L, O>
where
    L: PrecompressedLocator,
    O: Observer,
{
    /// Negotiates the encoding for `resource` and hands the chosen stream to
    /// `server`.
    ///
    /// `headers` are the response headers set by earlier stages; a
    /// `Content-Encoding` among them means encoding was already handled. The
    /// chosen [`Strategy`] is stored in the response extensions.
    pub fn serve<C>(
        &self,
        server: &C,
        request: &request::Parts,
        headers: ResponseHeaders,
        resource: Resource,
    ) -> Response<Full<Bytes>>
    where
        C: ServeContent + ?Sized,
    {
        let accept = AcceptEncoding::from_headers(&request.headers);
        let name = resource.name.clone();

        let (strategy, mut response) = self.negotiate(server, request, &accept, headers, resource);

        self.observer.strategy(&name, strategy);
        response.extensions_mut().insert(strategy);
        response
    }

    fn negotiate<C>(
        &self,
        server: &C,
        request: &request::Parts,
        accept: &AcceptEncoding,
        mut headers: ResponseHeaders,
        resource: Resource,
    ) -> (Strategy, Response<Full<Bytes>>)
    where
        C: ServeContent + ?Sized,
    {
        let Resource {
            name,
            path,
            modified,
            mut content,
            capability,
        } = resource;

        let deliver = |headers: ResponseHeaders, content: &mut dyn ReadSeek| {
            server.serve_content(request, headers.into_inner(), &name, modified, content)
        };

        // Never encode twice.
        if headers.has_encoding() {
            return (Strategy::PassThrough, deliver(headers, &mut *content));
        }

        for (encoding, strategy) in [
            (Encoding::Brotli, Strategy::PrecompressedBrotli),
            (Encoding::Gzip, Strategy::PrecompressedGzip),
        ] {
            if !accept.accepts(encoding) {
                continue;
            }
            // Unreadable siblings count as missing.
            let Some(mut sibling) = self.locator.find(&path, encoding) else {
                continue;
            };

            headers.set_encoding(encoding);
            if let Some(value) = accept.raw() {
                headers.append_vary(value.clone());
            }
            let response = deliver(headers, &mut sibling);
            drop(sibling);
            return (strategy, response);
        }

        if !accept.accepts(Encoding::Gzip) {
            return (Strategy::GzipNotAccepted, deliver(headers, &mut *content));
        }

        if capability == Capability::NotWorthCompressing {
            headers.clear_encoding();
            return (Strategy::NotWorthCompressing, deliver(headers, &mut *content));
        }

        if !headers.has_content_type() {
            match determine_content_type(&name, &mut *content) {
                Ok(ctype) => {
                    headers.set_content_type_if_absent(ctype);
                }
                Err(e) => {
                    tracing::error!(resource = %name, error = %e, "failed to rewind after sniffing");
                    return (
                        Strategy::InternalError,
                        internal_error("500 Internal Server Error\n\nseeker can't seek\n"),
                    );
                }
            }
        }

        if let Capability::PrecomputedGzip(gzip) = capability {
            headers.set_encoding(Encoding::Gzip);
            return (Strategy::PrecomputedGzip, deliver(headers, &mut Cursor::new(gzip)));
        }

        match gzip_compress(&mut *content, self.level) {
            Ok(gzipped) => {
                self.observer.compression(
                    &name,
                    gzipped.original_len(),
                    gzipped.compressed_len(),
                    true,
                );
                headers.set_encoding(Encoding::Gzip);
                let response = deliver(headers, &mut gzipped.into_reader());
                return (Strategy::CompressedOnTheFly, response);
            }
            Err(CompressError::NotWorthwhile {
                original,
                compressed,
            }) => {
                self.observer.compression(&name, original, compressed, false);
            }
            Err(CompressError::Io(e)) => {
                self.observer.compression_failed(&name, &e);
            }
        }

        headers.clear_encoding();
        (Strategy::Uncompressed, deliver(headers, &mut *content))
    }
}

/// Looks the type up by extension, falling back to sniffing the first bytes.
///
/// After sniffing, `content` is rewound so it can still be served whole.
fn determine_content_type(
    name: &str,
    content: &mut dyn ReadSeek,
) -> Result<HeaderValue, NegotiationError> {
    if let Some(ctype) = content_type_by_extension(name) {
        return Ok(ctype);
    }

    let prefix = read_prefix(&mut *content);
    let ctype = detect_content_type(&prefix);
    content
        .seek(SeekFrom::Start(0))
        .map_err(NegotiationError::Seek)?;
    Ok(HeaderValue::from_static(ctype))
}
