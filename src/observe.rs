use std::fmt;
use std::io;
use std::sync::Arc;

/// The delivery strategy chosen for a request.
///
/// Also stored in the response extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `Content-Encoding` was already set upstream; served untouched.
    PassThrough,
    /// A `.br` sibling was served.
    PrecompressedBrotli,
    /// A `.gz` sibling was served.
    PrecompressedGzip,
    /// The client does not accept gzip; served uncompressed.
    GzipNotAccepted,
    /// The resource is marked as not worth compressing; served uncompressed.
    NotWorthCompressing,
    /// The resource's precomputed gzip bytes were served.
    PrecomputedGzip,
    /// The resource was gzip-compressed for this request.
    CompressedOnTheFly,
    /// Compression did not pay off or failed; served uncompressed.
    Uncompressed,
    /// The resource could not be rewound after sniffing its type.
    InternalError,
}

impl Strategy {
    /// A short stable name, suitable for log fields and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::PassThrough => "pass_through",
            Strategy::PrecompressedBrotli => "precompressed_br",
            Strategy::PrecompressedGzip => "precompressed_gzip",
            Strategy::GzipNotAccepted => "gzip_not_accepted",
            Strategy::NotWorthCompressing => "not_worth_compressing",
            Strategy::PrecomputedGzip => "precomputed_gzip",
            Strategy::CompressedOnTheFly => "compressed_on_the_fly",
            Strategy::Uncompressed => "uncompressed",
            Strategy::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives negotiation events.
pub trait Observer {
    /// Called once per request with the strategy that was committed to.
    fn strategy(&self, name: &str, strategy: Strategy);

    /// Called after an on-the-fly compression pass ran to completion.
    fn compression(&self, name: &str, original: u64, compressed: u64, worthwhile: bool);

    /// Called when an on-the-fly compression pass failed with an I/O error.
    fn compression_failed(&self, name: &str, error: &io::Error);
}

/// Emits negotiation events as `tracing` debug events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn strategy(&self, name: &str, strategy: Strategy) {
        tracing::debug!(resource = name, strategy = strategy.as_str(), "negotiated encoding");
    }

    fn compression(&self, name: &str, original: u64, compressed: u64, worthwhile: bool) {
        tracing::debug!(
            resource = name,
            original,
            compressed,
            worthwhile,
            "gzip compression pass"
        );
    }

    fn compression_failed(&self, name: &str, error: &io::Error) {
        tracing::warn!(resource = name, error = %error, "gzip compression failed");
    }
}

impl Observer for () {
    fn strategy(&self, _name: &str, _strategy: Strategy) {}

    fn compression(&self, _name: &str, _original: u64, _compressed: u64, _worthwhile: bool) {}

    fn compression_failed(&self, _name: &str, _error: &io::Error) {}
}

impl<O: Observer + ?Sized> Observer for Arc<O> {
    fn strategy(&self, name: &str, strategy: Strategy) {
        (**self).strategy(name, strategy)
    }

    fn compression(&self, name: &str, original: u64, compressed: u64, worthwhile: bool) {
        (**self).compression(name, original, compressed, worthwhile)
    }

    fn compression_failed(&self, name: &str, error: &io::Error) {
        (**self).compression_failed(name, error)
    }
}
