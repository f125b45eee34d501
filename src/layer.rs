use crate::content::BufferedContent;
use crate::negotiate::Negotiator;
use crate::observe::TracingObserver;
use crate::service::StaticFiles;
use crate::variant::SiblingFiles;
use compression_core::Level;
use std::path::PathBuf;
use tower::Layer;

/// A Tower layer that serves static files in front of a fallback service.
///
/// Files are looked up below `root`. Anything that isn't a readable regular
/// file reaches the wrapped service unchanged.
#[derive(Debug, Clone)]
pub struct StaticFilesLayer<L = SiblingFiles, O = TracingObserver, C = BufferedContent> {
    root: PathBuf,
    negotiator: Negotiator<L, O>,
    content: C,
}

impl StaticFilesLayer {
    /// Creates a layer serving `root` with default settings.
    ///
    /// By default `.br`/`.gz` siblings are honoured, on-the-fly gzip uses the
    /// default level, events go to `tracing` and bodies are buffered by
    /// [`BufferedContent`].
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            negotiator: Negotiator::new(),
            content: BufferedContent,
        }
    }
}

impl<L, O, C> StaticFilesLayer<L, O, C> {
    /// Sets the gzip level used for on-the-fly compression.
    pub fn gzip_level(mut self, level: Level) -> Self {
        self.negotiator = self.negotiator.gzip_level(level);
        self
    }

    /// Sets how precompressed variants are found.
    pub fn locator<T>(self, locator: T) -> StaticFilesLayer<T, O, C> {
        StaticFilesLayer {
            root: self.root,
            negotiator: self.negotiator.locator(locator),
            content: self.content,
        }
    }

    /// Sets the receiver of negotiation events.
    pub fn observer<T>(self, observer: T) -> StaticFilesLayer<L, T, C> {
        StaticFilesLayer {
            root: self.root,
            negotiator: self.negotiator.observer(observer),
            content: self.content,
        }
    }

    /// Sets the server that delivers the negotiated bytes.
    pub fn content_server<T>(self, content: T) -> StaticFilesLayer<L, O, T> {
        StaticFilesLayer {
            root: self.root,
            negotiator: self.negotiator,
            content,
        }
    }
}

impl<S, L, O, C> Layer<S> for StaticFilesLayer<L, O, C>
where
    L: Clone,
    O: Clone,
    C: Clone,
{
    type Service = StaticFiles<S, L, O, C>;

    fn layer(&self, inner: S) -> Self::Service {
        StaticFiles::with_parts(
            inner,
            self.root.clone(),
            self.negotiator.clone(),
            self.content.clone(),
        )
    }
}
