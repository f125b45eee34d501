use crate::content::{BufferedContent, ServeContent};
use crate::future::ResponseFuture;
use crate::headers::ResponseHeaders;
use crate::negotiate::Negotiator;
use crate::observe::{Observer, TracingObserver};
use crate::resource::Resource;
use crate::variant::{PrecompressedLocator, SiblingFiles};
use http::{Method, Request};
use std::fs::File;
use std::path::{Component, Path, PathBuf};
use std::task::{Context, Poll};
use std::time::SystemTime;
use tower::Service;

/// A Tower service that serves files below a root directory with negotiated
/// encoding.
///
/// Requests that don't map onto a regular file, and methods other than `GET`
/// and `HEAD`, go to the inner service.
#[derive(Debug, Clone)]
pub struct StaticFiles<S, L = SiblingFiles, O = TracingObserver, C = BufferedContent> {
    inner: S,
    root: PathBuf,
    negotiator: Negotiator<L, O>,
    content: C,
}

impl<S> StaticFiles<S> {
    /// Creates a service with default negotiation in front of `inner`.
    pub fn new(inner: S, root: impl Into<PathBuf>) -> Self {
        Self::with_parts(inner, root.into(), Negotiator::new(), BufferedContent)
    }
}

impl<S, L, O, C> StaticFiles<S, L, O, C> {
    pub(crate) fn with_parts(
        inner: S,
        root: PathBuf,
        negotiator: Negotiator<L, O>,
        content: C,
    ) -> Self {
        Self {
            inner,
            root,
            negotiator,
            content,
        }
    }

    /// Returns the directory files are served from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns a reference to the inner service.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the inner service.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Consumes this service, returning the inner service.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, ReqBody, ResBody, L, O, C> Service<Request<ReqBody>> for StaticFiles<S, L, O, C>
where
    S: Service<Request<ReqBody>, Response = http::Response<ResBody>>,
    L: PrecompressedLocator,
    O: Observer,
    C: ServeContent,
{
    type Response = http::Response<crate::body::StaticBody<ResBody>>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<ReqBody>) -> Self::Future {
        if req.method() != Method::GET && req.method() != Method::HEAD {
            return ResponseFuture::fallback(self.inner.call(req));
        }

        let Some(path) = resolve(&self.root, req.uri().path()) else {
            return ResponseFuture::fallback(self.inner.call(req));
        };
        let Some((file, modified)) = open_file(&path) else {
            return ResponseFuture::fallback(self.inner.call(req));
        };

        let (parts, _body) = req.into_parts();
        let resource = Resource::new(parts.uri.path(), path, modified, file);
        let response =
            self.negotiator
                .serve(&self.content, &parts, ResponseHeaders::new(), resource);

        ResponseFuture::ready(response)
    }
}

/// Maps a request path onto `root`, rejecting anything that could escape it.
fn resolve(root: &Path, uri_path: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    for component in Path::new(uri_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(path)
}

/// Opens `path` if it is a regular file.
fn open_file(path: &Path) -> Option<(File, SystemTime)> {
    let file = File::open(path).ok()?;
    let metadata = file.metadata().ok()?;
    if !metadata.is_file() {
        return None;
    }
    let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
    Some((file, modified))
}
