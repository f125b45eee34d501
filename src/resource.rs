use bytes::Bytes;
use std::fmt;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// A seekable byte source.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Optional shortcuts a resource may carry.
///
/// A resource has at most one capability, so "already gzipped" and
/// "never worth gzipping" cannot both be claimed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Capability {
    /// Nothing is known about the resource beyond its bytes.
    #[default]
    None,
    /// The resource's gzip-compressed bytes, computed ahead of time.
    PrecomputedGzip(Bytes),
    /// Gzip was previously found not to shrink this resource.
    NotWorthCompressing,
}

/// A static resource to be served for one request.
pub struct Resource {
    pub(crate) name: String,
    pub(crate) path: PathBuf,
    pub(crate) modified: SystemTime,
    pub(crate) content: Box<dyn ReadSeek + Send>,
    pub(crate) capability: Capability,
}

impl Resource {
    /// Creates a resource without any capability.
    ///
    /// `name` is the logical name used for extension-based type lookup and
    /// by the content server; `path` is where precompressed siblings are
    /// looked up.
    pub fn new<R>(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        modified: SystemTime,
        content: R,
    ) -> Self
    where
        R: ReadSeek + Send + 'static,
    {
        Self {
            name: name.into(),
            path: path.into(),
            modified,
            content: Box::new(content),
            capability: Capability::None,
        }
    }

    /// Attaches a capability, replacing any previous one.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        self.capability = capability;
        self
    }

    /// Shorthand for [`Capability::PrecomputedGzip`].
    pub fn with_precomputed_gzip(self, gzip: impl Into<Bytes>) -> Self {
        self.with_capability(Capability::PrecomputedGzip(gzip.into()))
    }

    /// Shorthand for [`Capability::NotWorthCompressing`].
    pub fn not_worth_compressing(self) -> Self {
        self.with_capability(Capability::NotWorthCompressing)
    }

    /// The logical name, e.g. `style.css`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The filesystem path precompressed siblings are derived from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The modification time handed to the content server.
    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    /// The capability attached to this resource.
    pub fn capability(&self) -> &Capability {
        &self.capability
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("modified", &self.modified)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_default_capability() {
        let resource =
            Resource::new("a.txt", "/srv/a.txt", SystemTime::UNIX_EPOCH, Cursor::new(b"a"));
        assert_eq!(resource.capability(), &Capability::None);
        assert_eq!(resource.name(), "a.txt");
        assert_eq!(resource.path(), Path::new("/srv/a.txt"));
    }

    #[test]
    fn test_capability_is_replaced() {
        let resource = Resource::new("a.txt", "a.txt", SystemTime::UNIX_EPOCH, Cursor::new(b"a"))
            .not_worth_compressing()
            .with_precomputed_gzip(Bytes::from_static(b"\x1f\x8b"));
        assert_eq!(
            resource.capability(),
            &Capability::PrecomputedGzip(Bytes::from_static(b"\x1f\x8b"))
        );
    }

    #[test]
    fn test_content_is_readable() {
        let mut resource =
            Resource::new("a.txt", "a.txt", SystemTime::UNIX_EPOCH, Cursor::new(b"abc".to_vec()));
        let mut out = String::new();
        resource.content.read_to_string(&mut out).unwrap();
        assert_eq!(out, "abc");
    }
}
