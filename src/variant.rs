use crate::codec::Encoding;
use std::ffi::OsString;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Finds precompressed copies of a resource maintained by the build pipeline.
pub trait PrecompressedLocator {
    /// Opens the variant of `path` encoded with `encoding`.
    ///
    /// Any I/O failure is reported as `None`; a missing or unreadable
    /// variant is never an error for the request.
    fn find(&self, path: &Path, encoding: Encoding) -> Option<File>;
}

/// Looks for `<path>.br` and `<path>.gz` next to the resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiblingFiles;

impl SiblingFiles {
    /// Returns the path a sibling for `encoding` would live at.
    pub fn sibling_path(path: &Path, encoding: Encoding) -> PathBuf {
        let mut name = OsString::from(path.as_os_str());
        name.push(".");
        name.push(encoding.extension());
        PathBuf::from(name)
    }
}

impl PrecompressedLocator for SiblingFiles {
    fn find(&self, path: &Path, encoding: Encoding) -> Option<File> {
        let sibling = Self::sibling_path(path, encoding);
        let file = File::open(&sibling).ok()?;
        let metadata = file.metadata().ok()?;
        if !metadata.is_file() {
            return None;
        }
        tracing::trace!(path = %sibling.display(), "found precompressed sibling");
        Some(file)
    }
}

/// Never finds a sibling.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSiblings;

impl PrecompressedLocator for NoSiblings {
    fn find(&self, _path: &Path, _encoding: Encoding) -> Option<File> {
        None
    }
}
