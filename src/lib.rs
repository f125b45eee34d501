//! Gzip-aware content negotiation for static resources.
//!
//! For every request this crate decides whether a static resource is sent as a
//! precompressed sibling, as gzip bytes the resource already carries, gzipped
//! on the fly, or uncompressed. The actual byte delivery (conditional requests,
//! ranges, status codes) is left to a [`ServeContent`] implementation.
//!
//! # Example
//!
//! ```ignore
//! use http_gzip_negotiation::StaticFilesLayer;
//! use tower::ServiceBuilder;
//!
//! let service = ServiceBuilder::new()
//!     .layer(StaticFilesLayer::new("public"))
//!     .service(not_found);
//! ```
//!
//! # Negotiation Order
//!
//! The first rule that applies wins:
//! - `Content-Encoding` is already set: serve the resource untouched
//! - `br` is accepted and `<path>.br` exists: serve it with `Content-Encoding: br`
//! - `gzip` is accepted and `<path>.gz` exists: serve it with `Content-Encoding: gzip`
//! - `gzip` is not accepted: serve uncompressed
//! - The resource is marked not worth compressing: serve uncompressed
//! - The resource carries precomputed gzip bytes: serve those
//! - Gzip on the fly when the result is strictly smaller than the original
//! - Otherwise serve uncompressed
//!
//! Brotli is never produced on the fly.
//!
//! # Response Modifications
//!
//! - `Content-Encoding` is written at most once
//! - `Vary` gets the request's `Accept-Encoding` value appended when a sibling is served
//! - `Content-Type` is filled in from the file extension, or sniffed from the
//!   first 512 bytes, unless already present

#![deny(missing_docs)]

mod body;
mod codec;
mod compress;
mod content;
mod error;
mod future;
mod headers;
mod layer;
mod negotiate;
mod observe;
mod resource;
mod service;
pub mod sniff;
#[cfg(test)]
mod test_util;
mod variant;

pub use body::StaticBody;
pub use codec::{AcceptEncoding, Encoding};
pub use compress::{Gzipped, gzip_compress};
pub use compression_core::Level;
pub use content::{BufferedContent, ServeContent};
pub use error::{CompressError, NegotiationError};
pub use future::ResponseFuture;
pub use headers::ResponseHeaders;
pub use layer::StaticFilesLayer;
pub use negotiate::Negotiator;
pub use observe::{Observer, Strategy, TracingObserver};
pub use resource::{Capability, ReadSeek, Resource};
pub use service::StaticFiles;
pub use variant::{NoSiblings, PrecompressedLocator, SiblingFiles};
