use std::io;
use thiserror::Error;

/// Reasons on-the-fly compression was not used.
///
/// Both variants are absorbed by the negotiator, which falls back to serving
/// the original bytes.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The gzip output was not strictly smaller than the input.
    #[error("not worth gzip compressing: original size {original}, compressed size {compressed}")]
    NotWorthwhile {
        /// Bytes read from the input.
        original: u64,
        /// Bytes produced by the encoder.
        compressed: u64,
    },
    /// Reading the input or driving the encoder failed.
    #[error("gzip compression failed: {0}")]
    Io(#[from] io::Error),
}

/// Request-fatal negotiation failures.
#[derive(Debug, Error)]
pub enum NegotiationError {
    /// The resource could not be rewound after its prefix was read for sniffing.
    #[error("seeker can't seek: {0}")]
    Seek(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_worthwhile_message() {
        let err = CompressError::NotWorthwhile {
            original: 10,
            compressed: 30,
        };
        assert_eq!(
            err.to_string(),
            "not worth gzip compressing: original size 10, compressed size 30"
        );
    }

    #[test]
    fn test_io_from() {
        let err: CompressError = io::Error::other("boom").into();
        assert!(matches!(err, CompressError::Io(_)));
    }
}
