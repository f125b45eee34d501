use crate::codec::gzip_encoder;
use crate::error::CompressError;
use bytes::{Bytes, BytesMut};
use compression_codecs::EncodeV2;
use compression_core::Level;
use compression_core::util::{PartialBuffer, WriteBuffer};
use std::io::{self, Cursor, Read};

const INPUT_BUFFER_SIZE: usize = 32 * 1024;
const OUTPUT_BUFFER_SIZE: usize = 8 * 1024; // 8KB output buffer

/// The outcome of a worthwhile compression pass.
#[derive(Debug, Clone)]
pub struct Gzipped {
    original: u64,
    bytes: Bytes,
}

impl Gzipped {
    /// Size of the input in bytes.
    pub fn original_len(&self) -> u64 {
        self.original
    }

    /// Size of the gzip output in bytes.
    pub fn compressed_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// The complete gzip member.
    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// A seekable reader over the gzip output, positioned at the start.
    pub fn into_reader(self) -> Cursor<Bytes> {
        Cursor::new(self.bytes)
    }
}

/// Gzip-compresses everything `reader` yields.
///
/// The whole output is buffered so its final size can be compared with the
/// input before anyone commits to `Content-Encoding: gzip`. Returns
/// [`CompressError::NotWorthwhile`] unless the output is strictly smaller
/// than the input.
pub fn gzip_compress<R>(reader: &mut R, level: Level) -> Result<Gzipped, CompressError>
where
    R: Read + ?Sized,
{
    let mut gzip = GzipBuffer::new(level);
    let mut input = vec![0u8; INPUT_BUFFER_SIZE];
    let mut original: u64 = 0;

    loop {
        let n = match reader.read(&mut input) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        original += n as u64;
        gzip.encode(&input[..n])?;
    }

    let compressed = gzip.finish()?;
    let compressed_len = compressed.len() as u64;
    if compressed_len >= original {
        return Err(CompressError::NotWorthwhile {
            original,
            compressed: compressed_len,
        });
    }

    Ok(Gzipped {
        original,
        bytes: compressed,
    })
}

/// A gzip encoder that accumulates all of its output in memory.
struct GzipBuffer {
    encoder: Box<dyn EncodeV2 + Send>,
    scratch: Vec<u8>,
    output: BytesMut,
}

impl GzipBuffer {
    fn new(level: Level) -> Self {
        Self {
            encoder: gzip_encoder(level),
            scratch: vec![0u8; OUTPUT_BUFFER_SIZE],
            output: BytesMut::new(),
        }
    }

    /// Feeds a chunk of input through the encoder.
    fn encode(&mut self, input: &[u8]) -> io::Result<()> {
        let mut input_buf = PartialBuffer::new(input);

        // Keep encoding until all input is consumed
        loop {
            let mut out = WriteBuffer::new_initialized(self.scratch.as_mut_slice());
            self.encoder.encode(&mut input_buf, &mut out)?;

            let written = out.written_len();
            if written > 0 {
                self.output.extend_from_slice(&self.scratch[..written]);
            }

            if input_buf.written_len() >= input.len() {
                return Ok(());
            }

            if written == 0 && input_buf.written_len() == 0 {
                return Err(io::Error::other("gzip encoder made no progress"));
            }
        }
    }

    /// Writes the gzip trailer and returns the complete output.
    fn finish(mut self) -> io::Result<Bytes> {
        loop {
            let mut out = WriteBuffer::new_initialized(self.scratch.as_mut_slice());
            let done = self.encoder.finish(&mut out)?;

            let written = out.written_len();
            if written > 0 {
                self.output.extend_from_slice(&self.scratch[..written]);
            }
            if done {
                return Ok(self.output.freeze());
            }
        }
    }
}
