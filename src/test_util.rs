use bytes::Bytes;
use http_body::Body;
use http_body_util::BodyExt;
use std::io::Read;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Deterministic bytes gzip cannot shrink.
pub(crate) fn noise(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state >> 24) as u8
        })
        .collect()
}

/// 373 bytes that gzip at the default level turns into exactly 373 bytes.
pub(crate) fn break_even() -> Vec<u8> {
    let mut input = vec![b'a'; 73];
    input.extend(noise(300));
    input
}

pub(crate) fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(data)
        .read_to_end(&mut out)
        .unwrap();
    out
}

/// Collects a body that is ready without waiting.
pub(crate) fn collect_body<B>(body: B) -> Bytes
where
    B: Body + Unpin,
    B::Error: std::fmt::Debug,
{
    let waker = std::task::Waker::noop();
    let mut cx = Context::from_waker(waker);
    let mut fut = body.collect();
    match Pin::new(&mut fut).poll(&mut cx) {
        Poll::Ready(result) => result.unwrap().to_bytes(),
        Poll::Pending => panic!("Expected a ready body"),
    }
}

/// Polls a future once, expecting it to be ready.
pub(crate) fn now<F: Future>(future: F) -> F::Output {
    let waker = std::task::Waker::noop();
    let mut cx = Context::from_waker(waker);
    let future = std::pin::pin!(future);
    match future.poll(&mut cx) {
        Poll::Ready(output) => output,
        Poll::Pending => panic!("Expected a ready future"),
    }
}
