//! Stream adapter for parsing newline-delimited JSON records from byte chunks.

use crate::Error;
use futures_util::{Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{ready, Context, Poll};

/// Upper bound on a single unterminated line held in the buffer.
const MAX_LINE_BYTES: usize = 1_000_000;

/// A stream adapter that parses one JSON value per line from a byte stream.
/// Maintains internal state to handle records split across chunks.
pub struct NdjsonStream<S, T> {
    /// The underlying byte stream
    inner: S,
    /// Bytes of the current, not yet terminated line
    buffer: Vec<u8>,
    /// Parsed records ready to be yielded
    records: VecDeque<Result<T, Error>>,
    /// Set once the inner stream is exhausted or has failed
    finished: bool,
    _record: PhantomData<fn() -> T>,
}

impl<S, T: DeserializeOwned> NdjsonStream<S, T> {
    /// Create a new NDJSON stream from a byte stream.
    pub fn new(stream: S) -> Self {
        Self {
            inner: stream,
            buffer: Vec::new(),
            records: VecDeque::new(),
            finished: false,
            _record: PhantomData,
        }
    }

    /// Parse every complete line in the buffer into the record queue.
    fn parse_buffer(&mut self) {
        let mut start = 0;

        while let Some(pos) = memchr::memchr(b'\n', &self.buffer[start..]) {
            let line_end = start + pos;
            if let Some(record) = Self::parse_line(&self.buffer[start..line_end]) {
                self.records.push_back(record);
            }
            start = line_end + 1;
        }

        if start > 0 {
            self.buffer.drain(..start);
        }
    }

    /// Parse a single line. Blank lines yield nothing.
    fn parse_line(line: &[u8]) -> Option<Result<T, Error>> {
        let text = match std::str::from_utf8(line) {
            Ok(text) => text.trim(),
            Err(e) => {
                return Some(Err(Error::stream(format!(
                    "Invalid UTF-8 in NDJSON record: {e}"
                ))))
            }
        };

        if text.is_empty() {
            return None;
        }

        Some(serde_json::from_str(text).map_err(Error::from))
    }
}

// The record queue and buffer are never pinned; only `inner` is polled in place.
impl<S: Unpin, T> Unpin for NdjsonStream<S, T> {}

impl<S, E, T> Stream for NdjsonStream<S, T>
where
    S: Stream<Item = Result<bytes::Bytes, E>> + Unpin,
    E: Into<Error>,
    T: DeserializeOwned,
{
    type Item = Result<T, Error>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            if let Some(record) = self.records.pop_front() {
                return Poll::Ready(Some(record));
            }

            if self.finished {
                return Poll::Ready(None);
            }

            let chunk = match ready!(self.inner.poll_next_unpin(cx)) {
                Some(Ok(chunk)) => chunk,
                Some(Err(e)) => {
                    self.finished = true;
                    self.buffer.clear();
                    return Poll::Ready(Some(Err(e.into())));
                }
                None => {
                    // The last record may arrive without a trailing newline
                    self.finished = true;
                    let rest = std::mem::take(&mut self.buffer);
                    if let Some(record) = Self::parse_line(&rest) {
                        return Poll::Ready(Some(record));
                    }
                    return Poll::Ready(None);
                }
            };

            self.buffer.extend_from_slice(&chunk);
            self.parse_buffer();

            if self.buffer.len() > MAX_LINE_BYTES {
                self.finished = true;
                self.buffer.clear();
                self.records.push_back(Err(Error::stream(
                    "NDJSON line exceeded maximum size",
                )));
            }
        }
    }
}

/// Extension trait to add NDJSON parsing to byte streams.
pub trait NdjsonStreamExt: Stream {
    /// Parse this byte stream as one `T` per line.
    fn ndjson_records<T: DeserializeOwned>(self) -> NdjsonStream<Self, T>
    where
        Self: Sized,
    {
        NdjsonStream::new(self)
    }
}

impl<S: Stream> NdjsonStreamExt for S {}
