//! Response handling for streamed generations.

use crate::accumulator::{Completion, CompletionAccumulator};
use crate::sink::ChunkSink;
use crate::{Error, StreamEvent};
use futures_util::stream::Stream;
use futures_util::StreamExt;
use std::pin::Pin;
use tracing::trace;

/// Response from a generation request. Always streamed; buffer it with
/// [`Response::buffer`] when only the final text matters.
pub struct Response {
    stream: Pin<Box<dyn Stream<Item = Result<StreamEvent, Error>> + Send>>,
}

impl Response {
    /// Create a new response from a stream of events.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: Stream<Item = Result<StreamEvent, Error>> + Send + 'static,
    {
        Self {
            stream: Box::pin(stream),
        }
    }

    /// Stream the response events.
    pub fn stream(self) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, Error>> + Send>> {
        self.stream
    }

    /// Buffer the entire response by consuming the stream.
    pub async fn buffer(mut self) -> Result<Completion, Error> {
        let mut accumulator = CompletionAccumulator::new();

        while let Some(event) = self.stream.next().await {
            accumulator.process_event(&event?);
        }

        Ok(accumulator.finalize())
    }

    /// Get just the text (convenience method).
    pub async fn text(self) -> Result<String, Error> {
        Ok(self.buffer().await?.text)
    }

    /// Hand every chunk to `sink` as soon as it arrives, then return the completion.
    ///
    /// Stops at the first stream or sink error; chunks already delivered stay delivered.
    pub async fn forward_to<S>(mut self, sink: &mut S) -> Result<Completion, Error>
    where
        S: ChunkSink + ?Sized,
    {
        let mut accumulator = CompletionAccumulator::new();

        while let Some(event) = self.stream.next().await {
            let event = event?;
            if let Some(delta) = event.delta() {
                trace!(bytes = delta.len(), "Forwarding chunk");
                sink.accept(delta).await?;
            }
            accumulator.process_event(&event);
        }

        Ok(accumulator.finalize())
    }
}
