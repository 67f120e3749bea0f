//! Destinations for streamed chunks.

use crate::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// A capability that accepts one chunk of text at a time.
///
/// Returning an error aborts the exchange that is feeding the sink.
#[async_trait::async_trait]
pub trait ChunkSink: Send {
    async fn accept(&mut self, chunk: &str) -> Result<(), Error>;
}

/// Writes every chunk to an async writer and flushes it immediately.
pub struct WriterSink<W> {
    writer: W,
}

/// Sink for the process's standard output.
pub type StdoutSink = WriterSink<tokio::io::Stdout>;

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl StdoutSink {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait::async_trait]
impl<W> ChunkSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn accept(&mut self, chunk: &str) -> Result<(), Error> {
        self.writer.write_all(chunk.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// Keeps every chunk in memory, in the order received.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    chunks: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    /// All chunks concatenated.
    pub fn text(&self) -> String {
        self.chunks.concat()
    }
}

#[async_trait::async_trait]
impl ChunkSink for CollectingSink {
    async fn accept(&mut self, chunk: &str) -> Result<(), Error> {
        self.chunks.push(chunk.to_string());
        Ok(())
    }
}

/// Adapts a closure into a sink.
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(&str) -> Result<(), Error> + Send,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

#[async_trait::async_trait]
impl<F> ChunkSink for CallbackSink<F>
where
    F: FnMut(&str) -> Result<(), Error> + Send,
{
    async fn accept(&mut self, chunk: &str) -> Result<(), Error> {
        (self.callback)(chunk)
    }
}
