//! Stream a single completion from an Ollama server.
//!
//! A [`CompletionRequester`] sends one generation request (thinking trace enabled)
//! and hands each streamed chunk to a [`ChunkSink`] as it arrives.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod ndjson_stream;
pub mod provider;
pub mod providers;
pub mod requester;
pub mod response;
pub mod sink;
pub mod types;

// Re-export core types for easy usage
pub use accumulator::{Completion, CompletionAccumulator};
pub use config::{EnvFilePolicy, RequesterConfig, DEFAULT_MODEL, DEFAULT_PROMPT, OLLAMA_URL_VAR};
pub use error::Error;
pub use provider::CompletionProvider;
pub use providers::*;
pub use requester::CompletionRequester;
pub use response::Response;
pub use sink::{CallbackSink, ChunkSink, CollectingSink, StdoutSink, WriterSink};
pub use types::*;
