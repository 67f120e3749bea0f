//! Provider implementations for inference servers.

pub mod ollama;

pub use ollama::OllamaProvider;
