//! Ollama provider: `POST /api/generate` with a newline-delimited JSON stream.

pub mod client;
pub mod types;

pub use client::OllamaProvider;
