use crate::types::GenerationStats;
use serde::{Deserialize, Serialize};

/// Ollama `/api/generate` request body.
#[derive(Debug, Clone, Serialize)]
pub struct OllamaGenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub think: Option<bool>,
}

/// One newline-delimited record of a streamed `/api/generate` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaGenerateChunk {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub thinking: Option<String>,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub total_duration: Option<u64>,
    #[serde(default)]
    pub load_duration: Option<u64>,
    #[serde(default)]
    pub prompt_eval_count: Option<u64>,
    #[serde(default)]
    pub prompt_eval_duration: Option<u64>,
    #[serde(default)]
    pub eval_count: Option<u64>,
    #[serde(default)]
    pub eval_duration: Option<u64>,
    /// Set instead of the fields above when generation fails mid-stream.
    #[serde(default)]
    pub error: Option<String>,
}

impl OllamaGenerateChunk {
    pub fn stats(&self) -> GenerationStats {
        GenerationStats {
            total_duration: self.total_duration,
            load_duration: self.load_duration,
            prompt_eval_count: self.prompt_eval_count,
            prompt_eval_duration: self.prompt_eval_duration,
            eval_count: self.eval_count,
            eval_duration: self.eval_duration,
        }
    }
}

/// Ollama error body, returned with non-success status codes.
#[derive(Debug, Clone, Deserialize)]
pub struct OllamaError {
    pub error: String,
}
