use serde::{Deserialize, Serialize};

/// A single generation request: one model, one prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    /// Ask the endpoint to stream its thinking trace alongside the answer.
    pub think: bool,
}

impl GenerateRequest {
    /// Create a request with thinking enabled.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            think: true,
        }
    }

    /// Enable or disable thinking trace streaming.
    pub fn think(mut self, think: bool) -> Self {
        self.think = think;
        self
    }
}
