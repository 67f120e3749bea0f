//! Types for streaming responses.

use serde::{Deserialize, Serialize};

/// Events that can be emitted during streaming.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A chunk of the model's thinking trace.
    Thinking { delta: String },
    /// A chunk of the final answer.
    Content { delta: String },
    /// The endpoint reported the end of generation.
    Done {
        done_reason: Option<String>,
        stats: GenerationStats,
    },
}

impl StreamEvent {
    /// The text carried by this event, if any.
    ///
    /// Thinking and answer text are both returned: callers see one text stream.
    pub fn delta(&self) -> Option<&str> {
        match self {
            StreamEvent::Thinking { delta } | StreamEvent::Content { delta } => Some(delta),
            StreamEvent::Done { .. } => None,
        }
    }
}

/// Timing and token counts reported with the final record.
/// Durations are in nanoseconds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub total_duration: Option<u64>,
    pub load_duration: Option<u64>,
    pub prompt_eval_count: Option<u64>,
    pub prompt_eval_duration: Option<u64>,
    pub eval_count: Option<u64>,
    pub eval_duration: Option<u64>,
}

impl GenerationStats {
    /// Generated tokens per second, when both count and duration are known.
    pub fn tokens_per_second(&self) -> Option<f64> {
        match (self.eval_count, self.eval_duration) {
            (Some(count), Some(duration)) if duration > 0 => {
                Some(count as f64 / (duration as f64 / 1_000_000_000.0))
            }
            _ => None,
        }
    }
}
