//! Delta accumulation logic for streaming responses.

use crate::types::{GenerationStats, StreamEvent};

/// The outcome of one streamed generation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    /// Every chunk concatenated in arrival order, thinking text included.
    pub text: String,
    /// Number of non-empty chunks received.
    pub chunks: usize,
    /// Whether the endpoint sent its final record.
    pub done: bool,
    /// Reason reported with the final record, if the endpoint gave one.
    pub done_reason: Option<String>,
    pub stats: GenerationStats,
}

impl Completion {
    pub fn is_done(&self) -> bool {
        self.done
    }
}

/// Accumulates streaming deltas into a [`Completion`].
#[derive(Debug, Default)]
pub struct CompletionAccumulator {
    completion: Completion,
}

impl CompletionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a stream event and update the accumulation.
    pub fn process_event(&mut self, event: &StreamEvent) {
        match event {
            StreamEvent::Thinking { delta } | StreamEvent::Content { delta } => {
                self.completion.text.push_str(delta);
                self.completion.chunks += 1;
            }
            StreamEvent::Done { done_reason, stats } => {
                self.completion.done = true;
                self.completion.done_reason = done_reason.clone();
                self.completion.stats = stats.clone();
            }
        }
    }

    /// Text accumulated so far.
    pub fn current_text(&self) -> &str {
        &self.completion.text
    }

    pub fn finalize(self) -> Completion {
        self.completion
    }
}
