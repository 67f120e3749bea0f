//! The single request/response exchange.

use crate::accumulator::Completion;
use crate::config::RequesterConfig;
use crate::provider::CompletionProvider;
use crate::providers::OllamaProvider;
use crate::sink::ChunkSink;
use crate::Error;
use tracing::{debug, info};

/// Issues one generation request and forwards the streamed chunks to a sink.
pub struct CompletionRequester {
    provider: Box<dyn CompletionProvider>,
    config: RequesterConfig,
}

impl CompletionRequester {
    /// Create a requester talking to the Ollama server named in `config`.
    pub fn new(config: RequesterConfig) -> Result<Self, Error> {
        config.validate()?;
        let provider = OllamaProvider::new(config.base_url.clone())?;
        Ok(Self {
            provider: Box::new(provider),
            config,
        })
    }

    /// Create a requester from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::new(RequesterConfig::from_env()?)
    }

    /// Create a requester with a caller-supplied provider.
    pub fn with_provider(
        config: RequesterConfig,
        provider: Box<dyn CompletionProvider>,
    ) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn config(&self) -> &RequesterConfig {
        &self.config
    }

    /// Run the exchange: every chunk reaches `sink` in arrival order before this returns.
    pub async fn run<S>(&self, sink: &mut S) -> Result<Completion, Error>
    where
        S: ChunkSink + ?Sized,
    {
        let request = self.config.request();
        info!(model = %request.model, think = request.think, "Requesting completion");

        let response = self.provider.generate(&request).await?;
        let completion = response.forward_to(sink).await?;

        info!(
            chunks = completion.chunks,
            done = completion.done,
            done_reason = completion.done_reason.as_deref().unwrap_or("none"),
            eval_count = completion.stats.eval_count,
            "Completion finished"
        );
        if let Some(rate) = completion.stats.tokens_per_second() {
            debug!(tokens_per_second = rate, "Generation rate");
        }

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::CollectingSink;
    use crate::{GenerateRequest, GenerationStats, Response, StreamEvent};
    use std::sync::{Arc, Mutex};

    /// Replays a fixed list of chunks and records the requests it receives.
    struct ScriptedProvider {
        chunks: Vec<&'static str>,
        requests: Arc<Mutex<Vec<GenerateRequest>>>,
    }

    #[async_trait::async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn generate(&self, request: &GenerateRequest) -> Result<Response, Error> {
            self.requests.lock().unwrap().push(request.clone());

            let mut events: Vec<Result<StreamEvent, Error>> = self
                .chunks
                .iter()
                .map(|chunk| {
                    Ok(StreamEvent::Content {
                        delta: chunk.to_string(),
                    })
                })
                .collect();
            events.push(Ok(StreamEvent::Done {
                done_reason: Some("stop".to_string()),
                stats: GenerationStats::default(),
            }));

            Ok(Response::from_stream(futures_util::stream::iter(events)))
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl CompletionProvider for FailingProvider {
        async fn generate(&self, _request: &GenerateRequest) -> Result<Response, Error> {
            Err(Error::connection("connection refused"))
        }
    }

    fn hello_requester() -> (CompletionRequester, Arc<Mutex<Vec<GenerateRequest>>>) {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let provider = ScriptedProvider {
            chunks: vec!["Hello", ", ", "world!"],
            requests: requests.clone(),
        };
        let config = RequesterConfig::new("http://localhost:11434").with_prompt("Say hello.");
        let requester = CompletionRequester::with_provider(config, Box::new(provider)).unwrap();
        (requester, requests)
    }

    #[tokio::test]
    async fn test_run_forwards_chunks() {
        let (requester, requests) = hello_requester();
        let mut sink = CollectingSink::new();

        let completion = requester.run(&mut sink).await.unwrap();

        assert_eq!(sink.text(), "Hello, world!");
        assert_eq!(completion.text, "Hello, world!");
        assert_eq!(completion.chunks, 3);

        let requests = requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].model, "deepseek-r1:14b");
        assert_eq!(requests[0].prompt, "Say hello.");
        assert!(requests[0].think);
    }

    #[tokio::test]
    async fn test_run_is_repeatable() {
        let (requester, _) = hello_requester();

        let mut first = CollectingSink::new();
        let mut second = CollectingSink::new();
        requester.run(&mut first).await.unwrap();
        requester.run(&mut second).await.unwrap();

        assert_eq!(first.chunks(), second.chunks());
    }

    #[tokio::test]
    async fn test_provider_failure_prints_nothing() {
        let config = RequesterConfig::new("http://localhost:11434");
        let requester =
            CompletionRequester::with_provider(config, Box::new(FailingProvider)).unwrap();
        let mut sink = CollectingSink::new();

        let result = requester.run(&mut sink).await;

        assert!(matches!(result, Err(Error::Connection(_))));
        assert!(sink.chunks().is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = RequesterConfig::new("");
        assert!(matches!(
            CompletionRequester::new(config),
            Err(Error::Config(_))
        ));
    }
}
