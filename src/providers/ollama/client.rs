use super::types::{OllamaError, OllamaGenerateChunk, OllamaGenerateRequest};
use crate::config::validate_base_url;
use crate::ndjson_stream::NdjsonStreamExt;
use crate::provider::CompletionProvider;
use crate::{Error, GenerateRequest, Response, StreamEvent};
use futures_util::StreamExt;
use reqwest::Client;
use tracing::{debug, warn};

/// Ollama provider implementation.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
}

impl OllamaProvider {
    /// Create a new Ollama provider for the server at `base_url`.
    ///
    /// No request timeout is set; the transport defaults apply.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::connection(format!("Failed to build HTTP client: {e}")))?;

        Self::with_client(client, base_url)
    }

    /// Create a new Ollama provider reusing an existing HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Result<Self, Error> {
        let base_url = validate_base_url(&base_url.into())?;

        Ok(Self { client, base_url })
    }

    /// The normalized server URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    /// Convert a generation request to the Ollama wire format.
    fn convert_request(request: &GenerateRequest) -> OllamaGenerateRequest {
        OllamaGenerateRequest {
            model: request.model.clone(),
            prompt: request.prompt.clone(),
            stream: true,
            think: request.think.then_some(true),
        }
    }

    /// Convert one streamed record into stream events.
    ///
    /// Thinking text is emitted before answer text from the same record.
    fn convert_chunk(chunk: OllamaGenerateChunk) -> Result<Vec<StreamEvent>, Error> {
        if let Some(error) = chunk.error.as_deref() {
            return Err(Error::request(error));
        }

        let mut events = Vec::with_capacity(2);

        if let Some(thinking) = chunk.thinking.as_deref() {
            if !thinking.is_empty() {
                events.push(StreamEvent::Thinking {
                    delta: thinking.to_string(),
                });
            }
        }

        if let Some(response) = chunk.response.as_deref() {
            if !response.is_empty() {
                events.push(StreamEvent::Content {
                    delta: response.to_string(),
                });
            }
        }

        if chunk.done {
            events.push(StreamEvent::Done {
                stats: chunk.stats(),
                done_reason: chunk.done_reason,
            });
        }

        Ok(events)
    }

    /// Turn an error response into a request error, surfacing Ollama's message when present.
    async fn error_from_response(response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => return Error::status(status, format!("unreadable error body: {e}")),
        };

        let message = match serde_json::from_str::<OllamaError>(&body) {
            Ok(error) => error.error,
            Err(_) if body.trim().is_empty() => "empty response body".to_string(),
            Err(_) => body.trim().to_string(),
        };

        Error::status(status, message)
    }
}

#[async_trait::async_trait]
impl CompletionProvider for OllamaProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<Response, Error> {
        let url = self.generate_url();
        let body = Self::convert_request(request);

        debug!(url = %url, model = %request.model, think = request.think, "Sending generate request");

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            let error = Self::error_from_response(response).await;
            warn!(url = %url, error = %error, "Generate request rejected");
            return Err(error);
        }

        debug!(status = %response.status(), "Streaming response");

        let event_stream = response
            .bytes_stream()
            .ndjson_records::<OllamaGenerateChunk>()
            .map(|record| match record.and_then(Self::convert_chunk) {
                Ok(events) => events.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            })
            .map(futures_util::stream::iter)
            .flatten()
            // Nothing after the done record or the first error is part of this generation
            .scan(false, |finished, item| {
                if *finished {
                    return futures_util::future::ready(None);
                }
                *finished = matches!(item, Ok(StreamEvent::Done { .. }) | Err(_));
                futures_util::future::ready(Some(item))
            });

        Ok(Response::from_stream(event_stream))
    }
}
