use crate::{Error, GenerateRequest, Response};

/// A trait for inference servers that can stream a generated completion.
/// The returned response is consumed with `response.stream()`,
/// `response.forward_to(sink)` or `response.text().await`.
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync + 'static {
    /// Issue one generation request and return its event stream.
    async fn generate(&self, request: &GenerateRequest) -> Result<Response, Error>;
}
