use thiserror::Error;

/// Errors that can occur while requesting a streamed completion.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Request failed: {message}")]
    Request {
        /// HTTP status returned by the endpoint, if the failure carried one.
        status: Option<u16>,
        message: String,
    },

    #[error("Streaming error: {0}")]
    Stream(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write chunk to sink: {0}")]
    Sink(#[from] std::io::Error),
}

impl Error {
    pub fn config(message: impl Into<String>) -> Self {
        Error::Config(message.into())
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Error::Connection(message.into())
    }

    pub fn request(message: impl Into<String>) -> Self {
        Error::Request {
            status: None,
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Error::Request {
            status: Some(status),
            message: format!("HTTP {status}: {}", message.into()),
        }
    }

    pub fn stream(message: impl Into<String>) -> Self {
        Error::Stream(message.into())
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        let message = error_chain(&error);

        // Nothing was exchanged: the client could not be built, the host could not be
        // reached, or the peer hung up before sending a response head.
        if error.is_builder() || error.is_connect() || closed_before_response(&error) {
            return Error::Connection(message);
        }

        Error::Request {
            status: error.status().map(|s| s.as_u16()),
            message,
        }
    }
}

/// Render an error followed by each of its sources, separated by `": "`.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.ends_with(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

fn closed_before_response(error: &reqwest::Error) -> bool {
    if error.status().is_some() || !error.is_request() {
        return false;
    }

    let mut source = std::error::Error::source(error);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
                    | std::io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        // hyper reports a dropped socket without an io::Error underneath
        if cause
            .to_string()
            .contains("connection closed before message completed")
        {
            return true;
        }
        source = cause.source();
    }
    false
}
