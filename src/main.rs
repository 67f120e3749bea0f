//! CLI entrypoint: stream the fixed prompt's completion to stdout.

use ollama_stream::config::load_env_file;
use ollama_stream::{
    ChunkSink, Completion, CompletionRequester, EnvFilePolicy, Error, RequesterConfig, StdoutSink,
};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before the subscriber so RUST_LOG from the file applies
    let policy = EnvFilePolicy::from_lookup(|key| std::env::var(key).ok());
    let env_file = load_env_file(policy);

    // stdout carries the response text, so logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match env_file {
        Ok(_) => run().await,
        Err(e) => Err(e),
    };

    match result {
        Ok(completion) => {
            debug!(chunks = completion.chunks, "Done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            debug!(error = ?e, "Completion failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<Completion, Error> {
    let config = RequesterConfig::from_env()?;
    let requester = CompletionRequester::new(config)?;

    let mut stdout = StdoutSink::stdout();
    let completion = requester.run(&mut stdout).await?;
    stdout.accept("\n").await?;

    Ok(completion)
}
