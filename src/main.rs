use std::panic;

use tokio::io::AsyncReadExt;
use tracing_subscriber::EnvFilter;

use devdash_judge::api::{
    mappers::parse_request,
    models::{ErrorResponse, JudgeResponse},
};
use devdash_judge::config::JudgeConfig;
use devdash_judge::core::engine::JudgeEngine;

/// Judges one submission read as JSON from the file named by the first
/// argument (or stdin) and prints the JSON response on stdout.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    set_panic_hook();

    let config = JudgeConfig::from_env()?;
    tracing::debug!("Configuration: {:?}", config);
    let engine = JudgeEngine::native(&config);

    let body = read_request().await?;
    let response = match parse_request(&body) {
        Ok(submission) => {
            tokio::select! {
                result = engine.judge(&submission) => match result {
                    Ok(result) => JudgeResponse::from(result),
                    Err(e) => JudgeResponse::from(&e),
                },
                _ = tokio::signal::ctrl_c() => {
                    tracing::warn!("Interrupted, abandoning submission {}", submission.id);
                    JudgeResponse::Failed(ErrorResponse::internal(
                        "Judging was interrupted".to_string(),
                    ))
                }
            }
        }
        Err(e) => {
            tracing::warn!("Rejected request: {}", e);
            JudgeResponse::from(&e)
        }
    };
    tracing::debug!("Live workspaces: {}", engine.workspaces().active());

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}

async fn read_request() -> std::io::Result<String> {
    match std::env::args().nth(1) {
        Some(path) => tokio::fs::read_to_string(path).await,
        None => {
            let mut body = String::new();
            tokio::io::stdin().read_to_string(&mut body).await?;
            Ok(body)
        }
    }
}

fn set_panic_hook() {
    panic::set_hook(Box::new(|panic_info| {
        tracing::error!(
            message = "panic occurred",
            panic = %panic_info
        );
    }));
}
