use std::sync::Arc;

use miku_chat_api::{clients::GeminiClient, http::ChatHandler, ChatConfig};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vercel_runtime::{run, Error, Request};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // Local `vercel dev` reads secrets from .env; deployed functions get real env vars.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer().without_time())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ChatConfig::from_env()?;
    if config.api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; every chat request will fail until it is");
    }
    info!(model = %config.model, strategy = ?config.strategy, "chat function starting");

    let client = GeminiClient::new(&config)?;
    let handler = Arc::new(ChatHandler::new(config, client));

    run(move |req: Request| {
        let handler = Arc::clone(&handler);
        async move { handler.handle(req).await }
    })
    .await
}
