use std::sync::Arc;

use docs_assist::cli::Session;
use docs_assist::config::AssistConfig;
use docs_assist::gateway::{Gateway, HttpGateway};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AssistConfig::from_env();

    eprintln!("📚 Docs Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", config.base_url);
    if let Some(timeout) = config.request_timeout {
        eprintln!("   Timeout: {}s", timeout.as_secs());
    }
    if let Some(page) = &config.page_path {
        eprintln!("   Page: {}", page);
    }
    match &config.translate_path {
        Some(path) => eprintln!("   Translation: {}", config.endpoint(path)),
        None => eprintln!("   Translation: disabled"),
    }
    eprintln!("   Type a question and press Enter. /help for commands.\n");

    let gateway: Arc<dyn Gateway> = Arc::new(HttpGateway::from_config(&config)?);
    Session::new(&config, gateway).run().await?;

    Ok(())
}
