use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use feddit_sentiment::analysis::{BatchClassifier, GeminiModel};
use feddit_sentiment::config::AppConfig;
use feddit_sentiment::feddit::FedditClient;
use feddit_sentiment::monitor::Monitor;
use feddit_sentiment::service::SentimentService;
use feddit_sentiment::storage::MemoryRepository;
use feddit_sentiment::web;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "feddit_sentiment=info,tower_http=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = AppConfig::load()?;

    let source = Arc::new(FedditClient::new(&config.feddit)?);
    let model = Arc::new(GeminiModel::new(&config.gemini)?);
    let classifier = Arc::new(BatchClassifier::new(model, config.gemini.batch_size));
    let repository = Arc::new(MemoryRepository::new());

    let service = Arc::new(SentimentService::new(
        source,
        classifier,
        repository,
        config.feddit.subfeddit_page_size,
    ));

    info!(
        "Feddit at {}, Gemini model {} (batch size {})",
        config.feddit.base_url, config.gemini.model, config.gemini.batch_size
    );

    let monitor_handle = if config.monitor.enabled {
        let monitor = Monitor::new(service.clone(), &config.monitor);
        Some(tokio::spawn(monitor.run()))
    } else {
        None
    };

    let router = web::create_router(web::state::AppState::new(service));
    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting web server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let web_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            error!("Web server error: {:#}", e);
        }
    });

    match monitor_handle {
        Some(monitor_handle) => {
            tokio::select! {
                result = monitor_handle => match result {
                    Ok(()) => info!("Monitor task ended"),
                    Err(e) => error!("Monitor task failed: {}", e),
                },
                result = web_handle => match result {
                    Ok(()) => info!("Web server ended"),
                    Err(e) => error!("Web server task failed: {}", e),
                },
            }
        }
        None => match web_handle.await {
            Ok(()) => info!("Web server ended"),
            Err(e) => error!("Web server task failed: {}", e),
        },
    }

    Ok(())
}
