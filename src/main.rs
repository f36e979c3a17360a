use axum::Router;
use samcrypto::config::Config;
use samcrypto::sources::HttpMarketSource;
use samcrypto::{api, AppState};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Interval between sweeps of expired cache entries.
const CACHE_SWEEP_SECS: u64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "samcrypto=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Starting samcrypto server on {}", config.bind_address());
    info!(
        "Cache TTLs: price {:?}, sentiment {:?}, order book {:?}, on-chain {:?}",
        config.cache_ttls.price,
        config.cache_ttls.sentiment,
        config.cache_ttls.order_book,
        config.cache_ttls.onchain
    );

    let source = Arc::new(HttpMarketSource::from_config(&config));
    let state = AppState::new(config, source);

    // Periodically drop expired cache entries
    {
        let aggregator = state.aggregator.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(tokio::time::Duration::from_secs(CACHE_SWEEP_SECS)).await;
                let removed = aggregator.cleanup_expired();
                if removed > 0 {
                    debug!("Swept {} expired cache entries", removed);
                }
            }
        });
    }

    // Build CORS layer
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let addr = state.config.bind_address();

    // Build the router
    let app = Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("samcrypto server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
