#![warn(clippy::all)]

use std::net::SocketAddr;

use clap::Parser;
use tracing_subscriber::fmt::format::FmtSpan;

use quiz_api::config::{Args, Settings};
use quiz_api::{routes, store};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    let settings = Settings::load(&args)?;

    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "quiz_api={},handle_errors={},warp=error",
            settings.log_level, settings.log_level
        )
    });

    tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        // emits an event when each route span closes
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let store = store::Store::new(&settings.database_url, settings.max_connections).await?;
    store.migrate().await?;

    let address: SocketAddr = format!("{}:{}", settings.host, settings.port).parse()?;
    let (bound, server) = warp::serve(routes::routes(store.clone()))
        .try_bind_with_graceful_shutdown(address, async {
            tokio::signal::ctrl_c().await.ok();
        })?;

    tracing::info!("Q&A service listening on {}", bound);
    server.await;

    store.connection.close().await;
    tracing::info!("Q&A service stopped");

    Ok(())
}
