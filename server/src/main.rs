use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use todo_server::config::ServerArgs;
use todo_server::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .init();

    let config = ServerArgs::parse().into_config()?;
    let state = AppState::from_config(&config);

    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(
        user = %config.credentials.username(),
        "starting server at {}",
        config.bind
    );
    todo_server::run(listener, state).await?;
    Ok(())
}
