use clap::Parser;
use reqline_server::{telemetry, AppState, Config, ServeError};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ServeError> {
    let config = Config::parse();
    telemetry::initialise(&config)?;

    let listener = TcpListener::bind(config.addr()).await?;
    info!(addr = %listener.local_addr()?, timeout_ms = config.timeout_ms, "listening");
    reqline_server::run(listener, AppState::from_config(&config)).await?;
    Ok(())
}
