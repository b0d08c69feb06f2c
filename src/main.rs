mod app;
mod config;
mod cursor;
mod enums;
mod error;
mod form;
mod record;
mod render;
mod routes;
mod states;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::build_app;
use crate::config::Config;
use crate::states::app_state::AppState;
use crate::states::review_session::ReviewSession;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let layout = config.layout();
    tracing::info!(?layout, "starting quiz reviewer");

    let state = AppState::new(ReviewSession::new(layout));
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
