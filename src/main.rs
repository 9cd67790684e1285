use forum::config::{self, AppCfg};
use forum::AppState;
use tracing::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = AppCfg::load()?;

    config::tracing::init();

    let state = AppState::build(&cfg).await?;
    let app = forum::router(state);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    info!("starting listening at {}", cfg.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
