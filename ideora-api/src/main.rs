mod config;

mod app;
mod buddies;
mod ctx;
mod db;
mod dreams;
mod errors;
mod goals;
mod guidance;
mod openapi;
mod telemetry;

use std::net::SocketAddr;

use aide::axum::ApiRouter;
use app::AppParams;
pub use config::config;
pub use db::{init_db, DB};
pub use errors::{Error, Result};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> errors::Result<()> {
    let config = config();

    telemetry::setup_tracing(config);

    let conn = init_db().await?;

    let (app, _api) = app::create(AppParams {
        db: conn,
        router: |state| {
            ApiRouter::new()
                .merge(dreams::router(state.clone()))
                .merge(goals::router(state))
                .merge(guidance::router())
        },
    })
    .await?;

    let app = telemetry::add_tracing_layer(app);

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .map_err(|e| Error::Unexpected(format!("failed to bind {}: {e}", config.bind_addr())))?;

    tracing::info!("listening on http://{}", config.bind_addr());

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| Error::Unexpected(e.to_string()))?;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}
