//! Server lifecycle.

use crate::{AppState, ServerConfig, router};
use castscript_error::{CastscriptResult, ServerError, ServerErrorKind};
use tokio::net::TcpListener;
use tracing::{info, instrument, warn};

/// Bind the configured address and serve until Ctrl-C.
///
/// In-flight requests finish before the function returns.
#[instrument(skip_all, fields(bind = %config.bind()))]
pub async fn serve(state: AppState, config: &ServerConfig) -> CastscriptResult<()> {
    let listener = TcpListener::bind(config.bind()).await.map_err(|e| {
        ServerError::new(ServerErrorKind::Bind {
            address: config.bind().clone(),
            message: e.to_string(),
        })
    })?;

    if let Ok(address) = listener.local_addr() {
        info!(%address, "Listening");
    }

    axum::serve(listener, router(state, config))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::new(ServerErrorKind::Serve(e.to_string())))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Could not listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
