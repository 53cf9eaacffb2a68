//! HTTP service command handler.

use castscript::{AppState, CastscriptResult, ConversationStore, Settings, TextGenerator, serve};
use std::sync::Arc;

/// Handle the `serve` command
pub async fn run_server(
    settings: &Settings,
    generator: Arc<dyn TextGenerator>,
    bind: Option<String>,
) -> CastscriptResult<()> {
    let mut server = settings.server().clone();
    if let Some(bind) = bind {
        server = server.with_bind(bind);
    }

    let state = AppState::new(
        generator,
        ConversationStore::shared(settings.history().clone()),
        settings.upstream().retry.clone(),
        settings.pipeline().clone(),
    )?;

    tracing::info!(bind = %server.bind(), "Starting castscript server. Press Ctrl+C to stop.");
    serve(state, &server).await
}
