//! Backend selection and a round trip through a local server.

use castscript::{
    AppState, ConversationStore, HistoryConfig, PipelineConfig, RetryPolicy, ServerConfig,
    Settings, TextGenerator, build_generator, router,
};
use tokio::net::TcpListener;

#[test]
fn test_gateway_url_selects_gateway_client() -> anyhow::Result<()> {
    let generator = build_generator(&Settings::default(), Some("http://127.0.0.1:3000/"))?;

    assert_eq!(generator.provider_name(), "gateway");
    assert_eq!(generator.model_name(), "http://127.0.0.1:3000");
    Ok(())
}

#[tokio::test]
async fn test_gateway_chain_reports_upstream_failure() -> anyhow::Result<()> {
    // The upstream server is itself a gateway to a closed port
    let upstream = build_generator(&Settings::default(), Some("http://127.0.0.1:9"))?;
    let state = AppState::new(
        upstream,
        ConversationStore::shared(HistoryConfig::default()),
        RetryPolicy::disabled(),
        PipelineConfig::default(),
    )?;
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(state, &ServerConfig::default())).await;
    });

    let url = format!("http://{}", address);
    let client = build_generator(&Settings::default(), Some(url.as_str()))?;
    let err = client.generate_text("Hello").await.unwrap_err();

    assert!(
        err.user_message()
            .contains("Failed to process with Gemini API")
    );
    Ok(())
}
