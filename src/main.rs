use std::sync::Arc;

use anyhow::Context;
use palss_backend::{
    config::{self, ConfigSource, ServerSettings},
    init_tracing, routes,
    services::openai::OpenAiClient,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before tracing, so RUST_LOG may come from the dotenv file.
    let env_file = config::load_dotenv(config::dotenv_path());
    init_tracing();
    config::log_startup_diagnostics(&env_file);

    let settings = ServerSettings::from_env()?;
    let client = OpenAiClient::new(&settings.openai_base_url, settings.request_timeout)
        .context("failed to build OpenAI HTTP client")?;

    let state = Arc::new(AppState::new(ConfigSource::Environment, Arc::new(client)));
    let app = routes::create_router().with_state(state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("palss backend running at http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
