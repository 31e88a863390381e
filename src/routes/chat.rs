use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    config::current_dir_display,
    error::{AppError, error_chain},
    message::{ChatRequest, ChatResponse, HealthResponse},
    services::chatbot::generate_reply,
    state::SharedState,
};

pub async fn chat_handler(
    State(state): State<SharedState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(payload) = payload?;

    tracing::debug!(
        client_id = payload.client_id.is_some(),
        session_id = payload.session_id.is_some(),
        "chat request received"
    );

    let config = state.config.load();
    let Some(api_key) = config.api_key.as_deref() else {
        tracing::error!("OPENAI_API_KEY is not set. cwd={}", current_dir_display());
        return Err(AppError::MissingApiKey);
    };

    let reply = generate_reply(
        state.completions.as_ref(),
        api_key,
        &config.model,
        &config.system_prompt,
        &payload.message,
    )
    .await
    .map_err(|e| {
        tracing::error!(
            error = %error_chain(&e),
            model = %config.model,
            "OpenAI call failed"
        );
        AppError::from(e)
    })?;

    Ok(Json(ChatResponse { reply }))
}

// Liveness only; never inspects config or the upstream.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}
