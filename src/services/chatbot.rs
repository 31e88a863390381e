use crate::services::openai::{ChatCompletionRequest, ChatCompletions, ChatMessage, UpstreamError};

/// System prompt first, then the user's message.
pub fn build_conversation(system_prompt: &str, user_msg: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(system_prompt), ChatMessage::user(user_msg)]
}

/// Ask the upstream model for a reply to a single message.
///
/// One call, no retry. A null or missing content becomes an empty reply.
/// The caller has already checked that a key is configured.
pub async fn generate_reply(
    client: &dyn ChatCompletions,
    api_key: &str,
    model: &str,
    system_prompt: &str,
    user_msg: &str,
) -> Result<String, UpstreamError> {
    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: build_conversation(system_prompt, user_msg),
    };

    let response = client.create(api_key, &request).await?;
    let reply = response.first_content()?.unwrap_or_default().to_string();
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::openai::Role;

    #[test]
    fn conversation_is_system_then_user() {
        let messages = build_conversation("prompt", "料金プランを教えてください");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, "prompt");
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "料金プランを教えてください");
    }
}
