use tracing::{info, warn};

use crate::{
    clients::ChatProvider,
    error::{AppError, Result},
    models::{
        chat::ChatMessage,
        gemini::GenerateContentResponse,
        prompt::{build_request, PromptStrategy},
        reply::ChatReply,
    },
};

/// Sent instead of nothing when Gemini withholds a reply on policy grounds.
pub const SAFETY_FALLBACK_REPLY: &str = "Let's talk about something else, love.";
/// Sent when Gemini answered but produced no text.
pub const EMPTY_FALLBACK_REPLY: &str = "I'm here.";

const SAFETY_FINISH_REASONS: [&str; 4] = ["SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

pub struct ChatService<P> {
    provider: P,
    strategy: PromptStrategy,
}

impl<P: ChatProvider> ChatService<P> {
    pub fn new(provider: P, strategy: PromptStrategy) -> Self {
        Self { provider, strategy }
    }

    pub async fn reply(&self, messages: &[ChatMessage]) -> Result<ChatReply> {
        let request = build_request(self.strategy, messages);
        info!(strategy = ?self.strategy, messages = messages.len(), "forwarding chat turn");
        let response = self.provider.generate(&request).await?;
        normalize(response)
    }
}

pub fn normalize(mut response: GenerateContentResponse) -> Result<ChatReply> {
    if let Some(err) = response.error.take() {
        warn!(code = ?err.code, status = ?err.status, message = ?err.message, "gemini returned an error");
        return Err(AppError::Provider(
            err.message.unwrap_or_else(|| "Gemini API error".to_string()),
        ));
    }

    if is_safety_suppressed(&response) {
        info!("gemini suppressed the reply, sending fallback");
        return Ok(ChatReply::text(SAFETY_FALLBACK_REPLY));
    }

    match response.first_text().map(str::trim).filter(|t| !t.is_empty()) {
        Some(text) => Ok(ChatReply::text(text)),
        None => {
            warn!(finish_reason = ?response.first_finish_reason(), "gemini returned no text");
            Ok(ChatReply::text(EMPTY_FALLBACK_REPLY))
        }
    }
}

fn is_safety_suppressed(response: &GenerateContentResponse) -> bool {
    if let Some(reason) = response.first_finish_reason() {
        return SAFETY_FINISH_REASONS.contains(&reason);
    }
    response.candidates.is_empty()
        && response
            .prompt_feedback
            .as_ref()
            .is_some_and(|f| f.block_reason.is_some())
}
