pub mod gemini;

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::Result,
    models::gemini::{GenerateContentRequest, GenerateContentResponse},
};

pub use gemini::GeminiClient;

/// Anything that can answer a `generateContent` request.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse>;
}

#[async_trait]
impl<T: ChatProvider + ?Sized> ChatProvider for Arc<T> {
    async fn generate(&self, request: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        (**self).generate(request).await
    }
}
