use tracing::{error, info};
use vercel_runtime::{Body, Error, Request, Response, StatusCode};

use crate::{
    clients::ChatProvider,
    config::ChatConfig,
    error::{AppError, Result},
    http::{
        cors::{add_allow, add_cors},
        response::{empty_response, error_response, json_response},
    },
    models::{chat::ChatRequest, reply::ChatReply},
    services::ChatService,
};

/// The `/api/chat` function: CORS, method gate, credential gate, then the chat service.
pub struct ChatHandler<P> {
    config: ChatConfig,
    service: ChatService<P>,
}

impl<P: ChatProvider> ChatHandler<P> {
    pub fn new(config: ChatConfig, provider: P) -> Self {
        let service = ChatService::new(provider, config.strategy);
        Self { config, service }
    }

    pub async fn handle(&self, req: Request) -> std::result::Result<Response<Body>, Error> {
        self.respond(req.method().as_str(), req.body()).await
    }

    pub async fn respond(&self, method: &str, body: &[u8]) -> std::result::Result<Response<Body>, Error> {
        let resp = match method {
            "OPTIONS" => empty_response(StatusCode::OK)?,
            _ => match self.chat(method, body).await {
                Ok(reply) => json_response(StatusCode::OK, &reply)?,
                Err(err) => {
                    let (status, payload) = error_response(&err);
                    if status.is_server_error() {
                        error!(error = %err, "chat request failed");
                    } else {
                        info!(%status, error = %err, "chat request rejected");
                    }
                    let resp = json_response(status, &payload)?;
                    match err {
                        AppError::MethodNotAllowed => add_allow(resp),
                        _ => resp,
                    }
                }
            },
        };
        Ok(add_cors(resp))
    }

    async fn chat(&self, method: &str, body: &[u8]) -> Result<ChatReply> {
        if method != "POST" {
            return Err(AppError::MethodNotAllowed);
        }
        self.config.require_api_key()?;
        let request = ChatRequest::parse(body)?;
        self.service.reply(&request.messages).await
    }
}
