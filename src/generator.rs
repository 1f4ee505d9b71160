use crate::models::{GenerationRequest, GenerationResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("transport error: {0}")] Transport(String),
    #[error("service returned {status}: {body}")] Status { status: StatusCode, body: String },
    #[error("malformed response: {0}")] Decode(String),
}

/// The remote system that turns a description into a template.
#[async_trait]
pub trait GenerationService: Send + Sync + 'static {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError>;
}

// Keeps logged bodies short
fn preview(body: &str) -> String {
    const LIMIT: usize = 200;
    match body.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}...[{} chars total]", &body[..cut], body.chars().count()),
        None => body.to_string(),
    }
}

pub struct HttpGenerationService {
    client: Client,
    endpoint: String,
}

impl HttpGenerationService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { client: Client::new(), endpoint: endpoint.into() }
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, GenerationError> {
        info!("🔗 POST {} (style={}, {} chars)", self.endpoint, request.style, request.description.chars().count());

        let response = self.client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = response.status();
        debug!("📥 Response status: {}", status);

        let body = response.text().await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!("❌ Generation service error {}: {}", status, preview(&body));
            return Err(GenerationError::Status { status, body: preview(&body) });
        }

        debug!("📥 Raw generation response: {}", preview(&body));

        serde_json::from_str(&body)
            .map_err(|e| GenerationError::Decode(format!("{}: {}", e, preview(&body))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_keeps_short_bodies() {
        assert_eq!(preview("ok"), "ok");
    }

    #[test]
    fn preview_cuts_on_char_boundary() {
        let long = "ж".repeat(300);
        let p = preview(&long);
        assert!(p.starts_with(&"ж".repeat(200)));
        assert!(p.ends_with("[300 chars total]"));
    }
}
