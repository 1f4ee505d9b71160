//! Demo generation service. Picks one of three canned templates by keyword.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

use crate::models::{GeneratedTemplate, GenerationRequest, GenerationResult};

pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MAX_DESCRIPTION_CHARS: usize = 2000;
pub const ESTIMATED_TIME_SECS: f64 = 45.0;
const PREVIEW_URL: &str = "https://v3.fal.media/files/koala/VZb58nzUzvn2JP8DpmS6B_output.png";

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")] BadJson(String),
    #[error(
        "description must be between {min} and {max} characters, got {got}",
        min = MIN_DESCRIPTION_CHARS,
        max = MAX_DESCRIPTION_CHARS
    )]
    DescriptionLength { got: usize },
    #[error("Method not allowed")] MethodNotAllowed,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match self {
            ServiceError::BadJson(_) => StatusCode::BAD_REQUEST,
            ServiceError::DescriptionLength { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Landing,
    Portfolio,
    Ecommerce,
}

impl TemplateKind {
    pub fn classify(description: &str) -> Self {
        let lower = description.to_lowercase();
        let hit = |words: &[&str]| words.iter().any(|w| lower.contains(w));
        if hit(&["магазин", "shop", "каталог", "товар"]) {
            TemplateKind::Ecommerce
        } else if hit(&["портфолио", "portfolio", "работы", "проект"]) {
            TemplateKind::Portfolio
        } else {
            TemplateKind::Landing
        }
    }

    pub fn template(self) -> GeneratedTemplate {
        let (name, sections, colors) = match self {
            TemplateKind::Landing => ("Современный лендинг", ["Hero", "Features", "CTA", "Footer"], ["#2563EB", "#10B981"]),
            TemplateKind::Portfolio => ("Портфолио", ["About", "Projects", "Skills", "Contact"], ["#8B5CF6", "#EC4899"]),
            TemplateKind::Ecommerce => ("Интернет-магазин", ["Catalog", "Cart", "Checkout", "About"], ["#F97316", "#EAB308"]),
        };
        GeneratedTemplate {
            name: name.to_string(),
            sections: sections.iter().map(|s| s.to_string()).collect(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            preview_url: PREVIEW_URL.to_string(),
        }
    }
}

pub async fn generate_site(
    body: Result<Json<GenerationRequest>, JsonRejection>,
) -> Result<Json<GenerationResult>, ServiceError> {
    let Json(req) = body.map_err(|e| ServiceError::BadJson(e.body_text()))?;
    let len = req.description.chars().count();
    if !(MIN_DESCRIPTION_CHARS..=MAX_DESCRIPTION_CHARS).contains(&len) {
        tracing::warn!("⚠️ Rejecting description of {} chars", len);
        return Err(ServiceError::DescriptionLength { got: len });
    }

    let kind = TemplateKind::classify(&req.description);
    let template = kind.template();
    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, ?kind, style = %req.style, "🎯 Generated template '{}'", template.name);

    Ok(Json(GenerationResult {
        components_count: template.sections.len() as u32,
        template,
        estimated_time: ESTIMATED_TIME_SECS,
        status: "ready".to_string(),
        request_id: Some(request_id.to_string()),
    }))
}

async fn method_not_allowed() -> ServiceError { ServiceError::MethodNotAllowed }

pub fn router() -> Router {
    Router::new()
        .route("/api/generate", post(generate_site)
                .options(|| async { StatusCode::OK })
                .fallback(method_not_allowed))
        .route("/healthz", get(|| async { "ok" }))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
}
