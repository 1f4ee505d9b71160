use serde::{Serialize, Deserialize};

/// Style tag sent with every generation request.
pub const DEFAULT_STYLE: &str = "modern";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationRequest {
    pub description: String,
    #[serde(default = "default_style")]
    pub style: String,
}

fn default_style() -> String { DEFAULT_STYLE.to_string() }

impl GenerationRequest {
    /// Builds the outbound request. The description is sent untrimmed.
    pub fn new(description: impl Into<String>) -> Self {
        Self { description: description.into(), style: DEFAULT_STYLE.to_string() }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeneratedTemplate {
    pub name: String,
    pub sections: Vec<String>,
    pub colors: Vec<String>, // passed through to swatches unvalidated
    pub preview_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GenerationResult {
    pub template: GeneratedTemplate,
    pub estimated_time: f64,
    pub components_count: u32,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>, // opaque, passed through
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Normal,
    Destructive,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn generated(result: &GenerationResult) -> Self {
        Self {
            title: "Сайт сгенерирован!".to_string(),
            message: format!(
                "Шаблон «{}» готов за {} сек",
                result.template.name, result.estimated_time
            ),
            severity: Severity::Normal,
        }
    }

    pub fn generation_failed() -> Self {
        Self {
            title: "Ошибка".to_string(),
            message: "Не удалось сгенерировать сайт. Попробуйте ещё раз.".to_string(),
            severity: Severity::Destructive,
        }
    }
}
