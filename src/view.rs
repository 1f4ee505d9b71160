use crate::controller::LifecycleState;
use crate::models::{GenerationResult, Notification, Severity};

pub const SUBMIT_LABEL: &str = "Сгенерировать сайт";
pub const LOADING_LABEL: &str = "Генерация...";

/// Text for the result region. Empty for `Idle` and `Failed`.
pub fn render_state(state: &LifecycleState) -> String {
    match state {
        LifecycleState::Idle | LifecycleState::Failed => String::new(),
        LifecycleState::Generating => format!("⏳ {}", LOADING_LABEL),
        LifecycleState::Succeeded(result) => render_result(result),
    }
}

pub fn submit_label(state: &LifecycleState) -> &'static str {
    if state.is_generating() { LOADING_LABEL } else { SUBMIT_LABEL }
}

fn render_result(result: &GenerationResult) -> String {
    let template = &result.template;
    let mut out = Vec::new();
    out.push(format!("✨ {}", template.name));
    out.push(format!(
        "{} компонентов · {} сек",
        result.components_count, result.estimated_time
    ));
    let badges: Vec<String> = template.sections.iter().map(|s| format!("[{}]", s)).collect();
    out.push(format!("Разделы: {}", badges.join(" ")));
    out.push(format!("Цвета: {}", template.colors.join(" ")));
    out.push(format!("Превью: {}", template.preview_url));
    out.push("[Открыть редактор] [Скачать код]".to_string());
    out.join("\n")
}

pub fn render_notification(n: &Notification) -> String {
    let marker = match n.severity {
        Severity::Normal => "✅",
        Severity::Destructive => "❌",
    };
    format!("{} {}: {}", marker, n.title, n.message)
}
