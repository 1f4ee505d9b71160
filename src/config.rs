pub const DEFAULT_GENERATOR_URL: &str = "http://127.0.0.1:8080/api/generate";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub generator_url: String,
    pub port: u16,
}

impl Config {
    /// Reads `.env` (if any) then the process environment.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let generator_url = lookup("GENERATOR_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_GENERATOR_URL.to_string());
        let port = lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(DEFAULT_PORT);
        Self { generator_url, port }
    }
}
