use crate::notion::{DEFAULT_API_BASE, DEFAULT_NOTION_VERSION};

/// Server configuration resolved from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
  pub port: u16,
  pub notion_api_base: String,
  pub notion_version: String,
  /// Directory holding the browser client. Static hosting is off when unset.
  pub public_dir: Option<String>,
}

impl Config {
  pub fn from_env() -> Self {
    Self {
      port: std::env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(8080),
      notion_api_base: std::env::var("NOTION_API_BASE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.trim().trim_end_matches('/').to_string())
        .unwrap_or_else(|| DEFAULT_API_BASE.into()),
      notion_version: std::env::var("NOTION_VERSION")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_NOTION_VERSION.into()),
      public_dir: std::env::var("PUBLIC_DIR").ok().filter(|v| !v.is_empty()),
    }
  }

  /// Absolute URL for a Notion API path such as `/v1/pages/abc`.
  pub fn api_url(&self, path: &str) -> String {
    format!("{}{}", self.notion_api_base.trim_end_matches('/'), path)
  }
}

impl Default for Config {
  fn default() -> Self {
    Self {
      port: 8080,
      notion_api_base: DEFAULT_API_BASE.into(),
      notion_version: DEFAULT_NOTION_VERSION.into(),
      public_dir: None,
    }
  }
}
