use notion_relay_core::config::Config;
use std::sync::Arc;

use crate::services::notion_client::NotionClient;

/// Shared application state. Holds no per-request data; every dispatch is
/// independent.
#[derive(Clone)]
pub struct AppState {
  pub config: Arc<Config>,
  pub notion: NotionClient,
}

impl AppState {
  pub fn new(config: Config) -> Result<Self, reqwest::Error> {
    let http = reqwest::Client::builder()
      .user_agent(concat!("notion-relay/", env!("CARGO_PKG_VERSION")))
      .build()?;
    let config = Arc::new(config);
    Ok(Self {
      notion: NotionClient::new(http, config.clone()),
      config,
    })
  }
}
