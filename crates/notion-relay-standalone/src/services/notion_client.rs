use axum::http::{header, StatusCode};
use notion_relay_core::config::Config;
use notion_relay_core::notion::{CallMethod, OutboundCall};
use serde_json::Value;
use std::sync::Arc;

/// Status and decoded JSON body of a Notion API response.
#[derive(Debug)]
pub struct UpstreamResponse {
  pub status: StatusCode,
  pub body: Value,
}

/// Thin wrapper over a shared `reqwest::Client`. Every call is attempted once.
#[derive(Clone)]
pub struct NotionClient {
  http: reqwest::Client,
  config: Arc<Config>,
}

impl NotionClient {
  pub fn new(http: reqwest::Client, config: Arc<Config>) -> Self {
    Self { http, config }
  }

  /// Execute one Notion API call. Transport failures and bodies that are not
  /// JSON both surface as `reqwest::Error`; HTTP error statuses do not.
  pub async fn send(
    &self,
    api_key: &str,
    call: &OutboundCall,
  ) -> Result<UpstreamResponse, reqwest::Error> {
    let url = self.config.api_url(&call.path);
    let builder = match call.method {
      CallMethod::Post => self.http.post(&url),
      CallMethod::Patch => self.http.patch(&url),
    };

    let resp = builder
      .bearer_auth(api_key)
      .header("Notion-Version", &self.config.notion_version)
      .header(header::CONTENT_TYPE, "application/json")
      .body(call.body.to_string())
      .send()
      .await?;

    let status = resp.status();
    let body = resp.json::<Value>().await?;
    Ok(UpstreamResponse { status, body })
  }

  /// Fetch an arbitrary URL with the caller's bearer token attached.
  pub async fn fetch_image(
    &self,
    url: reqwest::Url,
    api_key: &str,
  ) -> Result<reqwest::Response, reqwest::Error> {
    self.http.get(url).bearer_auth(api_key).send().await
  }
}
