use serde_json::{json, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Missing required fields")]
  MissingFields,

  #[error("Missing image URL or API key")]
  MissingImageParams,

  #[error("Invalid image URL")]
  InvalidImageUrl,

  #[error("Invalid action")]
  InvalidAction,

  #[error("Invalid request body")]
  InvalidBody(String),

  #[error("Method not allowed")]
  MethodNotAllowed,

  /// Notion answered with a non-success status. `details` is its full body.
  #[error("Notion API error")]
  NotionApi { status: u16, details: Value },

  #[error("Failed to update page")]
  UpdateFailed(String),

  #[error("{0}")]
  Upstream(String),
}

impl AppError {
  pub fn status_code(&self) -> u16 {
    match self {
      AppError::MissingFields
      | AppError::MissingImageParams
      | AppError::InvalidImageUrl
      | AppError::InvalidAction
      | AppError::InvalidBody(_) => 400,
      AppError::MethodNotAllowed => 405,
      AppError::NotionApi { status, .. } => *status,
      AppError::UpdateFailed(_) | AppError::Upstream(_) => 500,
    }
  }

  /// JSON envelope sent back to the browser.
  pub fn to_json(&self) -> Value {
    match self {
      AppError::InvalidBody(message) | AppError::UpdateFailed(message) => {
        json!({"error": self.to_string(), "message": message})
      }
      AppError::NotionApi { details, .. } => {
        let mut body = json!({"error": self.to_string(), "details": details});
        if let Some(message) = details.get("message") {
          body["message"] = message.clone();
        }
        body
      }
      _ => json!({"error": self.to_string()}),
    }
  }
}
