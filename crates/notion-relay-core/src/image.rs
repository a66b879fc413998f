use serde::Deserialize;
use url::Url;

use crate::error::AppError;

/// Browsers may keep proxied images for a year; Notion file URLs are immutable.
pub const IMAGE_CACHE_CONTROL: &str = "public, max-age=31536000";
pub const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Query string of `GET /api/notion?proxyImage=<url>&apiKey=<key>`.
///
/// The target host is not restricted: whatever URL the caller names receives
/// the caller's bearer token.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageQuery {
  pub proxy_image: Option<String>,
  pub api_key: Option<String>,
}

impl ImageQuery {
  /// A GET carrying neither parameter is not an image request at all.
  pub fn is_image_request(&self) -> bool {
    self.proxy_image.is_some() || self.api_key.is_some()
  }

  pub fn validate(&self) -> Result<(Url, &str), AppError> {
    let (image, api_key) = match (self.proxy_image.as_deref(), self.api_key.as_deref()) {
      (Some(i), Some(k)) if !i.is_empty() && !k.is_empty() => (i, k),
      _ => return Err(AppError::MissingImageParams),
    };

    let url = Url::parse(image).map_err(|_| AppError::InvalidImageUrl)?;
    if !matches!(url.scheme(), "http" | "https") {
      return Err(AppError::InvalidImageUrl);
    }
    Ok((url, api_key))
  }
}
