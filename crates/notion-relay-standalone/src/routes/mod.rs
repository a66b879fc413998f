pub mod notion;

use crate::state::AppState;
use axum::http::{header, HeaderValue};
use axum::Router;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;

pub fn api_router() -> Router<AppState> {
  Router::new().merge(notion::router())
}

/// Full application: API under `/api`, the browser client as fallback when a
/// public directory is configured, CORS headers on every response.
pub fn app(state: AppState) -> Router {
  let public_dir = state.config.public_dir.clone();

  let mut app = Router::new().nest("/api", api_router()).with_state(state);

  if let Some(public_dir) = public_dir {
    // SPA: serve static files, fallback to index.html
    let index_file = format!("{}/index.html", &public_dir);
    app = app.fallback_service(ServeDir::new(&public_dir).fallback(ServeFile::new(&index_file)));
  }

  app
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_ORIGIN,
      HeaderValue::from_static("*"),
    ))
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_METHODS,
      HeaderValue::from_static("POST, GET, OPTIONS"),
    ))
    .layer(SetResponseHeaderLayer::overriding(
      header::ACCESS_CONTROL_ALLOW_HEADERS,
      HeaderValue::from_static("Content-Type"),
    ))
}
