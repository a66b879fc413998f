mod routes;
mod services;
mod state;

use notion_relay_core::config::Config;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    )
    .init();

  let config = Config::from_env();
  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

  let app_state = state::AppState::new(config.clone()).expect("Failed to build HTTP client");
  let app = routes::app(app_state);

  let listener = TcpListener::bind(addr).await.expect("Failed to bind");
  tracing::info!("Server listening on {}", addr);
  tracing::info!("Notion API: {} (version {})", config.notion_api_base, config.notion_version);
  if let Some(public_dir) = &config.public_dir {
    tracing::info!("Serving client from {}", public_dir);
  }

  axum::serve(listener, app).await.expect("Server error");
}
