use axum::{
  body::{Body, Bytes},
  extract::{Query, State},
  http::{header, HeaderValue, Method, StatusCode, Uri},
  response::{IntoResponse, Json, Response},
  routing::any,
  Router,
};
use serde_json::{json, Value};

use notion_relay_core::error::AppError;
use notion_relay_core::image::{ImageQuery, FALLBACK_CONTENT_TYPE, IMAGE_CACHE_CONTROL};
use notion_relay_core::notion::OutboundCall;
use notion_relay_core::request::{Action, ProxyRequest};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
  Router::new().route("/notion", any(dispatch))
}

type Rejection = (StatusCode, Json<Value>);

fn reject(err: AppError) -> Rejection {
  let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
  (status, Json(err.to_json()))
}

async fn dispatch(
  State(state): State<AppState>,
  method: Method,
  uri: Uri,
  body: Bytes,
) -> Result<Response, Rejection> {
  match method {
    Method::OPTIONS => Ok(StatusCode::OK.into_response()),
    // Only the image proxy reads the query string.
    Method::GET => match Query::<ImageQuery>::try_from_uri(&uri) {
      Ok(Query(query)) if query.is_image_request() => proxy_image(&state, &query).await,
      Ok(_) => Err(reject(AppError::MethodNotAllowed)),
      Err(e) => {
        tracing::debug!("Unreadable image query: {}", e);
        Err(reject(AppError::MissingImageParams))
      }
    },
    Method::POST => {
      let req = ProxyRequest::from_slice(&body).map_err(|e| {
        tracing::debug!("Rejected request: {}", e);
        reject(e)
      })?;
      handle_action(&state, req).await
    }
    _ => Err(reject(AppError::MethodNotAllowed)),
  }
}

async fn handle_action(state: &AppState, req: ProxyRequest) -> Result<Response, Rejection> {
  let call = OutboundCall::for_request(&req);

  match &req.action {
    Action::Query => {
      tracing::info!("Querying database {}", req.database_id);
      let resp = state.notion.send(&req.api_key, &call).await.map_err(|e| {
        tracing::error!("Query error: {}", e);
        reject(AppError::Upstream(e.to_string()))
      })?;
      Ok((resp.status, Json(resp.body)).into_response())
    }
    Action::Update { page_id, .. } | Action::UpdateText { page_id, .. } => {
      tracing::info!("{} for page {}", req.action.name(), page_id);
      tracing::debug!("Page properties: {}", call.body["properties"]);

      let resp = state.notion.send(&req.api_key, &call).await.map_err(|e| {
        tracing::error!("Update error: {}", e);
        reject(AppError::UpdateFailed(e.to_string()))
      })?;

      if !resp.status.is_success() {
        tracing::error!("Notion API returned HTTP {} for page {}", resp.status, page_id);
        return Err(reject(AppError::NotionApi {
          status: resp.status.as_u16(),
          details: resp.body,
        }));
      }

      tracing::info!("Update successful for page {}", page_id);
      let body = if matches!(req.action, Action::UpdateText { .. }) {
        json!({"success": true})
      } else {
        resp.body
      };
      Ok((StatusCode::OK, Json(body)).into_response())
    }
  }
}

async fn proxy_image(state: &AppState, query: &ImageQuery) -> Result<Response, Rejection> {
  let (url, api_key) = query.validate().map_err(reject)?;

  let resp = state.notion.fetch_image(url, api_key).await.map_err(|e| {
    tracing::error!("Image proxy error: {}", e);
    reject(AppError::Upstream(e.to_string()))
  })?;

  if !resp.status().is_success() {
    tracing::error!("Image upstream returned HTTP {}", resp.status());
    return Err(reject(AppError::Upstream("Failed to fetch image".into())));
  }

  let content_type = resp
    .headers()
    .get(header::CONTENT_TYPE)
    .cloned()
    .unwrap_or_else(|| HeaderValue::from_static(FALLBACK_CONTENT_TYPE));

  Ok(
    (
      [
        (header::CONTENT_TYPE, content_type),
        (header::CACHE_CONTROL, HeaderValue::from_static(IMAGE_CACHE_CONTROL)),
      ],
      Body::from_stream(resp.bytes_stream()),
    )
      .into_response(),
  )
}
