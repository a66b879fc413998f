//! Outbound calls to the Notion REST API.
//!
//! Everything here is pure: a validated [`ProxyRequest`] maps to exactly one
//! [`OutboundCall`], which the server then executes.

use serde_json::{json, Map, Number, Value};

use crate::request::{Action, ProxyRequest, TextProperty};

pub const DEFAULT_API_BASE: &str = "https://api.notion.com";
pub const DEFAULT_NOTION_VERSION: &str = "2022-06-28";

/// Property the database is sorted by, and the one `update` always writes.
pub const ORDER_PROPERTY: &str = "Order";
pub const DATE_PROPERTY: &str = "Date";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallMethod {
  Post,
  Patch,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutboundCall {
  pub method: CallMethod,
  /// Path relative to the API base, e.g. `/v1/pages/{id}`.
  pub path: String,
  pub body: Value,
}

impl OutboundCall {
  pub fn for_request(req: &ProxyRequest) -> Self {
    match &req.action {
      Action::Query => Self {
        method: CallMethod::Post,
        path: database_query_path(&req.database_id),
        body: query_body(),
      },
      Action::Update {
        page_id,
        order,
        date,
      } => Self {
        method: CallMethod::Patch,
        path: page_path(page_id),
        body: page_patch_body(order_date_properties(order, date.as_ref())),
      },
      Action::UpdateText {
        page_id,
        property,
        value,
      } => Self {
        method: CallMethod::Patch,
        path: page_path(page_id),
        body: page_patch_body(text_properties(*property, value)),
      },
    }
  }
}

pub fn database_query_path(database_id: &str) -> String {
  format!("/v1/databases/{}/query", urlencoding::encode(database_id))
}

pub fn page_path(page_id: &str) -> String {
  format!("/v1/pages/{}", urlencoding::encode(page_id))
}

/// No filter and no pagination; only the ascending `Order` sort.
pub fn query_body() -> Value {
  json!({
    "sorts": [{"property": ORDER_PROPERTY, "direction": "ascending"}]
  })
}

pub fn order_date_properties(order: &Number, date: Option<&Value>) -> Value {
  let mut properties = Map::new();
  properties.insert(ORDER_PROPERTY.into(), json!({"number": order}));
  if let Some(date) = date {
    properties.insert(DATE_PROPERTY.into(), json!({"date": {"start": date}}));
  }
  Value::Object(properties)
}

pub fn text_properties(property: TextProperty, value: &str) -> Value {
  let mut properties = Map::new();
  properties.insert(
    property.property_name().into(),
    json!({"rich_text": [{"text": {"content": value}}]}),
  );
  Value::Object(properties)
}

pub fn page_patch_body(properties: Value) -> Value {
  json!({ "properties": properties })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn request(action: Action) -> ProxyRequest {
    ProxyRequest {
      api_key: "k".into(),
      database_id: "d".into(),
      action,
    }
  }

  #[test]
  fn test_query_call() {
    let call = OutboundCall::for_request(&request(Action::Query));
    assert_eq!(call.method, CallMethod::Post);
    assert_eq!(call.path, "/v1/databases/d/query");
    assert_eq!(
      call.body,
      json!({"sorts": [{"property": "Order", "direction": "ascending"}]})
    );
  }

  #[test]
  fn test_update_call_with_date() {
    let call = OutboundCall::for_request(&request(Action::Update {
      page_id: "p".into(),
      order: Number::from(3),
      date: Some("2024-01-01".into()),
    }));
    assert_eq!(call.method, CallMethod::Patch);
    assert_eq!(call.path, "/v1/pages/p");
    assert_eq!(
      call.body,
      json!({"properties": {
        "Order": {"number": 3},
        "Date": {"date": {"start": "2024-01-01"}}
      }})
    );
  }

  #[test]
  fn test_update_call_without_date() {
    let call = OutboundCall::for_request(&request(Action::Update {
      page_id: "p".into(),
      order: Number::from_f64(1.5).unwrap(),
      date: None,
    }));
    assert_eq!(call.body, json!({"properties": {"Order": {"number": 1.5}}}));
  }

  #[test]
  fn test_update_text_call() {
    let call = OutboundCall::for_request(&request(Action::UpdateText {
      page_id: "p".into(),
      property: TextProperty::Hashtags,
      value: "#rust #notion".into(),
    }));
    assert_eq!(call.method, CallMethod::Patch);
    assert_eq!(
      call.body,
      json!({"properties": {
        "Hashtags": {"rich_text": [{"text": {"content": "#rust #notion"}}]}
      }})
    );
  }

  #[test]
  fn test_ids_are_single_path_segments() {
    assert_eq!(page_path("../users"), "/v1/pages/..%2Fusers");
    assert_eq!(database_query_path("a b"), "/v1/databases/a%20b/query");
  }
}
