use serde::Deserialize;
use serde_json::{Number, Value};

use crate::error::AppError;

/// POST body as the browser client sends it. Fields stay untyped here so a
/// field one action ignores can never fail another; `ProxyRequest::from_raw`
/// checks only what the selected action reads.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRequest {
  pub action: Option<Value>,
  pub database_id: Option<Value>,
  pub api_key: Option<Value>,
  pub page_id: Option<Value>,
  pub order: Option<Value>,
  pub date: Option<Value>,
  pub text_type: Option<Value>,
  pub text_value: Option<Value>,
}

/// A validated POST request.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyRequest {
  pub api_key: String,
  pub database_id: String,
  pub action: Action,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
  Query,
  Update {
    page_id: String,
    order: Number,
    /// Sent verbatim as `Date.start`.
    date: Option<Value>,
  },
  UpdateText {
    page_id: String,
    property: TextProperty,
    value: String,
  },
}

/// Rich-text property targeted by `updateText`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextProperty {
  Caption,
  Hashtags,
}

impl TextProperty {
  pub fn from_text_type(text_type: &Value) -> Self {
    if text_type.as_str() == Some("caption") {
      TextProperty::Caption
    } else {
      TextProperty::Hashtags
    }
  }

  pub fn property_name(self) -> &'static str {
    match self {
      TextProperty::Caption => "Caption",
      TextProperty::Hashtags => "Hashtags",
    }
  }
}

impl Action {
  pub fn name(&self) -> &'static str {
    match self {
      Action::Query => "query",
      Action::Update { .. } => "update",
      Action::UpdateText { .. } => "updateText",
    }
  }
}

impl ProxyRequest {
  /// Parse and validate a raw POST body. An empty body counts as `{}`.
  pub fn from_slice(body: &[u8]) -> Result<Self, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
      return Self::from_raw(RawRequest::default());
    }

    let value = serde_json::from_slice::<Value>(body).map_err(|e| AppError::InvalidBody(e.to_string()))?;
    if !value.is_object() {
      return Err(AppError::InvalidBody("expected a JSON object".into()));
    }
    let raw = serde_json::from_value::<RawRequest>(value).map_err(|e| AppError::InvalidBody(e.to_string()))?;
    Self::from_raw(raw)
  }

  pub fn from_raw(raw: RawRequest) -> Result<Self, AppError> {
    let (api_key, database_id) = match (non_empty(raw.api_key), non_empty(raw.database_id)) {
      (Some(k), Some(d)) => (k, d),
      _ => return Err(AppError::MissingFields),
    };

    let action = match raw.action.as_ref().and_then(Value::as_str) {
      Some("query") => Action::Query,
      Some("update") => {
        let page_id = non_empty(raw.page_id).ok_or(AppError::MissingFields)?;
        let order = match raw.order {
          Some(Value::Number(n)) => n,
          Some(other) => {
            return Err(AppError::InvalidBody(format!("order must be a number, got {other}")))
          }
          None => return Err(AppError::MissingFields),
        };
        Action::Update {
          page_id,
          order,
          date: raw.date.filter(|d| !is_empty_date(d)),
        }
      }
      Some("updateText") => {
        let page_id = non_empty(raw.page_id).ok_or(AppError::MissingFields)?;
        let text_type = raw
          .text_type
          .filter(|t| !t.is_null() && t.as_str() != Some(""))
          .ok_or(AppError::MissingFields)?;
        let value = match raw.text_value {
          Some(Value::String(v)) => v,
          Some(Value::Null) | None => return Err(AppError::MissingFields),
          Some(other) => {
            return Err(AppError::InvalidBody(format!("textValue must be a string, got {other}")))
          }
        };
        Action::UpdateText {
          page_id,
          property: TextProperty::from_text_type(&text_type),
          value,
        }
      }
      _ => return Err(AppError::InvalidAction),
    };

    Ok(Self {
      api_key,
      database_id,
      action,
    })
  }
}

/// No date: the browser sends `null`, `""` or the literal string `"null"`.
/// Other falsy JSON values (`false`, `0`) are treated the same way.
pub fn is_empty_date(date: &Value) -> bool {
  match date {
    Value::Null | Value::Bool(false) => true,
    Value::String(s) => s.is_empty() || s == "null",
    Value::Number(n) => n.as_f64() == Some(0.0),
    _ => false,
  }
}

/// Identifiers and keys must be non-empty strings; anything else is missing.
fn non_empty(value: Option<Value>) -> Option<String> {
  match value {
    Some(Value::String(s)) if !s.is_empty() => Some(s),
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(body: &str) -> Result<ProxyRequest, AppError> {
    ProxyRequest::from_slice(body.as_bytes())
  }

  #[test]
  fn test_missing_credentials_before_action() {
    for body in [
      r#"{"action":"query","databaseId":"d"}"#,
      r#"{"action":"update","apiKey":"k","pageId":"p","order":1}"#,
      r#"{"action":"frobnicate","apiKey":"","databaseId":"d"}"#,
      r#"{"apiKey":"k"}"#,
      "",
    ] {
      assert!(matches!(parse(body), Err(AppError::MissingFields)), "{body}");
    }
  }

  #[test]
  fn test_invalid_action() {
    assert!(matches!(
      parse(r#"{"action":"frobnicate","apiKey":"k","databaseId":"d"}"#),
      Err(AppError::InvalidAction)
    ));
    assert!(matches!(
      parse(r#"{"apiKey":"k","databaseId":"d"}"#),
      Err(AppError::InvalidAction)
    ));
  }

  #[test]
  fn test_malformed_body() {
    assert!(matches!(parse("not json"), Err(AppError::InvalidBody(_))));
    assert!(matches!(parse(r#"["k","d"]"#), Err(AppError::InvalidBody(_))));
    assert!(matches!(
      parse(r#"{"action":"update","apiKey":"k","databaseId":"d","pageId":"p","order":"three"}"#),
      Err(AppError::InvalidBody(_))
    ));
    assert!(matches!(
      parse(r#"{"action":"updateText","apiKey":"k","databaseId":"d","pageId":"p","textType":"caption","textValue":7}"#),
      Err(AppError::InvalidBody(_))
    ));
  }

  #[test]
  fn test_unused_fields_are_not_type_checked() {
    let req = parse(
      r#"{"action":"query","apiKey":"k","databaseId":"d","order":"3","date":20240101,"textValue":false}"#,
    )
    .unwrap();
    assert_eq!(req.action, Action::Query);

    assert!(matches!(
      parse(r#"{"action":"query","databaseId":"d","order":"3","pageId":42}"#),
      Err(AppError::MissingFields)
    ));
    assert!(matches!(
      parse(r#"{"action":"query","apiKey":123,"databaseId":"d"}"#),
      Err(AppError::MissingFields)
    ));
  }

  #[test]
  fn test_query() {
    let req = parse(r#"{"action":"query","apiKey":"k","databaseId":"d","pageId":"ignored"}"#).unwrap();
    assert_eq!(req.api_key, "k");
    assert_eq!(req.database_id, "d");
    assert_eq!(req.action, Action::Query);
  }

  #[test]
  fn test_update_date_sentinels() {
    for date in [r#""""#, r#""null""#, "null", "false", "0"] {
      let body = format!(
        r#"{{"action":"update","apiKey":"k","databaseId":"d","pageId":"p","order":2,"date":{date}}}"#
      );
      match parse(&body).unwrap().action {
        Action::Update { date, .. } => assert_eq!(date, None, "{body}"),
        other => panic!("unexpected action {other:?}"),
      }
    }

    let req = parse(
      r#"{"action":"update","apiKey":"k","databaseId":"d","pageId":"p","order":3,"date":"2024-01-01"}"#,
    )
    .unwrap();
    assert_eq!(
      req.action,
      Action::Update {
        page_id: "p".into(),
        order: Number::from(3),
        date: Some("2024-01-01".into()),
      }
    );
  }

  #[test]
  fn test_update_passes_other_dates_through() {
    let req = parse(
      r#"{"action":"update","apiKey":"k","databaseId":"d","pageId":"p","order":1,"date":20240101}"#,
    )
    .unwrap();
    match req.action {
      Action::Update { date, .. } => assert_eq!(date, Some(Value::from(20240101))),
      other => panic!("unexpected action {other:?}"),
    }
  }

  #[test]
  fn test_update_requires_page_and_order() {
    assert!(matches!(
      parse(r#"{"action":"update","apiKey":"k","databaseId":"d","order":1}"#),
      Err(AppError::MissingFields)
    ));
    assert!(matches!(
      parse(r#"{"action":"update","apiKey":"k","databaseId":"d","pageId":"p"}"#),
      Err(AppError::MissingFields)
    ));
  }

  #[test]
  fn test_update_text() {
    let req = parse(
      r##"{"action":"updateText","apiKey":"k","databaseId":"d","pageId":"p","textType":"caption","textValue":"hello"}"##,
    )
    .unwrap();
    assert_eq!(
      req.action,
      Action::UpdateText {
        page_id: "p".into(),
        property: TextProperty::Caption,
        value: "hello".into(),
      }
    );

    let req = parse(
      r##"{"action":"updateText","apiKey":"k","databaseId":"d","pageId":"p","textType":"tags","textValue":""}"##,
    )
    .unwrap();
    match req.action {
      Action::UpdateText { property, value, .. } => {
        assert_eq!(property, TextProperty::Hashtags);
        assert_eq!(value, "");
      }
      other => panic!("unexpected action {other:?}"),
    }

    assert!(matches!(
      parse(r#"{"action":"updateText","apiKey":"k","databaseId":"d","pageId":"p","textType":"caption"}"#),
      Err(AppError::MissingFields)
    ));
  }
}
