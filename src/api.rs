//! HTTP access to the spreadsheet-backed order endpoint.
//!
//! One URL serves three actions: a JSON `POST` saves an order, and `GET`
//! with `action=campaigns` / `action=insights` reads the campaign list and
//! the order counters. Submit and campaign bodies are parsed leniently: a
//! body that is not JSON is treated as an empty object, so the caller sees a
//! missing success flag rather than a decode error. Insights bodies must be
//! a JSON object.

use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::insights::{Insights, InsightsRange};
use crate::order::OrderPayload;

/// Shown in the campaign dropdown when the backend has nothing to offer.
pub const PLACEHOLDER_CAMPAIGN: &str = "No campaign";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{0}")]
    Backend(String),

    #[error("decode: {0}")]
    Decode(String),
}

/// Parsed reply to an order submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmitResponse {
    pub success: bool,
    pub error: Option<String>,
}

/// The three calls the form makes. Implemented over HTTP by [`HttpBackend`].
pub trait OrderBackend: Send + Sync {
    fn submit_order(&self, payload: &OrderPayload) -> Result<SubmitResponse, ApiError>;

    fn campaigns(&self) -> Result<Vec<String>, ApiError>;

    fn insights(&self, range: &InsightsRange) -> Result<Insights, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::blocking::Client,
    url: String,
}

impl HttpBackend {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    fn get_text(&self, query: &[(&str, String)]) -> Result<String, ApiError> {
        let resp = self.http.get(&self.url).query(query).send()?;
        let status = resp.status();
        let body = resp.text()?;
        debug!(%status, bytes = body.len(), "GET {:?}", query.first());
        Ok(body)
    }
}

impl OrderBackend for HttpBackend {
    fn submit_order(&self, payload: &OrderPayload) -> Result<SubmitResponse, ApiError> {
        info!(
            invoice = %payload.invoice_no,
            barcodes = %payload.barcodes,
            "Posting order"
        );
        let resp = self.http.post(&self.url).json(payload).send()?;
        let status = resp.status();
        let body = resp.text()?;
        debug!(%status, bytes = body.len(), "Order endpoint replied");
        Ok(parse_submit_body(&body))
    }

    fn campaigns(&self) -> Result<Vec<String>, ApiError> {
        let body = self.get_text(&[("action", "campaigns".to_string())])?;
        Ok(parse_campaigns_body(&body))
    }

    fn insights(&self, range: &InsightsRange) -> Result<Insights, ApiError> {
        let mut query = vec![("action", "insights".to_string())];
        query.extend(range.query_pairs());
        let body = self.get_text(&query)?;
        parse_insights_body(&body)
    }
}

fn try_parse_object(body: &str) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ApiError::Decode(format!("expected a JSON object, got {other}"))),
        Err(e) => Err(ApiError::Decode(format!("response body is not JSON: {e}"))),
    }
}

fn parse_object(body: &str) -> Map<String, Value> {
    try_parse_object(body).unwrap_or_else(|e| {
        warn!("{e}");
        Map::new()
    })
}

/// JavaScript truthiness, which is what the endpoint's callers have always relied on.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn message_of(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn parse_submit_body(body: &str) -> SubmitResponse {
    let map = parse_object(body);
    SubmitResponse {
        success: map.get("success").is_some_and(is_truthy),
        error: map.get("error").and_then(message_of),
    }
}

pub fn parse_campaigns_body(body: &str) -> Vec<String> {
    let map = parse_object(body);
    let campaigns: Vec<String> = map
        .get("campaigns")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    if campaigns.is_empty() {
        vec![PLACEHOLDER_CAMPAIGN.to_string()]
    } else {
        campaigns
    }
}

pub fn parse_insights_body(body: &str) -> Result<Insights, ApiError> {
    // `{}` is a valid reply for a range with no orders
    let map = try_parse_object(body)?;
    if let Some(message) = map.get("error").and_then(message_of) {
        return Err(ApiError::Backend(message));
    }

    let counters = map
        .into_iter()
        .filter_map(|(key, value)| {
            let n = value
                .as_i64()
                .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))?;
            Some((key, n))
        })
        .collect();
    Ok(Insights { counters })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_flag_follows_truthiness() {
        assert!(parse_submit_body(r#"{"success":true}"#).success);
        assert!(parse_submit_body(r#"{"success":1}"#).success);
        assert!(parse_submit_body(r#"{"success":"yes"}"#).success);
        assert!(!parse_submit_body(r#"{"success":0}"#).success);
        assert!(!parse_submit_body(r#"{"success":""}"#).success);
        assert!(!parse_submit_body(r#"{"success":null}"#).success);
    }

    #[test]
    fn backend_error_text_is_kept() {
        let resp = parse_submit_body(r#"{"success":false,"error":"Duplicate invoice"}"#);
        assert_eq!(
            resp,
            SubmitResponse {
                success: false,
                error: Some("Duplicate invoice".to_string())
            }
        );
        assert_eq!(parse_submit_body(r#"{"success":false,"error":""}"#).error, None);
    }

    #[test]
    fn malformed_body_becomes_empty_result() {
        assert_eq!(
            parse_submit_body("<html>Service unavailable</html>"),
            SubmitResponse::default()
        );
        assert_eq!(parse_submit_body("[true]"), SubmitResponse::default());
        assert_eq!(parse_submit_body(""), SubmitResponse::default());
    }

    #[test]
    fn campaigns_are_listed_in_order() {
        assert_eq!(
            parse_campaigns_body(r#"{"campaigns":["Mother's Day"," Valentines ","",7]}"#),
            vec!["Mother's Day".to_string(), "Valentines".to_string()]
        );
    }

    #[test]
    fn missing_campaigns_fall_back_to_placeholder() {
        for body in [r#"{}"#, r#"{"campaigns":[]}"#, r#"{"campaigns":"x"}"#, "oops"] {
            assert_eq!(parse_campaigns_body(body), vec![PLACEHOLDER_CAMPAIGN.to_string()]);
        }
    }

    #[test]
    fn insights_keep_integer_counters() {
        let insights =
            parse_insights_body(r#"{"totalOrders":14,"pickup":4.0,"label":"x","ratio":0.5}"#)
                .unwrap();
        assert_eq!(insights.counters.len(), 2);
        assert_eq!(insights.counters["totalOrders"], 14);
        assert_eq!(insights.counters["pickup"], 4);
    }

    #[test]
    fn insights_error_short_circuits() {
        let err = parse_insights_body(r#"{"error":"Unauthorized","totalOrders":3}"#).unwrap_err();
        assert!(matches!(err, ApiError::Backend(ref m) if m == "Unauthorized"));

        assert!(matches!(
            parse_insights_body("not json"),
            Err(ApiError::Decode(_))
        ));
        assert!(matches!(
            parse_insights_body("[1, 2]"),
            Err(ApiError::Decode(_))
        ));
    }

    #[test]
    fn empty_counters_mean_no_orders() {
        let insights = parse_insights_body("{}").unwrap();
        assert!(insights.counters.is_empty());
        assert!(insights.rows().is_empty());
    }
}
