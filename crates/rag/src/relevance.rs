//! Parsing of model relevance verdicts

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use support_agent_core::{Error, RelevanceResult, Result};

/// Outermost `{...}` span, allowing surrounding prose or code fences
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Extract a [`RelevanceResult`] from model output.
///
/// `isRelevant` must be the boolean `true` to count. `confidence` may be a
/// number or numeric string and is clamped to 0..=100; missing means 0.
pub fn parse_relevance(output: &str) -> Result<RelevanceResult> {
    let json = JSON_OBJECT
        .find(output)
        .ok_or_else(|| Error::MalformedResponse("no JSON object in relevance verdict".into()))?;

    let value: Value = serde_json::from_str(json.as_str())
        .map_err(|e| Error::MalformedResponse(format!("relevance verdict: {}", e)))?;

    let is_relevant = value.get("isRelevant").and_then(Value::as_bool) == Some(true);
    let confidence = value.get("confidence").map(confidence_value).unwrap_or(0);
    let reasoning = value
        .get("reasoning")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(RelevanceResult {
        is_relevant,
        confidence,
        reasoning,
    })
}

fn confidence_value(value: &Value) -> u8 {
    let raw = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().ok(),
        _ => None,
    };
    raw.map(|c| c.clamp(0.0, 100.0).round() as u8).unwrap_or(0)
}
