use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

use crate::errors::{AppError, AppResult};

static JSON_FENCE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("JSON_FENCE_REGEX is a valid regex pattern")
});

pub type RawQuestion = Map<String, Value>;

/// Extracts the question array from raw model output.
///
/// A ```` ```json ```` fenced block wins when present; otherwise the whole
/// text must be JSON. The result is a non-empty array of objects. Individual
/// question fields are checked later by the generator.
pub fn parse_question_array(raw: &str) -> AppResult<Vec<RawQuestion>> {
    let payload = match JSON_FENCE_REGEX.captures(raw).and_then(|c| c.get(1)) {
        Some(fenced) => fenced.as_str(),
        None => raw.trim(),
    };

    let value: Value = serde_json::from_str(payload).map_err(|e| {
        log::debug!("Unparseable generation payload: {}", payload);
        AppError::GenerationFormatError(format!("response is not valid JSON: {}", e))
    })?;

    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(AppError::GenerationFormatError(format!(
                "expected a JSON array of questions, got {}",
                json_type_name(&other)
            )))
        }
    };

    if items.is_empty() {
        return Err(AppError::GenerationFormatError(
            "question array is empty".to_string(),
        ));
    }

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => Err(AppError::GenerationFormatError(format!(
                "question {} is {} instead of an object",
                index + 1,
                json_type_name(&other)
            ))),
        })
        .collect()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
