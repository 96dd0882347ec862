use crate::config::InputType;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    #[error("enter true or false")]
    Bool,
    #[error("enter an integer")]
    Int,
    #[error("enter a number")]
    Number,
    #[error("invalid json: {0}")]
    Json(String),
}

/// Parses edit input into the JSON value sent to the engine. Text is kept verbatim.
pub fn parse_input_value(input: &str, input_type: InputType) -> Result<Value, InputError> {
    let trimmed = input.trim();
    match input_type {
        InputType::Bool => {
            if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
                Ok(Value::Bool(true))
            } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
                Ok(Value::Bool(false))
            } else {
                Err(InputError::Bool)
            }
        }
        InputType::Int => trimmed
            .parse::<i64>()
            .map(Value::from)
            .map_err(|_| InputError::Int),
        InputType::Number => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or(InputError::Number),
        InputType::Json => {
            serde_json::from_str(trimmed).map_err(|e| InputError::Json(e.to_string()))
        }
        InputType::Text | InputType::User | InputType::Auto => {
            Ok(Value::String(input.to_string()))
        }
    }
}
