use crate::error::{argument_error, AppResult};
use serde_json::{Map, Value};

/// Named parameters supplied by the caller for one operation.
///
/// Missing keys, `null` and empty strings all count as absent.
#[derive(Debug, Clone, Default)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    /// Accept a JSON object (or nothing at all)
    pub fn from_value(value: Value) -> AppResult<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(values) => Ok(Self { values }),
            other => Err(argument_error(&format!(
                "Arguments must be a JSON object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Raw value if present and non-empty
    pub fn get(&self, name: &str) -> Option<&Value> {
        match self.values.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(value) => Some(value),
        }
    }

    pub fn string(&self, name: &str) -> AppResult<Option<String>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(wrong_shape(name, "a string", other)),
        }
    }

    /// Integers arrive as JSON numbers or as numeric strings
    pub fn integer(&self, name: &str) -> AppResult<Option<i64>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| argument_error(&format!("'{}' must be a whole number", name))),
            Some(Value::String(s)) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| argument_error(&format!("'{}' must be a whole number", name))),
            Some(other) => Err(wrong_shape(name, "an integer", other)),
        }
    }

    pub fn boolean(&self, name: &str) -> AppResult<Option<bool>> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(argument_error(&format!(
                    "'{}' must be true or false",
                    name
                ))),
            },
            Some(other) => Err(wrong_shape(name, "a boolean", other)),
        }
    }

    /// Structured data (an object or array), either inline or as a string holding JSON
    pub fn json(&self, name: &str) -> AppResult<Option<Value>> {
        let value = match self.get(name) {
            None => return Ok(None),
            Some(Value::String(s)) => serde_json::from_str::<Value>(s).map_err(|e| {
                argument_error(&format!("'{}' is not valid JSON: {}", name, e))
            })?,
            Some(value) => value.clone(),
        };

        match value {
            Value::Object(_) | Value::Array(_) => Ok(Some(value)),
            other => Err(wrong_shape(name, "an object or array", &other)),
        }
    }

    /// A list of strings, either inline or as a JSON-encoded array
    pub fn string_list(&self, name: &str) -> AppResult<Option<Vec<String>>> {
        let value = match self.get(name) {
            None => return Ok(None),
            Some(Value::String(s)) => serde_json::from_str::<Value>(s).map_err(|e| {
                argument_error(&format!("'{}' is not a valid JSON array: {}", name, e))
            })?,
            Some(value) => value.clone(),
        };

        let items = match value {
            Value::Array(items) => items,
            other => return Err(wrong_shape(name, "a list of strings", &other)),
        };

        items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(wrong_shape(name, "a list of strings", &other)),
            })
            .collect::<AppResult<Vec<_>>>()
            .map(Some)
    }
}

fn wrong_shape(name: &str, expected: &str, got: &Value) -> crate::error::Error {
    argument_error(&format!(
        "'{}' must be {}, got {}",
        name,
        expected,
        type_name(got)
    ))
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
