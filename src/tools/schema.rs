//! Declarative parameter schemas for tools.
//!
//! Each tool builds a [`ParamSchema`] once in its constructor. The schema is
//! rendered to JSON Schema for LLM function calling and used to validate the
//! raw JSON arguments before the tool body runs.

use crate::types::{AppError, Result};
use serde_json::{json, Map, Value};

/// JSON type accepted by a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Number,
    Integer,
    Boolean,
    StringArray,
    Object,
}

impl FieldKind {
    fn json_type(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Number => "number",
            FieldKind::Integer => "integer",
            FieldKind::Boolean => "boolean",
            FieldKind::StringArray => "array",
            FieldKind::Object => "object",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Boolean => value.is_boolean(),
            FieldKind::StringArray => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            FieldKind::Object => value.is_object(),
        }
    }
}

/// A single named parameter and its constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
    pub required: bool,
    pub non_empty: bool,
    pub allowed: Option<Vec<&'static str>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub default: Option<Value>,
}

impl Field {
    fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
            required: false,
            non_empty: false,
            allowed: None,
            minimum: None,
            maximum: None,
            default: None,
        }
    }

    pub fn string(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::String, description)
    }

    pub fn number(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Number, description)
    }

    pub fn integer(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Integer, description)
    }

    pub fn boolean(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Boolean, description)
    }

    pub fn string_array(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::StringArray, description)
    }

    pub fn object(name: &'static str, description: &'static str) -> Self {
        Self::new(name, FieldKind::Object, description)
    }

    /// Mark the field as required. Required strings and arrays must also be non-empty.
    pub fn required(mut self) -> Self {
        self.required = true;
        self.non_empty = true;
        self
    }

    /// Reject blank strings and empty arrays or objects when the field is given.
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn one_of(mut self, values: &[&'static str]) -> Self {
        self.allowed = Some(values.to_vec());
        self
    }

    pub fn range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    pub fn min(mut self, minimum: f64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    fn to_json_schema(&self) -> Value {
        let mut prop = Map::new();
        prop.insert("type".into(), json!(self.kind.json_type()));
        prop.insert("description".into(), json!(self.description));
        if self.kind == FieldKind::StringArray {
            prop.insert("items".into(), json!({ "type": "string" }));
        }
        if let Some(allowed) = &self.allowed {
            prop.insert("enum".into(), json!(allowed));
        }
        if let Some(min) = self.minimum {
            prop.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.maximum {
            prop.insert("maximum".into(), json!(max));
        }
        if let Some(default) = &self.default {
            prop.insert("default".into(), default.clone());
        }
        Value::Object(prop)
    }

    fn validate(&self, value: &Value) -> Result<()> {
        if !self.kind.accepts(value) {
            return Err(AppError::InvalidArgument(format!(
                "parameter '{}' must be of type {}",
                self.name,
                match self.kind {
                    FieldKind::StringArray => "array of strings",
                    other => other.json_type(),
                }
            )));
        }

        if self.non_empty {
            let empty = match value {
                Value::String(s) => s.trim().is_empty(),
                Value::Array(items) => items.is_empty(),
                Value::Object(map) => map.is_empty(),
                _ => false,
            };
            if empty {
                return Err(AppError::InvalidArgument(format!(
                    "parameter '{}' must not be empty",
                    self.name
                )));
            }
        }

        if let (Some(allowed), Some(s)) = (&self.allowed, value.as_str()) {
            if !allowed.contains(&s) {
                return Err(AppError::InvalidArgument(format!(
                    "parameter '{}' must be one of: {}",
                    self.name,
                    allowed.join(", ")
                )));
            }
        }

        if let Some(n) = value.as_f64() {
            if let Some(min) = self.minimum {
                if n < min {
                    return Err(AppError::InvalidArgument(format!(
                        "parameter '{}' must be at least {}",
                        self.name, min
                    )));
                }
            }
            if let Some(max) = self.maximum {
                if n > max {
                    return Err(AppError::InvalidArgument(format!(
                        "parameter '{}' must be at most {}",
                        self.name, max
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Ordered set of parameter fields for one tool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParamSchema {
    fields: Vec<Field>,
}

impl ParamSchema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Schema for tools that take no arguments.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Render as a JSON Schema object suitable for LLM function calling.
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.to_json_schema()))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required
        })
    }

    /// Check raw arguments against the schema.
    ///
    /// `null` is treated as an empty object. Unknown keys are ignored; `null`
    /// values count as absent.
    pub fn validate(&self, args: &Value) -> Result<()> {
        let empty = Map::new();
        let obj = match args {
            Value::Null => &empty,
            Value::Object(map) => map,
            _ => {
                return Err(AppError::InvalidArgument(
                    "arguments must be a JSON object".to_string(),
                ))
            }
        };

        for field in &self.fields {
            match obj.get(field.name) {
                None | Some(Value::Null) => {
                    if field.required {
                        return Err(AppError::InvalidArgument(format!(
                            "missing required parameter '{}'",
                            field.name
                        )));
                    }
                }
                Some(value) => field.validate(value)?,
            }
        }

        Ok(())
    }
}

/// Deserialize already-validated arguments into a typed struct.
///
/// `null` members are dropped first so serde defaults apply to them.
pub fn parse_args<T: serde::de::DeserializeOwned>(args: Value) -> Result<T> {
    let args = match args {
        Value::Null => json!({}),
        Value::Object(mut map) => {
            map.retain(|_, v| !v.is_null());
            Value::Object(map)
        }
        other => other,
    };
    serde_json::from_value(args).map_err(|e| AppError::InvalidArgument(e.to_string()))
}
