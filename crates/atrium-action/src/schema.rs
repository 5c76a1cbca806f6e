//! JSON-schema-like parameter validation.
//!
//! [`ActionSchema`] supports the keyword subset the desktop shell
//! actually uses: `type`, `properties`, `required`,
//! `additionalProperties`, `enum`, `pattern`, `maxLength`, `minimum`,
//! `maximum`. Schemas are plain serde values, so plugins can declare
//! them as JSON.
//!
//! Validation collects **every** violation — a caller fixing their
//! parameters sees the full list at once, not one failure per retry.
//!
//! # Example
//!
//! ```
//! use atrium_action::ActionSchema;
//! use serde_json::json;
//!
//! let schema = ActionSchema::object()
//!     .property("message", ActionSchema::string().max_length(10))
//!     .require("message");
//!
//! let violations = schema.validate(&json!({"msg": "typo"}));
//! assert_eq!(violations.len(), 1);
//! assert!(violations[0].to_string().contains("message"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// One violated constraint: where and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// JSON path of the offending value (`$`, `$.message`, ...).
    pub path: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl Violation {
    fn new(path: &str, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// JSON-schema-like constraint set for action parameters.
///
/// Every field is optional; an empty schema accepts everything.
/// Re-registering a schema for the same `(component, action)` pair
/// overwrites silently (last-write-wins, like component registration).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ActionSchema {
    /// Expected JSON type: `object`, `string`, `number`, `integer`,
    /// `boolean`, `array`, or `null`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Per-key schemas for object values.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, ActionSchema>,
    /// Keys that must be present on object values.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// When `false`, object keys outside `properties` are violations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    /// Allowed values (any JSON type).
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    /// Regex the string value must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Maximum string length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Minimum numeric value (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    /// Maximum numeric value (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl ActionSchema {
    /// Schema expecting an object.
    #[must_use]
    pub fn object() -> Self {
        Self {
            kind: Some("object".into()),
            ..Self::default()
        }
    }

    /// Schema expecting a string.
    #[must_use]
    pub fn string() -> Self {
        Self {
            kind: Some("string".into()),
            ..Self::default()
        }
    }

    /// Schema expecting a number.
    #[must_use]
    pub fn number() -> Self {
        Self {
            kind: Some("number".into()),
            ..Self::default()
        }
    }

    /// Adds a property schema.
    #[must_use]
    pub fn property(mut self, name: impl Into<String>, schema: ActionSchema) -> Self {
        self.properties.insert(name.into(), schema);
        self
    }

    /// Marks a key as required.
    #[must_use]
    pub fn require(mut self, name: impl Into<String>) -> Self {
        self.required.push(name.into());
        self
    }

    /// Disallows keys outside `properties`.
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.additional_properties = Some(false);
        self
    }

    /// Restricts the value to an enumerated set.
    #[must_use]
    pub fn one_of(mut self, allowed: Vec<Value>) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// Requires string values to match a regex.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Caps string length.
    #[must_use]
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Sets the inclusive numeric range.
    #[must_use]
    pub fn range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }

    /// Validates a value, collecting **all** violations.
    ///
    /// Returns an empty vec when the value satisfies every constraint.
    /// An unparseable `pattern` is reported as a violation at the
    /// offending path rather than aborting validation.
    #[must_use]
    pub fn validate(&self, value: &Value) -> Vec<Violation> {
        let mut violations = Vec::new();
        self.check(value, "$", &mut violations);
        violations
    }

    fn check(&self, value: &Value, path: &str, out: &mut Vec<Violation>) {
        if let Some(kind) = &self.kind {
            if !type_matches(kind, value) {
                out.push(Violation::new(
                    path,
                    format!("expected type '{}', got '{}'", kind, type_name(value)),
                ));
                // Type is wrong: the type-specific checks below would
                // only produce noise on a value of the wrong shape.
                return;
            }
        }

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(value) {
                out.push(Violation::new(
                    path,
                    format!(
                        "value {} is not one of the allowed values",
                        compact(value)
                    ),
                ));
            }
        }

        match value {
            Value::Object(map) => {
                for key in &self.required {
                    if !map.contains_key(key) {
                        out.push(Violation::new(
                            &format!("{path}.{key}"),
                            "required parameter is missing",
                        ));
                    }
                }
                if self.additional_properties == Some(false) {
                    for key in map.keys() {
                        if !self.properties.contains_key(key) {
                            out.push(Violation::new(
                                &format!("{path}.{key}"),
                                "parameter is not declared for this action",
                            ));
                        }
                    }
                }
                for (key, schema) in &self.properties {
                    if let Some(child) = map.get(key) {
                        schema.check(child, &format!("{path}.{key}"), out);
                    }
                }
            }
            Value::String(s) => {
                if let Some(max) = self.max_length {
                    let len = s.chars().count();
                    if len > max {
                        out.push(Violation::new(
                            path,
                            format!("string of length {len} exceeds maxLength {max}"),
                        ));
                    }
                }
                if let Some(pattern) = &self.pattern {
                    match regex::Regex::new(pattern) {
                        Ok(re) => {
                            if !re.is_match(s) {
                                out.push(Violation::new(
                                    path,
                                    format!("string does not match pattern '{pattern}'"),
                                ));
                            }
                        }
                        Err(_) => out.push(Violation::new(
                            path,
                            format!("schema pattern '{pattern}' is not a valid regex"),
                        )),
                    }
                }
            }
            Value::Number(n) => {
                if let Some(v) = n.as_f64() {
                    if let Some(min) = self.minimum {
                        if v < min {
                            out.push(Violation::new(
                                path,
                                format!("value {v} is below minimum {min}"),
                            ));
                        }
                    }
                    if let Some(max) = self.maximum {
                        if v > max {
                            out.push(Violation::new(
                                path,
                                format!("value {v} is above maximum {max}"),
                            ));
                        }
                    }
                }
            }
            _ => {}
        }
    }
}

fn type_matches(kind: &str, value: &Value) -> bool {
    match kind {
        "object" => value.is_object(),
        "array" => value.is_array(),
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "null" => value.is_null(),
        // Unknown type names accept everything.
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Short single-line rendering for violation messages.
fn compact(value: &Value) -> String {
    let rendered = value.to_string();
    if rendered.len() <= 40 {
        return rendered;
    }
    // Truncate on a char boundary; byte 40 may sit inside a multibyte char.
    let mut cut = 40;
    while !rendered.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…", &rendered[..cut])
}
