//! Declarative component and action model.
//!
//! A [`Component`] describes a capability surface owned by one plugin:
//! its identity, display metadata, per-instance state, and the
//! [`ActionSpec`]s it exposes. The model is **declarative only** — a
//! spec never carries the handler function. Handlers are bound
//! separately in the dispatcher, keyed by `(component_id, action_id)`.
//!
//! # Registration Semantics
//!
//! Components are not versioned. Registering a component whose id is
//! already taken overwrites the prior entry (last-write-wins), which is
//! how a reloaded plugin replaces its stale declaration.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A registered capability surface.
///
/// # Example
///
/// ```
/// use atrium_types::{Component, ActionSpec, ParameterSpec};
///
/// let comp = Component::new("files", "panel", "File Manager")
///     .with_description("Browse and manage files")
///     .with_action(
///         ActionSpec::new("open", "Open")
///             .with_parameter(ParameterSpec::required("path", "string")),
///     );
///
/// assert_eq!(comp.id, "files");
/// assert_eq!(comp.actions.len(), 1);
/// assert!(comp.state.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    /// Unique key within the registry.
    pub id: String,
    /// Component kind (e.g., "panel", "widget", "service").
    pub kind: String,
    /// Human-readable name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Source path of the owning plugin, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Declared actions.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
    /// Per-instance state.
    #[serde(default)]
    pub state: ComponentState,
}

impl Component {
    /// Creates a component with default (enabled, visible) state.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: name.into(),
            description: String::new(),
            path: None,
            actions: Vec::new(),
            state: ComponentState::default(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the plugin source path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Appends a declared action.
    #[must_use]
    pub fn with_action(mut self, action: ActionSpec) -> Self {
        self.actions.push(action);
        self
    }

    /// Returns the declared action with the given id, if any.
    #[must_use]
    pub fn action(&self, action_id: &str) -> Option<&ActionSpec> {
        self.actions.iter().find(|a| a.id == action_id)
    }
}

/// Per-instance component state.
///
/// `extra` holds owner-defined keys that the core carries opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComponentState {
    /// Whether the component accepts dispatch.
    pub enabled: bool,
    /// Whether the component is shown by the (external) rendering layer.
    pub visible: bool,
    /// Owner-defined extension state.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ComponentState {
    fn default() -> Self {
        Self {
            enabled: true,
            visible: true,
            extra: Map::new(),
        }
    }
}

/// A declared, invokable operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Action id, unique within the owning component.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Whether the action is currently invokable.
    #[serde(default = "default_true")]
    pub available: bool,
    /// Declared parameters.
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

impl ActionSpec {
    /// Creates an available action with no parameters.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            available: true,
            parameters: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Appends a declared parameter.
    #[must_use]
    pub fn with_parameter(mut self, parameter: ParameterSpec) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Marks the action unavailable.
    #[must_use]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }
}

/// A declared action parameter.
///
/// Declarative documentation only — enforcement happens through the
/// schema registered with the dispatcher, not through this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Parameter name.
    pub name: String,
    /// Parameter type (e.g., "string", "number", "boolean", "object").
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Whether the parameter must be provided.
    #[serde(default)]
    pub required: bool,
    /// Allowed values, when the parameter is an enumeration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
}

impl ParameterSpec {
    /// Creates an optional parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: None,
            required: false,
            allowed: None,
        }
    }

    /// Creates a required parameter.
    #[must_use]
    pub fn required(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            required: true,
            ..Self::new(name, kind)
        }
    }

    /// Restricts the parameter to an enumerated set of values.
    #[must_use]
    pub fn with_allowed(mut self, allowed: Vec<Value>) -> Self {
        self.allowed = Some(allowed);
        self
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn component_builder() {
        let comp = Component::new("clock", "widget", "Clock")
            .with_description("Shows the time")
            .with_path("/plugins/clock")
            .with_action(ActionSpec::new("set_timezone", "Set timezone"));

        assert_eq!(comp.id, "clock");
        assert_eq!(comp.kind, "widget");
        assert_eq!(comp.path.as_deref(), Some("/plugins/clock"));
        assert!(comp.action("set_timezone").is_some());
        assert!(comp.action("unknown").is_none());
    }

    #[test]
    fn default_state_enabled_and_visible() {
        let state = ComponentState::default();
        assert!(state.enabled);
        assert!(state.visible);
        assert!(state.extra.is_empty());
    }

    #[test]
    fn action_spec_defaults_available() {
        let action = ActionSpec::new("open", "Open");
        assert!(action.available);
        assert!(!action.unavailable().available);
    }

    #[test]
    fn parameter_spec_enum() {
        let param = ParameterSpec::required("severity", "string")
            .with_allowed(vec![json!("info"), json!("warn"), json!("error")]);
        assert!(param.required);
        assert_eq!(param.allowed.as_ref().map(Vec::len), Some(3));
    }

    #[test]
    fn component_serde_roundtrip() {
        let mut state = ComponentState::default();
        state.extra.insert("pinned".into(), json!(true));

        let comp = Component {
            state,
            ..Component::new("files", "panel", "Files")
        };

        let json = serde_json::to_string(&comp).expect("serialize");
        let back: Component = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(comp, back);
        assert_eq!(back.state.extra.get("pinned"), Some(&json!(true)));
    }

    #[test]
    fn component_deserialize_minimal() {
        let comp: Component =
            serde_json::from_str(r#"{"id":"x","kind":"svc","name":"X"}"#).expect("deserialize");
        assert!(comp.actions.is_empty());
        assert!(comp.state.enabled);
    }
}
