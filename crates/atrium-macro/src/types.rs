//! Macro data model.
//!
//! A macro is an ordered list of recorded action invocations. The
//! serialized form uses camelCase keys, matching the event payloads the
//! steps were recorded from, so a persisted table reads the same as the
//! audit trail that produced it.

use atrium_types::{ActionResult, MacroId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded action invocation.
///
/// Steps carry the **sanitized** parameters the handler saw, not the
/// caller's originals — replay goes through the same dispatch pipeline
/// and would sanitize again anyway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroStep {
    /// Component the action belongs to.
    pub component_id: String,
    /// Action that was invoked.
    pub action_id: String,
    /// Parameters passed to the action, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    /// When the step was captured.
    pub timestamp: DateTime<Utc>,
}

impl MacroStep {
    /// Creates a step stamped with the current time.
    #[must_use]
    pub fn new(component_id: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            component_id: component_id.into(),
            action_id: action_id.into(),
            parameters: None,
            timestamp: Utc::now(),
        }
    }

    /// Sets the step parameters.
    #[must_use]
    pub fn with_parameters(mut self, parameters: Value) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

/// A named, replayable sequence of steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Macro {
    /// Stable identifier, minted when the recording is saved.
    pub id: MacroId,
    /// Human-chosen name. Never empty.
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Recorded steps, in capture order.
    pub steps: Vec<MacroStep>,
    /// When the recording was saved.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
    /// Free-form labels for organizing the macro table.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Macro {
    /// Creates a macro with a fresh id and current timestamps.
    #[must_use]
    pub fn new(name: impl Into<String>, steps: Vec<MacroStep>) -> Self {
        let now = Utc::now();
        Self {
            id: MacroId::new(),
            name: name.into(),
            description: None,
            steps,
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Number of recorded steps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the macro has no steps. Saved macros never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Outcome of replaying one macro.
///
/// `results` has one entry per step in step order, failed steps
/// included — replay never aborts early on a failed step. `success`
/// reflects the replay machinery, not the steps: an unknown macro id or
/// a store failure flips it, a failing step does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacroRunReport {
    /// The macro that was replayed, when it existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_id: Option<MacroId>,
    /// Name of the macro, when it existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macro_name: Option<String>,
    /// Per-step outcomes, in step order.
    pub results: Vec<ActionResult>,
    /// Whether the replay machinery itself ran cleanly.
    pub success: bool,
    /// Machinery error, when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MacroRunReport {
    /// Number of steps whose `ActionResult` reported success.
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    /// Number of steps whose `ActionResult` reported failure.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.succeeded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn step_builder_sets_parameters() {
        let step = MacroStep::new("system", "notify").with_parameters(json!({"message": "hi"}));
        assert_eq!(step.component_id, "system");
        assert_eq!(step.parameters, Some(json!({"message": "hi"})));
    }

    #[test]
    fn macro_json_round_trip_is_lossless() {
        let recorded = Macro::new(
            "morning",
            vec![
                MacroStep::new("system", "launch_app").with_parameters(json!({"appId": "mail"})),
                MacroStep::new("system", "notify").with_parameters(json!({"message": "ready"})),
            ],
        )
        .with_description("open the usual apps")
        .with_tag("daily");

        let json = serde_json::to_string(&recorded).expect("serialize");
        let parsed: Macro = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(parsed, recorded);
        assert_eq!(parsed.steps[0].action_id, "launch_app");
    }

    #[test]
    fn serialized_keys_are_camel_case() {
        let recorded = Macro::new("m", vec![MacroStep::new("a", "b")]);
        let value = serde_json::to_value(&recorded).expect("serialize");

        assert!(value.get("createdAt").is_some());
        assert!(value["steps"][0].get("componentId").is_some());
        assert!(value["steps"][0].get("component_id").is_none());
    }

    #[test]
    fn report_counts_split_by_step_success() {
        let report = MacroRunReport {
            macro_id: Some(MacroId::new()),
            macro_name: Some("m".into()),
            results: vec![
                ActionResult::ok(),
                ActionResult::fail("nope"),
                ActionResult::ok(),
            ],
            success: true,
            error: None,
        };

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.failed(), 1);
    }
}
