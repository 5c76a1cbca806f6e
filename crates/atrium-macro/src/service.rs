//! Macro recording and replay.
//!
//! One [`MacroService`] owns the in-memory macro table and a single
//! recording slot. Recording is wired to the dispatcher's audit trail:
//! [`attach`](MacroService::attach) subscribes to `action:executed`, so
//! every action dispatched while the recorder is armed becomes a step —
//! no caller cooperation needed.
//!
//! ```text
//!            start_recording()          stop_recording(name)
//!   Idle ─────────────────────▶ Recording ─────────────────▶ Idle
//!    ▲                              │                     (macro saved)
//!    └──────────────────────────────┘
//!         cancel_recording()
//! ```
//!
//! Replay is strictly sequential: each step's dispatch completes before
//! the next begins, and a failed step never aborts the run.

use crate::error::{MacroError, StoreError};
use crate::store::MacroStore;
use crate::types::{Macro, MacroRunReport, MacroStep};
use atrium_action::Dispatcher;
use atrium_event::{EventBus, Subscription};
use atrium_types::MacroId;
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde_json::json;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn};

/// Event emitted when a recording is saved as a macro.
pub const MACRO_RECORDED_EVENT: &str = "macro:recorded";
/// Event emitted when a macro is deleted.
pub const MACRO_DELETED_EVENT: &str = "macro:deleted";

/// An in-progress recording.
struct RecordingSession {
    started_at: DateTime<Utc>,
    steps: Vec<MacroStep>,
}

/// Macro table, recorder, and player.
///
/// # Example
///
/// ```
/// use atrium_macro::{MacroService, MacroStep, MemoryMacroStore};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let service = MacroService::new(Arc::new(MemoryMacroStore::new()));
///
/// service.start_recording();
/// service.record_step(MacroStep::new("system", "notify").with_parameters(json!({"message": "hi"})));
/// let saved = service.stop_recording("greeting", None).await?;
///
/// assert_eq!(saved.steps.len(), 1);
/// # Ok(())
/// # }
/// ```
pub struct MacroService {
    store: Arc<dyn MacroStore>,
    macros: RwLock<std::collections::HashMap<MacroId, Macro>>,
    recording: Mutex<Option<RecordingSession>>,
    bus: Mutex<Option<Arc<EventBus>>>,
}

impl MacroService {
    /// Creates a service with an empty in-memory table.
    ///
    /// Use [`load`](Self::load) to start from a store's persisted
    /// table instead.
    #[must_use]
    pub fn new(store: Arc<dyn MacroStore>) -> Self {
        Self {
            store,
            macros: RwLock::new(std::collections::HashMap::new()),
            recording: Mutex::new(None),
            bus: Mutex::new(None),
        }
    }

    /// Creates a service seeded from the store's persisted table.
    ///
    /// The store is read exactly once, here; afterwards the in-memory
    /// table is authoritative and the store only receives writes.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the persisted table cannot be read.
    pub async fn load(store: Arc<dyn MacroStore>) -> Result<Self, StoreError> {
        let macros = store.load_all().await?;
        debug!(count = macros.len(), "macro table loaded");
        Ok(Self {
            store,
            macros: RwLock::new(macros),
            recording: Mutex::new(None),
            bus: Mutex::new(None),
        })
    }

    /// Wires the recorder to a bus's `action:executed` audit trail and
    /// enables `macro:recorded` / `macro:deleted` lifecycle events.
    ///
    /// While a recording is active, every audited dispatch on `bus`
    /// becomes a step. The returned [`Subscription`] detaches the
    /// recorder when passed back to `bus.unsubscribe`.
    pub fn attach(self: &Arc<Self>, bus: &Arc<EventBus>) -> Subscription {
        *self.bus.lock() = Some(Arc::clone(bus));

        let weak: Weak<Self> = Arc::downgrade(self);
        bus.subscribe(atrium_action::ACTION_EXECUTED_EVENT, move |data| {
            let Some(service) = weak.upgrade() else {
                return;
            };
            let (Some(component_id), Some(action_id)) = (
                data.get("componentId").and_then(|v| v.as_str()),
                data.get("actionId").and_then(|v| v.as_str()),
            ) else {
                return;
            };
            let mut step = MacroStep::new(component_id, action_id);
            if let Some(parameters) = data.get("parameters") {
                step.parameters = Some(parameters.clone());
            }
            service.record_step(step);
        })
    }

    /// Arms the recorder.
    ///
    /// If a recording is already active this warns and keeps it; the
    /// in-flight steps are not discarded.
    pub fn start_recording(&self) {
        let mut recording = self.recording.lock();
        if recording.is_some() {
            warn!("recording already in progress, ignoring start");
            return;
        }
        *recording = Some(RecordingSession {
            started_at: Utc::now(),
            steps: Vec::new(),
        });
        info!("macro recording started");
    }

    /// Returns whether a recording is active.
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.recording.lock().is_some()
    }

    /// Appends a step to the active recording.
    ///
    /// Silently dropped when the recorder is idle — the audit trail
    /// fires for every dispatch, armed or not.
    pub fn record_step(&self, step: MacroStep) {
        if let Some(session) = self.recording.lock().as_mut() {
            session.steps.push(step);
        }
    }

    /// Number of steps captured by the active recording.
    #[must_use]
    pub fn recorded_steps(&self) -> usize {
        self.recording.lock().as_ref().map_or(0, |s| s.steps.len())
    }

    /// Finishes the recording and saves it as a named macro.
    ///
    /// The whole table is persisted before the macro becomes visible;
    /// a store failure leaves both the table and the recording session
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`MacroError::NotRecording`] if the recorder is idle;
    /// - [`MacroError::EmptyName`] for an empty or whitespace name —
    ///   the recording stays active so the caller can retry;
    /// - [`MacroError::NoSteps`] if nothing was captured — the
    ///   recording stays active;
    /// - [`MacroError::Store`] if persistence fails.
    pub async fn stop_recording(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Macro, MacroError> {
        let name = name.trim();
        {
            let recording = self.recording.lock();
            let session = recording.as_ref().ok_or(MacroError::NotRecording)?;
            if name.is_empty() {
                return Err(MacroError::EmptyName);
            }
            if session.steps.is_empty() {
                return Err(MacroError::NoSteps);
            }
        }

        // Checks passed: take the session and build the macro.
        let session = self
            .recording
            .lock()
            .take()
            .ok_or(MacroError::NotRecording)?;
        let mut saved = Macro::new(name, session.steps);
        saved.created_at = session.started_at;
        if let Some(description) = description {
            saved.description = Some(description.to_string());
        }

        let table = {
            let mut table = self.macros.read().clone();
            table.insert(saved.id, saved.clone());
            table
        };
        if let Err(err) = self.store.save_all(&table).await {
            // Restore the session so nothing recorded is lost.
            *self.recording.lock() = Some(RecordingSession {
                started_at: saved.created_at,
                steps: saved.steps,
            });
            return Err(err.into());
        }
        *self.macros.write() = table;

        info!(id = %saved.id, name = %saved.name, steps = saved.steps.len(), "macro recorded");
        self.emit(MACRO_RECORDED_EVENT, json!({ "macroId": saved.id, "name": saved.name }));
        Ok(saved)
    }

    /// Discards the active recording.
    ///
    /// # Errors
    ///
    /// Returns [`MacroError::NotRecording`] if the recorder is idle.
    pub fn cancel_recording(&self) -> Result<usize, MacroError> {
        let session = self.recording.lock().take().ok_or(MacroError::NotRecording)?;
        info!(discarded = session.steps.len(), "macro recording cancelled");
        Ok(session.steps.len())
    }

    /// Returns the macro with this id, if any.
    #[must_use]
    pub fn get(&self, id: MacroId) -> Option<Macro> {
        self.macros.read().get(&id).cloned()
    }

    /// Returns all macros, oldest first.
    #[must_use]
    pub fn all(&self) -> Vec<Macro> {
        let mut macros: Vec<Macro> = self.macros.read().values().cloned().collect();
        macros.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        macros
    }

    /// Number of saved macros.
    #[must_use]
    pub fn len(&self) -> usize {
        self.macros.read().len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.macros.read().is_empty()
    }

    /// Deletes a macro and persists the shrunk table.
    ///
    /// Unknown ids warn and return `false` without touching the store.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if persistence fails; the macro stays in
    /// the table.
    pub async fn delete(&self, id: MacroId) -> Result<bool, StoreError> {
        let table = {
            let macros = self.macros.read();
            if !macros.contains_key(&id) {
                warn!(%id, "delete of unknown macro ignored");
                return Ok(false);
            }
            let mut table = macros.clone();
            table.remove(&id);
            table
        };

        self.store.save_all(&table).await?;
        *self.macros.write() = table;

        info!(%id, "macro deleted");
        self.emit(MACRO_DELETED_EVENT, json!({ "macroId": id }));
        Ok(true)
    }

    /// Replays a macro through the dispatcher, step by step.
    ///
    /// Steps run strictly sequentially. Every step's [`ActionResult`]
    /// lands in the report, failures included; a failed step never
    /// aborts the run. The report's `success` flag covers only the
    /// replay machinery — an unknown id yields `success: false` with
    /// no results, never a panic.
    ///
    /// [`ActionResult`]: atrium_types::ActionResult
    pub async fn execute(&self, id: MacroId, dispatcher: &Dispatcher) -> MacroRunReport {
        let Some(replayed) = self.get(id) else {
            return MacroRunReport {
                macro_id: None,
                macro_name: None,
                results: Vec::new(),
                success: false,
                error: Some(MacroError::NotFound(id).to_string()),
            };
        };

        info!(%id, name = %replayed.name, steps = replayed.steps.len(), "macro replay started");
        let mut results = Vec::with_capacity(replayed.steps.len());
        for step in &replayed.steps {
            let result = dispatcher
                .execute(&step.component_id, &step.action_id, step.parameters.clone())
                .await;
            if !result.success {
                warn!(
                    component = %step.component_id,
                    action = %step.action_id,
                    error = result.error_message(),
                    "macro step failed, continuing"
                );
            }
            results.push(result);
        }

        MacroRunReport {
            macro_id: Some(replayed.id),
            macro_name: Some(replayed.name),
            results,
            success: true,
            error: None,
        }
    }

    fn emit(&self, event: &str, data: serde_json::Value) {
        if let Some(bus) = self.bus.lock().clone() {
            bus.emit(event, data);
        }
    }
}
