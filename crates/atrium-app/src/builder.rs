//! Builder for [`AtriumApp`].

use crate::app::AtriumApp;
use crate::config::AtriumConfig;
use crate::error::AppError;
use atrium_action::{ComponentRegistry, Dispatcher, SystemActions};
use atrium_event::{EventBus, EventWaiter};
use atrium_macro::{FileMacroStore, MacroService, MacroStore, MemoryMacroStore};
use atrium_mcp::McpBridge;
use std::sync::Arc;
use tracing::info;

/// Builder for [`AtriumApp`].
///
/// Defaults: config from `AtriumConfig::default()`, a file-backed
/// macro store at the configured path, and the built-in `system`
/// component installed.
///
/// # Example
///
/// ```
/// use atrium_app::AtriumApp;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let app = AtriumApp::builder().with_memory_store().build().await?;
/// assert!(app.components().iter().any(|c| c.id == "system"));
/// # Ok(())
/// # }
/// ```
pub struct AtriumAppBuilder {
    config: AtriumConfig,
    store: Option<Arc<dyn MacroStore>>,
    system_actions: bool,
}

impl AtriumAppBuilder {
    pub(crate) fn new() -> Self {
        Self {
            config: AtriumConfig::default(),
            store: None,
            system_actions: true,
        }
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: AtriumConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses a specific macro store instead of the configured file.
    #[must_use]
    pub fn with_store(mut self, store: Arc<dyn MacroStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Uses a non-durable in-memory macro store.
    #[must_use]
    pub fn with_memory_store(self) -> Self {
        self.with_store(Arc::new(MemoryMacroStore::new()))
    }

    /// Skips installing the built-in `system` component.
    #[must_use]
    pub fn without_system_actions(mut self) -> Self {
        self.system_actions = false;
        self
    }

    /// Builds the application.
    ///
    /// Wires the bus, waiter, registry, dispatcher, macro service, and
    /// tool bridge onto one shared event bus, then loads the persisted
    /// macro table.
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the macro store cannot be created or
    /// its persisted table cannot be read.
    pub async fn build(self) -> Result<AtriumApp, AppError> {
        let bus = Arc::new(EventBus::new());
        let waiter = EventWaiter::new(Arc::clone(&bus));
        let registry = Arc::new(ComponentRegistry::new(Arc::clone(&bus)));
        let dispatcher = Arc::new(Dispatcher::new(Arc::clone(&bus)));

        let store: Arc<dyn MacroStore> = match self.store {
            Some(store) => store,
            None => Arc::new(FileMacroStore::new(self.config.macros.path.clone())?),
        };
        let macros = Arc::new(MacroService::load(store).await?);
        let recorder = macros.attach(&bus);

        let bridge = McpBridge::new(Arc::clone(&dispatcher));

        if self.system_actions {
            SystemActions::install(&dispatcher, &registry);
        }

        info!(macros = macros.len(), "atrium core assembled");
        Ok(AtriumApp {
            config: self.config,
            bus,
            waiter,
            registry,
            dispatcher,
            macros,
            bridge,
            recorder,
        })
    }
}
