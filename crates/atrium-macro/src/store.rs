//! Macro persistence backends.
//!
//! The whole macro table is one JSON document, rewritten in full on
//! every mutation. Tables are small (tens of macros), so the simplicity
//! of whole-table rewrite wins over incremental updates.

use crate::error::StoreError;
use crate::types::Macro;
use async_trait::async_trait;
use atrium_types::MacroId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Persistence backend for the macro table.
#[async_trait]
pub trait MacroStore: Send + Sync {
    /// Persists the entire macro table, replacing any previous state.
    async fn save_all(&self, macros: &HashMap<MacroId, Macro>) -> Result<(), StoreError>;

    /// Loads the entire macro table.
    ///
    /// A store that has never been written returns an empty table.
    async fn load_all(&self) -> Result<HashMap<MacroId, Macro>, StoreError>;
}

/// File-backed macro store.
///
/// # Features
///
/// - Table stored as pretty-printed JSON
/// - Atomic writes (write to temp, then rename)
/// - Automatic parent-directory creation
///
/// # Example
///
/// ```no_run
/// use atrium_macro::{FileMacroStore, MacroStore};
/// use std::collections::HashMap;
/// use std::path::PathBuf;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = FileMacroStore::new(PathBuf::from("~/.atrium/macros.json"))?;
/// let macros = store.load_all().await?;
/// println!("loaded {} macros", macros.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FileMacroStore {
    /// Path of the JSON document.
    path: PathBuf,
}

impl FileMacroStore {
    /// Creates a file store writing to `path`.
    ///
    /// The parent directory is created if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the parent directory cannot be
    /// created.
    pub fn new(path: PathBuf) -> Result<Self, StoreError> {
        let expanded = expand_tilde(&path);

        // Create the parent directory (synchronously for constructor)
        if let Some(parent) = expanded.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self { path: expanded })
    }

    /// Returns the document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns a temporary sibling path for atomic writes.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("macros.json");
        self.path.with_file_name(format!(".{name}.tmp"))
    }
}

#[async_trait]
impl MacroStore for FileMacroStore {
    async fn save_all(&self, macros: &HashMap<MacroId, Macro>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(macros).map_err(StoreError::Serialize)?;
        let temp_path = self.temp_path();

        // Write to temp file first (atomic write pattern)
        fs::write(&temp_path, &json).await?;

        // Rename to final path (atomic on most filesystems)
        fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), count = macros.len(), "macro table saved");
        Ok(())
    }

    async fn load_all(&self) -> Result<HashMap<MacroId, Macro>, StoreError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let json = fs::read_to_string(&self.path).await?;
        let macros = serde_json::from_str(&json).map_err(StoreError::Deserialize)?;
        Ok(macros)
    }
}

/// In-memory macro store.
///
/// Holds the table behind a mutex with no durability. Intended for
/// tests and throwaway instances.
#[derive(Debug, Default)]
pub struct MemoryMacroStore {
    macros: Mutex<HashMap<MacroId, Macro>>,
}

impl MemoryMacroStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MacroStore for MemoryMacroStore {
    async fn save_all(&self, macros: &HashMap<MacroId, Macro>) -> Result<(), StoreError> {
        *self.macros.lock() = macros.clone();
        Ok(())
    }

    async fn load_all(&self) -> Result<HashMap<MacroId, Macro>, StoreError> {
        Ok(self.macros.lock().clone())
    }
}

/// Expands `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    if let Some(path_str) = path.to_str() {
        if let Some(rest) = path_str.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}
