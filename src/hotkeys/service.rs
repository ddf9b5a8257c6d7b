//! Registration, lookup, dispatch, and lifecycle for global hotkeys.
//!
//! `HotkeyService` owns the live binding table. It layers the logical rules
//! (duplicate detection, name validation, id allocation) on top of an
//! injected [`HotkeyRegistrar`] and persists through an injected
//! [`HotkeyStorage`]. Activation events reach consumers through a
//! synchronous subscriber list.

use std::collections::HashMap;
use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::persistence::HotkeyStorage;
use super::registrar::HotkeyRegistrar;
use super::types::{Hotkey, HotkeyBinding, HotkeyParseError};
use super::{DEFAULT_HOTKEY, DEFAULT_HOTKEY_NAME};

/// Id handed to the first binding. Restored bindings keep their stored ids
/// and push the allocator past them.
pub const FIRST_BINDING_ID: u32 = 1000;

/// Callback invoked when a registered hotkey fires.
pub type ActivationHandler = Arc<dyn Fn(&HotkeyBinding) + Send + Sync>;

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum HotkeyError {
    /// The service was used after `dispose`.
    #[error("the hotkey service has been disposed")]
    Disposed,

    /// The hotkey text did not parse; carries the offending input.
    #[error("failed to parse hotkey string '{text}'")]
    Parse {
        text: String,
        #[source]
        source: HotkeyParseError,
    },

    /// A live binding already claims the same combination.
    #[error("a hotkey with the same combination is already registered")]
    Duplicate { existing: HotkeyBinding },

    /// OS-level (un)registration failure or a logical precondition failure
    /// such as an unknown or empty name.
    #[error("{0}")]
    Binding(String),

    /// Unrecoverable I/O from the storage layer.
    #[error("hotkey storage failed")]
    Storage(#[from] io::Error),
}

// =============================================================================
// Service
// =============================================================================

/// Live hotkey bindings keyed by service-assigned id.
///
/// A single logical owner drives all mutation (`&mut self` everywhere);
/// multi-threaded callers wrap the service in a mutex, since register,
/// unregister, and rebind are multi-step check-then-act sequences.
pub struct HotkeyService<R: HotkeyRegistrar, S: HotkeyStorage> {
    registrar: R,
    storage: S,
    bindings: HashMap<u32, HotkeyBinding>,
    handlers: Vec<ActivationHandler>,
    next_id: u32,
    disposed: bool,
}

impl<R: HotkeyRegistrar, S: HotkeyStorage> HotkeyService<R, S> {
    pub fn new(registrar: R, storage: S) -> Self {
        Self {
            registrar,
            storage,
            bindings: HashMap::new(),
            handlers: Vec::new(),
            next_id: FIRST_BINDING_ID,
            disposed: false,
        }
    }

    /// Parse `hotkey_text` and claim it under `name`. Returns the assigned id.
    pub fn register_binding(&mut self, hotkey_text: &str, name: &str) -> Result<u32, HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        let hotkey = Hotkey::parse(hotkey_text).map_err(|source| HotkeyError::Parse {
            text: hotkey_text.to_string(),
            source,
        })?;
        self.register_hotkey(hotkey, name, None)
    }

    /// Structured registration shared by the public path, restore, and
    /// rebind. `id` is `None` for fresh allocations; restore and rebind
    /// supply the id to keep, and the allocator is advanced past it.
    fn register_hotkey(
        &mut self,
        hotkey: Hotkey,
        name: &str,
        id: Option<u32>,
    ) -> Result<u32, HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        if let Some(existing) = self.bindings.values().find(|b| b.hotkey == hotkey) {
            return Err(HotkeyError::Duplicate {
                existing: existing.clone(),
            });
        }

        if name.trim().is_empty() {
            return Err(HotkeyError::Binding("hotkey name cannot be empty".into()));
        }

        let id = match id {
            Some(id) => {
                self.next_id = self.next_id.max(id + 1);
                id
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        };

        // The id stays consumed even if the OS refuses; ids are cheap and a
        // rollback here would complicate the restore path for nothing.
        if !self.registrar.register(id, hotkey.modifiers, hotkey.key) {
            return Err(HotkeyError::Binding(format!(
                "failed to register hotkey {hotkey} for '{name}'"
            )));
        }

        self.bindings
            .insert(id, HotkeyBinding::new(id, hotkey, name));
        info!(id, hotkey = %hotkey, name, "registered hotkey");
        Ok(id)
    }

    /// Release the binding called `name`. `Ok(false)` when the name is
    /// unknown or the OS refused; the live map only changes on OS success,
    /// so the map and OS state never diverge.
    pub fn unregister_binding(&mut self, name: &str) -> Result<bool, HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        let Some(id) = self.find_by_name(name).map(|binding| binding.id) else {
            return Ok(false);
        };

        if !self.registrar.unregister(id) {
            warn!(id, name, "OS refused to release hotkey, keeping the binding");
            return Ok(false);
        }

        self.bindings.remove(&id);
        info!(id, name, "unregistered hotkey");
        Ok(true)
    }

    /// Point `name` at a new combination, keeping its id. Empty or blank
    /// `new_hotkey_text` deletes the binding instead. The old combination is
    /// released before the new one is claimed, so a failure in the second
    /// half leaves the name removed rather than reverted.
    pub fn rebind(&mut self, name: &str, new_hotkey_text: &str) -> Result<(), HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        let Some(id) = self.find_by_name(name).map(|binding| binding.id) else {
            return Err(HotkeyError::Binding(format!(
                "no hotkey registered with the name '{name}'"
            )));
        };

        if !self.unregister_binding(name)? {
            return Err(HotkeyError::Binding(format!(
                "failed to unregister hotkey '{name}' during re-binding"
            )));
        }

        if new_hotkey_text.trim().is_empty() {
            info!(id, name, "rebound to empty text, binding removed");
            return Ok(());
        }

        let hotkey = Hotkey::parse(new_hotkey_text).map_err(|source| HotkeyError::Parse {
            text: new_hotkey_text.to_string(),
            source,
        })?;
        self.register_hotkey(hotkey, name, Some(id))?;
        Ok(())
    }

    /// Notify subscribers that the binding with `id` fired. Ids this service
    /// does not own are ignored; the OS event stream is shared with the
    /// whole desktop session.
    pub fn dispatch_activation(&self, id: u32) {
        let Some(binding) = self.bindings.get(&id) else {
            return;
        };

        debug!(id, name = %binding.name, "hotkey activated");
        for handler in &self.handlers {
            handler(binding);
        }
    }

    /// Subscribe to activation notifications. Handlers run synchronously on
    /// the dispatching thread, in subscription order.
    pub fn on_activation(&mut self, handler: impl Fn(&HotkeyBinding) + Send + Sync + 'static) {
        self.handlers.push(Arc::new(handler));
    }

    /// Restore persisted bindings, or seed and persist the default binding
    /// when nothing usable is stored. Individual restore failures are logged
    /// and skipped.
    pub fn load_from_storage(&mut self) -> Result<(), HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        let stored = self.storage.load()?;
        if stored.is_empty() {
            self.seed_default()?;
            self.save_to_storage()?;
            return Ok(());
        }
        self.restore_entries(stored);
        Ok(())
    }

    /// Async counterpart of [`load_from_storage`](Self::load_from_storage).
    pub async fn load_from_storage_async(&mut self) -> Result<(), HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        let stored = self.storage.load_async().await?;
        if stored.is_empty() {
            self.seed_default()?;
            self.save_to_storage_async().await?;
            return Ok(());
        }
        self.restore_entries(stored);
        Ok(())
    }

    /// Persist a snapshot of the live bindings.
    pub fn save_to_storage(&self) -> Result<(), HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        let entries = self.bindings();
        self.storage.save(&entries)?;
        debug!(count = entries.len(), "saved hotkey bindings");
        Ok(())
    }

    /// Async counterpart of [`save_to_storage`](Self::save_to_storage).
    pub async fn save_to_storage_async(&self) -> Result<(), HotkeyError> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }

        let entries = self.bindings();
        self.storage.save_async(&entries).await?;
        debug!(count = entries.len(), "saved hotkey bindings");
        Ok(())
    }

    /// Snapshot of the current live bindings.
    pub fn bindings(&self) -> Vec<HotkeyBinding> {
        self.bindings.values().cloned().collect()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&HotkeyBinding> {
        self.find_by(|binding: &HotkeyBinding| binding.name.as_str(), name)
    }

    /// Linear scan for the binding whose `selector` projection equals
    /// `value`.
    pub fn find_by<T: PartialEq + ?Sized>(
        &self,
        selector: impl Fn(&HotkeyBinding) -> &T,
        value: &T,
    ) -> Option<&HotkeyBinding> {
        self.bindings
            .values()
            .find(|binding| selector(binding) == value)
    }

    fn seed_default(&mut self) -> Result<(), HotkeyError> {
        info!(
            hotkey = DEFAULT_HOTKEY,
            name = DEFAULT_HOTKEY_NAME,
            "no stored hotkeys, seeding the default binding"
        );
        self.register_binding(DEFAULT_HOTKEY, DEFAULT_HOTKEY_NAME)?;
        Ok(())
    }

    fn restore_entries(&mut self, stored: Vec<HotkeyBinding>) {
        for entry in stored {
            if let Err(e) = self.register_hotkey(entry.hotkey, &entry.name, Some(entry.id)) {
                warn!(
                    id = entry.id,
                    name = %entry.name,
                    error = %e,
                    "skipping persisted hotkey that failed to restore"
                );
            }
        }
    }

    /// Release every live registration and clear the map. Best-effort: OS
    /// refusals are logged and skipped. Idempotent; `Drop` runs the same
    /// path.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        for (id, binding) in &self.bindings {
            if !self.registrar.unregister(*id) {
                warn!(id = *id, name = %binding.name, "failed to release hotkey during dispose");
            }
        }
        self.bindings.clear();
        info!("hotkey service disposed");
    }
}

impl<R: HotkeyRegistrar, S: HotkeyStorage> Drop for HotkeyService<R, S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
