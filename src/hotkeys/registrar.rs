//! OS-level hotkey registration boundary.
//!
//! `HotkeyRegistrar` is the capability the service needs from the platform:
//! claim or release a key combination system-wide, reporting success as a
//! plain bool. `GlobalHotkeyRegistrar` is the production implementation on
//! top of the `global-hotkey` crate; tests inject fakes instead.

use std::collections::HashMap;
use std::sync::Arc;

use global_hotkey::{
    hotkey::{Code, HotKey, Modifiers as NativeModifiers},
    Error as NativeError, GlobalHotKeyManager,
};
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::types::{Key, Modifiers};

/// Native registration capability injected into the hotkey service.
///
/// Both operations touch process-wide OS state. A `false` return means the
/// OS declined (combination taken by another process, unknown id, platform
/// error); it is never a logical duplicate within this process, the service
/// checks that itself before calling in.
pub trait HotkeyRegistrar {
    /// Claim `modifiers + key` system-wide under the service-assigned `id`.
    fn register(&mut self, id: u32, modifiers: Modifiers, key: Key) -> bool;

    /// Release a previously claimed `id`. False if the id is not currently
    /// registered at the OS level.
    fn unregister(&mut self, id: u32) -> bool;
}

// =============================================================================
// Activation routing
// =============================================================================

/// Shared table translating native hotkey ids into service binding ids.
///
/// The `global-hotkey` crate derives its event ids from the key combination
/// itself, so the event loop sees native ids while the service tracks its
/// own. The registrar writes routes as it (un)registers; the event loop holds
/// a clone and reads them.
#[derive(Debug, Clone, Default)]
pub struct ActivationRouter {
    routes: Arc<Mutex<HashMap<u32, u32>>>,
}

impl ActivationRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// The service binding id behind a native event id, if any.
    pub fn binding_id(&self, native_id: u32) -> Option<u32> {
        self.routes.lock().get(&native_id).copied()
    }

    fn route(&self, native_id: u32, binding_id: u32) {
        self.routes.lock().insert(native_id, binding_id);
    }

    fn unroute(&self, native_id: u32) {
        self.routes.lock().remove(&native_id);
    }
}

// =============================================================================
// Production registrar
// =============================================================================

/// [`HotkeyRegistrar`] backed by [`GlobalHotKeyManager`].
///
/// NOTE: Must be created on the main thread; the underlying manager hooks
/// into the platform event loop.
pub struct GlobalHotkeyRegistrar {
    manager: GlobalHotKeyManager,
    /// Maps service id -> HotKey object (needed for exact unregistration).
    registered: HashMap<u32, HotKey>,
    router: ActivationRouter,
}

impl GlobalHotkeyRegistrar {
    pub fn new() -> Result<Self, NativeError> {
        Ok(Self {
            manager: GlobalHotKeyManager::new()?,
            registered: HashMap::new(),
            router: ActivationRouter::new(),
        })
    }

    /// A clone of the native-id route table for the event loop.
    pub fn router(&self) -> ActivationRouter {
        self.router.clone()
    }
}

impl HotkeyRegistrar for GlobalHotkeyRegistrar {
    fn register(&mut self, id: u32, modifiers: Modifiers, key: Key) -> bool {
        let Some(code) = native_code(key) else {
            warn!(id, "refusing to register a binding without a key");
            return false;
        };

        let hotkey = HotKey::new(Some(native_modifiers(modifiers)), code);
        let native_id = hotkey.id();

        if let Err(e) = self.manager.register(hotkey) {
            match e {
                NativeError::AlreadyRegistered(hk) => warn!(
                    id,
                    native_id = hk.id(),
                    "combination is already claimed by another application"
                ),
                NativeError::FailedToRegister(msg) => {
                    warn!(id, %msg, "the OS rejected the combination")
                }
                NativeError::OsError(os_err) => {
                    warn!(id, error = %os_err, "OS error while registering hotkey")
                }
                other => warn!(id, error = %other, "failed to register hotkey"),
            }
            return false;
        }

        self.registered.insert(id, hotkey);
        self.router.route(native_id, id);
        debug!(id, native_id, "registered hotkey with the OS");
        true
    }

    fn unregister(&mut self, id: u32) -> bool {
        let Some(hotkey) = self.registered.get(&id).copied() else {
            return false;
        };

        if let Err(e) = self.manager.unregister(hotkey) {
            warn!(id, error = %e, "failed to unregister hotkey with the OS");
            return false;
        }

        self.registered.remove(&id);
        self.router.unroute(hotkey.id());
        debug!(id, "unregistered hotkey with the OS");
        true
    }
}

fn native_modifiers(modifiers: Modifiers) -> NativeModifiers {
    let mut native = NativeModifiers::empty();
    if modifiers.contains(Modifiers::CONTROL) {
        native |= NativeModifiers::CONTROL;
    }
    if modifiers.contains(Modifiers::SHIFT) {
        native |= NativeModifiers::SHIFT;
    }
    if modifiers.contains(Modifiers::ALT) {
        native |= NativeModifiers::ALT;
    }
    if modifiers.contains(Modifiers::WIN) {
        native |= NativeModifiers::SUPER;
    }
    native
}

fn native_code(key: Key) -> Option<Code> {
    let code = match key {
        Key::None => return None,
        Key::A => Code::KeyA,
        Key::B => Code::KeyB,
        Key::C => Code::KeyC,
        Key::D => Code::KeyD,
        Key::E => Code::KeyE,
        Key::F => Code::KeyF,
        Key::G => Code::KeyG,
        Key::H => Code::KeyH,
        Key::I => Code::KeyI,
        Key::J => Code::KeyJ,
        Key::K => Code::KeyK,
        Key::L => Code::KeyL,
        Key::M => Code::KeyM,
        Key::N => Code::KeyN,
        Key::O => Code::KeyO,
        Key::P => Code::KeyP,
        Key::Q => Code::KeyQ,
        Key::R => Code::KeyR,
        Key::S => Code::KeyS,
        Key::T => Code::KeyT,
        Key::U => Code::KeyU,
        Key::V => Code::KeyV,
        Key::W => Code::KeyW,
        Key::X => Code::KeyX,
        Key::Y => Code::KeyY,
        Key::Z => Code::KeyZ,
        Key::F1 => Code::F1,
        Key::F2 => Code::F2,
        Key::F3 => Code::F3,
        Key::F4 => Code::F4,
        Key::F5 => Code::F5,
        Key::F6 => Code::F6,
        Key::F7 => Code::F7,
        Key::F8 => Code::F8,
        Key::F9 => Code::F9,
        Key::F10 => Code::F10,
        Key::F11 => Code::F11,
        Key::F12 => Code::F12,
        Key::Space => Code::Space,
        Key::Enter => Code::Enter,
        Key::Escape => Code::Escape,
        Key::Tab => Code::Tab,
    };
    Some(code)
}
