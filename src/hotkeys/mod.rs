//! Global hotkey registration and binding management.
//!
//! This module provides:
//! - `Hotkey` value types with a stable `Ctrl+Shift+N` text form
//! - `HotkeyService`, which owns binding state, id allocation, duplicate
//!   detection, and activation dispatch
//! - A `HotkeyRegistrar` capability trait over the OS registration surface
//! - JSON persistence with first-run seeding and corrupt-file tolerance
//!
//! # Example
//!
//! ```ignore
//! use wallswitch::hotkeys::{GlobalHotkeyRegistrar, HotkeyService, JsonHotkeyStorage};
//!
//! let registrar = GlobalHotkeyRegistrar::new()?;
//! let mut service = HotkeyService::new(registrar, JsonHotkeyStorage::new());
//! service.load_from_storage()?; // seeds Ctrl+Alt+N on first run
//! service.on_activation(|binding| println!("{} fired", binding.name));
//! ```

mod persistence;
mod registrar;
mod service;
mod types;


/// Combination seeded when storage holds nothing usable.
pub const DEFAULT_HOTKEY: &str = "Ctrl+Alt+N";

/// Name of the seeded binding.
pub const DEFAULT_HOTKEY_NAME: &str = "Next Wallpaper";

// Re-export value types
pub use types::{Hotkey, HotkeyBinding, HotkeyParseError, Key, Modifiers};

// Re-export the service and its error taxonomy
pub use service::{ActivationHandler, FIRST_BINDING_ID, HotkeyError, HotkeyService};

// Re-export the OS registration boundary
pub use registrar::{ActivationRouter, GlobalHotkeyRegistrar, HotkeyRegistrar};

// Re-export persistence
pub use persistence::{HotkeyStorage, JsonHotkeyStorage};
