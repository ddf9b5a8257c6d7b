//! wallswitch - global-hotkey driven wallpaper switching
//!
//! This library provides the hotkey binding subsystem (value types, a
//! registration service over an OS capability trait, JSON persistence) and
//! the slideshow machinery the daemon binary wires together.

pub mod config;
pub mod hotkeys;
pub mod logging;
pub mod paths;
pub mod wallpaper;
