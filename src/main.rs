//! Headless wallpaper-switcher daemon.
//!
//! Restores the persisted hotkey bindings (seeding the default on first
//! run), binds the configured slideshow actions, then drains the native
//! hotkey event stream until ctrl-c. `next` and `previous` subcommands
//! apply a single step and exit without touching the hotkey layer.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use global_hotkey::{GlobalHotKeyEvent, HotKeyState};
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wallswitch::config::{self, AppConfig};
use wallswitch::hotkeys::{
    ActivationRouter, GlobalHotkeyRegistrar, HotkeyService, JsonHotkeyStorage, DEFAULT_HOTKEY_NAME,
};
use wallswitch::logging;
use wallswitch::wallpaper::{LoggingSetter, SlideshowCycler};

/// Name of the binding that steps the slideshow backwards.
const PREVIOUS_HOTKEY_NAME: &str = "Previous Wallpaper";

type DaemonService = HotkeyService<GlobalHotkeyRegistrar, JsonHotkeyStorage>;

/// wallswitch - cycle desktop wallpapers with global hotkeys
#[derive(Parser)]
#[command(name = "wallswitch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Read configuration from this file instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply the next wallpaper once and exit
    Next,
    /// Apply the previous wallpaper once and exit
    Previous,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _guard = logging::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config_from(path),
        None => config::load_config(),
    };

    let mut cycler = SlideshowCycler::new(LoggingSetter::default());
    match config.first_available_folder() {
        Some(folder) => {
            if let Err(e) = cycler.set_folder(&folder.to_string_lossy()) {
                warn!(error = %e, "wallpaper folder not usable, cycling disabled");
            }
        }
        None => warn!("no wallpaper folder configured, cycling disabled"),
    }

    match cli.command {
        Some(Commands::Next) => {
            cycler
                .advance_forward()
                .context("failed to apply the next wallpaper")?;
            Ok(())
        }
        Some(Commands::Previous) => {
            cycler
                .advance_backward()
                .context("failed to apply the previous wallpaper")?;
            Ok(())
        }
        None => run_daemon(config, cycler).await,
    }
}

async fn run_daemon(
    config: AppConfig,
    cycler: SlideshowCycler<LoggingSetter>,
) -> anyhow::Result<()> {
    let registrar =
        GlobalHotkeyRegistrar::new().context("failed to initialize the OS hotkey manager")?;
    let router = registrar.router();

    let mut service = HotkeyService::new(registrar, JsonHotkeyStorage::new());
    service
        .load_from_storage_async()
        .await
        .context("failed to restore hotkey bindings")?;
    ensure_config_bindings(&mut service, &config);

    let stepper = Arc::new(Mutex::new(cycler));
    service.on_activation(move |binding| {
        let result = match binding.name.as_str() {
            DEFAULT_HOTKEY_NAME => stepper.lock().advance_forward(),
            PREVIOUS_HOTKEY_NAME => stepper.lock().advance_backward(),
            _ => Ok(()),
        };
        if let Err(e) = result {
            warn!(binding = %binding.name, error = %e, "wallpaper change failed");
        }
    });

    for binding in service.bindings() {
        info!(id = binding.id, hotkey = %binding.hotkey, name = %binding.name, "hotkey active");
    }

    let (activation_tx, mut activations) = mpsc::unbounded_channel();
    spawn_event_pump(router, activation_tx);

    info!("wallswitch running, press ctrl-c to exit");
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result.context("failed to listen for the shutdown signal")?;
                info!("shutting down");
                break;
            }
            maybe_id = activations.recv() => match maybe_id {
                Some(id) => service.dispatch_activation(id),
                None => {
                    warn!("event pump stopped, shutting down");
                    break;
                }
            },
        }
    }

    if let Err(e) = service.save_to_storage_async().await {
        warn!(error = %e, "failed to save hotkey bindings on shutdown");
    }
    service.dispose();
    Ok(())
}

/// Make sure both slideshow actions are bound. The restore path usually
/// brings them back from storage; on first run only the seeded default
/// exists, and the configured "Previous Wallpaper" combination is added
/// here. Failures are logged, not fatal: the daemon still serves whatever
/// did bind.
fn ensure_config_bindings(service: &mut DaemonService, config: &AppConfig) {
    let wanted = [
        (DEFAULT_HOTKEY_NAME, config.next_hotkey.as_str()),
        (PREVIOUS_HOTKEY_NAME, config.previous_hotkey.as_str()),
    ];

    for (name, text) in wanted {
        if service.find_by_name(name).is_some() {
            continue;
        }
        match service.register_binding(text, name) {
            Ok(id) => info!(id, hotkey = text, name, "bound configured hotkey"),
            Err(e) => warn!(name, hotkey = text, error = %e, "could not bind configured hotkey"),
        }
    }
}

/// Drain native hotkey events on a dedicated thread, translating native ids
/// into service binding ids. Only key presses are forwarded; releases are
/// ignored.
fn spawn_event_pump(router: ActivationRouter, activations: mpsc::UnboundedSender<u32>) {
    thread::spawn(move || {
        let receiver = GlobalHotKeyEvent::receiver();
        loop {
            let Ok(event) = receiver.recv() else {
                warn!("hotkey event channel closed, stopping event pump");
                return;
            };
            if event.state != HotKeyState::Pressed {
                continue;
            }

            match router.binding_id(event.id) {
                Some(id) => {
                    // A send failure means the daemon is already shutting down.
                    if activations.send(id).is_err() {
                        return;
                    }
                }
                None => debug!(native_id = event.id, "event for an id we do not own, ignoring"),
            }
        }
    });
}
