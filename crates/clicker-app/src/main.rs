//! Multi-Clicker headless entry point.
//!
//! Wires the platform hooks and injector into a [`ClickerSession`] and drives
//! it from commands typed on stdin, one per line (`help` lists them).
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load AppConfig            -- config file, then CLI overrides
//!  └─ ClickerSession::new()     -- store, recorder, scheduler, hotkey
//!       ├─ keyboard hook        (Win32 hook thread, whole run)
//!       ├─ pointer hook         (Win32 hook thread, only while recording)
//!       └─ playback task        (Tokio task, only while playing)
//!  └─ stdin reader thread       -- lines → tokio mpsc → command loop
//! ```

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use clicker_app::application::commands::{SessionCommand, HELP};
use clicker_app::application::session::{ClickerSession, CommandOutcome};
use clicker_app::infrastructure::input_hooks::platform_hooks;
use clicker_app::infrastructure::storage::config::{
    config_file_path, load_config_from, save_config_to, AppConfig,
};
use clicker_app::infrastructure::synthetic_input::platform_injector;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Multi-Clicker: record screen clicks and replay them on a timer.
///
/// Every flag overrides the matching value from the config file.
#[derive(Debug, Parser)]
#[command(
    name = "multi-clicker",
    about = "Record screen clicks and replay them on a timer",
    version
)]
struct Cli {
    /// Click document to load at startup.
    #[arg(long, env = "MULTICLICKER_DOCUMENT")]
    document: Option<PathBuf>,

    /// Config file to use instead of the platform default.
    #[arg(long, env = "MULTICLICKER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    /// Resolves the config path: `--config`, else the platform default.
    fn config_path(&self) -> anyhow::Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config_file_path().context("no --config given and no platform config dir"),
        }
    }

    /// Applies the CLI overrides on top of the loaded config.
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(document) = &self.document {
            config.autoload_document = Some(document.clone());
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config_path()?;
    let mut config = load_config_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;
    cli.apply_to(&mut config);

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    if cli.init_config {
        save_config_to(&config_path, &config)?;
        info!(path = %config_path.display(), "config written");
        return Ok(());
    }

    info!("Multi-Clicker starting");

    let session = ClickerSession::new(
        Handle::current(),
        platform_hooks(),
        platform_injector(),
        config.default_settings.clone(),
    );

    // Without the keyboard hook the clicker still works from stdin.
    if let Err(e) = session.install_hotkey_hook() {
        warn!("play/pause hotkey unavailable: {e}");
    }

    if let Some(path) = &config.autoload_document {
        match session.load(path) {
            Ok(()) => info!(path = %path.display(), "startup document loaded"),
            Err(e) => warn!("could not load startup document: {e}"),
        }
    }

    println!("{}", session.status());
    println!("type `help` for commands");

    let mut lines = spawn_stdin_reader();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    info!("stdin closed");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                if !run_line(&session, &line) {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    session.shutdown();
    info!("Multi-Clicker stopped");
    Ok(())
}

/// Parses and executes one command line.  Returns `false` on `quit`.
fn run_line(session: &ClickerSession, line: &str) -> bool {
    let command = match line.parse::<SessionCommand>() {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}");
            return true;
        }
    };

    match session.execute(command) {
        Ok(CommandOutcome::Quit) => return false,
        Ok(CommandOutcome::Done) => println!("{}", session.status()),
        Ok(CommandOutcome::Status(status)) => {
            println!("{status}");
            println!("{}", status.recording_label());
            println!("{}", status.enabled_toggle_label());
        }
        Ok(CommandOutcome::Clicks(clicks)) => {
            if clicks.is_empty() {
                println!("(no clicks)");
            }
            for (index, click) in clicks.iter().enumerate() {
                println!(
                    "{index:>3}: ({}, {}) {}{}",
                    click.x,
                    click.y,
                    if click.is_enabled { "enabled" } else { "disabled" },
                    if click.is_selected { " [selected]" } else { "" },
                );
            }
        }
        Ok(CommandOutcome::Help) => println!("{HELP}"),
        Err(e) => eprintln!("error: {e}"),
    }
    true
}

/// Reads stdin on a plain thread and forwards each line to the runtime.
///
/// A blocking stdin read cannot be cancelled, so it lives on a detached
/// thread that dies with the process instead of on the runtime's blocking
/// pool, which would hold up shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();
    let spawned = std::thread::Builder::new()
        .name("clicker-stdin".to_string())
        .spawn(move || {
            for line in std::io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
        });
    if let Err(e) = spawned {
        warn!("could not start stdin reader: {e}");
    }
    rx
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_config_untouched() {
        // Arrange
        let cli = Cli::parse_from(["multi-clicker"]);
        let mut config = AppConfig::default();

        // Act
        cli.apply_to(&mut config);

        // Assert
        assert_eq!(config, AppConfig::default());
        assert!(!cli.init_config);
    }

    #[test]
    fn test_cli_flags_override_config() {
        let cli = Cli::parse_from([
            "multi-clicker",
            "--document",
            "clicks.toml",
            "--log-level",
            "debug",
        ]);
        let mut config = AppConfig::default();

        cli.apply_to(&mut config);

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.autoload_document, Some(PathBuf::from("clicks.toml")));
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let cli = Cli::parse_from(["multi-clicker", "--config", "/tmp/clicker.toml"]);

        assert_eq!(cli.config_path().unwrap(), PathBuf::from("/tmp/clicker.toml"));
    }
}
