//! Structured logging configuration.
//!
//! Records from the `dealer_portal` library go through the `log` facade and
//! are bridged into `tracing` by the subscriber.

use std::{
    fs::{self, OpenOptions},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "info,hyper=warn,reqwest=warn";

/// Where log output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Console output for the line-oriented CLI
    Stderr,
    /// Append to a file while the TUI owns the terminal
    File(PathBuf),
}

/// Initialize structured logging
///
/// Log levels are configurable via the `RUST_LOG` env var.
///
/// # Example
///
/// ```no_run
/// use dp_client::logging::{self, LogTarget};
///
/// logging::init(&LogTarget::Stderr).unwrap();
/// tracing::info!("Client starting");
/// ```
///
/// # Errors
///
/// Returns error if the log file cannot be opened
pub fn init(target: &LogTarget) -> io::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match target {
        LogTarget::Stderr => {
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .init();
        }
    }

    tracing::debug!(log_target = ?target, "Structured logging initialized");
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Authentication events worth an audit line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    LoginSucceeded,
    LoginFailed,
    Logout,
    SessionExpired,
}

impl AuthEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LoginSucceeded => "login_succeeded",
            Self::LoginFailed => "login_failed",
            Self::Logout => "logout",
            Self::SessionExpired => "session_expired",
        }
    }
}

/// Log an authentication event with structured data
///
/// Never pass passwords or tokens here.
///
/// # Example
///
/// ```
/// use dp_client::logging::{AuthEvent, log_auth_event};
///
/// log_auth_event(AuthEvent::LoginFailed, Some("admin"), "Invalid credentials");
/// ```
pub fn log_auth_event(event: AuthEvent, username: Option<&str>, message: &str) {
    match event {
        AuthEvent::LoginFailed | AuthEvent::SessionExpired => tracing::warn!(
            event_type = event.as_str(),
            username = username,
            "AUTH: {}",
            message
        ),
        AuthEvent::LoginSucceeded | AuthEvent::Logout => tracing::info!(
            event_type = event.as_str(),
            username = username,
            "AUTH: {}",
            message
        ),
    }
}
