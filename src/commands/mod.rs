//! Command module - Strategy pattern for CLI commands.
//!
//! Each command is a separate module implementing the `CommandExecutor` trait.
//! Settings are resolved once in `main` and handed to whichever command runs.

mod lock;
mod status;
mod unlock;

pub use lock::LockCommand;
pub use status::StatusCommand;
pub use unlock::{TestCommand, UnlockCommand};

use anyhow::{Context, Result};

use picture_lock::config::Settings;
use picture_lock::safe::HttpSafeClient;

/// Trait for command execution - Strategy pattern.
///
/// Each command struct holds its parsed arguments and implements
/// this trait to define its execution logic.
pub trait CommandExecutor {
    /// Executes the command against the configured safe.
    fn execute(&self, settings: &Settings) -> Result<()>;
}

/// Builds the HTTP client for the configured safe.
fn connect(settings: &Settings) -> Result<HttpSafeClient> {
    HttpSafeClient::new(settings.credentials.clone(), settings.timeout)
        .context("Failed to set up HTTP client")
}
