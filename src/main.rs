//! picture-lock - Keep a safe's combination in a picture
//!
//! Command line client for a network controlled safe. Locks the safe with
//! a random combination stored in a barcode image, and unlocks it again
//! from that image.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use picture_lock::config::{ConfigFile, Overrides, Settings};

use commands::{CommandExecutor, LockCommand, StatusCommand, TestCommand, UnlockCommand};

/// picture-lock - Keep a safe's combination in a picture
///
/// Locks the safe with a random password and writes that password into a
/// barcode image. The image is then the only way to unlock the safe.
///
/// Safe address, user and password can also be stored as JSON in
/// ~/.picture_lock, e.g. {"Safe": "safe.local", "User": "u", "Pass": "p"},
/// or set through environment variables of the same names.
#[derive(Parser)]
#[command(name = "picture-lock")]
#[command(version)]
#[command(about = "Lock a network safe with a random password kept in a barcode image")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct GlobalArgs {
    /// Safe address (host or host:port)
    #[arg(long, global = true)]
    safe: Option<String>,

    /// Username to talk to the safe (optional)
    #[arg(long, global = true)]
    user: Option<String>,

    /// Password to talk to the safe (optional)
    #[arg(long, global = true)]
    pass: Option<String>,

    /// Config file to use instead of ~/.picture_lock
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seconds to wait for the safe (0 waits forever, default 30)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Lock the safe with a new random password and create the image
    Lock(LockCommand),

    /// Unlock the safe with the password in an image
    Unlock(UnlockCommand),

    /// Test that an image can unlock the safe, without unlocking it
    Test(TestCommand),

    /// Request the current safe status
    Status(StatusCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.global.verbose);

    let settings = resolve_settings(&cli.global)?;

    match &cli.command {
        Commands::Lock(cmd) => cmd.execute(&settings),
        Commands::Unlock(cmd) => cmd.execute(&settings),
        Commands::Test(cmd) => cmd.execute(&settings),
        Commands::Status(cmd) => cmd.execute(&settings),
    }
}

/// Sets up env_logger; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Merges the config file with command line flags.
fn resolve_settings(global: &GlobalArgs) -> Result<Settings> {
    let file = match &global.config {
        Some(path) => ConfigFile::load(path),
        None => ConfigFile::load_default(),
    }
    .and_then(ConfigFile::with_env)
    .context("Failed to load configuration")?;

    let overrides = Overrides {
        safe: global.safe.clone(),
        user: global.user.clone(),
        pass: global.pass.clone(),
        timeout: global.timeout,
    };

    let settings = Settings::resolve(file, overrides)?;
    log::debug!("Using safe at {}", settings.credentials.address);

    Ok(settings)
}
