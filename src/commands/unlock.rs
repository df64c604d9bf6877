//! Unlock and test commands.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use picture_lock::barcode::Code128Codec;
use picture_lock::config::Settings;
use picture_lock::workflow::{UnlockMode, UnlockWorkflow};

use super::{connect, CommandExecutor};

/// Unlock the safe with the password stored in an image.
#[derive(Args, Debug)]
pub struct UnlockCommand {
    /// Lock image created by `picture-lock lock`
    pub file: PathBuf,
}

/// Check an image against the safe without unlocking it.
#[derive(Args, Debug)]
pub struct TestCommand {
    /// Lock image created by `picture-lock lock`
    pub file: PathBuf,
}

impl CommandExecutor for UnlockCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        run(&self.file, UnlockMode::Unlock, settings)
    }
}

impl CommandExecutor for TestCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        run(&self.file, UnlockMode::Test, settings)
    }
}

/// The safe's answer is printed as is: "Passwords match" and its failure
/// counterparts are both meaningful to the user.
fn run(file: &Path, mode: UnlockMode, settings: &Settings) -> Result<()> {
    let client = connect(settings)?;

    let answer = UnlockWorkflow::new(&client, Code128Codec::default())
        .run(file, mode)
        .with_context(|| format!("Failed to use {}", file.display()))?;

    println!("{}", answer);

    Ok(())
}
