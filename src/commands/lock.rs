//! Lock command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use picture_lock::barcode::Code128Codec;
use picture_lock::config::Settings;
use picture_lock::workflow::LockWorkflow;

use super::{connect, CommandExecutor};

/// Lock the safe with a new random password and write it into an image.
#[derive(Args, Debug)]
pub struct LockCommand {
    /// Image to create (.jpg, .png, ...); must not exist yet
    pub file: PathBuf,
}

impl CommandExecutor for LockCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let client = connect(settings)?;

        let created = LockWorkflow::new(&client, Code128Codec::default())
            .run(&self.file)
            .with_context(|| format!("Failed to lock safe with {}", self.file.display()))?;

        println!("{} created.", created.display());

        Ok(())
    }
}
