//! Status command.

use anyhow::{Context, Result};
use clap::Args;

use picture_lock::config::Settings;
use picture_lock::workflow;

use super::{connect, CommandExecutor};

/// Print the safe's current status.
#[derive(Args, Debug)]
pub struct StatusCommand {}

impl CommandExecutor for StatusCommand {
    fn execute(&self, settings: &Settings) -> Result<()> {
        let client = connect(settings)?;

        let answer = workflow::status(&client).context("Failed to query safe status")?;
        println!("{}", answer);

        Ok(())
    }
}
