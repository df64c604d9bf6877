//! Blocking HTTP transport for [`SafeCommand`]s.

use std::time::Duration;

use reqwest::blocking::Client;

use super::{Credentials, SafeClient, SafeCommand, SafeError};

/// Sends commands to a real safe over HTTP with basic auth.
#[derive(Debug)]
pub struct HttpSafeClient {
    client: Client,
    credentials: Credentials,
}

impl HttpSafeClient {
    /// Creates a client for the given safe.
    ///
    /// `timeout` bounds each whole request; `None` waits forever.
    pub fn new(credentials: Credentials, timeout: Option<Duration>) -> Result<Self, SafeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SafeError::Transport(e.without_url().to_string()))?;

        Ok(Self {
            client,
            credentials,
        })
    }

    /// The URL a command is sent to.
    pub fn url(&self, command: &SafeCommand) -> String {
        format!("http://{}/safe/?{}", self.credentials.address, command.query())
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }
}

impl SafeClient for HttpSafeClient {
    fn send(&self, command: &SafeCommand) -> Result<String, SafeError> {
        log::info!(
            "Sending {} command to {}",
            command.name(),
            self.credentials.address
        );

        let response = self
            .client
            .get(self.url(command))
            .basic_auth(&self.credentials.username, Some(&self.credentials.password))
            .send()
            .map_err(|e| SafeError::Transport(command.redact(&e.without_url().to_string())))?;

        let status = response.status();
        log::debug!("Safe answered {} to {}", status, command.name());

        let body = response
            .text()
            .map_err(|e| SafeError::Body(command.redact(&e.without_url().to_string())))?;

        if !status.is_success() {
            return Err(SafeError::Status {
                status: status.to_string(),
                body: command.redact(&body),
            });
        }

        Ok(body)
    }
}
