//! Talking to the safe.
//!
//! The safe exposes a tiny HTTP interface: every command is a GET on
//! `http://<safe>/safe/?<query>` with basic auth, and the answer is a plain
//! text body. This module builds those queries ([`SafeCommand`]) and sends
//! them ([`SafeClient`], [`HttpSafeClient`]).

mod http;

use std::fmt;

use thiserror::Error;

use crate::password::Password;

pub use http::HttpSafeClient;

/// What secret material gets replaced with in error messages.
pub const REDACTED: &str = "*******";

/// Errors that can occur while talking to the safe.
#[derive(Error, Debug)]
pub enum SafeError {
    /// The request never got an answer (DNS, refused connection, bad address, timeout).
    #[error("Problems talking to the safe: {0}")]
    Transport(String),

    /// The answer could not be read.
    #[error("Problems getting response from safe: {0}")]
    Body(String),

    /// The safe answered with a non-2xx status.
    #[error("Bad result from safe: {status}\n{body}")]
    Status { status: String, body: String },
}

/// A single command understood by the safe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafeCommand {
    /// Ask for the current state.
    Status,
    /// Set a new combination and lock.
    Lock(Password),
    /// Check a combination without opening anything.
    PasswordTest(Password),
    /// Open every lock.
    UnlockAll(Password),
}

impl SafeCommand {
    /// The URL query string for this command.
    pub fn query(&self) -> String {
        match self {
            SafeCommand::Status => "status=1".to_string(),
            SafeCommand::Lock(p) => format!("lock=1&lock1={0}&lock2={0}", p.expose()),
            SafeCommand::PasswordTest(p) => format!("pwtest=1&unlock={}", p.expose()),
            SafeCommand::UnlockAll(p) => format!("unlock_all=1&unlock={}", p.expose()),
        }
    }

    /// Short name, safe to log.
    pub fn name(&self) -> &'static str {
        match self {
            SafeCommand::Status => "status",
            SafeCommand::Lock(_) => "lock",
            SafeCommand::PasswordTest(_) => "pwtest",
            SafeCommand::UnlockAll(_) => "unlock_all",
        }
    }

    /// The combination carried by this command, if any.
    pub fn password(&self) -> Option<&Password> {
        match self {
            SafeCommand::Status => None,
            SafeCommand::Lock(p) | SafeCommand::PasswordTest(p) | SafeCommand::UnlockAll(p) => {
                Some(p)
            }
        }
    }

    /// Masks anything from this command that shows up in `message`.
    pub fn redact(&self, message: &str) -> String {
        let query = self.query();
        let mut secrets = vec![query.as_str()];
        if let Some(password) = self.password() {
            secrets.push(password.expose());
        }
        redact(message, &secrets)
    }
}

/// Replaces every occurrence of each non-empty secret with [`REDACTED`].
///
/// Longer secrets are replaced first so a query string is masked as a
/// whole rather than around the password inside it.
pub fn redact(message: &str, secrets: &[&str]) -> String {
    let mut secrets: Vec<&str> = secrets.iter().copied().filter(|s| !s.is_empty()).collect();
    secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));

    secrets
        .into_iter()
        .fold(message.to_string(), |acc, secret| acc.replace(secret, REDACTED))
}

/// Who we are and where the safe lives.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Host name or `host:port` of the safe
    pub address: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Sends commands to a safe and returns its plain text answer.
///
/// Implementations must treat every failure as final: no retries.
pub trait SafeClient {
    fn send(&self, command: &SafeCommand) -> Result<String, SafeError>;
}

impl<T: SafeClient + ?Sized> SafeClient for &T {
    fn send(&self, command: &SafeCommand) -> Result<String, SafeError> {
        (**self).send(command)
    }
}
