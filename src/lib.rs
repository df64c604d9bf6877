//! # picture-lock - Keep a safe's combination in a picture
//!
//! picture-lock drives a network controlled safe over its small HTTP
//! interface. Instead of choosing a combination yourself, the tool makes up
//! a random one, locks the safe with it, and hands you back a picture with
//! the combination stored in a Code 128 barcode. That picture is the only
//! copy: give it to a keyholder, and whoever has it can open the safe.
//!
//! ## Overview
//!
//! Locking:
//! 1. Generate a 30 character alphanumeric password
//! 2. Rotate its letters (ROT13) and prefix it with `LOCKPSW:`
//! 3. Render that payload as a barcode with a caption underneath
//! 4. Write the picture (never overwriting an existing file)
//! 5. Lock the safe with the password and check it accepts it
//!
//! Unlocking reads the barcode back, checks the `LOCKPSW:` tag, undoes the
//! rotation, and sends the password to the safe.
//!
//! The rotation is not encryption; it only keeps a casual phone scan from
//! showing the combination in plain text.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::Path;
//! use picture_lock::barcode::Code128Codec;
//! use picture_lock::safe::{Credentials, HttpSafeClient};
//! use picture_lock::workflow::{LockWorkflow, UnlockMode, UnlockWorkflow};
//!
//! let credentials = Credentials {
//!     address: "safe.local".to_string(),
//!     username: "admin".to_string(),
//!     password: "admin".to_string(),
//! };
//! let client = HttpSafeClient::new(credentials, None).unwrap();
//!
//! LockWorkflow::new(&client, Code128Codec::default())
//!     .run(Path::new("locked.jpg"))
//!     .unwrap();
//!
//! let answer = UnlockWorkflow::new(&client, Code128Codec::default())
//!     .run(Path::new("locked.jpg"), UnlockMode::Test)
//!     .unwrap();
//! println!("{}", answer);
//! ```
//!
//! ## Modules
//!
//! - [`password`]: random password generation
//! - [`obfuscate`]: the ROT13 letter rotation
//! - [`barcode`]: Code 128 generation and reading
//! - [`render`]: lock picture composition and storage
//! - [`safe`]: the safe's HTTP command protocol
//! - [`config`]: settings from `~/.picture_lock` and the command line
//! - [`workflow`]: lock, unlock and status

/// Prefix marking a barcode as one of ours.
pub const PAYLOAD_TAG: &str = "LOCKPSW:";

/// Length of generated passwords.
pub const PASSWORD_LENGTH: usize = 30;

pub mod barcode;
pub mod config;
pub mod error;
pub mod obfuscate;
pub mod password;
pub mod render;
pub mod safe;
pub mod workflow;

// Re-export commonly used types at the crate root
pub use barcode::{BarcodeCodec, BarcodeError, Code128Codec};
pub use config::{ConfigError, ConfigFile, Overrides, Settings};
pub use error::WorkflowError;
pub use password::Password;
pub use safe::{Credentials, HttpSafeClient, SafeClient, SafeCommand, SafeError};
pub use workflow::{LockWorkflow, UnlockMode, UnlockWorkflow};
