//! Lock, unlock and status workflows.
//!
//! Each workflow is a straight line of steps where every step depends on
//! the one before. The first failure is returned to the caller; nothing is
//! retried and nothing is rolled back on the safe.

use std::path::{Path, PathBuf};

use rand::Rng;

use crate::barcode::{BarcodeCodec, BarcodeError};
use crate::error::{Result, WorkflowError};
use crate::obfuscate::transform;
use crate::password::{self, Password};
use crate::render::{compose_lock_image, save_exclusive, LockImageLayout};
use crate::safe::{SafeClient, SafeCommand};
use crate::{PASSWORD_LENGTH, PAYLOAD_TAG};

/// Exact answer to a successful lock command.
pub const LOCKED_RESPONSE: &str = "Safe locked";

/// Exact answer to a password test with the right combination.
pub const MATCH_RESPONSE: &str = "Passwords match";

/// Builds the string stored in the barcode for a password.
pub fn payload_for(password: &Password) -> String {
    format!("{}{}", PAYLOAD_TAG, transform(password.expose()))
}

/// Recovers the password from a decoded barcode string.
///
/// Returns `None` if the text was not produced by [`payload_for`].
pub fn password_from_payload(payload: &str) -> Option<Password> {
    payload
        .strip_prefix(PAYLOAD_TAG)
        .map(|obfuscated| Password::new(transform(obfuscated)))
}

/// Creates a lock image and locks the safe with the password inside it.
pub struct LockWorkflow<C, B> {
    client: C,
    codec: B,
    layout: LockImageLayout,
}

impl<C: SafeClient, B: BarcodeCodec> LockWorkflow<C, B> {
    pub fn new(client: C, codec: B) -> Self {
        Self {
            client,
            codec,
            layout: LockImageLayout::default(),
        }
    }

    /// Replaces the caption layout drawn under the barcode.
    pub fn with_layout(mut self, layout: LockImageLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Runs the workflow with a freshly seeded password.
    pub fn run(&self, dest: &Path) -> Result<PathBuf> {
        self.run_with_rng(dest, &mut rand::thread_rng())
    }

    /// Runs the workflow drawing the password from `rng`.
    ///
    /// The image is written before the safe is touched: if the file cannot
    /// be created, the safe keeps its current combination.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, dest: &Path, rng: &mut R) -> Result<PathBuf> {
        let password = password::generate_with(rng, PASSWORD_LENGTH);

        let symbol = self
            .codec
            .encode(&payload_for(&password))
            .map_err(WorkflowError::Encoding)?;
        let image = compose_lock_image(&symbol, &self.layout);
        log::info!("Composed {}x{} lock image", image.width(), image.height());

        save_exclusive(&image, dest)?;
        log::info!("Lock image written to {}", dest.display());

        let lock = SafeCommand::Lock(password.clone());
        let res = self.client.send(&lock)?;
        if res != LOCKED_RESPONSE {
            return Err(WorkflowError::LockRejected(lock.redact(&res)));
        }

        let verify = SafeCommand::PasswordTest(password);
        let res = self.client.send(&verify)?;
        if res != MATCH_RESPONSE {
            return Err(WorkflowError::VerifyFailed(verify.redact(&res)));
        }

        Ok(dest.to_path_buf())
    }
}

/// What to do with a password recovered from a lock image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnlockMode {
    /// Open the safe.
    Unlock,
    /// Only check that the image matches the safe's combination.
    Test,
}

/// Reads a lock image and unlocks (or tests) the safe with it.
pub struct UnlockWorkflow<C, B> {
    client: C,
    codec: B,
}

impl<C: SafeClient, B: BarcodeCodec> UnlockWorkflow<C, B> {
    pub fn new(client: C, codec: B) -> Self {
        Self { client, codec }
    }

    /// Returns the safe's answer verbatim, whatever it says.
    pub fn run(&self, path: &Path, mode: UnlockMode) -> Result<String> {
        let password = self.read_password(path)?;

        let command = match mode {
            UnlockMode::Unlock => SafeCommand::UnlockAll(password),
            UnlockMode::Test => SafeCommand::PasswordTest(password),
        };

        Ok(self.client.send(&command)?)
    }

    /// Opens the picture at `path` and extracts the combination from it.
    pub fn read_password(&self, path: &Path) -> Result<Password> {
        let image = image::open(path).map_err(|source| WorkflowError::ImageRead {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded {}x{} image from {}", image.width(), image.height(), path.display());

        let payload = self
            .codec
            .decode(&image)
            .map_err(|e: BarcodeError| WorkflowError::InvalidImage(Some(e)))?;

        // A bare tag carries no combination
        password_from_payload(&payload)
            .filter(|password| !password.is_empty())
            .ok_or(WorkflowError::InvalidImage(None))
    }
}

/// Asks the safe for its status and returns the answer verbatim.
pub fn status<C: SafeClient>(client: &C) -> Result<String> {
    Ok(client.send(&SafeCommand::Status)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::barcode::Code128Codec;
    use crate::safe::SafeError;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    /// Records every query and answers from a fixed table.
    struct FakeSafe {
        sent: RefCell<Vec<String>>,
        lock_answer: &'static str,
        test_answer: &'static str,
    }

    impl FakeSafe {
        fn new() -> Self {
            Self::answering(LOCKED_RESPONSE, MATCH_RESPONSE)
        }

        fn answering(lock_answer: &'static str, test_answer: &'static str) -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
                lock_answer,
                test_answer,
            }
        }

        fn sent(&self) -> Vec<String> {
            self.sent.borrow().clone()
        }
    }

    impl SafeClient for FakeSafe {
        fn send(&self, command: &SafeCommand) -> std::result::Result<String, SafeError> {
            self.sent.borrow_mut().push(command.query());
            Ok(match command {
                SafeCommand::Status => "Safe is locked".to_string(),
                SafeCommand::Lock(_) => self.lock_answer.to_string(),
                SafeCommand::PasswordTest(_) => self.test_answer.to_string(),
                SafeCommand::UnlockAll(_) => "Safe unlocked".to_string(),
            })
        }
    }

    struct BrokenSafe;

    impl SafeClient for BrokenSafe {
        fn send(&self, _: &SafeCommand) -> std::result::Result<String, SafeError> {
            Err(SafeError::Status {
                status: "401 Unauthorized".to_string(),
                body: "Authentication required".to_string(),
            })
        }
    }

    fn write_payload_image(dir: &Path, payload: &str) -> PathBuf {
        let path = dir.join("payload.png");
        Code128Codec::default()
            .encode(payload)
            .unwrap()
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_payload_helpers() {
        let password = Password::new("hello");
        assert_eq!(payload_for(&password), "LOCKPSW:uryyb");
        assert_eq!(password_from_payload("LOCKPSW:uryyb"), Some(password));
        assert_eq!(password_from_payload("uryyb"), None);
    }

    #[test]
    fn test_lock_sends_lock_then_verify() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("lock.png");
        let safe = FakeSafe::new();

        let created = LockWorkflow::new(&safe, Code128Codec::default())
            .run(&dest)
            .unwrap();

        assert_eq!(created, dest);
        assert!(dest.exists());

        let sent = safe.sent();
        assert_eq!(sent.len(), 2);
        let password = sent[1].strip_prefix("pwtest=1&unlock=").unwrap();
        assert_eq!(password.len(), PASSWORD_LENGTH);
        assert_eq!(
            sent[0],
            format!("lock=1&lock1={0}&lock2={0}", password)
        );
    }

    #[test]
    fn test_lock_refuses_existing_file_without_talking_to_safe() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("lock.jpg");
        fs::write(&dest, b"old image").unwrap();
        let safe = FakeSafe::new();

        let err = LockWorkflow::new(&safe, Code128Codec::default())
            .run(&dest)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::File(_)));
        assert!(safe.sent().is_empty());
        assert_eq!(fs::read(&dest).unwrap(), b"old image");
    }

    #[test]
    fn test_lock_rejected_reports_answer() {
        let dir = tempdir().unwrap();
        let safe = FakeSafe::answering("Safe already locked", MATCH_RESPONSE);

        let err = LockWorkflow::new(&safe, Code128Codec::default())
            .run(&dir.path().join("lock.png"))
            .unwrap_err();

        match err {
            WorkflowError::LockRejected(msg) => assert_eq!(msg, "Safe already locked"),
            other => panic!("unexpected error: {other}"),
        }
        // No verification after a failed lock
        assert_eq!(safe.sent().len(), 1);
    }

    #[test]
    fn test_lock_verify_mismatch_reports_answer() {
        let dir = tempdir().unwrap();
        let safe = FakeSafe::answering(LOCKED_RESPONSE, "Passwords do not match");

        let err = LockWorkflow::new(&safe, Code128Codec::default())
            .run(&dir.path().join("lock.png"))
            .unwrap_err();

        assert!(matches!(err, WorkflowError::VerifyFailed(ref m) if m == "Passwords do not match"));
        assert_eq!(safe.sent().len(), 2);
    }

    #[test]
    fn test_lock_transport_error_propagates() {
        let dir = tempdir().unwrap();
        let err = LockWorkflow::new(BrokenSafe, Code128Codec::default())
            .run(&dir.path().join("lock.png"))
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Safe(SafeError::Status { .. })));
    }

    #[test]
    fn test_unlock_test_mode_sends_pwtest() {
        let dir = tempdir().unwrap();
        let path = write_payload_image(dir.path(), "LOCKPSW:uryyb");
        let safe = FakeSafe::new();

        let answer = UnlockWorkflow::new(&safe, Code128Codec::default())
            .run(&path, UnlockMode::Test)
            .unwrap();

        assert_eq!(answer, MATCH_RESPONSE);
        assert_eq!(safe.sent(), vec!["pwtest=1&unlock=hello".to_string()]);
    }

    #[test]
    fn test_unlock_mode_sends_unlock_all() {
        let dir = tempdir().unwrap();
        let path = write_payload_image(dir.path(), "LOCKPSW:uryyb");
        let safe = FakeSafe::new();

        let answer = UnlockWorkflow::new(&safe, Code128Codec::default())
            .run(&path, UnlockMode::Unlock)
            .unwrap();

        assert_eq!(answer, "Safe unlocked");
        assert_eq!(safe.sent(), vec!["unlock_all=1&unlock=hello".to_string()]);
    }

    #[test]
    fn test_unlock_relays_failure_text_verbatim() {
        let dir = tempdir().unwrap();
        let path = write_payload_image(dir.path(), "LOCKPSW:uryyb");
        let safe = FakeSafe::answering(LOCKED_RESPONSE, "Passwords do not match");

        let answer = UnlockWorkflow::new(&safe, Code128Codec::default())
            .run(&path, UnlockMode::Test)
            .unwrap();
        assert_eq!(answer, "Passwords do not match");
    }

    #[test]
    fn test_unlock_rejects_untagged_barcode() {
        let dir = tempdir().unwrap();
        let path = write_payload_image(dir.path(), "PASSWORD:uryyb");
        let safe = FakeSafe::new();

        let err = UnlockWorkflow::new(&safe, Code128Codec::default())
            .run(&path, UnlockMode::Unlock)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidImage(None)));
        assert_eq!(err.to_string(), "This is not a valid password image");
        assert!(safe.sent().is_empty());
    }

    #[test]
    fn test_unlock_rejects_tag_without_password() {
        let dir = tempdir().unwrap();
        let path = write_payload_image(dir.path(), PAYLOAD_TAG);
        let safe = FakeSafe::new();

        let err = UnlockWorkflow::new(&safe, Code128Codec::default())
            .run(&path, UnlockMode::Test)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidImage(None)));
        assert!(safe.sent().is_empty());
    }

    #[test]
    fn test_unlock_rejects_image_without_barcode() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blank.png");
        image::RgbImage::from_pixel(320, 200, image::Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();
        let safe = FakeSafe::new();

        let err = UnlockWorkflow::new(&safe, Code128Codec::default())
            .run(&path, UnlockMode::Test)
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidImage(Some(_))));
        assert!(safe.sent().is_empty());
    }

    #[test]
    fn test_unlock_unreadable_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.png");
        fs::write(&path, b"this is not a picture").unwrap();

        let err = UnlockWorkflow::new(FakeSafe::new(), Code128Codec::default())
            .run(&path, UnlockMode::Test)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ImageRead { .. }));
    }

    #[test]
    fn test_unlock_missing_file() {
        let dir = tempdir().unwrap();
        let err = UnlockWorkflow::new(FakeSafe::new(), Code128Codec::default())
            .run(&dir.path().join("absent.jpg"), UnlockMode::Unlock)
            .unwrap_err();
        assert!(matches!(err, WorkflowError::ImageRead { .. }));
    }

    #[test]
    fn test_status_sends_status_only() {
        let safe = FakeSafe::new();
        let answer = status(&safe).unwrap();
        assert_eq!(answer, "Safe is locked");
        assert_eq!(safe.sent(), vec!["status=1".to_string()]);
    }
}
