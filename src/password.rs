//! Random lock passwords.
//!
//! Passwords are drawn uniformly from a 62 symbol alphanumeric alphabet.
//! The safe accepts almost anything except `:`, but keeping to letters and
//! digits means the password survives URL query strings and Code 128 set B
//! without any escaping.

use std::fmt;

use rand::Rng;

/// Characters a generated password may contain.
pub const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// A safe combination.
///
/// Deliberately has no `Display` impl and a masking `Debug` impl, so it can
/// only end up in output through an explicit call to [`Password::expose`].
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    /// Wraps an already known password (e.g. one recovered from a lock image).
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the plaintext password.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(*******)")
    }
}

/// Generates a password of `length` characters using the given random source.
///
/// Every character is drawn independently and uniformly from [`ALPHABET`].
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> Password {
    let value: String = (0..length)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    Password(value)
}

/// Generates a password of `length` characters from the thread-local RNG.
pub fn generate(length: usize) -> Password {
    generate_with(&mut rand::thread_rng(), length)
}
