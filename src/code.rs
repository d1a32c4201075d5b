//! Short code validation and random generation
//!
//! A code is 6 to 8 ASCII alphanumeric characters. The generator draws each
//! character uniformly from its alphabet using the thread-local RNG, which is
//! seeded from the OS and not predictable across clients. Generation alone does
//! not guarantee uniqueness; the registry retries on store conflicts.

use rand::Rng;

use crate::config::ConfigError;
use crate::error::RegistryError;

pub const MIN_CODE_LEN: usize = 6;
pub const MAX_CODE_LEN: usize = 8;
pub const DEFAULT_CODE_LEN: usize = 6;

/// 26 upper + 26 lower + 10 digits
pub const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Checks `code` against `^[A-Za-z0-9]{6,8}$`
pub fn validate_code(code: &str) -> Result<(), RegistryError> {
    let len_ok = (MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code.len());
    if len_ok && code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(RegistryError::InvalidFormat(code.to_string()))
    }
}

/// Produces candidate codes of a fixed length
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    alphabet: Vec<u8>,
    length: usize,
}

impl CodeGenerator {
    /// Generator over the full 62-character alphabet
    pub fn new(length: usize) -> Result<Self, ConfigError> {
        Self::with_alphabet(ALPHANUMERIC, length)
    }

    /// Generator over a custom alphabet.
    ///
    /// The alphabet must be non-empty and alphanumeric and the length must be
    /// a valid code length, so every generated candidate passes [`validate_code`].
    pub fn with_alphabet(alphabet: &[u8], length: usize) -> Result<Self, ConfigError> {
        if alphabet.is_empty() || !alphabet.iter().all(u8::is_ascii_alphanumeric) {
            return Err(ConfigError::Invalid {
                key: "CODE_ALPHABET",
                value: String::from_utf8_lossy(alphabet).into_owned(),
                reason: "must be non-empty and alphanumeric",
            });
        }
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&length) {
            return Err(ConfigError::Invalid {
                key: "CODE_LENGTH",
                value: length.to_string(),
                reason: "must be between 6 and 8",
            });
        }
        Ok(Self {
            alphabet: alphabet.to_vec(),
            length,
        })
    }

    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..self.length)
            .map(|_| char::from(self.alphabet[rng.random_range(0..self.alphabet.len())]))
            .collect()
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self {
            alphabet: ALPHANUMERIC.to_vec(),
            length: DEFAULT_CODE_LEN,
        }
    }
}
