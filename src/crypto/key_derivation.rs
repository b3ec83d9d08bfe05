//! Password-based key derivation
//!
//! Derives 256-bit AES keys from user passwords. Two strategies are
//! supported and selected through [`CryptoConfig`]:
//!
//! - PBKDF2 with HMAC-SHA-256 (the default, 65,536 iterations)
//! - Argon2id, a memory-hard alternative
//!
//! The backup blob does not record which strategy produced it, so the
//! exporting and importing side must share the same configuration.

use argon2::{Algorithm, Argon2, Params, Version};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// Length of the derived key in bytes (AES-256)
pub const KEY_SIZE: usize = 32;

/// Default PBKDF2 iteration count
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 65_536;

/// Key derivation strategy and its cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum KdfAlgorithm {
    /// PBKDF2 with an HMAC-SHA-256 PRF
    Pbkdf2Sha256 { iterations: u32 },
    /// Argon2id (memory cost in KiB)
    Argon2id {
        memory_cost: u32,
        time_cost: u32,
        parallelism: u32,
    },
}

impl Default for KdfAlgorithm {
    fn default() -> Self {
        Self::Pbkdf2Sha256 {
            iterations: DEFAULT_PBKDF2_ITERATIONS,
        }
    }
}

impl std::fmt::Display for KdfAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pbkdf2Sha256 { iterations } => {
                write!(f, "PBKDF2-SHA256 ({} iterations)", iterations)
            }
            Self::Argon2id {
                memory_cost,
                time_cost,
                parallelism,
            } => write!(
                f,
                "Argon2id (m={} KiB, t={}, p={})",
                memory_cost, time_cost, parallelism
            ),
        }
    }
}

/// Cryptographic parameters handed to a [`CryptoEnvelope`](super::CryptoEnvelope)
/// at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CryptoConfig {
    /// Key derivation strategy
    #[serde(default)]
    pub kdf: KdfAlgorithm,
}

impl CryptoConfig {
    /// PBKDF2-HMAC-SHA-256 with a custom iteration count
    pub fn pbkdf2(iterations: u32) -> Self {
        Self {
            kdf: KdfAlgorithm::Pbkdf2Sha256 { iterations },
        }
    }

    /// Argon2id with custom costs
    pub fn argon2id(memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            kdf: KdfAlgorithm::Argon2id {
                memory_cost,
                time_cost,
                parallelism,
            },
        }
    }

    /// Check that the parameters can actually derive a key
    pub fn validate(&self) -> VaultResult<()> {
        match self.kdf {
            KdfAlgorithm::Pbkdf2Sha256 { iterations } => {
                if iterations == 0 {
                    return Err(VaultError::Config(
                        "PBKDF2 iteration count must be at least 1".into(),
                    ));
                }
                if iterations < DEFAULT_PBKDF2_ITERATIONS {
                    tracing::warn!(
                        iterations,
                        "PBKDF2 iteration count is below the recommended {}",
                        DEFAULT_PBKDF2_ITERATIONS
                    );
                }
            }
            KdfAlgorithm::Argon2id {
                memory_cost,
                time_cost,
                parallelism,
            } => {
                Params::new(memory_cost, time_cost, parallelism, Some(KEY_SIZE)).map_err(
                    |e| VaultError::Config(format!("Invalid Argon2 parameters: {}", e)),
                )?;
            }
        }
        Ok(())
    }
}

/// A derived encryption key, wiped from memory on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive an encryption key from a password and salt
pub fn derive_key(password: &str, salt: &[u8], config: &CryptoConfig) -> VaultResult<DerivedKey> {
    let mut key = [0u8; KEY_SIZE];

    match config.kdf {
        KdfAlgorithm::Pbkdf2Sha256 { iterations } => {
            tracing::debug!(iterations, "Deriving key with PBKDF2-HMAC-SHA256");
            pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
        }
        KdfAlgorithm::Argon2id {
            memory_cost,
            time_cost,
            parallelism,
        } => {
            tracing::debug!(memory_cost, time_cost, parallelism, "Deriving key with Argon2id");
            let params = Params::new(memory_cost, time_cost, parallelism, Some(KEY_SIZE))
                .map_err(|e| VaultError::Encryption(format!("Invalid Argon2 parameters: {}", e)))?;

            let result = Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
                .hash_password_into(password.as_bytes(), salt, &mut key);
            if let Err(e) = result {
                key.zeroize();
                return Err(VaultError::Encryption(format!("Key derivation failed: {}", e)));
            }
        }
    }

    let derived = DerivedKey { key };
    key.zeroize();
    Ok(derived)
}
