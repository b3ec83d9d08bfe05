//! Cryptographic functions for finvault
//!
//! Provides the password-based AES-256-GCM envelope used to protect
//! exported backups, with PBKDF2-HMAC-SHA256 or Argon2id key derivation.

pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use envelope::{CryptoEnvelope, HEADER_SIZE, MIN_BLOB_SIZE, NONCE_SIZE, SALT_SIZE, TAG_SIZE};
pub use key_derivation::{derive_key, CryptoConfig, DerivedKey, KdfAlgorithm};
pub use secure_memory::SecretPassword;
