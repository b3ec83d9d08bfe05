//! AES-256-GCM envelope for backup blobs
//!
//! A blob is the base64 encoding of
//!
//! ```text
//! salt (16 bytes) || iv (12 bytes) || ciphertext || tag (16 bytes)
//! ```
//!
//! Every call to [`CryptoEnvelope::encrypt`] draws a fresh salt and IV from
//! the operating system RNG, so encrypting the same payload twice never
//! yields the same blob.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{VaultError, VaultResult};

use super::key_derivation::{derive_key, CryptoConfig};

/// Size of the key-derivation salt in bytes
pub const SALT_SIZE: usize = 16;

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Salt plus nonce
pub const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// Smallest decodable blob: header plus the tag of an empty plaintext
pub const MIN_BLOB_SIZE: usize = HEADER_SIZE + TAG_SIZE;

/// Password-based authenticated encryption of byte payloads
#[derive(Debug, Clone)]
pub struct CryptoEnvelope {
    config: CryptoConfig,
}

impl CryptoEnvelope {
    /// Create an envelope with validated parameters
    pub fn new(config: CryptoConfig) -> VaultResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The parameters this envelope derives keys with
    pub fn config(&self) -> &CryptoConfig {
        &self.config
    }

    /// Encrypt `plaintext` under `password` and return a base64 blob
    ///
    /// Blocking: the key derivation step is deliberately CPU-expensive.
    pub fn encrypt(&self, plaintext: &[u8], password: &str) -> VaultResult<String> {
        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let blob = self.seal(plaintext, password, &salt, &nonce)?;
        Ok(STANDARD.encode(blob))
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt)
    ///
    /// Fails with `Decode` for malformed or truncated input and with
    /// `Authentication` when the tag does not verify, whatever the cause.
    pub fn decrypt(&self, blob: &str, password: &str) -> VaultResult<Vec<u8>> {
        let raw = STANDARD
            .decode(blob.trim())
            .map_err(|e| VaultError::Decode(format!("invalid base64: {}", e)))?;

        if raw.len() < MIN_BLOB_SIZE {
            return Err(VaultError::Decode(format!(
                "blob is {} bytes, expected at least {}",
                raw.len(),
                MIN_BLOB_SIZE
            )));
        }

        let (salt, rest) = raw.split_at(SALT_SIZE);
        let (nonce, ciphertext) = rest.split_at(NONCE_SIZE);

        let key = derive_key(password, salt, &self.config)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))?;

        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| VaultError::Authentication)
    }

    /// Decoded length of a blob, or `None` if it is not valid base64
    ///
    /// Lets callers sanity-check a backup without a password.
    pub fn blob_len(blob: &str) -> Option<usize> {
        STANDARD.decode(blob.trim()).ok().map(|raw| raw.len())
    }

    /// Encrypt with caller-supplied salt and nonce, returning raw blob bytes
    fn seal(
        &self,
        plaintext: &[u8],
        password: &str,
        salt: &[u8; SALT_SIZE],
        nonce: &[u8; NONCE_SIZE],
    ) -> VaultResult<Vec<u8>> {
        let key = derive_key(password, salt, &self.config)?;
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| VaultError::Encryption(format!("Failed to create cipher: {}", e)))?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|e| VaultError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut blob = Vec::with_capacity(HEADER_SIZE + ciphertext.len());
        blob.extend_from_slice(salt);
        blob.extend_from_slice(nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }
}
