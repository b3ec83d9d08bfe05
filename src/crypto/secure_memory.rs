//! Secret string handling
//!
//! Backup passwords pass through [`SecretPassword`], which wipes its buffer
//! on drop and never prints its contents.

use std::fmt;
use std::ops::Deref;

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{VaultError, VaultResult};

/// Environment variable consulted for non-interactive backup runs
pub const PASSWORD_ENV_VAR: &str = "FINVAULT_PASSWORD";

/// A password that is zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct SecretPassword {
    inner: String,
}

impl SecretPassword {
    /// Wrap a password
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the password
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Read the password from `FINVAULT_PASSWORD` if set, otherwise prompt
    pub fn from_env_or_prompt(prompt: &str) -> VaultResult<Self> {
        if let Ok(value) = std::env::var(PASSWORD_ENV_VAR) {
            return Ok(Self::new(value));
        }
        Self::prompt(prompt)
    }

    /// Prompt on the terminal without echo
    pub fn prompt(prompt: &str) -> VaultResult<Self> {
        let value = rpassword::prompt_password(prompt)
            .map_err(|e| VaultError::Io(format!("Failed to read password: {}", e)))?;
        Ok(Self::new(value))
    }

    /// Prompt twice and require both entries to match
    pub fn prompt_new() -> VaultResult<Self> {
        if let Ok(value) = std::env::var(PASSWORD_ENV_VAR) {
            return Self::checked(value);
        }

        let first = Self::prompt("Backup password: ")?;
        let second = Self::prompt("Confirm password: ")?;
        if first.expose() != second.expose() {
            return Err(VaultError::Validation("Passwords do not match".into()));
        }
        Self::checked(first.expose().to_string())
    }

    fn checked(value: String) -> VaultResult<Self> {
        let password = Self::new(value);
        if password.is_empty() {
            return Err(VaultError::Validation(
                "Backup password cannot be empty".into(),
            ));
        }
        Ok(password)
    }
}

impl Deref for SecretPassword {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl From<&str> for SecretPassword {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Debug for SecretPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretPassword")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for SecretPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expose() {
        let s = SecretPassword::new("hunter2");
        assert_eq!(s.expose(), "hunter2");
        assert_eq!(s.len(), 7);
    }

    #[test]
    fn test_debug_and_display_redact() {
        let s: SecretPassword = "secret".into();
        assert!(!format!("{:?}", s).contains("secret"));
        assert!(format!("{}", s).contains("REDACTED"));
    }

    #[test]
    fn test_checked_rejects_empty() {
        assert!(SecretPassword::checked(String::new()).is_err());
        assert!(SecretPassword::checked("x".into()).is_ok());
    }
}
