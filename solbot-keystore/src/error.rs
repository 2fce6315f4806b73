use solana_sdk::pubkey::Pubkey;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the keystore core.
///
/// Load-time variants (`Io`, `InvalidFormat`, `InvalidLength`,
/// `PublicKeyMismatch`, `Derivation`) are recorded per wallet file and never
/// escape [`crate::Keystore::load_directory`]. The remaining variants are
/// returned to the immediate caller of the selector or a signer handle.
#[derive(Error, Debug)]
pub enum KeystoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid key file format: {0}")]
    InvalidFormat(String),

    #[error("unexpected secret key length {0} (expected 32 or 64)")]
    InvalidLength(usize),

    #[error("public key half does not match the key derived from the seed")]
    PublicKeyMismatch,

    #[error("keypair derivation failed: {0}")]
    Derivation(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("no loaded wallet with public key {0}")]
    NotFound(Pubkey),

    #[error("no wallets available")]
    NoWalletsAvailable,

    #[error("signing key is no longer available (keystore torn down)")]
    KeyUnavailable,
}

impl KeystoreError {
    /// Returns `true` for errors that describe a single malformed wallet file.
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            KeystoreError::Io { .. }
                | KeystoreError::InvalidFormat(_)
                | KeystoreError::InvalidLength(_)
                | KeystoreError::PublicKeyMismatch
                | KeystoreError::Derivation(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, KeystoreError>;
