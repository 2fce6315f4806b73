//! # Signer handles
//!
//! A [`SignerHandle`] is the only capability the keystore hands out. It can
//! produce Ed25519 signatures for one wallet and nothing else: the seed stays
//! inside the [`crate::Keystore`] that minted the handle.
//!
//! Handles hold a weak reference to the key. Once the owning keystore is torn
//! down (or dropped), every outstanding handle fails with
//! [`KeystoreError::KeyUnavailable`].

use crate::error::{KeystoreError, Result};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    signer::{Signer, SignerError},
};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Weak},
};

/// Signing capability for a single wallet.
#[derive(Clone)]
pub struct SignerHandle {
    pubkey: Pubkey,
    key: Weak<Keypair>,
}

impl SignerHandle {
    pub(crate) fn new(pubkey: Pubkey, key: &Arc<Keypair>) -> Self {
        Self {
            pubkey,
            key: Arc::downgrade(key),
        }
    }

    /// The public key this handle signs for.
    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    /// `false` once the owning keystore has been torn down.
    pub fn is_available(&self) -> bool {
        self.key.strong_count() > 0
    }

    /// Signs `message` with Ed25519.
    ///
    /// Signing is deterministic: the same key and message always produce the
    /// same 64-byte signature.
    pub fn sign(&self, message: &[u8]) -> Result<Signature> {
        let key = self.key.upgrade().ok_or(KeystoreError::KeyUnavailable)?;
        key.try_sign_message(message)
            .map_err(|e| KeystoreError::Signing(e.to_string()))
    }
}

impl std::fmt::Debug for SignerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerHandle")
            .field("pubkey", &self.pubkey)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

// Lets the transaction layer pass a handle straight to `Transaction::try_sign`.
impl Signer for SignerHandle {
    fn try_pubkey(&self) -> std::result::Result<Pubkey, SignerError> {
        Ok(self.pubkey)
    }

    fn try_sign_message(&self, message: &[u8]) -> std::result::Result<Signature, SignerError> {
        self.sign(message)
            .map_err(|e| SignerError::Custom(e.to_string()))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// A loaded wallet as seen from outside the keystore: its public key, the file
/// it came from, and a [`SignerHandle`].
#[derive(Clone, Debug)]
pub struct Identity {
    pubkey: Pubkey,
    path: PathBuf,
    signer: SignerHandle,
}

impl Identity {
    pub(crate) fn new(path: PathBuf, signer: SignerHandle) -> Self {
        Self {
            pubkey: signer.pubkey(),
            path,
            signer,
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn signer(&self) -> &SignerHandle {
        &self.signer
    }

    pub fn into_signer(self) -> SignerHandle {
        self.signer
    }
}
