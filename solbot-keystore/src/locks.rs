//! # Per-wallet signing locks
//!
//! The keystore itself lets any number of callers sign with the same wallet at
//! once. A transaction layer that needs at most one in-flight signature per
//! wallet layers [`WalletLocks`] on top: one async mutex per public key,
//! acquired before signing and released when the guard drops, including on
//! error paths.
//!
//! ## Thread Safety
//! The lock table is a `DashMap`, so lookups for different wallets never
//! contend with each other. Locks are created lazily and live until
//! [`WalletLocks::retain_loaded`] prunes wallets a rescan removed.

use crate::{error::Result, keystore::Keystore, signer::SignerHandle};
use dashmap::DashMap;
use solana_sdk::{pubkey::Pubkey, signature::Signature};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

/// Guard proving exclusive signing rights for one wallet.
pub type WalletGuard = OwnedMutexGuard<()>;

/// Table of one mutex per public key.
#[derive(Debug, Default)]
pub struct WalletLocks {
    table: DashMap<Pubkey, Arc<Mutex<()>>>,
}

impl WalletLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, pubkey: &Pubkey) -> Arc<Mutex<()>> {
        // Clone the Arc out so the shard lock is released before awaiting.
        self.table
            .entry(*pubkey)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Waits until no one else holds `pubkey`'s lock, then takes it.
    pub async fn lock(&self, pubkey: &Pubkey) -> WalletGuard {
        let guard = self.slot(pubkey).lock_owned().await;
        trace!(%pubkey, "Wallet lock acquired");
        guard
    }

    /// Takes `pubkey`'s lock if it is free.
    pub fn try_lock(&self, pubkey: &Pubkey) -> Option<WalletGuard> {
        self.slot(pubkey).try_lock_owned().ok()
    }

    /// Signs `message` while holding the wallet's lock.
    pub async fn sign_exclusive(&self, signer: &SignerHandle, message: &[u8]) -> Result<Signature> {
        let _guard = self.lock(&signer.pubkey()).await;
        signer.sign(message)
    }

    /// Drops locks of wallets not loaded in `keystore`. A lock that is held
    /// or awaited stays until the next call.
    pub fn retain_loaded(&self, keystore: &Keystore) {
        self.table
            .retain(|pubkey, lock| keystore.contains(pubkey) || Arc::strong_count(lock) > 1);
    }

    /// Number of wallets that have had a lock created.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_lock_is_exclusive_per_wallet() {
        let locks = WalletLocks::new();
        let a = Pubkey::new_unique();
        let b = Pubkey::new_unique();

        let guard = locks.lock(&a).await;
        assert!(locks.try_lock(&a).is_none());
        assert!(locks.try_lock(&b).is_some());

        drop(guard);
        assert!(locks.try_lock(&a).is_some());
        assert_eq!(locks.len(), 2);
    }
}
