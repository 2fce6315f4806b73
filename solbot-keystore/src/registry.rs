//! # Keystore snapshots
//!
//! [`WalletRegistry`] publishes the current [`Keystore`] as an immutable
//! `Arc` snapshot. A rescan loads a complete new keystore first and then swaps
//! it in atomically, so readers see either the old index or the new one,
//! never a half-built one.
//!
//! Handles minted from a replaced snapshot keep working while anyone still
//! holds that snapshot, and fail with `KeyUnavailable` after the last
//! reference is gone.
//!
//! A rescan does not touch per-wallet state kept elsewhere. Callers that share
//! a [`crate::Selector`] or [`crate::WalletLocks`] across rescans pass the new
//! snapshot to their `retain_loaded` so removed wallets are forgotten.

use crate::keystore::Keystore;
use arc_swap::ArcSwap;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::info;

#[derive(Debug)]
pub struct WalletRegistry {
    root: PathBuf,
    current: ArcSwap<Keystore>,
}

impl WalletRegistry {
    /// Loads `root` and publishes it as the first snapshot.
    pub fn load(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let keystore = Keystore::load_directory(&root);
        Self {
            root,
            current: ArcSwap::from_pointee(keystore),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<Keystore> {
        self.current.load_full()
    }

    /// Rescans the directory and publishes the result. Returns the new
    /// snapshot.
    pub fn rescan(&self) -> Arc<Keystore> {
        let fresh = Arc::new(Keystore::load_directory(&self.root));
        let previous = self.current.swap(fresh.clone());
        info!(
            root = %self.root.display(),
            previous = previous.signers().len(),
            current = fresh.signers().len(),
            "Published new keystore snapshot"
        );
        fresh
    }
}
