//! # Wallet selector
//!
//! Chooses which loaded wallet signs the next operation. The selector owns the
//! only mutable state in the core:
//!
//! - a round-robin cursor, advanced with a single atomic `fetch_add` per
//!   successful round-robin pick, so concurrent callers never skip or repeat a
//!   position;
//! - a last-use clock per public key, guarded by a mutex. Every successful
//!   pick stamps the chosen wallet, whatever the policy.
//!
//! Candidates are [`Keystore::signers`]: each distinct loaded public key once,
//! in scan order. The keystore snapshot is passed in on every call, so a
//! rescan never changes the set of candidates under a running pick.
//!
//! The last-use clock keeps an entry for every wallet ever picked. Call
//! [`Selector::retain_loaded`] after a rescan to forget removed wallets.

use crate::{
    error::{KeystoreError, Result},
    keystore::Keystore,
    signer::Identity,
};
use solana_sdk::pubkey::Pubkey;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, MutexGuard, PoisonError,
    },
};
use tracing::trace;

/// How to choose a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Exactly this wallet.
    Explicit(Pubkey),
    /// The next wallet in scan order, wrapping.
    RoundRobin,
    /// The wallet picked least recently; never-picked wallets first, ties by
    /// scan order.
    LeastRecentlyUsed,
}

#[derive(Debug, Default)]
struct UsageClock {
    tick: u64,
    last_used: HashMap<Pubkey, u64>,
}

impl UsageClock {
    fn stamp(&mut self, pubkey: Pubkey) {
        self.tick += 1;
        self.last_used.insert(pubkey, self.tick);
    }

    fn last_used(&self, pubkey: &Pubkey) -> u64 {
        self.last_used.get(pubkey).copied().unwrap_or(0)
    }

    fn retain(&mut self, keep: impl Fn(&Pubkey) -> bool) {
        self.last_used.retain(|pubkey, _| keep(pubkey));
    }
}

/// Selection state shared by every caller that picks wallets.
///
/// Create one per process (or per strategy) and share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct Selector {
    cursor: AtomicUsize,
    usage: Mutex<UsageClock>,
}

impl Selector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Picks a wallet from `keystore` according to `policy`.
    ///
    /// # Errors
    ///
    /// * [`KeystoreError::NoWalletsAvailable`] if the keystore has no loaded
    ///   wallets, for every policy.
    /// * [`KeystoreError::NotFound`] for an explicit public key that is not
    ///   loaded.
    pub fn pick(&self, keystore: &Keystore, policy: &SelectionPolicy) -> Result<Identity> {
        match policy {
            SelectionPolicy::Explicit(pubkey) => self.explicit(keystore, pubkey),
            SelectionPolicy::RoundRobin => self.round_robin(keystore),
            SelectionPolicy::LeastRecentlyUsed => self.least_recently_used(keystore),
        }
    }

    pub fn explicit(&self, keystore: &Keystore, pubkey: &Pubkey) -> Result<Identity> {
        ensure_available(keystore)?;
        let identity = keystore
            .get(pubkey)
            .ok_or(KeystoreError::NotFound(*pubkey))?;
        self.usage().stamp(identity.pubkey());
        Ok(identity)
    }

    pub fn round_robin(&self, keystore: &Keystore) -> Result<Identity> {
        let count = ensure_available(keystore)?;
        let position = self.cursor.fetch_add(1, Ordering::Relaxed) % count;
        let identity = keystore
            .signer_at(position)
            .ok_or(KeystoreError::NoWalletsAvailable)?;

        trace!(position, pubkey = %identity.pubkey(), "Round-robin pick");
        self.usage().stamp(identity.pubkey());
        Ok(identity)
    }

    pub fn least_recently_used(&self, keystore: &Keystore) -> Result<Identity> {
        ensure_available(keystore)?;

        // Hold the clock for the whole scan so two callers cannot both see the
        // same wallet as least recent.
        let mut usage = self.usage();
        let identity = keystore
            .signers()
            .into_iter()
            .min_by_key(|identity| usage.last_used(&identity.pubkey()))
            .ok_or(KeystoreError::NoWalletsAvailable)?;

        trace!(pubkey = %identity.pubkey(), "Least-recently-used pick");
        usage.stamp(identity.pubkey());
        Ok(identity)
    }

    /// Scan position the next round-robin pick will use against `keystore`.
    pub fn peek_round_robin(&self, keystore: &Keystore) -> Option<usize> {
        match keystore.signer_count() {
            0 => None,
            count => Some(self.cursor.load(Ordering::Relaxed) % count),
        }
    }

    /// Clock tick of the last pick of `pubkey` (0 if never picked).
    pub fn last_used(&self, pubkey: &Pubkey) -> u64 {
        self.usage().last_used(pubkey)
    }

    /// Drops last-use stamps of wallets not loaded in `keystore`.
    pub fn retain_loaded(&self, keystore: &Keystore) {
        let mut usage = self.usage();
        let before = usage.last_used.len();
        usage.retain(|pubkey| keystore.contains(pubkey));
        trace!(pruned = before - usage.last_used.len(), "Pruned usage clock");
    }

    fn usage(&self) -> MutexGuard<'_, UsageClock> {
        // The clock has no invariants a panicking holder could break.
        self.usage.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn ensure_available(keystore: &Keystore) -> Result<usize> {
    match keystore.signer_count() {
        0 => Err(KeystoreError::NoWalletsAvailable),
        count => Ok(count),
    }
}
