//! # Keystore
//!
//! Loads every `*.json` key file under a wallets directory and owns the
//! resulting keypairs. A keystore is built once per scan and is immutable
//! afterwards; rescanning builds a new one (see [`crate::WalletRegistry`]).
//!
//! ## Partial failure
//!
//! Each file becomes a [`WalletEntry`] whose [`LoadStatus`] is either
//! `Loaded` or `Failed(reason)`. A bad file never aborts the scan, and
//! [`Keystore::load_directory`] itself cannot fail: a missing or unreadable
//! root simply yields an empty keystore.
//!
//! ## Candidates
//!
//! Every directory entry whose name ends in `.json` is a candidate, whatever
//! its type. A directory named `x.json` is recorded as a failed entry (it
//! cannot be read as a key file) and is still walked for key files inside it.
//!
//! ## Duplicate public keys
//!
//! Two files may encode the same keypair. Both entries are kept in scan order,
//! but [`Keystore::get`] and the selector resolve a public key to the *first*
//! successfully loaded file. Later duplicates are reported with a warning.

use crate::{
    codec,
    error::{KeystoreError, Result},
    signer::{Identity, SignerHandle},
};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use std::{
    collections::{hash_map::Entry, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

/// Extension of candidate key files.
pub const KEY_FILE_EXTENSION: &str = "json";

/// Outcome of loading a single key file.
#[derive(Debug)]
pub enum LoadStatus {
    Loaded(Pubkey),
    Failed(KeystoreError),
}

/// One discovered key file.
pub struct WalletEntry {
    path: PathBuf,
    status: LoadStatus,
    key: Option<Arc<Keypair>>,
}

impl WalletEntry {
    fn loaded(path: PathBuf, keypair: Keypair) -> Self {
        Self {
            path,
            status: LoadStatus::Loaded(keypair.pubkey()),
            key: Some(Arc::new(keypair)),
        }
    }

    fn failed(path: PathBuf, reason: KeystoreError) -> Self {
        Self {
            path,
            status: LoadStatus::Failed(reason),
            key: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.status, LoadStatus::Loaded(_))
    }

    pub fn pubkey(&self) -> Option<Pubkey> {
        match self.status {
            LoadStatus::Loaded(pubkey) => Some(pubkey),
            LoadStatus::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&KeystoreError> {
        match &self.status {
            LoadStatus::Loaded(_) => None,
            LoadStatus::Failed(err) => Some(err),
        }
    }

    /// The wallet's identity, or `None` if the file failed to load.
    pub fn identity(&self) -> Option<Identity> {
        let pubkey = self.pubkey()?;
        let key = self.key.as_ref()?;
        Some(Identity::new(
            self.path.clone(),
            SignerHandle::new(pubkey, key),
        ))
    }

    /// Public key in base-58, or `<error: reason>` for a failed file.
    pub fn display_pubkey(&self) -> String {
        match &self.status {
            LoadStatus::Loaded(pubkey) => pubkey.to_string(),
            LoadStatus::Failed(err) => format!("<error: {}>", err),
        }
    }
}

impl std::fmt::Debug for WalletEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletEntry")
            .field("path", &self.path)
            .field("status", &self.status)
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// In-memory index of every wallet file found by one directory scan.
#[derive(Debug)]
pub struct Keystore {
    root: PathBuf,
    entries: Vec<WalletEntry>,
    by_pubkey: HashMap<Pubkey, usize>,
    by_path: HashMap<PathBuf, usize>,
    /// Entry indices of distinct loaded wallets, in scan order.
    signers: Vec<usize>,
}

impl Keystore {
    /// A keystore with no wallets.
    pub fn empty(root: impl Into<PathBuf>) -> Self {
        Self::from_entries(root.into(), Vec::new())
    }

    /// Scans `root` recursively for `*.json` key files, in lexicographic path
    /// order, and loads each one.
    ///
    /// Never fails. A missing directory is a valid, empty keystore.
    pub fn load_directory(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let files = discover(&root);

        let entries = files
            .into_iter()
            .map(|path| match load_keypair(&path) {
                Ok(keypair) => {
                    debug!(path = %path.display(), pubkey = %keypair.pubkey(), "Loaded wallet");
                    WalletEntry::loaded(path, keypair)
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "Failed to load wallet");
                    WalletEntry::failed(path, err)
                }
            })
            .collect();

        let keystore = Self::from_entries(root, entries);
        info!(
            root = %keystore.root.display(),
            loaded = keystore.loaded_count(),
            failed = keystore.failed_count(),
            "Wallet scan complete"
        );
        keystore
    }

    fn from_entries(root: PathBuf, entries: Vec<WalletEntry>) -> Self {
        let mut by_pubkey = HashMap::new();
        let mut by_path = HashMap::with_capacity(entries.len());
        let mut signers = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            by_path.insert(entry.path.clone(), idx);

            let Some(pubkey) = entry.pubkey() else {
                continue;
            };
            match by_pubkey.entry(pubkey) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                    signers.push(idx);
                }
                Entry::Occupied(first) => {
                    warn!(
                        %pubkey,
                        path = %entry.path.display(),
                        first = %entries[*first.get()].path.display(),
                        "Duplicate wallet; the first file in scan order takes precedence"
                    );
                }
            }
        }

        Self {
            root,
            entries,
            by_pubkey,
            by_path,
            signers,
        }
    }

    /// The directory this keystore was loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The first successfully loaded wallet with this public key.
    pub fn get(&self, pubkey: &Pubkey) -> Option<Identity> {
        self.by_pubkey
            .get(pubkey)
            .and_then(|&idx| self.entries[idx].identity())
    }

    /// The entry loaded from exactly this path.
    pub fn get_by_path(&self, path: &Path) -> Option<&WalletEntry> {
        self.by_path.get(path).map(|&idx| &self.entries[idx])
    }

    /// Every entry, loaded or failed, in scan order.
    pub fn all(&self) -> &[WalletEntry] {
        &self.entries
    }

    /// Distinct loaded wallets in scan order (first file per public key).
    pub fn signers(&self) -> Vec<Identity> {
        self.signers
            .iter()
            .filter_map(|&idx| self.entries[idx].identity())
            .collect()
    }

    pub(crate) fn signer_count(&self) -> usize {
        self.signers.len()
    }

    pub(crate) fn signer_at(&self, position: usize) -> Option<Identity> {
        self.signers
            .get(position)
            .and_then(|&idx| self.entries[idx].identity())
    }

    /// `true` if a wallet with this public key is loaded.
    pub fn contains(&self, pubkey: &Pubkey) -> bool {
        self.by_pubkey.contains_key(pubkey)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of `Loaded` entries, duplicates included.
    pub fn loaded_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_loaded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.len() - self.loaded_count()
    }

    /// `(path, public key or "<error: ..>")` per entry, in scan order.
    pub fn report(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|e| (e.path.display().to_string(), e.display_pubkey()))
            .collect()
    }

    /// Drops all key material. Outstanding handles fail with
    /// [`KeystoreError::KeyUnavailable`] afterwards.
    pub fn teardown(self) {
        info!(root = %self.root.display(), wallets = self.signers.len(), "Tearing down keystore");
        drop(self);
    }
}

/// Loads `dir` and returns its [`Keystore::report`].
pub fn list_public_keys_with_paths(dir: impl AsRef<Path>) -> Vec<(String, String)> {
    Keystore::load_directory(dir).report()
}

fn load_keypair(path: &Path) -> Result<Keypair> {
    let raw = Zeroizing::new(fs::read(path).map_err(|source| KeystoreError::Io {
        path: path.to_path_buf(),
        source,
    })?);
    codec::decode(&raw)?.to_keypair()
}

/// Collects candidate key files under `root`, sorted component by component.
fn discover(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        debug!(root = %root.display(), "Wallets directory does not exist");
        return Vec::new();
    }
    if !root.is_dir() {
        warn!(root = %root.display(), "Wallets path is not a directory");
        return Vec::new();
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let read_dir = match fs::read_dir(&dir) {
            Ok(rd) => rd,
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "Skipping unreadable directory");
                continue;
            }
        };

        for dir_entry in read_dir.flatten() {
            let path = dir_entry.path();
            let Ok(file_type) = dir_entry.file_type() else {
                continue;
            };
            if has_key_extension(&path) {
                files.push(path.clone());
            }
            // Symlinked directories are not followed.
            if file_type.is_dir() {
                pending.push(path);
            }
        }
    }

    files.sort();
    files
}

fn has_key_extension(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == KEY_FILE_EXTENSION)
}
