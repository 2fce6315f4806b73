//! # Solbot Keystore
//!
//! The multi-wallet keystore and signing core of the trading bot. It loads
//! `solana-keygen` key files from a directory, keeps the secret material to
//! itself, and hands out signing capability one wallet at a time.
//!
//! ## Data Flow
//! ```text
//! wallets/**/*.json
//!     → codec::decode       (JSON byte array → 32/64-byte key material)
//!     → Keystore            (per-file Loaded / Failed entries, scan order)
//!     → Selector::pick      (explicit / round-robin / least-recently-used)
//!     → SignerHandle::sign  (Ed25519, deterministic)
//! ```
//!
//! ## Key Features
//!
//! - **No raw secrets**: nothing outside this crate can read a seed. Callers
//!   get public keys and [`SignerHandle`]s; secret buffers are zeroized.
//! - **Partial-failure tolerant loading**: a corrupt file becomes a
//!   `Failed` entry, never an error from [`Keystore::load_directory`].
//! - **Snapshot rescans**: [`WalletRegistry`] swaps whole keystores atomically.
//! - **Concurrent selection**: [`Selector`] is safe to share across threads;
//!   [`WalletLocks`] optionally serializes signing per wallet.

pub mod codec;
pub mod error;
pub mod keystore;
pub mod locks;
pub mod registry;
pub mod selector;
pub mod signer;

pub use error::{KeystoreError, Result};
pub use keystore::{list_public_keys_with_paths, Keystore, LoadStatus, WalletEntry};
pub use locks::{WalletGuard, WalletLocks};
pub use registry::WalletRegistry;
pub use selector::{SelectionPolicy, Selector};
pub use signer::{Identity, SignerHandle};
