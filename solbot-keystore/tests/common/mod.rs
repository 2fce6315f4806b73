#![allow(dead_code)]

use solana_sdk::signature::Keypair;
use std::{fs, path::Path};

/// Writes `bytes` as a `solana-keygen` style JSON array to `dir/name`.
pub fn write_key_file(dir: &Path, name: &str, bytes: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_vec(bytes).unwrap()).unwrap();
}

/// Writes a fresh 64-byte keypair file and returns the keypair.
pub fn write_keypair(dir: &Path, name: &str) -> Keypair {
    let kp = Keypair::new();
    write_key_file(dir, name, &kp.to_bytes());
    kp
}

/// Writes a fresh seed-only (32-byte) key file and returns the keypair.
pub fn write_seed(dir: &Path, name: &str) -> Keypair {
    let kp = Keypair::new();
    write_key_file(dir, name, &kp.to_bytes()[..32]);
    kp
}
