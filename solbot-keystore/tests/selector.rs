mod common;

use common::{write_keypair, write_seed};
use solana_sdk::{pubkey::Pubkey, signature::Keypair, signer::Signer};
use solbot_keystore::{Keystore, KeystoreError, SelectionPolicy, Selector};
use std::{collections::HashMap, fs, sync::Mutex};
use tempfile::{tempdir, TempDir};

/// Loads a keystore with `count` wallets named `w0.json`, `w1.json`, ...
fn keystore_with(count: usize) -> (TempDir, Keystore, Vec<Keypair>) {
    let dir = tempdir().unwrap();
    let keypairs = (0..count)
        .map(|i| write_keypair(dir.path(), &format!("w{i}.json")))
        .collect();
    let keystore = Keystore::load_directory(dir.path());
    (dir, keystore, keypairs)
}

#[test]
fn test_round_robin_cycles_in_scan_order() {
    let (_dir, keystore, keypairs) = keystore_with(3);
    let selector = Selector::new();

    let picked: Vec<Pubkey> = (0..7)
        .map(|_| selector.round_robin(&keystore).unwrap().pubkey())
        .collect();

    let expected: Vec<Pubkey> = (0..7).map(|i| keypairs[i % 3].pubkey()).collect();
    assert_eq!(picked, expected);
}

#[test]
fn test_round_robin_is_fair() {
    for (wallets, calls) in [(1usize, 5usize), (3, 10), (4, 4), (5, 23)] {
        let (_dir, keystore, _) = keystore_with(wallets);
        let selector = Selector::new();

        let mut counts: HashMap<Pubkey, usize> = HashMap::new();
        for _ in 0..calls {
            let pubkey = selector
                .pick(&keystore, &SelectionPolicy::RoundRobin)
                .unwrap()
                .pubkey();
            *counts.entry(pubkey).or_default() += 1;
        }

        let floor = calls / wallets;
        let ceil = calls.div_ceil(wallets);
        assert_eq!(counts.len(), wallets.min(calls));
        assert!(counts.values().all(|&n| n == floor || n == ceil));
    }
}

#[test]
fn test_round_robin_skips_failed_and_duplicate_entries() {
    let dir = tempdir().unwrap();
    let a = write_keypair(dir.path(), "a.json");
    fs::write(dir.path().join("b.json"), "garbage").unwrap();
    common::write_key_file(dir.path(), "c.json", &a.to_bytes()[..32]);
    let d = write_seed(dir.path(), "d.json");

    let keystore = Keystore::load_directory(dir.path());
    let selector = Selector::new();

    let picked: Vec<Pubkey> = (0..4)
        .map(|_| selector.round_robin(&keystore).unwrap().pubkey())
        .collect();
    assert_eq!(picked, [a.pubkey(), d.pubkey(), a.pubkey(), d.pubkey()]);
}

#[test]
fn test_concurrent_round_robin_never_skips_or_repeats() {
    let (_dir, keystore, keypairs) = keystore_with(4);
    let selector = Selector::new();
    let counts: Mutex<HashMap<Pubkey, usize>> = Mutex::new(HashMap::new());

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..100 {
                    let pubkey = selector.round_robin(&keystore).unwrap().pubkey();
                    *counts.lock().unwrap().entry(pubkey).or_default() += 1;
                }
            });
        }
    });

    let counts = counts.into_inner().unwrap();
    for kp in &keypairs {
        assert_eq!(counts[&kp.pubkey()], 200);
    }
}

#[test]
fn test_least_recently_used_order() {
    let (_dir, keystore, keypairs) = keystore_with(3);
    let selector = Selector::new();

    // Never-used wallets come first, in scan order.
    let first = selector.least_recently_used(&keystore).unwrap();
    assert_eq!(first.pubkey(), keypairs[0].pubkey());

    // An explicit pick counts as a use.
    selector.explicit(&keystore, &keypairs[1].pubkey()).unwrap();

    let next = selector.least_recently_used(&keystore).unwrap();
    assert_eq!(next.pubkey(), keypairs[2].pubkey());

    let next = selector.least_recently_used(&keystore).unwrap();
    assert_eq!(next.pubkey(), keypairs[0].pubkey());

    let next = selector.least_recently_used(&keystore).unwrap();
    assert_eq!(next.pubkey(), keypairs[1].pubkey());
}

#[test]
fn test_concurrent_least_recently_used_spreads_load() {
    let (_dir, keystore, keypairs) = keystore_with(6);
    let selector = Selector::new();
    let picked: Mutex<Vec<Pubkey>> = Mutex::new(Vec::new());

    std::thread::scope(|s| {
        for _ in 0..6 {
            s.spawn(|| {
                let pubkey = selector.least_recently_used(&keystore).unwrap().pubkey();
                picked.lock().unwrap().push(pubkey);
            });
        }
    });

    let mut picked = picked.into_inner().unwrap();
    picked.sort();
    let mut expected: Vec<Pubkey> = keypairs.iter().map(|kp| kp.pubkey()).collect();
    expected.sort();
    assert_eq!(picked, expected);
}

#[test]
fn test_explicit_pick() {
    let (_dir, keystore, keypairs) = keystore_with(2);
    let selector = Selector::new();

    let identity = selector
        .pick(&keystore, &SelectionPolicy::Explicit(keypairs[1].pubkey()))
        .unwrap();
    assert_eq!(identity.pubkey(), keypairs[1].pubkey());
    assert!(selector.last_used(&keypairs[1].pubkey()) > 0);

    let unknown = Pubkey::new_unique();
    assert!(matches!(
        selector.explicit(&keystore, &unknown),
        Err(KeystoreError::NotFound(pk)) if pk == unknown
    ));
}

#[test]
fn test_selector_works_across_snapshots() {
    let (_dir, small, _) = keystore_with(2);
    let (_dir2, large, large_keys) = keystore_with(3);
    let selector = Selector::new();

    selector.round_robin(&small).unwrap();
    assert_eq!(selector.peek_round_robin(&large), Some(1));
    assert_eq!(
        selector.round_robin(&large).unwrap().pubkey(),
        large_keys[1].pubkey()
    );
}
