use solana_sdk::{signature::Keypair, signer::Signer};
use solbot::{config::BotConfig, list_report};
use std::fs;
use tempfile::tempdir;

fn config_for(wallets_dir: &std::path::Path) -> BotConfig {
    BotConfig {
        wallets_dir: wallets_dir.display().to_string(),
        ..Default::default()
    }
}

#[test]
fn test_list_creates_missing_directory() {
    let dir = tempdir().unwrap();
    let wallets = dir.path().join("nested").join("wallets");

    let output = list_report(&config_for(&wallets)).unwrap();

    assert!(wallets.is_dir());
    assert!(output.starts_with("No wallets found"));
    assert!(output.contains("solana-keygen new --outfile"));
}

#[test]
fn test_list_reports_existing_wallets() {
    let dir = tempdir().unwrap();
    let kp = Keypair::new();
    fs::write(
        dir.path().join("trader1.json"),
        serde_json::to_vec(&kp.to_bytes().to_vec()).unwrap(),
    )
    .unwrap();

    let output = list_report(&config_for(dir.path())).unwrap();

    assert!(output.starts_with("Discovered wallets:"));
    assert!(output.contains(&kp.pubkey().to_string()));
}

#[test]
fn test_list_fails_when_path_is_a_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("wallets");
    fs::write(&file, "not a directory").unwrap();

    let err = list_report(&config_for(&file)).unwrap_err();
    assert!(err.to_string().contains("Failed to create wallets directory"));
}
