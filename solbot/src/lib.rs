pub mod cli;
pub mod config;
pub mod report;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, CommonArgs, PolicyArg, SignCmd};
use config::{load_config, BotConfig};
use solana_sdk::pubkey::Pubkey;
use solbot_keystore::{SelectionPolicy, Selector, WalletLocks, WalletRegistry};
use std::{fs, str::FromStr};

/// The main entry point for the solbot binary.
/// Handles `.env` loading, CLI parsing, configuration and logging setup.
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::List(cmd) => {
            let config = setup(&cmd.common)?;
            println!("{}", list_report(&config)?);
            Ok(())
        }
        Commands::Sign(cmd) => {
            let config = setup(&cmd.common)?;
            sign(&config, cmd).await
        }
    }
}

fn setup(common: &CommonArgs) -> Result<BotConfig> {
    let config = load_config(common.config.as_deref(), common.wallets_dir.clone())?;
    solbot_logger::init(&config.log)?;
    tracing::debug!("Configuration loaded: {:#?}", &config);
    match &config.rpc_endpoint {
        Some(url) => tracing::info!(rpc_endpoint = %url, "RPC endpoint configured"),
        None => tracing::debug!("No RPC endpoint configured"),
    }
    Ok(config)
}

/// Output of the `list` command. Creates the wallets directory if missing.
pub fn list_report(config: &BotConfig) -> Result<String> {
    fs::create_dir_all(&config.wallets_dir).with_context(|| {
        format!("Failed to create wallets directory '{}'", config.wallets_dir)
    })?;

    let registry = WalletRegistry::load(&config.wallets_dir);
    Ok(report::render(&config.wallets_dir, &registry.current()))
}

async fn sign(config: &BotConfig, cmd: SignCmd) -> Result<()> {
    let policy = match (&cmd.pubkey, cmd.policy) {
        (Some(pubkey), _) => SelectionPolicy::Explicit(
            Pubkey::from_str(pubkey).context(format!("Invalid public key '{}'", pubkey))?,
        ),
        (None, Some(PolicyArg::Lru)) => SelectionPolicy::LeastRecentlyUsed,
        (None, Some(PolicyArg::RoundRobin) | None) => SelectionPolicy::RoundRobin,
    };

    let registry = WalletRegistry::load(&config.wallets_dir);
    let keystore = registry.current();
    let identity = Selector::new()
        .pick(&keystore, &policy)
        .with_context(|| format!("No wallet to sign with in '{}'", config.wallets_dir))?;

    let locks = WalletLocks::new();
    let signature = locks
        .sign_exclusive(identity.signer(), cmd.message.as_bytes())
        .await?;

    tracing::info!(pubkey = %identity.pubkey(), path = %identity.path().display(), "Message signed");
    println!("{} {}", identity.pubkey(), signature);
    Ok(())
}
