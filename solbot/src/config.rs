use anyhow::{Context, Result};
use serde::Deserialize;
use solbot_logger::{LogConfig, LogOutput};
use std::env;

/// Plain environment variable naming the wallets directory.
pub const WALLETS_DIR_ENV: &str = "WALLETS_DIR";
/// Plain environment variable naming the Solana RPC endpoint.
pub const RPC_ENDPOINT_ENV: &str = "RPC_ENDPOINT";
/// Prefix for structured overrides, e.g. `SOLBOT__LOG__LEVEL=debug`.
pub const ENV_PREFIX: &str = "SOLBOT";

/// The top-level configuration for the solbot binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Directory scanned recursively for `*.json` key files.
    pub wallets_dir: String,
    /// Solana RPC endpoint for the transaction layer. Not used by the keystore.
    pub rpc_endpoint: Option<String>,
    pub log: LogConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            wallets_dir: "wallets".to_string(),
            rpc_endpoint: None,
            log: LogConfig {
                output: LogOutput::Stderr,
                ..LogConfig::default()
            },
        }
    }
}

/// Loads the bot configuration.
///
/// Later sources win:
/// 1. built-in defaults
/// 2. the TOML file at `path`, if given
/// 3. `SOLBOT__*` environment variables (`__` separates nested keys)
/// 4. `WALLETS_DIR` / `RPC_ENDPOINT`
/// 5. `wallets_dir_override` (the `--wallets-dir` flag)
pub fn load_config(path: Option<&str>, wallets_dir_override: Option<String>) -> Result<BotConfig> {
    let mut builder = config::Config::builder();
    if let Some(path) = path {
        builder = builder.add_source(config::File::with_name(path));
    }

    let builder = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .set_override_option("wallets_dir", env::var(WALLETS_DIR_ENV).ok())?
        .set_override_option("rpc_endpoint", env::var(RPC_ENDPOINT_ENV).ok())?
        .set_override_option("wallets_dir", wallets_dir_override)?;

    let source = path.unwrap_or("<defaults>");
    let settings: BotConfig = builder
        .build()
        .context(format!("Failed to build configuration from '{}'", source))?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    Ok(settings)
}
