use clap::{Args, Parser, Subcommand, ValueEnum};

/// The main CLI structure for the solbot trading bot.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Defines the available subcommands for the application.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover wallets and print each one's public key (or load error).
    List(ListCmd),
    /// Sign a message with one of the loaded wallets.
    Sign(SignCmd),
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Path to a TOML configuration file.
    /// If not provided, defaults and environment variables are used.
    #[arg(short, long)]
    pub config: Option<String>,

    /// Wallets directory. Overrides `WALLETS_DIR` and the config file.
    #[arg(long)]
    pub wallets_dir: Option<String>,
}

/// Arguments for the `list` subcommand.
#[derive(Args, Debug)]
pub struct ListCmd {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the `sign` subcommand.
#[derive(Args, Debug)]
pub struct SignCmd {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Message to sign (UTF-8).
    #[arg(short, long)]
    pub message: String,

    /// Sign with this wallet (base-58 public key).
    #[arg(long, conflicts_with = "policy")]
    pub pubkey: Option<String>,

    /// Wallet selection policy when no public key is given. Defaults to round-robin.
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    RoundRobin,
    Lru,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let cli = Cli::try_parse_from(["solbot", "list", "--wallets-dir", "w"]).unwrap();
        let Commands::List(cmd) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(cmd.common.wallets_dir.as_deref(), Some("w"));
        assert!(cmd.common.config.is_none());
    }

    #[test]
    fn test_parse_sign_with_policy() {
        let cli =
            Cli::try_parse_from(["solbot", "sign", "-m", "hello", "--policy", "lru"]).unwrap();
        let Commands::Sign(cmd) = cli.command else {
            panic!("expected sign");
        };
        assert_eq!(cmd.message, "hello");
        assert_eq!(cmd.policy, Some(PolicyArg::Lru));
    }

    #[test]
    fn test_pubkey_conflicts_with_policy() {
        let res = Cli::try_parse_from([
            "solbot",
            "sign",
            "-m",
            "x",
            "--pubkey",
            "11111111111111111111111111111111",
            "--policy",
            "round-robin",
        ]);
        assert!(res.is_err());
    }
}
