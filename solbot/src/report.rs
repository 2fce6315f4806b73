//! Console output for `solbot list`.

use solbot_keystore::Keystore;

/// Renders the wallet report printed by `solbot list`.
pub fn render(wallets_dir: &str, keystore: &Keystore) -> String {
    if keystore.is_empty() {
        return format!(
            "No wallets found in '{dir}'. Create wallets with \
             'solana-keygen new --outfile {dir}/trader1.json' and re-run.",
            dir = wallets_dir
        );
    }

    let mut out = String::from("Discovered wallets:");
    for (path, pubkey) in keystore.report() {
        out.push_str(&format!("\n- {}: {}", path, pubkey));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keystore_message() {
        let keystore = Keystore::empty("my_wallets");
        let text = render("my_wallets", &keystore);
        assert!(text.starts_with("No wallets found in 'my_wallets'"));
        assert!(text.contains("solana-keygen new --outfile my_wallets/trader1.json"));
    }
}
