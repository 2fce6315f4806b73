//! # Key material codec
//!
//! Decodes the `solana-keygen` file format: a JSON array of small integers,
//! either a 32-byte seed or a 64-byte `[seed || public key]` pair.
//!
//! The decoded bytes never leave this crate. Callers outside the keystore only
//! ever see the derived [`Pubkey`].

use crate::error::{KeystoreError, Result};
use serde::de::{DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde_json::error::Category;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{keypair_from_seed, Keypair},
    signer::Signer,
};
use zeroize::{Zeroize, Zeroizing};

/// Length of a seed-only key file.
pub const SEED_LEN: usize = 32;
/// Length of a full `[seed || public key]` key file.
pub const KEYPAIR_LEN: usize = 64;

/// Validated secret key bytes, 32 or 64 long.
///
/// The buffer is zeroized on drop.
pub struct KeyMaterial {
    bytes: Vec<u8>,
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

impl KeyMaterial {
    /// Number of decoded bytes (32 or 64).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; present for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[cfg(test)]
    fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// `true` if the file carried only the 32-byte seed.
    pub fn is_seed_only(&self) -> bool {
        self.bytes.len() == SEED_LEN
    }

    /// Derives the public key from the seed half.
    pub fn derive_pubkey(&self) -> Result<Pubkey> {
        self.to_keypair().map(|kp| kp.pubkey())
    }

    /// Builds the signing keypair.
    ///
    /// The keypair is always derived from the seed. For 64-byte material the
    /// trailing half must equal the derived public key.
    pub(crate) fn to_keypair(&self) -> Result<Keypair> {
        let keypair = keypair_from_seed(&self.bytes[..SEED_LEN])
            .map_err(|e| KeystoreError::Derivation(e.to_string()))?;

        let public_half = &self.bytes[SEED_LEN..];
        if !public_half.is_empty() && keypair.pubkey().to_bytes()[..] != *public_half {
            return Err(KeystoreError::PublicKeyMismatch);
        }

        Ok(keypair)
    }
}

/// Decodes the textual contents of a key file into [`KeyMaterial`].
///
/// # Errors
///
/// * [`KeystoreError::InvalidFormat`] if the input is not a JSON array of
///   integers in `0..=255`.
/// * [`KeystoreError::InvalidLength`] if the array length is neither 32 nor 64.
pub fn decode(input: &[u8]) -> Result<KeyMaterial> {
    // Preallocated so the buffer never reallocates and leaves seed bytes behind.
    let mut bytes = Zeroizing::new(Vec::with_capacity(KEYPAIR_LEN));

    let mut de = serde_json::Deserializer::from_slice(input);
    let count = KeyBytes(&mut bytes)
        .deserialize(&mut de)
        .and_then(|count| de.end().map(|()| count))
        .map_err(|e| KeystoreError::InvalidFormat(describe(&e)))?;

    match count {
        SEED_LEN | KEYPAIR_LEN => Ok(KeyMaterial {
            bytes: std::mem::take(&mut *bytes),
        }),
        other => Err(KeystoreError::InvalidLength(other)),
    }
}

/// Reads a JSON array of `u8` into the borrowed buffer, keeping at most
/// `KEYPAIR_LEN` bytes. Yields the total element count.
struct KeyBytes<'a>(&'a mut Vec<u8>);

impl<'de> DeserializeSeed<'de> for KeyBytes<'_> {
    type Value = usize;

    fn deserialize<D>(self, deserializer: D) -> std::result::Result<usize, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for KeyBytes<'_> {
    type Value = usize;

    fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("an array of integers in 0..=255")
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<usize, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut count = 0;
        while let Some(byte) = seq.next_element::<u8>()? {
            if count < KEYPAIR_LEN {
                self.0.push(byte);
            }
            count += 1;
        }
        Ok(count)
    }
}

// serde_json messages echo offending values; keep only the position.
fn describe(err: &serde_json::Error) -> String {
    let kind = match err.classify() {
        Category::Io => "unreadable input",
        Category::Syntax => "malformed JSON",
        Category::Data => "expected an array of integers in 0..=255",
        Category::Eof => "unexpected end of input",
    };
    format!("{} at line {} column {}", kind, err.line(), err.column())
}
