//! Fixed local co-signer (the base account keypair)

use std::fmt;
use std::fs;
use std::path::Path;

use ed25519_dalek::{Signer as _, SigningKey};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::signer::{Signer, SignerError};

use crate::error::ConfigError;
use crate::models::Address;

/// ed25519 keypair loaded from a 64-byte JSON array file (secret || public)
pub struct KeypairSigner {
    key: SigningKey,
}

impl KeypairSigner {
    pub fn from_seed(seed: [u8; 32]) -> Self {
        KeypairSigner {
            key: SigningKey::from_bytes(&seed),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidKeypair {
            path: path.display().to_string(),
            message,
        };

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let bytes: Vec<u8> = serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        let bytes: [u8; 64] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| invalid(format!("expected 64 bytes, got {}", v.len())))?;
        let key = SigningKey::from_keypair_bytes(&bytes).map_err(|e| invalid(e.to_string()))?;
        Ok(KeypairSigner { key })
    }

    pub fn address(&self) -> Address {
        Address::new(self.key.verifying_key().to_bytes())
    }

    pub fn keypair_bytes(&self) -> [u8; 64] {
        self.key.to_keypair_bytes()
    }
}

impl Signer for KeypairSigner {
    fn try_pubkey(&self) -> Result<Pubkey, SignerError> {
        Ok(self.address().into())
    }

    fn try_sign_message(&self, message: &[u8]) -> Result<Signature, SignerError> {
        Ok(Signature::from(self.key.sign(message).to_bytes()))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

impl fmt::Debug for KeypairSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairSigner")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
