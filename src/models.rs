use std::fmt;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::error::{ConfigError, RemoteError};

/// 32-byte public key, shown and parsed as base58
#[derive(Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    pub fn new(bytes: [u8; 32]) -> Self {
        Address(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Shortened form for narrow terminals: `AbCd…WxYz`
    pub fn short(&self) -> String {
        let full = self.to_string();
        if full.len() <= 10 {
            return full;
        }
        format!("{}…{}", &full[..4], &full[full.len() - 4..])
    }
}

impl FromStr for Address {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = Pubkey::from_str(s.trim()).map_err(|_| ConfigError::InvalidAddress(s.to_string()))?;
        Ok(key.into())
    }
}

impl From<Pubkey> for Address {
    fn from(key: Pubkey) -> Self {
        Address(key.to_bytes())
    }
}

impl From<Address> for Pubkey {
    fn from(address: Address) -> Self {
        Pubkey::new_from_array(address.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Pubkey::from(*self))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

/// An established wallet connection
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub address: Address,
    /// True when the session came from a silent (pre-trusted) probe
    pub trusted: bool,
}

/// One entry of the shared list, laid out as the program's `ItemStruct`
#[derive(Clone, Debug, PartialEq, BorshSerialize, BorshDeserialize)]
pub struct GifItem {
    pub link: String,
    /// Address recorded on-chain as the submitter
    pub submitter: Address,
}

impl GifItem {
    pub fn new(link: impl Into<String>, submitter: Address) -> Self {
        GifItem {
            link: link.into(),
            submitter,
        }
    }
}

/// Client view of the shared collection.
///
/// Every fetch replaces the whole value; items are never merged in.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum GifCollection {
    /// Not fetched during this session
    #[default]
    Unknown,
    /// The account does not exist yet and needs a one-time setup
    Uninitialized,
    /// The last fetch failed for any other reason
    Unavailable(String),
    Loaded(Vec<GifItem>),
}

impl GifCollection {
    /// Map a fetch outcome onto the collection sentinels
    pub fn from_fetch(result: Result<Vec<GifItem>, RemoteError>) -> Self {
        match result {
            Ok(items) => GifCollection::Loaded(items),
            Err(RemoteError::AccountNotInitialized) => GifCollection::Uninitialized,
            Err(e) => GifCollection::Unavailable(e.to_string()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, GifCollection::Loaded(_))
    }

    pub fn is_uninitialized(&self) -> bool {
        matches!(self, GifCollection::Uninitialized)
    }

    pub fn items(&self) -> &[GifItem] {
        match self {
            GifCollection::Loaded(items) => items,
            _ => &[],
        }
    }
}

/// Signature returned once a transaction has been sent
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxSignature(pub String);

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger confirmation level for reads and sends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    #[default]
    Processed,
    Confirmed,
    Finalized,
}

impl Commitment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Commitment::Processed => "processed",
            Commitment::Confirmed => "confirmed",
            Commitment::Finalized => "finalized",
        }
    }
}
