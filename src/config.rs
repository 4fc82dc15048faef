//! Startup configuration, loaded once and shared read-only afterwards.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, CONFIG_PATH_ENV, DEFAULT_PROGRAM_ID, DEFAULT_RPC_TIMEOUT_SECS,
};
use crate::error::ConfigError;
use crate::models::{Address, Commitment};
use crate::remote::signer::KeypairSigner;

/// Ledger cluster the client reads from and sends to
#[derive(Clone, Debug, PartialEq)]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    Localnet,
    Custom(String),
}

impl Cluster {
    pub fn url(&self) -> &str {
        match self {
            Cluster::Devnet => "https://api.devnet.solana.com",
            Cluster::Testnet => "https://api.testnet.solana.com",
            Cluster::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Cluster::Localnet => "http://127.0.0.1:8899",
            Cluster::Custom(url) => url,
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim() {
            "" | "devnet" => Ok(Cluster::Devnet),
            "testnet" => Ok(Cluster::Testnet),
            "mainnet" | "mainnet-beta" => Ok(Cluster::MainnetBeta),
            "localnet" | "localhost" => Ok(Cluster::Localnet),
            url if url.starts_with("http://") || url.starts_with("https://") => {
                Ok(Cluster::Custom(url.to_string()))
            }
            other => Err(ConfigError::InvalidCluster(other.to_string())),
        }
    }
}

/// Wallet section of the config file
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletFile {
    /// JSON-RPC endpoint of the wallet bridge; absent means no wallet capability
    pub bridge_url: Option<String>,
}

/// On-disk shape of the configuration file
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub cluster: String,
    pub program_id: String,
    pub base_account: Option<String>,
    pub base_account_keypair: Option<PathBuf>,
    pub commitment: Commitment,
    pub wallet: WalletFile,
    pub restore_input_on_failure: bool,
    pub rpc_timeout_secs: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        ConfigFile {
            cluster: String::from("devnet"),
            program_id: String::from(DEFAULT_PROGRAM_ID),
            base_account: None,
            base_account_keypair: None,
            commitment: Commitment::default(),
            wallet: WalletFile::default(),
            restore_input_on_failure: false,
            rpc_timeout_secs: DEFAULT_RPC_TIMEOUT_SECS,
        }
    }
}

/// Resolved, immutable configuration
#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub cluster: Cluster,
    pub program_id: Address,
    /// Handle of the shared account, if one can be derived
    pub base_account: Option<Address>,
    /// Fixed local co-signer for the one-time account creation
    pub base_signer: Option<Arc<KeypairSigner>>,
    pub commitment: Commitment,
    pub wallet_bridge_url: Option<String>,
    pub restore_input_on_failure: bool,
    pub rpc_timeout: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        // The default file has no keypair, so resolving it cannot touch the disk
        Self::resolve(ConfigFile::default(), Path::new(".")).unwrap_or_else(|_| PortalConfig {
            cluster: Cluster::Devnet,
            program_id: Address::new([0u8; 32]),
            base_account: None,
            base_signer: None,
            commitment: Commitment::default(),
            wallet_bridge_url: None,
            restore_input_on_failure: false,
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
        })
    }
}

impl PortalConfig {
    /// Default location: `$GIF_PORTAL_CONFIG` or `~/.gif-portal/config.yaml`
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            return PathBuf::from(path);
        }
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Load from the default location, falling back to defaults if absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::resolve(ConfigFile::default(), Path::new("."))?);
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: ConfigFile = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let config = Self::resolve(file, base_dir)?;
        tracing::info!(
            path = %path.display(),
            cluster = config.cluster.url(),
            base_account = ?config.base_account,
            wallet = config.wallet_bridge_url.is_some(),
            "Loaded config"
        );
        Ok(config)
    }

    /// Turn the file shape into validated values. Relative keypair paths are
    /// resolved against `base_dir`.
    pub fn resolve(file: ConfigFile, base_dir: &Path) -> Result<Self, ConfigError> {
        let cluster = Cluster::parse(&file.cluster)?;
        let program_id: Address = file.program_id.parse()?;

        let base_signer = match &file.base_account_keypair {
            Some(path) => {
                let path = expand_path(path, base_dir);
                Some(Arc::new(KeypairSigner::from_file(&path)?))
            }
            None => None,
        };

        let configured: Option<Address> = match &file.base_account {
            Some(s) => Some(s.parse()?),
            None => None,
        };

        let base_account = match (&base_signer, configured) {
            (Some(signer), Some(addr)) if signer.address() != addr => {
                tracing::warn!(
                    keypair = %signer.address(),
                    configured = %addr,
                    "base_account does not match keypair, using keypair"
                );
                Some(signer.address())
            }
            (Some(signer), _) => Some(signer.address()),
            (None, addr) => addr,
        };

        let wallet_bridge_url = file
            .wallet
            .bridge_url
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        Ok(PortalConfig {
            cluster,
            program_id,
            base_account,
            base_signer,
            commitment: file.commitment,
            wallet_bridge_url,
            restore_input_on_failure: file.restore_input_on_failure,
            rpc_timeout: Duration::from_secs(file.rpc_timeout_secs.max(1)),
        })
    }
}

/// Expand `~` and make relative paths relative to the config file
fn expand_path(path: &Path, base_dir: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path.is_relative() {
        base_dir.join(path)
    } else {
        path.to_path_buf()
    }
}
