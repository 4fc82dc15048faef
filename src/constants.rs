//! Application constants
//!
//! Centralized location for well-known addresses and configuration defaults.

/// Program that owns the shared GIF account (buildspace gif-portal deployment)
pub const DEFAULT_PROGRAM_ID: &str = "CjxPTLChmSrMgLHCxKNpRpuz5cJFMP6RcXyyzMVGnx6Q";

/// System program, required when the base account is created
pub const SYSTEM_PROGRAM_ID: &str = "11111111111111111111111111111111";

/// Default JSON-RPC timeout for ledger requests, in seconds
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "GIF_PORTAL_CONFIG";

/// Directory (under $HOME) holding the configuration file
pub const CONFIG_DIR_NAME: &str = ".gif-portal";

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Log file written next to the working directory
pub const LOG_FILE_NAME: &str = "gif-portal.log";

/// Maximum number of activity log entries kept in memory
pub const MAX_ACTIVITY: usize = 100;

/// Application name
pub const APP_NAME: &str = "GIF Portal";
