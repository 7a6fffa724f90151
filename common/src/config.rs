use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Largest number of recipients paid in one run.
pub const RECIPIENT_CAP: usize = 250;
/// Whole-token amount bounds drawn for each transfer.
pub const AMOUNT_RANGE: RangeInclusive<u64> = 100..=10_000;
/// Pause between consecutive transfers on one network.
pub const TRANSFER_DELAY: Duration = Duration::from_secs(2);

pub const REGISTRY_FILE: &str = "deployed_tokens.json";
pub const RECIPIENTS_FILE: &str = "address.txt";
pub const NETWORKS_FILE: &str = "deploy_config.json";
pub const AUDIT_LOG_FILE: &str = "transfers.log";

/// Environment variable holding the signing key.
pub const SIGNING_KEY_VAR: &str = "PRIVATE_KEY";

#[derive(Debug, Clone)]
pub struct Config {
    pub registry_path: PathBuf,
    pub recipients_path: PathBuf,
    pub networks_path: PathBuf,
    pub audit_log_path: PathBuf,
    pub recipient_cap: usize,
    pub amount_range: RangeInclusive<u64>,
    pub transfer_delay: Duration,
    /// Blocks to wait for after submission. Zero records a transfer as soon
    /// as the endpoint accepts it.
    pub confirmations: usize,
    /// Fixed seed for sampling and amounts; `None` draws from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry_path: PathBuf::from(REGISTRY_FILE),
            recipients_path: PathBuf::from(RECIPIENTS_FILE),
            networks_path: PathBuf::from(NETWORKS_FILE),
            audit_log_path: PathBuf::from(AUDIT_LOG_FILE),
            recipient_cap: RECIPIENT_CAP,
            amount_range: AMOUNT_RANGE,
            transfer_delay: TRANSFER_DELAY,
            confirmations: 0,
            seed: None,
        }
    }
}
