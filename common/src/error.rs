use std::path::PathBuf;

use thiserror::Error;

/// Failures that stop a run before any network is touched, plus the I/O
/// faults of the files the run reads and appends to.
#[derive(Debug, Error)]
pub enum ScatterError {
    #[error("recipient source {0} not found")]
    MissingRecipientSource(PathBuf),

    #[error("deployment registry {0} not found, run the deployment first")]
    MissingRegistry(PathBuf),

    #[error("no valid recipient addresses found")]
    NoValidRecipients,

    #[error("token symbol must not be empty")]
    EmptySymbol,

    #[error("network configuration {0} not found, expected {{ \"targetNetworks\": [\"net1\", \"net2\"] }}")]
    MissingNetworkConfig(PathBuf),

    #[error("no target networks declared in {0}")]
    NoTargetNetworks(PathBuf),

    #[error("none of the target networks ({0}) has an RPC endpoint configured")]
    NoResolvableNetworks(String),

    #[error("PRIVATE_KEY is not set, it is required to sign transfers on each network")]
    MissingSigningKey,

    #[error("PRIVATE_KEY is not a valid secp256k1 key: {0}")]
    InvalidSigningKey(String),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("audit log {path} is not writable: {source}")]
    AuditLog {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
