//! # Deployment Registry
//!
//! Read-only view of `deployed_tokens.json`, the file the deployment process
//! writes after issuing a token on each network:
//!
//! ```json
//! { "base": { "DEMO": { "name": "Demo", "address": "0x...", "decimals": 18 } } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use ethers::types::{Address, H256};
use serde::Deserialize;

use crate::error::ScatterError;

/// Outcome of the optional explorer verification step of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "VerificationRepr")]
pub enum Verification {
    Verified,
    NotVerified,
    SkippedNoConfig,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum VerificationRepr {
    Flag(bool),
    Label(String),
}

impl TryFrom<VerificationRepr> for Verification {
    type Error = String;

    fn try_from(repr: VerificationRepr) -> Result<Self, Self::Error> {
        match repr {
            VerificationRepr::Flag(true) => Ok(Verification::Verified),
            VerificationRepr::Flag(false) => Ok(Verification::NotVerified),
            VerificationRepr::Label(label) => match label.as_str() {
                "verified" => Ok(Verification::Verified),
                "not-verified" | "not_verified" => Ok(Verification::NotVerified),
                "skipped_no_config" | "skipped-no-config" => Ok(Verification::SkippedNoConfig),
                other => Err(format!("unknown verification status: {other}")),
            },
        }
    }
}

impl fmt::Display for Verification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verification::Verified => "verified",
            Verification::NotVerified => "not-verified",
            Verification::SkippedNoConfig => "skipped-no-config",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub name: String,
    #[serde(default)]
    pub address: Option<Address>,
    #[serde(default)]
    pub total_supply: Option<String>,
    #[serde(default)]
    pub decimals: Option<u8>,
    #[serde(default)]
    pub deployed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub deployer: Option<Address>,
    #[serde(default)]
    pub tx_hash: Option<H256>,
    #[serde(default)]
    pub verified: Option<Verification>,
    #[serde(default)]
    pub verification_error: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl DeploymentRecord {
    /// Contract address of a deployment that can fund transfers.
    pub fn usable_address(&self) -> Option<Address> {
        match (&self.error, self.address) {
            (None, Some(address)) => Some(address),
            _ => None,
        }
    }
}

/// Result of looking a `(network, symbol)` pair up in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    NoNetwork,
    NoToken,
    Failed { record: &'a DeploymentRecord },
    Ready { address: Address, record: &'a DeploymentRecord },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct DeploymentRegistry {
    networks: BTreeMap<String, BTreeMap<String, DeploymentRecord>>,
}

impl DeploymentRegistry {
    /// Loads the registry at `path`. A missing file is an empty registry.
    pub fn load(path: &Path) -> Result<Self, ScatterError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw).map_err(|source| ScatterError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn lookup(&self, network: &str, symbol: &str) -> Lookup<'_> {
        let Some(tokens) = self.networks.get(network) else {
            return Lookup::NoNetwork;
        };
        let Some(record) = tokens.get(symbol) else {
            return Lookup::NoToken;
        };
        match record.usable_address() {
            Some(address) => Lookup::Ready { address, record },
            None => Lookup::Failed { record },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }

    /// Every `(network, symbol, record)` triple in key order.
    pub fn records(&self) -> impl Iterator<Item = (&str, &str, &DeploymentRecord)> {
        self.networks.iter().flat_map(|(network, tokens)| {
            tokens
                .iter()
                .map(move |(symbol, record)| (network.as_str(), symbol.as_str(), record))
        })
    }
}
