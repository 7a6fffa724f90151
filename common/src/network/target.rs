//! # Target Networks
//!
//! The run's network list comes from `deploy_config.json`, the same file the
//! deployment process reads:
//!
//! ```json
//! { "targetNetworks": ["base", "optimism", "ink"] }
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::error::ScatterError;

/// Connection parameters of one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkTarget {
    pub name: String,
    pub rpc_url: String,
    /// Pinned chain id. Queried from the endpoint when absent.
    pub chain_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetNetworks {
    #[serde(default)]
    target_networks: Vec<String>,
}

impl TargetNetworks {
    /// Reads the declared network names in file order, trimmed, blanks dropped.
    pub fn load(path: &Path) -> Result<Vec<String>, ScatterError> {
        if !path.exists() {
            return Err(ScatterError::MissingNetworkConfig(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        let names = Self::from_json(&raw)
            .map_err(|source| ScatterError::Parse {
                path: path.to_path_buf(),
                source,
            })?
            .names();

        if names.is_empty() {
            return Err(ScatterError::NoTargetNetworks(path.to_path_buf()));
        }
        Ok(names)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn names(self) -> Vec<String> {
        self.target_networks
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}
