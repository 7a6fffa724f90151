//! # Network Directory
//!
//! Static table of the networks this tool knows how to reach. Endpoints are
//! not stored in any file; each network reads its RPC URL from its own
//! environment variable (usually through `.env`).

use std::collections::BTreeMap;

use super::target::NetworkTarget;

/// `(network name, RPC URL variable, default URL)`
pub const KNOWN_NETWORKS: &[(&str, &str, Option<&str>)] = &[
    ("base", "BASE_RPC_URL", None),
    ("optimism", "OPTIMISM_RPC_URL", None),
    ("mode", "MODE_RPC_URL", None),
    ("unichain", "UNICHAIN_RPC_URL", None),
    ("soneium", "SONEIUM_RPC_URL", None),
    ("ink", "INK_RPC_URL", None),
    ("lisk", "LISK_RPC_URL", None),
    ("localhost", "LOCALHOST_RPC_URL", Some("http://127.0.0.1:8545")),
];

/// A declared network paired with its connection parameters, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedNetwork {
    pub name: String,
    pub target: Option<NetworkTarget>,
}

#[derive(Debug, Clone, Default)]
pub struct NetworkDirectory {
    known: BTreeMap<String, NetworkTarget>,
}

impl NetworkDirectory {
    pub fn from_env() -> Self {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds the directory by asking `lookup` for each network's variables.
    ///
    /// Networks whose endpoint is missing or blank are left out.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut known = BTreeMap::new();

        for &(name, url_var, default_url) in KNOWN_NETWORKS {
            let rpc_url = lookup(url_var)
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .or_else(|| default_url.map(str::to_string));

            let Some(rpc_url) = rpc_url else {
                continue;
            };

            let chain_id = lookup(&chain_id_var(name)).and_then(|id| id.trim().parse().ok());
            let target = NetworkTarget {
                name: name.to_string(),
                rpc_url,
                chain_id,
            };
            known.insert(name.to_string(), target);
        }

        Self { known }
    }

    pub fn with_target(mut self, target: NetworkTarget) -> Self {
        self.known.insert(target.name.clone(), target);
        self
    }

    pub fn resolve(&self, name: &str) -> Option<&NetworkTarget> {
        self.known.get(name)
    }

    /// Resolves every declared name, keeping declaration order.
    pub fn resolve_all(&self, names: &[String]) -> Vec<ResolvedNetwork> {
        names
            .iter()
            .map(|name| ResolvedNetwork {
                name: name.clone(),
                target: self.resolve(name).cloned(),
            })
            .collect()
    }
}

fn chain_id_var(name: &str) -> String {
    format!("{}_CHAIN_ID", name.to_ascii_uppercase())
}
