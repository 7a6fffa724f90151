//! Input checks that must pass before any network is contacted.
//!
//! Each step fails with the [`ScatterError`] that aborts the run. [`prepare`]
//! chains them and records the failure as `FATAL_ERROR` before handing it back.

use ethers::signers::LocalWallet;
use rand::Rng;
use scatter_common::ScatterError;
use scatter_common::audit::{AuditLog, Tag};
use scatter_common::config::Config;
use scatter_common::network::{NetworkDirectory, ResolvedNetwork, TargetNetworks};
use scatter_common::recipients::RecipientSet;
use scatter_common::registry::DeploymentRegistry;
use tracing::error;

use crate::distributor::DistributionPlan;

/// Runs every check in order and builds the plan of the run.
///
/// `ask_symbol` is only called when `symbol` is `None`. Nothing here talks
/// to a network.
pub fn prepare<R, F>(
    cfg: &Config,
    directory: &NetworkDirectory,
    symbol: Option<String>,
    ask_symbol: F,
    signing_key: Option<&str>,
    rng: &mut R,
    log: &mut AuditLog,
) -> Result<(DistributionPlan, LocalWallet), ScatterError>
where
    R: Rng + ?Sized,
    F: FnOnce() -> std::io::Result<String>,
{
    match gather(cfg, directory, symbol, ask_symbol, signing_key, rng, log) {
        Ok(ready) => Ok(ready),
        Err(err) => {
            record_fatal(log, &err);
            Err(err)
        }
    }
}

fn gather<R, F>(
    cfg: &Config,
    directory: &NetworkDirectory,
    symbol: Option<String>,
    ask_symbol: F,
    signing_key: Option<&str>,
    rng: &mut R,
    log: &mut AuditLog,
) -> Result<(DistributionPlan, LocalWallet), ScatterError>
where
    R: Rng + ?Sized,
    F: FnOnce() -> std::io::Result<String>,
{
    let (registry, recipients) = load_inputs(cfg, rng)?;
    log.info(format!("starting token distribution to {} wallet(s)", recipients.len()))?;

    let symbol = match symbol {
        Some(symbol) => symbol,
        None => ask_symbol()?,
    };
    let symbol = check_symbol(&symbol)?;

    let networks = resolve_networks(cfg, directory)?;
    let wallet = signing_wallet(signing_key)?;

    let names: Vec<&str> = networks.iter().map(|n| n.name.as_str()).collect();
    log.info(format!("distributing {symbol} on networks: {}", names.join(", ")))?;

    let plan = DistributionPlan {
        symbol,
        recipients,
        registry,
        networks,
    };
    Ok((plan, wallet))
}

/// Writes `err` to the audit log as the reason the run stopped.
pub fn record_fatal(log: &mut AuditLog, err: &ScatterError) {
    if let Err(log_err) = log.record(Tag::FatalError, err.to_string()) {
        error!("{log_err}");
    }
}

/// Loads the deployment registry, then the recipient sample.
///
/// Unlike [`DeploymentRegistry::load`], a missing registry file is an error
/// here: there is nothing to distribute before the first deployment.
pub fn load_inputs<R>(
    cfg: &Config,
    rng: &mut R,
) -> Result<(DeploymentRegistry, RecipientSet), ScatterError>
where
    R: Rng + ?Sized,
{
    if !cfg.registry_path.exists() {
        return Err(ScatterError::MissingRegistry(cfg.registry_path.clone()));
    }

    let registry = DeploymentRegistry::load(&cfg.registry_path)?;
    let recipients = RecipientSet::load(&cfg.recipients_path, cfg.recipient_cap, rng)?;
    Ok((registry, recipients))
}

pub fn check_symbol(raw: &str) -> Result<String, ScatterError> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        return Err(ScatterError::EmptySymbol);
    }
    Ok(symbol.to_string())
}

/// Resolves the configured networks, requiring at least one to be reachable.
pub fn resolve_networks(
    cfg: &Config,
    directory: &NetworkDirectory,
) -> Result<Vec<ResolvedNetwork>, ScatterError> {
    let names = TargetNetworks::load(&cfg.networks_path)?;
    let resolved = directory.resolve_all(&names);

    if resolved.iter().all(|network| network.target.is_none()) {
        return Err(ScatterError::NoResolvableNetworks(names.join(", ")));
    }
    Ok(resolved)
}

pub fn signing_wallet(raw: Option<&str>) -> Result<LocalWallet, ScatterError> {
    let raw = raw
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(ScatterError::MissingSigningKey)?;

    raw.parse::<LocalWallet>()
        .map_err(|e| ScatterError::InvalidSigningKey(e.to_string()))
}
