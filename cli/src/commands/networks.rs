use colored::*;
use scatter_common::config::Config;
use scatter_common::network::{NetworkDirectory, TargetNetworks};

use crate::terminal::print;

pub fn networks(cfg: &Config) -> anyhow::Result<()> {
    let names = TargetNetworks::load(&cfg.networks_path)?;
    let resolved = NetworkDirectory::from_env().resolve_all(&names);

    print::set_key_width(resolved.iter().map(|n| n.name.as_str()));
    for network in &resolved {
        match &network.target {
            Some(target) => {
                let chain: String = target
                    .chain_id
                    .map(|id| format!(" (chain {id})"))
                    .unwrap_or_default();
                print::aligned_line(&network.name, format!("{}{}", target.rpc_url, chain));
            }
            None => print::aligned_line(&network.name, "unresolved, set its RPC URL".red()),
        }
    }

    let reachable = resolved.iter().filter(|n| n.target.is_some()).count();
    print::fat_separator();
    print::print_status(format!("{reachable} of {} network(s) resolved", resolved.len()));
    Ok(())
}
