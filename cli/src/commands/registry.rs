use scatter_common::config::Config;
use scatter_common::registry::DeploymentRegistry;

use crate::mprint;
use crate::terminal::{format, print};

pub fn registry(symbol: Option<&str>, cfg: &Config) -> anyhow::Result<()> {
    let registry = DeploymentRegistry::load(&cfg.registry_path)?;

    let records: Vec<_> = registry
        .records()
        .filter(|(_, token, _)| symbol.is_none_or(|wanted| wanted == *token))
        .collect();

    if records.is_empty() {
        print::no_results("deployment records");
        return Ok(());
    }

    for (idx, (network, token, record)) in records.iter().enumerate() {
        print::tree_head(idx, &format!("{network} / {token}"));
        print::as_tree_one_level(format::record_to_details(record));
        if idx + 1 != records.len() {
            mprint!();
        }
    }
    Ok(())
}
