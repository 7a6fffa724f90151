use colored::*;
use ethers::types::Address;
use ethers::utils::to_checksum;
use scatter_common::registry::{DeploymentRecord, Verification};
use scatter_core::distributor::{NetworkOutcome, SkipReason};

use crate::terminal::colors;

pub type Detail = (String, ColoredString);

pub fn address(addr: &Address) -> ColoredString {
    to_checksum(addr, None).color(colors::ADDRESS)
}

pub fn skip_reason(reason: SkipReason) -> &'static str {
    match reason {
        SkipReason::NoEndpoint => "no RPC endpoint",
        SkipReason::NoDeployment => "nothing deployed on this network",
        SkipReason::NoToken => "token not deployed here",
        SkipReason::FailedDeployment => "failed deployment",
        SkipReason::ZeroTokenBalance => "signer holds no tokens",
    }
}

pub fn outcome_to_details(outcome: &NetworkOutcome) -> Vec<Detail> {
    let status: ColoredString = match outcome {
        NetworkOutcome::Skipped(reason) => format!("skipped, {}", skip_reason(*reason)).yellow(),
        NetworkOutcome::Completed(_) => "completed".green().bold(),
        NetworkOutcome::Halted(_) => "halted, balance exhausted".yellow().bold(),
        NetworkOutcome::Abandoned { reason, .. } => format!("abandoned, {reason}").red(),
    };

    let mut details: Vec<Detail> = vec![("Status".to_string(), status)];

    if !matches!(outcome, NetworkOutcome::Skipped(_)) {
        let tally = outcome.tally();
        details.push(("Sent".to_string(), tally.succeeded.to_string().green()));
        let failed = tally.failed.to_string();
        let failed = if tally.failed > 0 { failed.red() } else { failed.normal() };
        details.push(("Failed".to_string(), failed));
    }

    details
}

pub fn record_to_details(record: &DeploymentRecord) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![("Name".to_string(), record.name.normal())];

    if let Some(addr) = &record.address {
        details.push(("Address".to_string(), address(addr)));
    }
    if let Some(error) = &record.error {
        details.push(("Error".to_string(), error.red()));
    }
    if let Some(decimals) = record.decimals {
        details.push(("Decimals".to_string(), decimals.to_string().normal()));
    }
    if let Some(supply) = &record.total_supply {
        details.push(("Supply".to_string(), supply.normal()));
    }
    if let Some(deployed_at) = &record.deployed_at {
        details.push(("Deployed".to_string(), deployed_at.to_rfc3339().normal()));
    }
    if let Some(deployer) = &record.deployer {
        details.push(("Deployer".to_string(), address(deployer)));
    }
    if let Some(tx_hash) = &record.tx_hash {
        details.push(("Tx".to_string(), format!("{tx_hash:#x}").color(colors::HASH)));
    }
    if let Some(verified) = record.verified {
        details.push(("Verified".to_string(), verification(verified, record.verification_error.as_deref())));
    }

    details
}

fn verification(status: Verification, error: Option<&str>) -> ColoredString {
    match (status, error) {
        (Verification::Verified, _) => status.to_string().green(),
        (Verification::NotVerified, Some(error)) => format!("{status} ({error})").red(),
        (Verification::NotVerified, None) => status.to_string().red(),
        (Verification::SkippedNoConfig, _) => status.to_string().yellow(),
    }
}
