use std::path::Path;
use std::sync::atomic::Ordering;
use std::time::Duration;

use ethers::types::{Address, U256};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scatter_common::audit::{AuditEntry, AuditLog, Tag, read_entries};
use scatter_common::network::{NetworkTarget, ResolvedNetwork};
use scatter_common::recipients::RecipientSet;
use scatter_common::registry::DeploymentRegistry;
use scatter_core::amount::{AmountPicker, to_base_units};
use scatter_core::distributor::{
    DistributionPlan, Distributor, NetworkOutcome, RunReport, SkipReason, Tally,
};
use scatter_core::pacing::{FixedDelay, Pacer};

use super::mock::{CountingPacer, DECIMALS, MockConnector, chain};

const TOKEN: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";

const RECIPIENTS: [&str; 3] = [
    "0x00000000000000000000000000000000000000a1",
    "0x00000000000000000000000000000000000000a2",
    "0x00000000000000000000000000000000000000a3",
];

fn recipient(idx: usize) -> Address {
    RECIPIENTS[idx].parse().unwrap()
}

fn resolved(name: &str) -> ResolvedNetwork {
    ResolvedNetwork {
        name: name.to_string(),
        target: Some(NetworkTarget {
            name: name.to_string(),
            rpc_url: format!("http://{name}.invalid"),
            chain_id: Some(1),
        }),
    }
}

fn unresolved(name: &str) -> ResolvedNetwork {
    ResolvedNetwork {
        name: name.to_string(),
        target: None,
    }
}

/// Registry holding a healthy DEMO deployment on each of `networks`.
fn registry_on(networks: &[&str]) -> DeploymentRegistry {
    let entries: Vec<String> = networks
        .iter()
        .map(|n| format!(r#""{n}": {{ "DEMO": {{ "name": "Demo", "address": "{TOKEN}", "decimals": 18 }} }}"#))
        .collect();
    DeploymentRegistry::from_json(&format!("{{ {} }}", entries.join(", "))).unwrap()
}

fn plan(registry: DeploymentRegistry, networks: Vec<ResolvedNetwork>) -> DistributionPlan {
    let mut rng = StdRng::seed_from_u64(0);
    DistributionPlan {
        symbol: "DEMO".to_string(),
        recipients: RecipientSet::build(RECIPIENTS, 250, &mut rng).unwrap(),
        registry,
        networks,
    }
}

async fn run(
    connector: MockConnector,
    amounts: AmountPicker,
    plan: &DistributionPlan,
    log_path: &Path,
) -> RunReport {
    let pacer = Box::new(FixedDelay::new(Duration::ZERO));
    run_paced(connector, amounts, pacer, plan, log_path).await
}

async fn run_paced(
    connector: MockConnector,
    amounts: AmountPicker,
    pacer: Box<dyn Pacer>,
    plan: &DistributionPlan,
    log_path: &Path,
) -> RunReport {
    let mut log = AuditLog::open(log_path).unwrap();
    let mut distributor = Distributor::new(Box::new(connector))
        .with_pacer(pacer)
        .with_amounts(amounts)
        .with_seed(42);
    distributor.run(plan, &mut log).await.unwrap()
}

fn count(entries: &[AuditEntry], tag: Tag) -> usize {
    entries.iter().filter(|e| e.tag == tag).count()
}

fn sending_lines(entries: &[AuditEntry], network: &str) -> usize {
    let prefix = format!("[{network}] sending ");
    entries
        .iter()
        .filter(|e| e.tag == Tag::Info && e.message.starts_with(&prefix))
        .count()
}

#[tokio::test]
async fn every_recipient_is_paid_once() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let base = chain(1_000_000);

    let plan = plan(registry_on(&["base"]), vec![resolved("base")]);
    let connector = MockConnector::default().with_chain("base", base.clone());
    let report = run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    assert_eq!(
        report.outcome("base"),
        Some(&NetworkOutcome::Completed(Tally { succeeded: 3, failed: 0 }))
    );

    let state = base.lock().unwrap();
    let paid: Vec<Address> = state.transfers.iter().map(|(to, _)| *to).collect();
    assert_eq!(paid, vec![recipient(0), recipient(1), recipient(2)]);

    let low = to_base_units(100, DECIMALS).unwrap();
    let high = to_base_units(10_000, DECIMALS).unwrap();
    assert!(state.transfers.iter().all(|(_, amount)| *amount >= low && *amount <= high));

    let entries = read_entries(&log_path).unwrap();
    assert_eq!(sending_lines(&entries, "base"), 3);
    assert_eq!(count(&entries, Tag::Success), 3);
    assert!(entries.iter().all(|e| !e.tag.is_error()));
    assert!(entries.last().unwrap().message.contains("finished distribution on base"));
}

#[tokio::test]
async fn zero_token_balance_skips_network() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let base = chain(0);

    let plan = plan(registry_on(&["base"]), vec![resolved("base")]);
    let connector = MockConnector::default().with_chain("base", base.clone());
    let report = run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    assert_eq!(
        report.outcome("base"),
        Some(&NetworkOutcome::Skipped(SkipReason::ZeroTokenBalance))
    );
    assert!(base.lock().unwrap().transfers.is_empty());

    let entries = read_entries(&log_path).unwrap();
    assert_eq!(count(&entries, Tag::Warning), 1);
    assert_eq!(sending_lines(&entries, "base"), 0);
}

#[tokio::test]
async fn failed_deployment_is_never_contacted() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let mode = chain(1_000_000);

    let registry = DeploymentRegistry::from_json(
        r#"{ "mode": { "DEMO": { "name": "Demo", "error": "insufficient funds for gas" } } }"#,
    )
    .unwrap();
    let plan = plan(registry, vec![resolved("mode")]);
    let connector = MockConnector::default().with_chain("mode", mode.clone());
    let report = run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    assert_eq!(
        report.outcome("mode"),
        Some(&NetworkOutcome::Skipped(SkipReason::FailedDeployment))
    );
    assert_eq!(mode.lock().unwrap().connects, 0);

    let entries = read_entries(&log_path).unwrap();
    let warnings: Vec<&AuditEntry> = entries.iter().filter(|e| e.tag == Tag::Warning).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("insufficient funds for gas"));
}

#[tokio::test]
async fn exhausted_balance_halts_only_that_network() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let base = chain(150);
    let ink = chain(1_000_000);

    let plan = plan(registry_on(&["base", "ink"]), vec![resolved("base"), resolved("ink")]);
    let connector = MockConnector::default()
        .with_chain("base", base.clone())
        .with_chain("ink", ink.clone());
    let report = run(connector, AmountPicker::new(100..=100), &plan, &log_path).await;

    assert_eq!(
        report.outcome("base"),
        Some(&NetworkOutcome::Halted(Tally { succeeded: 1, failed: 0 }))
    );
    assert_eq!(
        report.outcome("ink"),
        Some(&NetworkOutcome::Completed(Tally { succeeded: 3, failed: 0 }))
    );
    assert_eq!(base.lock().unwrap().transfers.len(), 1);
    assert_eq!(base.lock().unwrap().token_balance, to_base_units(50, DECIMALS).unwrap());
    assert_eq!(ink.lock().unwrap().transfers.len(), 3);

    let entries = read_entries(&log_path).unwrap();
    assert_eq!(count(&entries, Tag::Error), 1);
    assert_eq!(sending_lines(&entries, "base"), 2);
    assert_eq!(report.totals(), Tally { succeeded: 4, failed: 0 });
}

#[tokio::test]
async fn failed_transfer_does_not_block_the_next_recipient() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let base = chain(1_000_000);
    base.lock().unwrap().failing.insert(recipient(1));

    let plan = plan(registry_on(&["base"]), vec![resolved("base")]);
    let connector = MockConnector::default().with_chain("base", base.clone());
    let report = run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    assert_eq!(
        report.outcome("base"),
        Some(&NetworkOutcome::Completed(Tally { succeeded: 2, failed: 1 }))
    );

    let paid: Vec<Address> = base.lock().unwrap().transfers.iter().map(|(to, _)| *to).collect();
    assert_eq!(paid, vec![recipient(0), recipient(2)]);

    let entries = read_entries(&log_path).unwrap();
    let failures: Vec<&AuditEntry> = entries.iter().filter(|e| e.tag == Tag::ErrorTransfer).collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("execution reverted"));
    assert_eq!(count(&entries, Tag::Success), 2);
}

#[tokio::test]
async fn unresolved_and_unreachable_networks_are_passed_over() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let optimism = chain(1_000_000);
    optimism.lock().unwrap().refuse_connect = true;
    let ink = chain(1_000_000);

    let plan = plan(
        registry_on(&["mode", "optimism", "ink"]),
        vec![unresolved("mode"), resolved("optimism"), resolved("ink")],
    );
    let connector = MockConnector::default()
        .with_chain("optimism", optimism.clone())
        .with_chain("ink", ink.clone());
    let report = run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    assert_eq!(
        report.outcome("mode"),
        Some(&NetworkOutcome::Skipped(SkipReason::NoEndpoint))
    );
    assert!(matches!(
        report.outcome("optimism"),
        Some(NetworkOutcome::Abandoned { tally, .. }) if tally.attempted() == 0
    ));
    assert_eq!(
        report.outcome("ink"),
        Some(&NetworkOutcome::Completed(Tally { succeeded: 3, failed: 0 }))
    );
    assert_eq!(optimism.lock().unwrap().connects, 1);

    let entries = read_entries(&log_path).unwrap();
    assert_eq!(count(&entries, Tag::ErrorNetworkInteraction), 1);
    assert_eq!(sending_lines(&entries, "ink"), 3);
    assert!(entries.last().unwrap().message.contains("finished distribution on ink"));
}

#[tokio::test]
async fn run_appends_to_an_existing_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    std::fs::write(&log_path, "2026-01-01T00:00:00.000Z - INFO: earlier run\n").unwrap();

    let plan = plan(registry_on(&["base"]), vec![resolved("base")]);
    let connector = MockConnector::default().with_chain("base", chain(1_000_000));
    run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    let entries = read_entries(&log_path).unwrap();
    assert_eq!(entries[0].message, "earlier run");
    assert!(entries.len() > 1);
}

#[tokio::test]
async fn zero_native_balance_only_warns() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let base = chain(1_000_000);
    base.lock().unwrap().native_balance = U256::zero();

    let plan = plan(registry_on(&["base"]), vec![resolved("base")]);
    let connector = MockConnector::default().with_chain("base", base.clone());
    let report = run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    assert_eq!(
        report.outcome("base"),
        Some(&NetworkOutcome::Completed(Tally { succeeded: 3, failed: 0 }))
    );

    let entries = read_entries(&log_path).unwrap();
    let warnings: Vec<&AuditEntry> = entries.iter().filter(|e| e.tag == Tag::Warning).collect();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("no native balance"));
    assert_eq!(count(&entries, Tag::Success), 3);
}

#[tokio::test]
async fn pause_follows_every_attempt_but_the_last() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let base = chain(1_000_000);
    base.lock().unwrap().failing.insert(recipient(0));
    let pacer = CountingPacer::default();

    let plan = plan(registry_on(&["base"]), vec![resolved("base")]);
    let connector = MockConnector::default().with_chain("base", base.clone());
    let amounts = AmountPicker::new(100..=10_000);
    let report = run_paced(connector, amounts, Box::new(pacer.clone()), &plan, &log_path).await;

    assert_eq!(
        report.outcome("base"),
        Some(&NetworkOutcome::Completed(Tally { succeeded: 2, failed: 1 }))
    );
    assert_eq!(pacer.calls.load(Ordering::SeqCst), RECIPIENTS.len() - 1);
}

#[tokio::test]
async fn failed_balance_read_costs_one_recipient() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    let base = chain(1_000_000);
    // Read 1 is the opening balance, read 2 the check before the first recipient.
    base.lock().unwrap().failing_balance_read = Some(2);

    let plan = plan(registry_on(&["base"]), vec![resolved("base")]);
    let connector = MockConnector::default().with_chain("base", base.clone());
    let report = run(connector, AmountPicker::new(100..=10_000), &plan, &log_path).await;

    assert_eq!(
        report.outcome("base"),
        Some(&NetworkOutcome::Completed(Tally { succeeded: 2, failed: 1 }))
    );

    let paid: Vec<Address> = base.lock().unwrap().transfers.iter().map(|(to, _)| *to).collect();
    assert_eq!(paid, vec![recipient(1), recipient(2)]);

    let entries = read_entries(&log_path).unwrap();
    let failures: Vec<&AuditEntry> = entries.iter().filter(|e| e.tag == Tag::ErrorTransfer).collect();
    assert_eq!(failures.len(), 1);
    assert!(failures[0].message.contains("balanceOf timed out"));
    assert_eq!(count(&entries, Tag::ErrorNetworkInteraction), 0);
}

#[tokio::test]
async fn oversized_amount_abandons_the_network() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("transfers.log");
    // 100 * 10^77 does not fit in 256 bits.
    let base = chain(1_000_000);
    base.lock().unwrap().decimals = 77;
    let ink = chain(1_000_000);

    let plan = plan(registry_on(&["base", "ink"]), vec![resolved("base"), resolved("ink")]);
    let connector = MockConnector::default()
        .with_chain("base", base.clone())
        .with_chain("ink", ink.clone());
    let report = run(connector, AmountPicker::new(100..=100), &plan, &log_path).await;

    assert!(matches!(
        report.outcome("base"),
        Some(NetworkOutcome::Abandoned { tally, reason })
            if tally.attempted() == 0 && reason.contains("overflows")
    ));
    assert!(base.lock().unwrap().transfers.is_empty());
    assert_eq!(ink.lock().unwrap().transfers.len(), 3);

    let entries = read_entries(&log_path).unwrap();
    assert_eq!(count(&entries, Tag::ErrorNetworkInteraction), 1);
    assert_eq!(sending_lines(&entries, "base"), 0);
}
