use std::time::{Duration, Instant};

use colored::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use scatter_common::audit::AuditLog;
use scatter_common::config::{Config, SIGNING_KEY_VAR};
use scatter_common::network::NetworkDirectory;
use scatter_common::success;
use scatter_core::distributor::{DistributionPlan, Distributor, Progress, RunReport};
use scatter_core::ledger::EvmConnector;
use scatter_core::preflight;

use crate::mprint;
use crate::terminal::{colors, format, print, prompt, spinner};

pub async fn distribute(symbol: Option<String>, cfg: &Config) -> anyhow::Result<()> {
    let mut log = AuditLog::open(&cfg.audit_log_path)?;
    let mut rng = match cfg.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let key = std::env::var(SIGNING_KEY_VAR).ok();
    let (plan, wallet) = preflight::prepare(
        cfg,
        &NetworkDirectory::from_env(),
        symbol,
        prompt::ask_symbol,
        key.as_deref(),
        &mut rng,
        &mut log,
    )?;

    let connector = EvmConnector::new(wallet, cfg.confirmations);
    print_plan(&plan, &connector, cfg);

    spinner::start("Connecting to the first network...");
    let mut distributor = Distributor::from_config(Box::new(connector), cfg).on_progress(
        Box::new(|progress: Progress<'_>| {
            spinner::report_transfer_progress(progress.network, progress.done, progress.total)
        }),
    );

    let start_time: Instant = Instant::now();
    let result = distributor.run(&plan, &mut log).await;
    spinner::finish();

    match result {
        Ok(report) => {
            print_report(&report, start_time.elapsed(), &log);
            Ok(())
        }
        Err(err) => {
            preflight::record_fatal(&mut log, &err);
            Err(err.into())
        }
    }
}

fn print_plan(plan: &DistributionPlan, connector: &EvmConnector, cfg: &Config) {
    let delay: Duration = cfg.transfer_delay;
    let criterion: String = match cfg.confirmations {
        0 => "submitted".to_string(),
        n => format!("{n} confirmation(s)"),
    };

    print::set_key_width(["Token", "Signer", "Recipients", "Networks", "Pacing", "Counts as"]);
    print::aligned_line("Token", plan.symbol.as_str().color(colors::ACCENT));
    print::aligned_line("Signer", format::address(&connector.signer_address()));
    print::aligned_line("Recipients", plan.recipients.len().to_string());
    print::aligned_line("Networks", plan.networks.len().to_string());
    print::aligned_line("Pacing", format!("{:.1}s between transfers", delay.as_secs_f64()));
    print::aligned_line("Counts as", criterion);
}

fn print_report(report: &RunReport, total_time: Duration, log: &AuditLog) {
    print::header("distribution report");

    for (idx, network) in report.networks.iter().enumerate() {
        print::tree_head(idx, &network.network);
        print::as_tree_one_level(format::outcome_to_details(&network.outcome));
        if idx + 1 != report.networks.len() {
            mprint!();
        }
    }

    let totals = report.totals();
    let sent: ColoredString = format!("{} transfers sent", totals.succeeded).bold().green();
    let failed: ColoredString = format!("{} failed", totals.failed).bold().red();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Distribution Complete: {sent}, {failed} in {total_time}");

    print::fat_separator();
    print::centerln(&output);
    success!("audit trail appended to {}", log.path().display());
}
