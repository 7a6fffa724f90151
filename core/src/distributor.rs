//! # Distributor
//!
//! The control loop of a run. Networks are visited one after another in the
//! configured order; within a network, recipients are paid one after another
//! with a single transfer in flight at a time.
//!
//! Failures never escape their scope:
//! * a missing endpoint, registry entry or token balance skips the network,
//! * a balance that runs out mid-loop stops the network,
//! * a failed transfer costs only its recipient,
//! * a failed connection or setup query abandons the network.
//!
//! The only error [`Distributor::run`] returns is a failure to write the
//! audit log, since the run would otherwise leave no record.

use ethers::types::{Address, U256};
use ethers::utils::{format_ether, to_checksum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use scatter_common::ScatterError;
use scatter_common::audit::{AuditLog, Tag};
use scatter_common::config::{AMOUNT_RANGE, Config, TRANSFER_DELAY};
use scatter_common::network::{NetworkTarget, ResolvedNetwork};
use scatter_common::recipients::RecipientSet;
use scatter_common::registry::{DeploymentRegistry, Lookup};

use crate::amount::{AmountPicker, display_units, to_base_units};
use crate::ledger::{Ledger, LedgerConnector, TransferReceipt};
use crate::pacing::{self, FixedDelay, Pacer};

/// Everything a run needs, fixed before the first network is touched.
#[derive(Debug, Clone)]
pub struct DistributionPlan {
    pub symbol: String,
    pub recipients: RecipientSet,
    pub registry: DeploymentRegistry,
    pub networks: Vec<ResolvedNetwork>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoEndpoint,
    NoDeployment,
    NoToken,
    FailedDeployment,
    ZeroTokenBalance,
}

/// Transfer counters of one network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
}

impl Tally {
    pub fn attempted(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkOutcome {
    Skipped(SkipReason),
    /// Every recipient was attempted.
    Completed(Tally),
    /// The signer ran out of tokens before the last recipient.
    Halted(Tally),
    /// Setup or a network-level query failed.
    Abandoned { tally: Tally, reason: String },
}

impl NetworkOutcome {
    pub fn tally(&self) -> Tally {
        match self {
            Self::Skipped(_) => Tally::default(),
            Self::Completed(tally) | Self::Halted(tally) => *tally,
            Self::Abandoned { tally, .. } => *tally,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkReport {
    pub network: String,
    pub outcome: NetworkOutcome,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub networks: Vec<NetworkReport>,
}

impl RunReport {
    pub fn totals(&self) -> Tally {
        self.networks.iter().fold(Tally::default(), |acc, report| {
            let tally = report.outcome.tally();
            Tally {
                succeeded: acc.succeeded + tally.succeeded,
                failed: acc.failed + tally.failed,
            }
        })
    }

    pub fn outcome(&self, network: &str) -> Option<&NetworkOutcome> {
        self.networks
            .iter()
            .find(|report| report.network == network)
            .map(|report| &report.outcome)
    }
}

/// Position of the recipient loop, handed to the progress hook after each recipient.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    pub network: &'a str,
    pub done: usize,
    pub total: usize,
}

pub type ProgressHook = Box<dyn Fn(Progress<'_>) + Send + Sync>;

macro_rules! or_abandon {
    ($log:expr, $network:expr, $tally:expr, $call:expr) => {
        match $call {
            Ok(value) => value,
            Err(err) => return abandon($log, $network, $tally, err.to_string()),
        }
    };
}

pub struct Distributor {
    connector: Box<dyn LedgerConnector>,
    pacer: Box<dyn Pacer>,
    amounts: AmountPicker,
    rng: StdRng,
    on_progress: Option<ProgressHook>,
}

impl Distributor {
    pub fn new(connector: Box<dyn LedgerConnector>) -> Self {
        Self {
            connector,
            pacer: Box::new(FixedDelay::new(TRANSFER_DELAY)),
            amounts: AmountPicker::new(AMOUNT_RANGE),
            rng: StdRng::from_os_rng(),
            on_progress: None,
        }
    }

    pub fn from_config(connector: Box<dyn LedgerConnector>, cfg: &Config) -> Self {
        let distributor = Self::new(connector)
            .with_pacer(Box::new(FixedDelay::new(cfg.transfer_delay)))
            .with_amounts(AmountPicker::new(cfg.amount_range.clone()));
        match cfg.seed {
            Some(seed) => distributor.with_seed(seed),
            None => distributor,
        }
    }

    pub fn with_pacer(mut self, pacer: Box<dyn Pacer>) -> Self {
        self.pacer = pacer;
        self
    }

    pub fn with_amounts(mut self, amounts: AmountPicker) -> Self {
        self.amounts = amounts;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn on_progress(mut self, hook: ProgressHook) -> Self {
        self.on_progress = Some(hook);
        self
    }

    /// Runs the plan against every network and reports what happened on each.
    pub async fn run(
        &mut self,
        plan: &DistributionPlan,
        log: &mut AuditLog,
    ) -> Result<RunReport, ScatterError> {
        let mut report = RunReport::default();

        for network in &plan.networks {
            let outcome = self.distribute_on(network, plan, log).await?;
            report.networks.push(NetworkReport {
                network: network.name.clone(),
                outcome,
            });
        }

        Ok(report)
    }

    async fn distribute_on(
        &mut self,
        network: &ResolvedNetwork,
        plan: &DistributionPlan,
        log: &mut AuditLog,
    ) -> Result<NetworkOutcome, ScatterError> {
        let name = network.name.as_str();
        let symbol = plan.symbol.as_str();
        log.info(format!("--- starting distribution on {name} ---"))?;

        let Some(target) = &network.target else {
            log.warning(format!("[{name}] no RPC endpoint configured, skipping"))?;
            return Ok(NetworkOutcome::Skipped(SkipReason::NoEndpoint));
        };

        let token = match plan.registry.lookup(name, symbol) {
            Lookup::Ready { address, record } => {
                log.info(format!(
                    "[{name}] distributing {} ({symbol}) from contract {}",
                    record.name,
                    to_checksum(&address, None)
                ))?;
                address
            }
            Lookup::NoNetwork => {
                log.warning(format!("[{name}] no deployments recorded for this network, skipping"))?;
                return Ok(NetworkOutcome::Skipped(SkipReason::NoDeployment));
            }
            Lookup::NoToken => {
                log.warning(format!("[{name}] token {symbol} is not deployed on this network, skipping"))?;
                return Ok(NetworkOutcome::Skipped(SkipReason::NoToken));
            }
            Lookup::Failed { record } => {
                let reason = record.error.as_deref().unwrap_or("no contract address");
                log.warning(format!(
                    "[{name}] token {symbol} has a failed deployment ({reason}), skipping"
                ))?;
                return Ok(NetworkOutcome::Skipped(SkipReason::FailedDeployment));
            }
        };

        let outcome = self.pay_recipients(name, target, token, plan, log).await?;
        if !matches!(outcome, NetworkOutcome::Skipped(_)) {
            log.info(format!("--- finished distribution on {name} ---"))?;
        }
        Ok(outcome)
    }

    async fn pay_recipients(
        &mut self,
        name: &str,
        target: &NetworkTarget,
        token: Address,
        plan: &DistributionPlan,
        log: &mut AuditLog,
    ) -> Result<NetworkOutcome, ScatterError> {
        let symbol = plan.symbol.as_str();
        let mut tally = Tally::default();

        let ledger = or_abandon!(log, name, tally, self.connector.connect(target, token).await);
        let signer = ledger.signer_address();
        let signer_label = to_checksum(&signer, None);

        let native = or_abandon!(log, name, tally, ledger.native_balance(signer).await);
        log.info(format!(
            "[{name}] signer {signer_label} native balance: {}",
            format_ether(native)
        ))?;
        if native.is_zero() {
            log.warning(format!(
                "[{name}] signer {signer_label} has no native balance, transfers will likely fail for gas"
            ))?;
        }

        let decimals = or_abandon!(log, name, tally, ledger.token_decimals().await);
        let balance = or_abandon!(log, name, tally, ledger.token_balance(signer).await);
        log.info(format!(
            "[{name}] signer {signer_label} holds {} {symbol}",
            display_units(balance, decimals)
        ))?;

        if balance.is_zero() {
            log.warning(format!(
                "[{name}] signer {signer_label} holds no {symbol}, nothing to distribute from this network"
            ))?;
            return Ok(NetworkOutcome::Skipped(SkipReason::ZeroTokenBalance));
        }

        let total = plan.recipients.len();
        for (idx, recipient) in plan.recipients.iter().enumerate() {
            let tokens = self.amounts.pick(&mut self.rng);
            let Some(amount) = to_base_units(tokens, decimals) else {
                let reason = format!("{tokens} {symbol} at {decimals} decimals overflows 256 bits");
                return abandon(log, name, tally, reason);
            };

            let recipient_label = to_checksum(recipient, None);
            log.info(format!(
                "[{name}] sending {tokens} {symbol} to {recipient_label} ({}/{total})",
                idx + 1
            ))?;

            match ledger.token_balance(signer).await {
                Ok(current) if current < amount => {
                    log.error(format!(
                        "[{name}] signer balance {} {symbol} cannot cover {tokens} {symbol} to {recipient_label}, stopping distribution on this network",
                        display_units(current, decimals)
                    ))?;
                    return Ok(NetworkOutcome::Halted(tally));
                }
                Ok(_) => {
                    let sent = self
                        .send(ledger.as_ref(), name, *recipient, tokens, amount, symbol, log)
                        .await?;
                    if sent {
                        tally.succeeded += 1;
                    } else {
                        tally.failed += 1;
                    }
                }
                Err(err) => {
                    log.record(
                        Tag::ErrorTransfer,
                        format!("[{name}] could not re-read balance before paying {recipient_label}: {err}"),
                    )?;
                    tally.failed += 1;
                }
            }

            self.report_progress(name, idx + 1, total);
            if idx + 1 < total {
                pacing::pause(self.pacer.as_ref(), idx).await;
            }
        }

        Ok(NetworkOutcome::Completed(tally))
    }

    /// Submits one transfer and logs its outcome. Returns whether it went through.
    #[allow(clippy::too_many_arguments)]
    async fn send(
        &self,
        ledger: &dyn Ledger,
        name: &str,
        recipient: Address,
        tokens: u64,
        amount: U256,
        symbol: &str,
        log: &mut AuditLog,
    ) -> Result<bool, ScatterError> {
        let to = to_checksum(&recipient, None);

        match ledger.transfer(recipient, amount).await {
            Ok(TransferReceipt::Submitted { tx_hash }) => {
                log.record(
                    Tag::Success,
                    format!("[{name}] submitted {tokens} {symbol} to {to}, tx {tx_hash:#x} (not yet confirmed)"),
                )?;
                Ok(true)
            }
            Ok(TransferReceipt::Confirmed { tx_hash, block }) => {
                let block = block.map_or_else(|| "unknown".to_string(), |b| b.to_string());
                log.record(
                    Tag::Success,
                    format!("[{name}] sent {tokens} {symbol} to {to}, tx {tx_hash:#x} confirmed in block {block}"),
                )?;
                Ok(true)
            }
            Ok(TransferReceipt::Reverted { tx_hash, .. }) => {
                log.record(
                    Tag::ErrorTransfer,
                    format!("[{name}] transfer of {tokens} {symbol} to {to} reverted, tx {tx_hash:#x}"),
                )?;
                Ok(false)
            }
            Err(err) => {
                let hash = err
                    .tx_hash()
                    .map(|h| format!(" (tx {h:#x})"))
                    .unwrap_or_default();
                log.record(
                    Tag::ErrorTransfer,
                    format!("[{name}] failed to send tokens to {to}: {err}{hash}"),
                )?;
                Ok(false)
            }
        }
    }

    fn report_progress(&self, network: &str, done: usize, total: usize) {
        if let Some(hook) = &self.on_progress {
            hook(Progress {
                network,
                done,
                total,
            });
        }
    }
}

fn abandon(
    log: &mut AuditLog,
    name: &str,
    tally: Tally,
    reason: String,
) -> Result<NetworkOutcome, ScatterError> {
    log.record(
        Tag::ErrorNetworkInteraction,
        format!("[{name}] setup or interaction failed: {reason}"),
    )?;
    Ok(NetworkOutcome::Abandoned { tally, reason })
}
