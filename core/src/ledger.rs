//! The **abstraction** over one network's token contract.
//!
//! The distributor only talks to [`Ledger`] and [`LedgerConnector`]; the
//! [`evm`] submodule implements both over JSON-RPC. Implementations never
//! retry: every failure is handed back to the caller, which decides whether
//! it costs a recipient or the whole network.

use std::fmt;

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use scatter_common::network::NetworkTarget;
use thiserror::Error;

pub mod evm;

pub use evm::EvmConnector;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("transfer to {recipient:?} failed: {reason}")]
    TransferFailed {
        recipient: Address,
        reason: String,
        /// Hash of the transaction, when it got far enough to have one.
        tx_hash: Option<H256>,
    },

    #[error("network {network} unavailable: {reason}")]
    NetworkUnavailable { network: String, reason: String },
}

impl LedgerError {
    pub fn unavailable(network: &str, reason: impl fmt::Display) -> Self {
        Self::NetworkUnavailable {
            network: network.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn tx_hash(&self) -> Option<H256> {
        match self {
            Self::TransferFailed { tx_hash, .. } => *tx_hash,
            Self::NetworkUnavailable { .. } => None,
        }
    }
}

/// What the network told us about a transfer by the time `transfer` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferReceipt {
    /// Accepted by the endpoint for inclusion, not yet confirmed.
    Submitted { tx_hash: H256 },
    /// Mined and executed successfully with the requested confirmations.
    Confirmed { tx_hash: H256, block: Option<u64> },
    /// Mined but the token call reverted.
    Reverted { tx_hash: H256, block: Option<u64> },
}

/// One signer talking to one token contract on one network.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Account that signs and funds every transfer.
    fn signer_address(&self) -> Address;

    /// Native (gas) currency balance of `account`.
    async fn native_balance(&self, account: Address) -> Result<U256, LedgerError>;

    /// Token precision. Fetched once, then served from cache.
    async fn token_decimals(&self) -> Result<u8, LedgerError>;

    /// Fresh token balance of `account` in base units.
    async fn token_balance(&self, account: Address) -> Result<U256, LedgerError>;

    /// Signs and submits `token.transfer(to, amount)`.
    async fn transfer(&self, to: Address, amount: U256) -> Result<TransferReceipt, LedgerError>;
}

/// Opens a [`Ledger`] for the token deployed at `token` on `target`.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn connect(
        &self,
        target: &NetworkTarget,
        token: Address,
    ) -> Result<Box<dyn Ledger>, LedgerError>;
}
