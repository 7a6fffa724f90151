//! JSON-RPC implementation of [`Ledger`] for EVM networks.
//!
//! One [`EvmConnector`] holds the signing key for the whole run and builds an
//! independent provider and signer for every network it connects to.

use std::sync::Arc;

use async_trait::async_trait;
use ethers::contract::abigen;
use ethers::middleware::SignerMiddleware;
use ethers::providers::{Http, Middleware, Provider};
use ethers::signers::{LocalWallet, Signer};
use ethers::types::{Address, U64, U256};
use scatter_common::network::NetworkTarget;
use tokio::sync::OnceCell;
use tracing::debug;

use super::{Ledger, LedgerConnector, LedgerError, TransferReceipt};

abigen!(
    Erc20,
    r#"[
        function transfer(address to, uint256 amount) external returns (bool)
        function decimals() external view returns (uint8)
        function balanceOf(address account) external view returns (uint256)
    ]"#
);

type Client = SignerMiddleware<Provider<Http>, LocalWallet>;

pub struct EvmConnector {
    wallet: LocalWallet,
    confirmations: usize,
}

impl EvmConnector {
    pub fn new(wallet: LocalWallet, confirmations: usize) -> Self {
        Self {
            wallet,
            confirmations,
        }
    }

    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }
}

#[async_trait]
impl LedgerConnector for EvmConnector {
    async fn connect(
        &self,
        target: &NetworkTarget,
        token: Address,
    ) -> Result<Box<dyn Ledger>, LedgerError> {
        let network = target.name.as_str();
        let provider = Provider::<Http>::try_from(target.rpc_url.as_str())
            .map_err(|e| LedgerError::unavailable(network, format!("invalid RPC URL: {e}")))?;

        let chain_id = match target.chain_id {
            Some(id) => id,
            None => provider
                .get_chainid()
                .await
                .map_err(|e| LedgerError::unavailable(network, e))?
                .as_u64(),
        };
        debug!("[{network}] connected, chain id {chain_id}");

        let wallet = self.wallet.clone().with_chain_id(chain_id);
        let client = Arc::new(SignerMiddleware::new(provider, wallet));
        let contract = Erc20::new(token, client.clone());

        Ok(Box::new(EvmLedger {
            network: target.name.clone(),
            client,
            contract,
            decimals: OnceCell::new(),
            confirmations: self.confirmations,
        }))
    }
}

pub struct EvmLedger {
    network: String,
    client: Arc<Client>,
    contract: Erc20<Client>,
    decimals: OnceCell<u8>,
    confirmations: usize,
}

#[async_trait]
impl Ledger for EvmLedger {
    fn signer_address(&self) -> Address {
        self.client.address()
    }

    async fn native_balance(&self, account: Address) -> Result<U256, LedgerError> {
        self.client
            .get_balance(account, None)
            .await
            .map_err(|e| LedgerError::unavailable(&self.network, e))
    }

    async fn token_decimals(&self) -> Result<u8, LedgerError> {
        self.decimals
            .get_or_try_init(|| async {
                self.contract
                    .decimals()
                    .call()
                    .await
                    .map_err(|e| LedgerError::unavailable(&self.network, e))
            })
            .await
            .copied()
    }

    async fn token_balance(&self, account: Address) -> Result<U256, LedgerError> {
        self.contract
            .balance_of(account)
            .call()
            .await
            .map_err(|e| LedgerError::unavailable(&self.network, e))
    }

    async fn transfer(&self, to: Address, amount: U256) -> Result<TransferReceipt, LedgerError> {
        let call = self.contract.transfer(to, amount);
        let pending = call.send().await.map_err(|e| LedgerError::TransferFailed {
            recipient: to,
            reason: e.to_string(),
            tx_hash: None,
        })?;

        let tx_hash = pending.tx_hash();
        if self.confirmations == 0 {
            return Ok(TransferReceipt::Submitted { tx_hash });
        }

        let failed = |reason: String| LedgerError::TransferFailed {
            recipient: to,
            reason,
            tx_hash: Some(tx_hash),
        };

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| failed(e.to_string()))?
            .ok_or_else(|| failed("transaction dropped before confirmation".to_string()))?;

        let block = receipt.block_number.map(|b| b.as_u64());
        if receipt.status == Some(U64::one()) {
            Ok(TransferReceipt::Confirmed { tx_hash, block })
        } else {
            Ok(TransferReceipt::Reverted { tx_hash, block })
        }
    }
}
