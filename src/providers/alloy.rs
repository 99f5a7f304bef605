// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Alloy-based blockchain provider implementation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use alloy_network::{Ethereum, EthereumWallet, NetworkWallet, ReceiptResponse};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types::{BlockNumberOrTag, TransactionRequest};
use async_trait::async_trait;
use tracing::{debug, info, instrument, trace};
use url::Url;

use crate::chain::ChainProfile;
use crate::contracts::erc20::Erc20;
use crate::error::{CctpError, Result};
use crate::traits::{BlockchainProvider, FeeParameters, TransactionOutcome};

/// Production [`BlockchainProvider`] backed by Alloy HTTP providers and a
/// local signing wallet.
///
/// Holds one wallet-filled provider per registered chain and treats one of
/// them as active, the way a browser wallet tracks its selected network.
/// Switching to a chain that was never registered fails with
/// [`CctpError::UnrecognizedChain`] until [`add_chain`](BlockchainProvider::add_chain)
/// registers it.
///
/// # Examples
///
/// ```rust,no_run
/// use alloy_chains::NamedChain;
/// use alloy_network::EthereumWallet;
/// use cctp_orchestrator::providers::AlloyBlockchainProvider;
/// use cctp_orchestrator::ChainRegistry;
///
/// # fn example(wallet: EthereumWallet) -> Result<(), cctp_orchestrator::CctpError> {
/// let registry = ChainRegistry::builtin();
/// let provider = AlloyBlockchainProvider::new(wallet, registry.get(NamedChain::Mainnet)?)?
///     .with_chain(registry.get(NamedChain::Base)?)?;
/// # Ok(())
/// # }
/// ```
pub struct AlloyBlockchainProvider {
    wallet: EthereumWallet,
    providers: RwLock<HashMap<u64, DynProvider<Ethereum>>>,
    active_chain_id: RwLock<u64>,
}

impl AlloyBlockchainProvider {
    /// Creates a provider whose active chain is `active`.
    ///
    /// # Errors
    ///
    /// [`CctpError::InvalidConfig`] when the profile's RPC URL does not parse.
    pub fn new(wallet: EthereumWallet, active: &ChainProfile) -> Result<Self> {
        let provider = connect(&wallet, active)?;
        let chain_id = active.chain_id();

        Ok(Self {
            wallet,
            providers: RwLock::new(HashMap::from([(chain_id, provider)])),
            active_chain_id: RwLock::new(chain_id),
        })
    }

    /// Registers another chain without switching to it.
    pub fn with_chain(self, profile: &ChainProfile) -> Result<Self> {
        self.register(profile)?;
        Ok(self)
    }

    /// Chain ids the wallet can switch to.
    pub fn registered_chains(&self) -> Vec<u64> {
        let mut chains: Vec<u64> = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        chains.sort_unstable();
        chains
    }

    fn register(&self, profile: &ChainProfile) -> Result<()> {
        let provider = connect(&self.wallet, profile)?;
        self.providers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(profile.chain_id(), provider);
        Ok(())
    }

    fn active(&self) -> Result<DynProvider<Ethereum>> {
        let chain_id = *self
            .active_chain_id
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        self.providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&chain_id)
            .cloned()
            .ok_or(CctpError::UnrecognizedChain { chain_id })
    }
}

impl std::fmt::Debug for AlloyBlockchainProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlloyBlockchainProvider")
            .field("registered_chains", &self.registered_chains())
            .field(
                "active_chain_id",
                &*self
                    .active_chain_id
                    .read()
                    .unwrap_or_else(PoisonError::into_inner),
            )
            .finish_non_exhaustive()
    }
}

fn connect(wallet: &EthereumWallet, profile: &ChainProfile) -> Result<DynProvider<Ethereum>> {
    let url = Url::parse(&profile.rpc_url).map_err(|e| {
        CctpError::InvalidConfig(format!(
            "invalid RPC URL for {}: {} ({e})",
            profile.chain, profile.rpc_url
        ))
    })?;

    debug!(chain = %profile.chain, rpc_url = %url, event = "provider_connected");
    Ok(ProviderBuilder::new()
        .wallet(wallet.clone())
        .connect_http(url)
        .erased())
}

#[async_trait]
impl BlockchainProvider for AlloyBlockchainProvider {
    async fn account(&self) -> Result<Address> {
        Ok(NetworkWallet::<Ethereum>::default_signer_address(&self.wallet))
    }

    #[instrument(skip(self), fields(token = %token, owner = %owner))]
    async fn get_balance(&self, token: Address, owner: Address) -> Result<U256> {
        let balance = Erc20::new(token, self.active()?)
            .balanceOf(owner)
            .call()
            .await?;
        trace!(balance = %balance, event = "balance_fetched");
        Ok(balance)
    }

    #[instrument(skip(self), fields(token = %token, owner = %owner, spender = %spender))]
    async fn get_allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256> {
        let allowance = Erc20::new(token, self.active()?)
            .allowance(owner, spender)
            .call()
            .await?;
        trace!(allowance = %allowance, event = "allowance_fetched");
        Ok(allowance)
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> Result<u64> {
        Ok(self.active()?.estimate_gas(tx.clone()).await?)
    }

    async fn get_fee_parameters(&self) -> Result<FeeParameters> {
        let provider = self.active()?;
        let base_fee = provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .and_then(|block| block.header.base_fee_per_gas);

        let base_fee_per_gas = match base_fee {
            Some(fee) => u128::from(fee),
            None => {
                debug!(event = "base_fee_unavailable_using_gas_price");
                provider.get_gas_price().await?
            }
        };

        Ok(FeeParameters { base_fee_per_gas })
    }

    #[instrument(skip(self, tx))]
    async fn submit_transaction(&self, tx: TransactionRequest) -> Result<TxHash> {
        let pending = self.active()?.send_transaction(tx).await?;
        let tx_hash = *pending.tx_hash();
        debug!(tx_hash = %tx_hash, event = "transaction_broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn get_receipt(&self, tx_hash: TxHash) -> Result<Option<TransactionOutcome>> {
        let Some(receipt) = self.active()?.get_transaction_receipt(tx_hash).await? else {
            trace!(event = "receipt_not_found");
            return Ok(None);
        };

        Ok(Some(TransactionOutcome {
            tx_hash,
            success: receipt.status(),
            block_number: receipt.block_number(),
            gas_used: receipt.gas_used(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        }))
    }

    async fn get_active_chain(&self) -> Result<u64> {
        Ok(self.active()?.get_chain_id().await?)
    }

    async fn switch_chain(&self, chain_id: u64) -> Result<()> {
        let known = self
            .providers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&chain_id);
        if !known {
            return Err(CctpError::UnrecognizedChain { chain_id });
        }

        *self
            .active_chain_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = chain_id;
        info!(chain_id, event = "active_chain_switched");
        Ok(())
    }

    async fn add_chain(&self, profile: &ChainProfile) -> Result<()> {
        self.register(profile)?;
        info!(chain = %profile.chain, event = "chain_added");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_chains::NamedChain;
    use alloy_signer_local::PrivateKeySigner;

    use crate::chain::ChainRegistry;

    fn provider() -> AlloyBlockchainProvider {
        let registry = ChainRegistry::builtin();
        let wallet = EthereumWallet::from(PrivateKeySigner::random());
        AlloyBlockchainProvider::new(wallet, registry.get(NamedChain::Sepolia).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_account_is_wallet_signer() {
        let signer = PrivateKeySigner::random();
        let expected = signer.address();
        let registry = ChainRegistry::builtin();
        let provider = AlloyBlockchainProvider::new(
            EthereumWallet::from(signer),
            registry.get(NamedChain::Sepolia).unwrap(),
        )
        .unwrap();

        assert_eq!(provider.account().await.unwrap(), expected);
    }

    #[tokio::test]
    async fn test_switch_to_unregistered_chain() {
        let provider = provider();

        let err = provider.switch_chain(8453).await.unwrap_err();

        assert!(matches!(err, CctpError::UnrecognizedChain { chain_id: 8453 }));
    }

    #[tokio::test]
    async fn test_add_chain_then_switch() {
        let provider = provider();
        let registry = ChainRegistry::builtin();

        provider
            .add_chain(registry.get(NamedChain::BaseSepolia).unwrap())
            .await
            .unwrap();
        provider.switch_chain(84532).await.unwrap();

        assert_eq!(provider.registered_chains(), vec![84532, 11155111]);
    }

    #[test]
    fn test_invalid_rpc_url() {
        let registry = ChainRegistry::builtin()
            .with_rpc_url(NamedChain::Sepolia, "not a url")
            .unwrap();
        let wallet = EthereumWallet::from(PrivateKeySigner::random());

        let err =
            AlloyBlockchainProvider::new(wallet, registry.get(NamedChain::Sepolia).unwrap())
                .unwrap_err();

        assert!(matches!(err, CctpError::InvalidConfig(_)));
    }
}
