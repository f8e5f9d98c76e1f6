//! Chain access
//!
//! Balance reads and static-call simulation behind object-safe traits, so
//! the migration service runs the same against an RPC node or fixed data.

use std::collections::HashMap;

use alloy_primitives::{Address, Bytes, U256};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::SolCall;
use async_trait::async_trait;
use tracing::debug;

use crate::error::{MigrationError, MigrationResult};
use crate::migration::MigrationPayload;
use crate::relayer::IERC20;

// ============================================
// CAPABILITIES
// ============================================

#[async_trait]
pub trait BalanceQuery: Send + Sync {
    /// ERC-20 balance of `holder`; gauges report staked BPT the same way
    async fn balance_of(&self, token: Address, holder: Address) -> MigrationResult<U256>;
}

#[async_trait]
pub trait CallSimulator: Send + Sync {
    /// Raw return data of `payload` executed as a static call from `from`
    async fn simulate(&self, from: Address, payload: &MigrationPayload) -> MigrationResult<Bytes>;
}

// ============================================
// FIXED BALANCES
// ============================================

/// Balances known up front; anything not set reads as zero
#[derive(Debug, Default, Clone)]
pub struct FixedBalances {
    balances: HashMap<(Address, Address), U256>,
}

impl FixedBalances {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, token: Address, holder: Address, amount: U256) -> Self {
        self.set(token, holder, amount);
        self
    }

    pub fn set(&mut self, token: Address, holder: Address, amount: U256) {
        self.balances.insert((token, holder), amount);
    }
}

#[async_trait]
impl BalanceQuery for FixedBalances {
    async fn balance_of(&self, token: Address, holder: Address) -> MigrationResult<U256> {
        Ok(self
            .balances
            .get(&(token, holder))
            .copied()
            .unwrap_or(U256::ZERO))
    }
}

// ============================================
// RPC
// ============================================

/// `balanceOf` through `eth_call`
#[derive(Debug, Clone)]
pub struct RpcBalances {
    rpc_url: String,
}

impl RpcBalances {
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self { rpc_url: rpc_url.into() }
    }
}

#[async_trait]
impl BalanceQuery for RpcBalances {
    async fn balance_of(&self, token: Address, holder: Address) -> MigrationResult<U256> {
        let url = self.rpc_url.parse().map_err(|e| {
            MigrationError::Provider(format!("invalid RPC URL {}: {}", self.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(url);

        let calldata = IERC20::balanceOfCall { account: holder }.abi_encode();
        let tx = TransactionRequest::default().to(token).input(calldata.into());

        let result = provider
            .call(tx)
            .await
            .map_err(|e| MigrationError::Provider(format!("balanceOf {} failed: {}", token, e)))?;

        let balance = IERC20::balanceOfCall::abi_decode_returns(&result)
            .map_err(|e| MigrationError::Provider(format!("balanceOf {} returned garbage: {}", token, e)))?;

        debug!("balanceOf({}) on {} = {}", holder, token, balance);
        Ok(balance)
    }
}

/// Executes the multicall with `eth_call`; nothing is broadcast
#[derive(Debug, Clone)]
pub struct StaticCallSimulator {
    rpc_url: String,
    gas_limit: u64,
}

impl StaticCallSimulator {
    pub fn new(rpc_url: impl Into<String>, gas_limit: u64) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            gas_limit,
        }
    }
}

#[async_trait]
impl CallSimulator for StaticCallSimulator {
    async fn simulate(&self, from: Address, payload: &MigrationPayload) -> MigrationResult<Bytes> {
        let url = self.rpc_url.parse().map_err(|e| {
            MigrationError::Provider(format!("invalid RPC URL {}: {}", self.rpc_url, e))
        })?;
        let provider = ProviderBuilder::new().connect_http(url);

        let tx = TransactionRequest::default()
            .from(from)
            .to(payload.to)
            .input(payload.data.clone().into())
            .gas_limit(self.gas_limit);

        let result = provider
            .call(tx)
            .await
            .map_err(|e| MigrationError::Provider(format!("migration simulation reverted: {}", e)))?;

        debug!("Simulation returned {} bytes", result.len());
        Ok(result)
    }
}
