//! Relayer Actions
//!
//! Typed arguments for each relayer library call and their calldata
//! encoding. Validation of array lengths happens here, at encode time, so a
//! malformed step can never reach the multicall.

use alloy_primitives::{Address, Bytes, I256, U256};
use alloy_sol_types::{SolCall, SolValue};

use super::abi::IBalancerRelayer;
use super::references::{Amount, ChainedReference};
use crate::error::{MigrationError, MigrationResult};
use crate::topology::PoolId;

/// `PoolKind.WEIGHTED` in the relayer; the only kind it distinguishes for exits and joins
const POOL_KIND_DEFAULT: u8 = 0;

/// `SwapKind.GIVEN_IN`
const SWAP_KIND_GIVEN_IN: u8 = 0;

/// `EXACT_BPT_IN_FOR_ONE_TOKEN_OUT`
const EXIT_ONE_TOKEN: u64 = 0;

/// `EXACT_BPT_IN_FOR_TOKENS_OUT` on weighted / stable pools
const EXIT_PROPORTIONAL: u64 = 1;

/// `EXACT_BPT_IN_FOR_ALL_TOKENS_OUT` on composable stable pools
const EXIT_PROPORTIONAL_COMPOSABLE: u64 = 2;

/// `EXACT_TOKENS_IN_FOR_BPT_OUT`
const JOIN_EXACT_TOKENS_IN: u64 = 1;

/// Largest positive int256, used as "no limit" for amounts in
pub fn max_int256() -> U256 {
    I256::MAX.into_raw()
}

/// Pool ids start with the pool's own address
pub fn pool_address(pool_id: &PoolId) -> Address {
    Address::from_slice(&pool_id[..20])
}

/// Capture of one output amount into a chained reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputReference {
    /// Position in the call's asset array
    pub index: usize,
    pub reference: ChainedReference,
}

impl OutputReference {
    fn to_abi(self) -> IBalancerRelayer::OutputReference {
        IBalancerRelayer::OutputReference {
            index: U256::from(self.index),
            key: self.reference.value(),
        }
    }
}

// ============================================
// GAUGES
// ============================================

/// Unstake BPT from a liquidity gauge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeWithdraw {
    pub gauge: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount: U256,
}

impl GaugeWithdraw {
    pub fn encode(&self) -> Bytes {
        IBalancerRelayer::gaugeWithdrawCall {
            gauge: self.gauge,
            sender: self.sender,
            recipient: self.recipient,
            amount: self.amount,
        }
        .abi_encode()
        .into()
    }
}

/// Stake BPT into a liquidity gauge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeDeposit {
    pub gauge: Address,
    pub sender: Address,
    pub recipient: Address,
    pub amount: Amount,
}

impl GaugeDeposit {
    pub fn encode(&self) -> Bytes {
        IBalancerRelayer::gaugeDepositCall {
            gauge: self.gauge,
            sender: self.sender,
            recipient: self.recipient,
            amount: self.amount.to_u256(),
        }
        .abi_encode()
        .into()
    }
}

// ============================================
// EXIT
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// All BPT redeemed for the token at `token_index`
    SingleToken { token_index: usize },
    /// BPT redeemed across every pool token
    Proportional { composable: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExitPool {
    pub pool_id: PoolId,
    /// Pool tokens in Vault order
    pub assets: Vec<Address>,
    pub kind: ExitKind,
    pub bpt_amount: U256,
    pub sender: Address,
    pub recipient: Address,
    pub output_references: Vec<OutputReference>,
    pub to_internal_balance: bool,
}

impl ExitPool {
    pub fn user_data(&self) -> Bytes {
        let encoded = match self.kind {
            ExitKind::SingleToken { token_index } => (
                U256::from(EXIT_ONE_TOKEN),
                self.bpt_amount,
                U256::from(token_index),
            )
                .abi_encode_params(),
            ExitKind::Proportional { composable } => {
                let kind = if composable { EXIT_PROPORTIONAL_COMPOSABLE } else { EXIT_PROPORTIONAL };
                (U256::from(kind), self.bpt_amount).abi_encode_params()
            }
        };
        encoded.into()
    }

    pub fn encode(&self) -> MigrationResult<Bytes> {
        if let ExitKind::SingleToken { token_index } = self.kind {
            if token_index >= self.assets.len() {
                return Err(MigrationError::InvalidInput(format!(
                    "exit token index {} out of {} assets",
                    token_index,
                    self.assets.len()
                )));
            }
        }
        if let Some(bad) = self.output_references.iter().find(|o| o.index >= self.assets.len()) {
            return Err(MigrationError::InvalidInput(format!(
                "exit output reference index {} out of {} assets",
                bad.index,
                self.assets.len()
            )));
        }

        let call = IBalancerRelayer::exitPoolCall {
            poolId: self.pool_id,
            poolKind: POOL_KIND_DEFAULT,
            sender: self.sender,
            recipient: self.recipient,
            exitPoolRequest: IBalancerRelayer::ExitPoolRequest {
                assets: self.assets.clone(),
                minAmountsOut: vec![U256::ZERO; self.assets.len()],
                userData: self.user_data(),
                toInternalBalance: self.to_internal_balance,
            },
            outputReferences: self.output_references.iter().map(|o| o.to_abi()).collect(),
        };

        Ok(call.abi_encode().into())
    }
}

// ============================================
// JOIN
// ============================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPool {
    pub pool_id: PoolId,
    /// Pool tokens in Vault order, including the pool's own BPT when listed
    pub assets: Vec<Address>,
    /// One amount per asset other than the pool's own BPT
    pub amounts_in: Vec<Amount>,
    pub min_bpt_out: U256,
    pub sender: Address,
    pub recipient: Address,
    pub output_reference: ChainedReference,
    pub from_internal_balance: bool,
}

impl JoinPool {
    pub fn user_data(&self) -> Bytes {
        let amounts: Vec<U256> = self.amounts_in.iter().map(Amount::to_u256).collect();
        (U256::from(JOIN_EXACT_TOKENS_IN), amounts, self.min_bpt_out)
            .abi_encode_params()
            .into()
    }

    pub fn encode(&self) -> MigrationResult<Bytes> {
        let own_bpt = pool_address(&self.pool_id);
        let expected = self.assets.iter().filter(|&&a| a != own_bpt).count();
        if self.amounts_in.len() != expected {
            return Err(MigrationError::InvalidInput(format!(
                "join expects {} amounts for {} assets, got {}",
                expected,
                self.assets.len(),
                self.amounts_in.len()
            )));
        }

        let call = IBalancerRelayer::joinPoolCall {
            poolId: self.pool_id,
            kind: POOL_KIND_DEFAULT,
            sender: self.sender,
            recipient: self.recipient,
            request: IBalancerRelayer::JoinPoolRequest {
                assets: self.assets.clone(),
                maxAmountsIn: vec![max_int256(); self.assets.len()],
                userData: self.user_data(),
                fromInternalBalance: self.from_internal_balance,
            },
            value: U256::ZERO,
            outputReference: self.output_reference.value(),
        };

        Ok(call.abi_encode().into())
    }
}

// ============================================
// BATCH SWAP
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHop {
    pub pool_id: PoolId,
    pub asset_in: Address,
    pub asset_out: Address,
}

/// Hops converting one token into another; empty when no conversion applies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapPath {
    pub hops: Vec<SwapHop>,
}

impl SwapPath {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    pub fn asset_in(&self) -> Option<Address> {
        self.hops.first().map(|h| h.asset_in)
    }

    pub fn asset_out(&self) -> Option<Address> {
        self.hops.last().map(|h| h.asset_out)
    }
}

/// One multi-hop route inside a batch swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRoute {
    pub path: SwapPath,
    pub amount_in: Amount,
    pub output_reference: ChainedReference,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchSwap {
    pub routes: Vec<SwapRoute>,
    pub sender: Address,
    pub recipient: Address,
    pub deadline: U256,
    pub to_internal_balance: bool,
}

impl BatchSwap {
    /// Flatten routes into Vault batch swap steps.
    ///
    /// Every hop appends its in/out assets, so indices are global across
    /// routes. Only the first hop of a route carries an amount; zero tells
    /// the Vault to use the previous hop's output.
    pub fn to_abi(&self) -> MigrationResult<IBalancerRelayer::batchSwapCall> {
        let mut swaps = Vec::new();
        let mut assets = Vec::new();
        let mut limits = Vec::new();
        let mut output_references = Vec::new();

        for route in &self.routes {
            if route.path.is_empty() {
                return Err(MigrationError::InvalidInput(
                    "batch swap route without hops".to_string(),
                ));
            }

            for (i, hop) in route.path.hops.iter().enumerate() {
                let asset_in_index = assets.len();
                assets.push(hop.asset_in);
                assets.push(hop.asset_out);

                limits.push(I256::MAX);
                limits.push(I256::ZERO);

                let amount = if i == 0 { route.amount_in.to_u256() } else { U256::ZERO };

                swaps.push(IBalancerRelayer::BatchSwapStep {
                    poolId: hop.pool_id,
                    assetInIndex: U256::from(asset_in_index),
                    assetOutIndex: U256::from(asset_in_index + 1),
                    amount,
                    userData: Bytes::new(),
                });
            }

            output_references.push(
                OutputReference {
                    index: assets.len() - 1,
                    reference: route.output_reference,
                }
                .to_abi(),
            );
        }

        Ok(IBalancerRelayer::batchSwapCall {
            kind: SWAP_KIND_GIVEN_IN,
            swaps,
            assets,
            funds: IBalancerRelayer::FundManagement {
                sender: self.sender,
                fromInternalBalance: true,
                recipient: self.recipient,
                toInternalBalance: self.to_internal_balance,
            },
            limits,
            deadline: self.deadline,
            value: U256::ZERO,
            outputReferences: output_references,
        })
    }

    pub fn encode(&self) -> MigrationResult<Bytes> {
        Ok(self.to_abi()?.abi_encode().into())
    }
}

// ============================================
// PEEK & MULTICALL
// ============================================

/// Surface a reference's current value in the multicall return data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeekReference {
    pub reference: ChainedReference,
}

impl PeekReference {
    pub fn encode(&self) -> Bytes {
        IBalancerRelayer::peekChainedReferenceValueCall {
            chainedReference: self.reference.value(),
        }
        .abi_encode()
        .into()
    }
}

pub fn encode_multicall(calls: Vec<Bytes>) -> Bytes {
    IBalancerRelayer::multicallCall { data: calls }.abi_encode().into()
}

/// Per-call return blobs of a relayer multicall
pub fn decode_multicall_results(return_data: &[u8]) -> MigrationResult<Vec<Bytes>> {
    IBalancerRelayer::multicallCall::abi_decode_returns(return_data)
        .map_err(|e| MigrationError::DecodeError(format!("multicall results: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;

    fn reference(key: u64) -> ChainedReference {
        ChainedReference::temporary(key)
    }

    #[test]
    fn test_pool_address_from_id() {
        assert_eq!(pool_address(&COMPOSABLE_STABLE_ID), COMPOSABLE_STABLE);
        assert_eq!(pool_address(&META_STABLE_ID), META_STABLE);
    }

    #[test]
    fn test_exit_user_data() {
        let mut exit = ExitPool {
            pool_id: META_STABLE_ID,
            assets: vec![WSTETH, WETH],
            kind: ExitKind::Proportional { composable: false },
            bpt_amount: U256::from(1000u64),
            sender: USER,
            recipient: RELAYER,
            output_references: vec![],
            to_internal_balance: true,
        };
        let expected = (U256::from(1u64), U256::from(1000u64)).abi_encode_params();
        assert_eq!(exit.user_data().to_vec(), expected);

        exit.kind = ExitKind::SingleToken { token_index: 1 };
        let expected = (U256::ZERO, U256::from(1000u64), U256::from(1u64)).abi_encode_params();
        assert_eq!(exit.user_data().to_vec(), expected);
    }

    #[test]
    fn test_exit_rejects_out_of_range_reference() {
        let exit = ExitPool {
            pool_id: META_STABLE_ID,
            assets: vec![WSTETH, WETH],
            kind: ExitKind::Proportional { composable: false },
            bpt_amount: U256::from(1000u64),
            sender: USER,
            recipient: RELAYER,
            output_references: vec![OutputReference { index: 2, reference: reference(102) }],
            to_internal_balance: true,
        };
        assert!(matches!(exit.encode(), Err(MigrationError::InvalidInput(_))));
    }

    #[test]
    fn test_join_amount_count_excludes_own_bpt() {
        let mut join = JoinPool {
            pool_id: COMPOSABLE_STABLE_ID,
            assets: vec![BB_A_USDT, BB_A_USDC, COMPOSABLE_STABLE, BB_A_DAI],
            amounts_in: vec![Amount::ZERO; 3],
            min_bpt_out: U256::ZERO,
            sender: RELAYER,
            recipient: USER,
            output_reference: ChainedReference::read_only(999),
            from_internal_balance: true,
        };
        assert!(join.encode().is_ok());

        join.amounts_in.push(Amount::ZERO);
        assert!(matches!(join.encode(), Err(MigrationError::InvalidInput(_))));
    }

    #[test]
    fn test_batch_swap_indices_are_global() {
        let hop = |pool_id, asset_in, asset_out| SwapHop { pool_id, asset_in, asset_out };
        let swap = BatchSwap {
            routes: vec![
                SwapRoute {
                    path: SwapPath {
                        hops: vec![
                            hop(BB_A_USDT_ID, BB_A_USDT, USDT),
                            hop(BB_A3_USDT_ID, USDT, BB_A3_USDT),
                        ],
                    },
                    amount_in: reference(100).into(),
                    output_reference: reference(200),
                },
                SwapRoute {
                    path: SwapPath {
                        hops: vec![
                            hop(BB_A_DAI_ID, BB_A_DAI, DAI),
                            hop(BB_A3_DAI_ID, DAI, BB_A3_DAI),
                        ],
                    },
                    amount_in: reference(103).into(),
                    output_reference: reference(203),
                },
            ],
            sender: RELAYER,
            recipient: RELAYER,
            deadline: U256::MAX,
            to_internal_balance: true,
        };

        let call = swap.to_abi().unwrap();
        assert_eq!(call.assets.len(), 8);
        assert_eq!(call.limits.len(), 8);
        assert_eq!(call.swaps[2].assetInIndex, U256::from(4u64));
        assert_eq!(call.swaps[2].amount, reference(103).value());
        assert_eq!(call.swaps[3].amount, U256::ZERO);
        assert_eq!(call.outputReferences[0].index, U256::from(3u64));
        assert_eq!(call.outputReferences[1].index, U256::from(7u64));
        assert_eq!(call.outputReferences[1].key, reference(203).value());
    }

    #[test]
    fn test_multicall_results_decode() {
        let results = vec![Bytes::new(), Bytes::from(U256::from(42u64).abi_encode())];
        let encoded = results.abi_encode();

        let decoded = decode_multicall_results(&encoded).unwrap();
        assert_eq!(decoded, results);

        assert!(matches!(
            decode_multicall_results(&[0xde, 0xad]),
            Err(MigrationError::DecodeError(_))
        ));
    }
}
