//! Balancer Relayer: ABI bindings, chained references and call encoding

pub mod abi;
mod actions;
mod references;

pub use abi::{IBalancerRelayer, IERC20, RELAYER_V5_MAINNET};
pub use actions::{
    decode_multicall_results, encode_multicall, max_int256, pool_address, BatchSwap, ExitKind,
    ExitPool, GaugeDeposit, GaugeWithdraw, JoinPool, OutputReference, PeekReference, SwapHop,
    SwapPath, SwapRoute,
};
pub use references::{Amount, ChainedReference, READ_ONLY_PREFIX, TEMPORARY_PREFIX};
