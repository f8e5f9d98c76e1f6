//! Balancer Relayer ABI
//!
//! Only the library calls a migration needs. Enum arguments of the relayer
//! (`PoolKind`, `SwapKind`) are `uint8` on the wire.

use alloy_primitives::{address, Address};
use alloy_sol_types::sol;

/// BatchRelayer V5 on Ethereum Mainnet, the first with `peekChainedReferenceValue`
/// and read-only references
pub const RELAYER_V5_MAINNET: Address = address!("fea793aa415061c483d2390414275ad314b3f621");

sol! {
    /// Batch relayer entry points used to chain a migration
    interface IBalancerRelayer {
        struct OutputReference {
            uint256 index;
            uint256 key;
        }

        struct ExitPoolRequest {
            address[] assets;
            uint256[] minAmountsOut;
            bytes userData;
            bool toInternalBalance;
        }

        struct JoinPoolRequest {
            address[] assets;
            uint256[] maxAmountsIn;
            bytes userData;
            bool fromInternalBalance;
        }

        struct BatchSwapStep {
            bytes32 poolId;
            uint256 assetInIndex;
            uint256 assetOutIndex;
            uint256 amount;
            bytes userData;
        }

        struct FundManagement {
            address sender;
            bool fromInternalBalance;
            address recipient;
            bool toInternalBalance;
        }

        function gaugeWithdraw(
            address gauge,
            address sender,
            address recipient,
            uint256 amount
        ) external payable;

        function gaugeDeposit(
            address gauge,
            address sender,
            address recipient,
            uint256 amount
        ) external payable;

        function exitPool(
            bytes32 poolId,
            uint8 poolKind,
            address sender,
            address recipient,
            ExitPoolRequest exitPoolRequest,
            OutputReference[] outputReferences
        ) external payable;

        function joinPool(
            bytes32 poolId,
            uint8 kind,
            address sender,
            address recipient,
            JoinPoolRequest request,
            uint256 value,
            uint256 outputReference
        ) external payable;

        function batchSwap(
            uint8 kind,
            BatchSwapStep[] swaps,
            address[] assets,
            FundManagement funds,
            int256[] limits,
            uint256 deadline,
            uint256 value,
            OutputReference[] outputReferences
        ) external payable returns (int256[] memory);

        function peekChainedReferenceValue(uint256 chainedReference)
            external view returns (uint256 value);

        function multicall(bytes[] data)
            external payable returns (bytes[] memory results);
    }
}

sol! {
    interface IERC20 {
        function balanceOf(address account) external view returns (uint256);
    }
}
