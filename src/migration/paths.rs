//! Path Planner
//!
//! Exiting a composable pool yields wrapper BPTs (e.g. bb-a-USDT). When the
//! destination holds a different wrapper around the same main token, the
//! amount is routed source wrapper -> main token -> destination wrapper.

use tracing::trace;

use crate::error::{MigrationError, MigrationResult};
use crate::relayer::{SwapHop, SwapPath};
use crate::topology::PoolNode;

/// One path per source slot, aligned with the exit output references.
///
/// With `exit_token_index` set only that slot's path is returned. Slots
/// without a matching destination wrapper get an empty path.
pub fn build_paths(
    from_tokens: &[PoolNode],
    to_tokens: &[PoolNode],
    exit_token_index: Option<usize>,
) -> MigrationResult<Vec<SwapPath>> {
    let to_main_tokens: Vec<_> = to_tokens.iter().map(PoolNode::main_token).collect();

    let paths = from_tokens
        .iter()
        .map(|from| {
            let destination = from.main_token().and_then(|main| {
                to_main_tokens
                    .iter()
                    .position(|candidate| *candidate == Some(main))
                    .map(|idx| &to_tokens[idx])
            });

            match destination {
                Some(to) => build_path(from, to),
                None => Ok(SwapPath::empty()),
            }
        })
        .collect::<MigrationResult<Vec<_>>>()?;

    match exit_token_index {
        Some(idx) => {
            let path = paths.get(idx).cloned().ok_or_else(|| {
                MigrationError::InvalidInput(format!(
                    "exit token index {} out of {} source tokens",
                    idx,
                    paths.len()
                ))
            })?;
            Ok(vec![path])
        }
        None => Ok(paths),
    }
}

fn build_path(from: &PoolNode, to: &PoolNode) -> MigrationResult<SwapPath> {
    if !from.is_linear() || !to.is_linear() {
        return Ok(SwapPath::empty());
    }
    build_linear_path(from, to)
}

fn build_linear_path(from: &PoolNode, to: &PoolNode) -> MigrationResult<SwapPath> {
    let (Some(from_id), Some(to_id)) = (from.pool_id, to.pool_id) else {
        return Err(MigrationError::InvalidPool(format!(
            "linear pools {} / {} are missing their ids",
            from.address, to.address
        )));
    };
    let main_token = from.main_token().ok_or_else(|| {
        MigrationError::InvalidPool(format!("linear pool {} has no main token", from.address))
    })?;

    trace!("Linear path {} -> {} -> {}", from.address, main_token, to.address);

    Ok(SwapPath {
        hops: vec![
            SwapHop {
                pool_id: from_id,
                asset_in: from.address,
                asset_out: main_token,
            },
            SwapHop {
                pool_id: to_id,
                asset_in: main_token,
                asset_out: to.address,
            },
        ],
    })
}
