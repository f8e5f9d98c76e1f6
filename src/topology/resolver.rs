//! Pool Topology Resolver
//!
//! Rebuilds the nested token tree of a pool (pools of pools), one repository
//! lookup per token. Sibling tokens are resolved concurrently.

use alloy_primitives::Address;
use futures::future::{try_join_all, BoxFuture, FutureExt};
use tracing::{debug, trace};

use super::node::{PoolId, PoolNode};
use crate::error::{MigrationError, MigrationResult};
use crate::repository::{PoolLookup, PoolRecord};

/// Resolve a pool id into its full token tree.
///
/// Fails with `NotFound` when the id is unknown to the repository.
pub async fn resolve_pool(pool_id: &PoolId, pools: &dyn PoolLookup) -> MigrationResult<PoolNode> {
    let record = pools
        .find_by_id(pool_id)
        .await?
        .ok_or_else(|| MigrationError::NotFound(format!("pool {}", pool_id)))?;

    let children = resolve_tokens(&record, Vec::new(), pools).await?;
    let node = PoolNode::from_record(&record, children);

    debug!(
        "Resolved pool {} ({}): {} top-level tokens",
        pool_id,
        record.pool_type,
        node.children.len()
    );

    Ok(node)
}

/// Resolve every token of `record`, in ascending address order.
///
/// `ancestors` holds the pools already being expanded above this level.
async fn resolve_tokens(
    record: &PoolRecord,
    mut ancestors: Vec<Address>,
    pools: &dyn PoolLookup,
) -> MigrationResult<Vec<PoolNode>> {
    ancestors.push(record.address);

    let lookups = record
        .sorted_token_addresses()
        .into_iter()
        .map(|token| resolve_token(token, ancestors.clone(), pools));

    try_join_all(lookups).await
}

fn resolve_token<'a>(
    token: Address,
    ancestors: Vec<Address>,
    pools: &'a dyn PoolLookup,
) -> BoxFuture<'a, MigrationResult<PoolNode>> {
    async move {
        // A composable pool lists its own BPT; never expand a pool inside itself
        if ancestors.contains(&token) {
            trace!("Token {} is an enclosing pool, kept as leaf", token);
            return Ok(PoolNode::leaf(token));
        }

        match pools.find_by_address(token).await? {
            Some(nested) => {
                let children = resolve_tokens(&nested, ancestors, pools).await?;
                trace!("Token {} is nested pool {}", token, nested.id);
                Ok(PoolNode::from_record(&nested, children))
            }
            None => Ok(PoolNode::leaf(token)),
        }
    }
    .boxed()
}
