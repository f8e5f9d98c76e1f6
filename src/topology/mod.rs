//! Pool topology: nested token trees of Balancer pools
//!
//! A composable pool's tokens may themselves be pools (e.g. bb-a-USD holds
//! three Aave linear pools). The migration builder needs that structure to
//! decide which swaps are required between exit and join.

mod node;
mod resolver;

pub use node::{PoolId, PoolNode, PoolType};
pub use resolver::resolve_pool;
