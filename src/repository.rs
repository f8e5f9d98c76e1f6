//! Pool & Gauge Repositories
//!
//! Lookup capabilities consumed by the topology resolver and the migration
//! service, plus in-memory implementations that can be loaded from JSON
//! registry files (subgraph exports).

use alloy_primitives::Address;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{MigrationError, MigrationResult};
use crate::topology::{PoolId, PoolType};

// ============================================
// RECORDS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolToken {
    pub address: Address,
}

/// Pool data as served by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolRecord {
    pub id: PoolId,
    pub address: Address,
    pub tokens: Vec<PoolToken>,
    pub pool_type: PoolType,
    #[serde(default = "default_pool_type_version")]
    pub pool_type_version: u32,
    #[serde(default)]
    pub main_index: Option<usize>,
}

fn default_pool_type_version() -> u32 {
    1
}

impl PoolRecord {
    /// Token addresses in ascending order
    pub fn sorted_token_addresses(&self) -> Vec<Address> {
        let mut tokens: Vec<Address> = self.tokens.iter().map(|t| t.address).collect();
        tokens.sort();
        tokens
    }
}

/// Liquidity gauge staking a pool's BPT
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeRecord {
    /// Gauge contract address (also the staked position token)
    pub id: Address,
    pub pool_id: PoolId,
}

// ============================================
// CAPABILITIES
// ============================================

#[async_trait]
pub trait PoolLookup: Send + Sync {
    async fn find_by_id(&self, id: &PoolId) -> MigrationResult<Option<PoolRecord>>;

    /// Pool whose BPT lives at `address`, if any
    async fn find_by_address(&self, address: Address) -> MigrationResult<Option<PoolRecord>>;
}

#[async_trait]
pub trait GaugeLookup: Send + Sync {
    async fn find_by_pool_id(&self, pool_id: &PoolId) -> MigrationResult<Option<GaugeRecord>>;
}

// ============================================
// IN-MEMORY REPOSITORIES
// ============================================

#[derive(Debug, Default, Clone)]
pub struct InMemoryPools {
    by_id: HashMap<PoolId, PoolRecord>,
    by_address: HashMap<Address, PoolId>,
}

impl InMemoryPools {
    pub fn new(pools: impl IntoIterator<Item = PoolRecord>) -> Self {
        let mut repo = Self::default();
        for pool in pools {
            repo.insert(pool);
        }
        repo
    }

    pub fn insert(&mut self, pool: PoolRecord) {
        self.by_address.insert(pool.address, pool.id);
        self.by_id.insert(pool.id, pool);
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Load a JSON array of pool records
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MigrationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| MigrationError::Provider(format!("{}: {}", path.display(), e)))?;
        let repo = Self::from_json_str(&content)?;
        debug!("Loaded {} pools from {}", repo.len(), path.display());
        Ok(repo)
    }

    pub fn from_json_str(content: &str) -> MigrationResult<Self> {
        let pools: Vec<PoolRecord> = serde_json::from_str(content)
            .map_err(|e| MigrationError::InvalidInput(format!("pool registry: {}", e)))?;
        Ok(Self::new(pools))
    }
}

#[async_trait]
impl PoolLookup for InMemoryPools {
    async fn find_by_id(&self, id: &PoolId) -> MigrationResult<Option<PoolRecord>> {
        Ok(self.by_id.get(id).cloned())
    }

    async fn find_by_address(&self, address: Address) -> MigrationResult<Option<PoolRecord>> {
        Ok(self
            .by_address
            .get(&address)
            .and_then(|id| self.by_id.get(id))
            .cloned())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryGauges {
    by_pool: HashMap<PoolId, GaugeRecord>,
}

impl InMemoryGauges {
    pub fn new(gauges: impl IntoIterator<Item = GaugeRecord>) -> Self {
        Self {
            by_pool: gauges.into_iter().map(|g| (g.pool_id, g)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_pool.is_empty()
    }

    /// Load a JSON array of gauge records
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> MigrationResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| MigrationError::Provider(format!("{}: {}", path.display(), e)))?;
        let gauges: Vec<GaugeRecord> = serde_json::from_str(&content)
            .map_err(|e| MigrationError::InvalidInput(format!("gauge registry: {}", e)))?;
        debug!("Loaded {} gauges from {}", gauges.len(), path.display());
        Ok(Self::new(gauges))
    }
}

#[async_trait]
impl GaugeLookup for InMemoryGauges {
    async fn find_by_pool_id(&self, pool_id: &PoolId) -> MigrationResult<Option<GaugeRecord>> {
        Ok(self.by_pool.get(pool_id).cloned())
    }
}
