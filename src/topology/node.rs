//! Pool tree nodes and pool type names

use alloy_primitives::{Address, B256};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::repository::PoolRecord;

/// Balancer pool ids are the pool address followed by specialization and nonce
pub type PoolId = B256;

// ============================================
// POOL TYPE
// ============================================

/// Pool type as reported by the pool registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PoolType {
    Weighted,
    Stable,
    MetaStable,
    ComposableStable,
    AaveLinear,
    ERC4626Linear,
    EulerLinear,
    GearboxLinear,
    YearnLinear,
    Gyro2,
    Gyro3,
    GyroE,
    Other(String),
}

impl PoolType {
    /// Linear pools wrap a single main token (e.g. DAI <-> aDAI)
    pub fn is_linear(&self) -> bool {
        self.as_str().contains("Linear")
    }

    pub fn is_composable_stable(&self) -> bool {
        matches!(self, PoolType::ComposableStable)
    }

    pub fn as_str(&self) -> &str {
        match self {
            PoolType::Weighted => "Weighted",
            PoolType::Stable => "Stable",
            PoolType::MetaStable => "MetaStable",
            PoolType::ComposableStable => "ComposableStable",
            PoolType::AaveLinear => "AaveLinear",
            PoolType::ERC4626Linear => "ERC4626Linear",
            PoolType::EulerLinear => "EulerLinear",
            PoolType::GearboxLinear => "GearboxLinear",
            PoolType::YearnLinear => "YearnLinear",
            PoolType::Gyro2 => "Gyro2",
            PoolType::Gyro3 => "Gyro3",
            PoolType::GyroE => "GyroE",
            PoolType::Other(name) => name,
        }
    }
}

impl FromStr for PoolType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Weighted" => PoolType::Weighted,
            "Stable" => PoolType::Stable,
            // the subgraph spells it both ways
            "MetaStable" | "Metastable" => PoolType::MetaStable,
            "ComposableStable" => PoolType::ComposableStable,
            "AaveLinear" => PoolType::AaveLinear,
            "ERC4626Linear" => PoolType::ERC4626Linear,
            "EulerLinear" => PoolType::EulerLinear,
            "GearboxLinear" => PoolType::GearboxLinear,
            "YearnLinear" => PoolType::YearnLinear,
            "Gyro2" => PoolType::Gyro2,
            "Gyro3" => PoolType::Gyro3,
            "GyroE" => PoolType::GyroE,
            other => PoolType::Other(other.to_string()),
        })
    }
}

impl From<String> for PoolType {
    fn from(name: String) -> Self {
        match name.parse() {
            Ok(pool_type) => pool_type,
            Err(never) => match never {},
        }
    }
}

impl From<PoolType> for String {
    fn from(pool_type: PoolType) -> Self {
        pool_type.as_str().to_string()
    }
}

impl fmt::Display for PoolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================
// POOL NODE
// ============================================

/// One level of a (possibly nested) pool.
///
/// A node without children is a plain ERC-20 token. Children are kept in
/// ascending address order, which is the order the Vault expects for the
/// asset and amount arrays of exits and joins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolNode {
    pub address: Address,
    pub pool_id: Option<PoolId>,
    pub pool_type: Option<PoolType>,
    pub pool_type_version: Option<u32>,
    pub main_token_index: Option<usize>,
    pub children: Vec<PoolNode>,
}

impl PoolNode {
    /// A plain token
    pub fn leaf(address: Address) -> Self {
        Self {
            address,
            pool_id: None,
            pool_type: None,
            pool_type_version: None,
            main_token_index: None,
            children: Vec::new(),
        }
    }

    /// A pool level built from registry data and its already resolved tokens
    pub fn from_record(record: &PoolRecord, children: Vec<PoolNode>) -> Self {
        Self {
            address: record.address,
            pool_id: Some(record.id),
            pool_type: Some(record.pool_type.clone()),
            pool_type_version: Some(record.pool_type_version),
            main_token_index: record.main_index,
            children,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Addresses of the direct children, in tree order
    pub fn token_addresses(&self) -> Vec<Address> {
        self.children.iter().map(|c| c.address).collect()
    }

    /// Address of the wrapped main token, for pools that declare one
    pub fn main_token(&self) -> Option<Address> {
        self.main_token_index
            .and_then(|idx| self.children.get(idx))
            .map(|token| token.address)
    }

    pub fn is_linear(&self) -> bool {
        self.pool_type.as_ref().is_some_and(PoolType::is_linear)
    }

    /// First-version composable stable pools cannot exit proportionally
    pub fn is_composable_stable_v1(&self) -> bool {
        self.pool_type.as_ref().is_some_and(PoolType::is_composable_stable)
            && self.pool_type_version == Some(1)
    }

    /// True when every level of the tree lists its children in strictly ascending order
    pub fn is_canonically_sorted(&self) -> bool {
        self.children.windows(2).all(|w| w[0].address < w[1].address)
            && self.children.iter().all(PoolNode::is_canonically_sorted)
    }
}
