//! Mainnet pool fixtures shared by unit tests
//!
//! MetaStable wstETH/WETH, bb-a-USD v1 (ComposableStable v1 over three Aave
//! linear pools) and a later bb-a-USD generation over new linear pools.

use alloy_primitives::{address, b256, Address, B256};

use crate::repository::{GaugeRecord, InMemoryGauges, InMemoryPools, PoolRecord, PoolToken};
use crate::topology::{PoolId, PoolType};

pub const RELAYER: Address = address!("fea793aa415061c483d2390414275ad314b3f621");
pub const USER: Address = address!("21ac89788d52070d23b8eacecbd3dc544178dc60");

// Plain tokens
pub const WSTETH: Address = address!("7f39c581f595b53c5cb19bd0b3f8da6c935e2ca0");
pub const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
pub const DAI: Address = address!("6b175474e89094c44da98b954eedcdecb5be3830");
pub const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");
pub const USDT: Address = address!("dac17f958d2ee523a2206206994597c13d831ec7");

// Aave v2 static wrappers
pub const WA_DAI: Address = address!("02d60b84491589974263d922d9cc7a3152618ef6");
pub const WA_USDC: Address = address!("d093fa4fb80d09bb30817fdcd442d4d02ed3e5de");
pub const WA_USDT: Address = address!("f8fd466f12e236f4c96f7cce6c79eadb819abf58");

// Aave v3 static wrappers
pub const WA3_DAI: Address = address!("098256c06ab24f5655c5506a6488781bd711c14b");
pub const WA3_USDC: Address = address!("57d20c946a7a3812a7225b881cdcd8431d23431c");
pub const WA3_USDT: Address = address!("862c57d48becb45583aeba3f489696d22466ca1b");

// MetaStable wstETH/WETH
pub const META_STABLE: Address = address!("32296969ef14eb0c6d29669c550d4a0449130230");
pub const META_STABLE_ID: PoolId =
    b256!("32296969ef14eb0c6d29669c550d4a0449130230000200000000000000000080");

// bb-a-USD v1 and its linear pools
pub const COMPOSABLE_STABLE: Address = address!("a13a9247ea42d743238089903570127dda72fe44");
pub const COMPOSABLE_STABLE_ID: PoolId =
    b256!("a13a9247ea42d743238089903570127dda72fe4400000000000000000000035d");
pub const BB_A_DAI: Address = address!("ae37d54ae477268b9997d4161b96b8200755935c");
pub const BB_A_DAI_ID: PoolId =
    b256!("ae37d54ae477268b9997d4161b96b8200755935c000000000000000000000337");
pub const BB_A_USDC: Address = address!("82698aecc9e28e9bb27608bd52cf57f704bd1b83");
pub const BB_A_USDC_ID: PoolId =
    b256!("82698aecc9e28e9bb27608bd52cf57f704bd1b83000000000000000000000336");
pub const BB_A_USDT: Address = address!("2f4eb100552ef93840d5adc30560e5513dfffacb");
pub const BB_A_USDT_ID: PoolId =
    b256!("2f4eb100552ef93840d5adc30560e5513dfffacb000000000000000000000334");

// bb-a-USD v3 and its linear pools
pub const COMPOSABLE_STABLE_V3: Address = address!("febb0bbf162e64fb9d0dfe186e517d84c395f016");
pub const COMPOSABLE_STABLE_V3_ID: PoolId =
    b256!("febb0bbf162e64fb9d0dfe186e517d84c395f016000000000000000000000502");
pub const BB_A3_DAI: Address = address!("6667c6fa9f2b3fc1cc8d85320b62703d938e4385");
pub const BB_A3_DAI_ID: PoolId =
    b256!("6667c6fa9f2b3fc1cc8d85320b62703d938e43850000000000000000000004fb");
pub const BB_A3_USDC: Address = address!("cbfa4532d8b2ade2c261d3dd5ef2a2284f792692");
pub const BB_A3_USDC_ID: PoolId =
    b256!("cbfa4532d8b2ade2c261d3dd5ef2a2284f7926920000000000000000000004fa");
pub const BB_A3_USDT: Address = address!("a1697f9af0875b63ddc472d6eebada8c1fab8568");
pub const BB_A3_USDT_ID: PoolId =
    b256!("a1697f9af0875b63ddc472d6eebada8c1fab85680000000000000000000004f9");

// Weighted pools over one wrapper of each generation and WETH
pub const WEIGHTED_DAI: Address = address!("0fd5663d4893ae0d579d580584806aadd2dd0b8b");
pub const WEIGHTED_DAI_ID: PoolId =
    b256!("0fd5663d4893ae0d579d580584806aadd2dd0b8b0002000000000000000003c0");
pub const WEIGHTED_DAI_V3: Address = address!("08775ccb6674d6bdceb0797c364c2653ed84f384");
pub const WEIGHTED_DAI_V3_ID: PoolId =
    b256!("08775ccb6674d6bdceb0797c364c2653ed84f3840002000000000000000004e0");

// Gauges
pub const META_STABLE_GAUGE: Address = address!("cd4722b7c24c29e0413bdcd9e51404b4539d14ae");
pub const COMPOSABLE_STABLE_GAUGE: Address = address!("a6325e799d266632d347e41265a69af111b05403");

fn pool(
    id: B256,
    address: Address,
    pool_type: PoolType,
    version: u32,
    main_index: Option<usize>,
    tokens: &[Address],
) -> PoolRecord {
    PoolRecord {
        id,
        address,
        tokens: tokens.iter().map(|&address| PoolToken { address }).collect(),
        pool_type,
        pool_type_version: version,
        main_index,
    }
}

pub fn meta_stable() -> PoolRecord {
    pool(META_STABLE_ID, META_STABLE, PoolType::MetaStable, 1, None, &[WSTETH, WETH])
}

pub fn composable_stable() -> PoolRecord {
    pool(
        COMPOSABLE_STABLE_ID,
        COMPOSABLE_STABLE,
        PoolType::ComposableStable,
        1,
        None,
        &[COMPOSABLE_STABLE, BB_A_DAI, BB_A_USDC, BB_A_USDT],
    )
}

pub fn composable_stable_v3() -> PoolRecord {
    pool(
        COMPOSABLE_STABLE_V3_ID,
        COMPOSABLE_STABLE_V3,
        PoolType::ComposableStable,
        4,
        None,
        &[COMPOSABLE_STABLE_V3, BB_A3_DAI, BB_A3_USDC, BB_A3_USDT],
    )
}

pub fn linear_pools() -> Vec<PoolRecord> {
    vec![
        // registry lists them unsorted; main index refers to the sorted order
        pool(BB_A_DAI_ID, BB_A_DAI, PoolType::AaveLinear, 1, Some(1), &[BB_A_DAI, WA_DAI, DAI]),
        pool(BB_A_USDC_ID, BB_A_USDC, PoolType::AaveLinear, 1, Some(1), &[BB_A_USDC, WA_USDC, USDC]),
        pool(BB_A_USDT_ID, BB_A_USDT, PoolType::AaveLinear, 1, Some(1), &[BB_A_USDT, WA_USDT, USDT]),
        pool(BB_A3_DAI_ID, BB_A3_DAI, PoolType::AaveLinear, 2, Some(2), &[BB_A3_DAI, WA3_DAI, DAI]),
        pool(BB_A3_USDC_ID, BB_A3_USDC, PoolType::AaveLinear, 2, Some(1), &[BB_A3_USDC, WA3_USDC, USDC]),
        pool(BB_A3_USDT_ID, BB_A3_USDT, PoolType::AaveLinear, 2, Some(2), &[BB_A3_USDT, WA3_USDT, USDT]),
    ]
}

/// Not part of [`pool_repository`]; insert them where a weighted source is needed
pub fn weighted_pools() -> Vec<PoolRecord> {
    vec![
        pool(WEIGHTED_DAI_ID, WEIGHTED_DAI, PoolType::Weighted, 2, None, &[BB_A_DAI, WETH]),
        pool(WEIGHTED_DAI_V3_ID, WEIGHTED_DAI_V3, PoolType::Weighted, 4, None, &[WETH, BB_A3_DAI]),
    ]
}

pub fn pool_repository() -> InMemoryPools {
    let mut pools = vec![meta_stable(), composable_stable(), composable_stable_v3()];
    pools.extend(linear_pools());
    InMemoryPools::new(pools)
}

pub fn gauge_repository() -> InMemoryGauges {
    InMemoryGauges::new([
        GaugeRecord { id: META_STABLE_GAUGE, pool_id: META_STABLE_ID },
        GaugeRecord { id: COMPOSABLE_STABLE_GAUGE, pool_id: COMPOSABLE_STABLE_ID },
    ])
}
