//! Configuration for the migration CLI
//!
//! Values come from the environment (and a `.env` file) or a TOML file.
//! The library itself takes everything as arguments; only the binary reads
//! this.

use alloy_primitives::Address;
use eyre::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::relayer::RELAYER_V5_MAINNET;

/// Batch relayer deployment for a known chain
pub fn default_relayer(chain_id: u64) -> Option<Address> {
    match chain_id {
        1 => Some(RELAYER_V5_MAINNET),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // ========== Network Settings ==========
    /// RPC used for balance reads and static-call simulation
    pub rpc_url: String,

    /// Chain ID (1 = Ethereum Mainnet)
    pub chain_id: u64,

    /// Relayer override; known chains fall back to their deployment
    pub relayer_address: Option<String>,

    // ========== Registries ==========
    /// JSON array of pools (`id`, `address`, `tokens`, `poolType`, ...)
    pub pools_file: String,

    /// JSON array of gauges (`id`, `poolId`)
    pub gauges_file: String,

    // ========== Simulation ==========
    /// Gas limit for the peek simulation `eth_call`
    pub simulation_gas_limit: u64,
}

impl Config {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            rpc_url: env::var("RPC_URL")
                .unwrap_or_else(|_| "https://eth.llamarpc.com".to_string()),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .unwrap_or(1),
            relayer_address: env::var("RELAYER_ADDRESS").ok(),

            pools_file: env::var("POOLS_FILE")
                .unwrap_or_else(|_| "./data/pools.json".to_string()),
            gauges_file: env::var("GAUGES_FILE")
                .unwrap_or_else(|_| "./data/gauges.json".to_string()),

            simulation_gas_limit: env::var("SIMULATION_GAS_LIMIT")
                .unwrap_or_else(|_| "8000000".to_string())
                .parse()
                .unwrap_or(8_000_000),
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Relayer to build against: the override, else the chain's deployment
    pub fn relayer(&self) -> Result<Address> {
        match &self.relayer_address {
            Some(raw) => Address::from_str(raw)
                .map_err(|e| eyre::eyre!("Invalid RELAYER_ADDRESS {}: {}", raw, e)),
            None => default_relayer(self.chain_id).ok_or_else(|| {
                eyre::eyre!("No known relayer on chain {}, set RELAYER_ADDRESS", self.chain_id)
            }),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc_url.is_empty() || self.rpc_url.contains("YOUR_API_KEY") {
            return Err(eyre::eyre!("Invalid RPC_URL - please set a valid Alchemy/Infura URL"));
        }

        self.relayer()?;

        if self.pools_file.is_empty() {
            return Err(eyre::eyre!("POOLS_FILE is required"));
        }
        if self.simulation_gas_limit < 500_000 {
            return Err(eyre::eyre!(
                "SIMULATION_GAS_LIMIT {} is too low for an exit and a join",
                self.simulation_gas_limit
            ));
        }

        Ok(())
    }

    /// Print configuration summary
    pub fn print_summary(&self) {
        let relayer = self
            .relayer()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "✗ Not Set".to_string());

        println!("╔════════════════════════════════════════════════════════════╗");
        println!("║              BPT MIGRATOR - CONFIGURATION                  ║");
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ Chain ID:          {:^40} ║", self.chain_id);
        println!("║ Relayer:           {:^40} ║", short(&relayer));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ REGISTRIES                                                 ║");
        println!("║ • Pools:           {:^40} ║", short(&self.pools_file));
        println!("║ • Gauges:          {:^40} ║", short(&self.gauges_file));
        println!("╠════════════════════════════════════════════════════════════╣");
        println!("║ SIMULATION                                                 ║");
        println!("║ • Gas Limit:       {:^40} ║", self.simulation_gas_limit);
        println!("╚════════════════════════════════════════════════════════════╝");
    }
}

/// Keep box rows aligned for long paths and addresses
fn short(value: &str) -> String {
    let len = value.chars().count();
    if len <= 40 {
        value.to_string()
    } else {
        format!("...{}", value.chars().skip(len - 37).collect::<String>())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: "https://eth.llamarpc.com".to_string(),
            chain_id: 1,
            relayer_address: None,
            pools_file: "./data/pools.json".to_string(),
            gauges_file: "./data/gauges.json".to_string(),
            simulation_gas_limit: 8_000_000,
        }
    }
}

// ============================================
// TESTS
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.relayer().unwrap(), RELAYER_V5_MAINNET);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_mainnet_default_supports_peek() {
        // V4 (0x2536..1afa) has no peekChainedReferenceValue and no 0xba11 references
        let v4: Address = "0x2536dfeecb7a0397cf98edada8486254533b1afa".parse().unwrap();
        let v5: Address = "0xfea793aa415061c483d2390414275ad314b3f621".parse().unwrap();

        assert_eq!(default_relayer(1), Some(v5));
        assert_ne!(default_relayer(1), Some(v4));
        assert_eq!(default_relayer(137), None);
    }

    #[test]
    fn test_relayer_override_and_unknown_chain() {
        let mut config = Config {
            chain_id: 137,
            ..Config::default()
        };
        assert!(config.relayer().is_err());
        assert!(config.validate().is_err());

        config.relayer_address = Some("0x28a224d9d398a1ebb7ba69bca515898966bb1b6b".to_string());
        assert!(config.relayer().is_ok());

        config.relayer_address = Some("not-an-address".to_string());
        assert!(config.relayer().is_err());
    }

    #[test]
    fn test_from_toml() {
        let config: Config = toml::from_str(
            r#"
            rpc_url = "http://localhost:8545"
            chain_id = 1
            pools_file = "pools.json"
            gauges_file = "gauges.json"
            simulation_gas_limit = 3000000
            "#,
        )
        .unwrap();

        assert_eq!(config.relayer_address, None);
        assert_eq!(config.simulation_gas_limit, 3_000_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_short_keeps_rows_aligned() {
        assert_eq!(short("pools.json"), "pools.json");
        let long = "/very/long/path/to/a/registry/directory/with/pools.json";
        assert_eq!(short(long).chars().count(), 40);
        assert!(short(long).ends_with("pools.json"));
    }
}
