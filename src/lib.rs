//! BPT Migrator
//!
//! Builds single-transaction Balancer relayer multicalls that move a BPT
//! position (staked or not) from one pool to another.

pub mod chain;
pub mod config;
pub mod error;
pub mod migration;
pub mod relayer;
pub mod repository;
pub mod topology;

#[cfg(test)]
mod fixtures;

pub use error::{MigrationError, MigrationResult};
