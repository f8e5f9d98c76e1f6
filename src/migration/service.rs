//! Migration Service
//!
//! Entry points that go from pool ids to a payload: resolve both pools,
//! read the position being moved, then hand off to [`MigrationBuilder`].

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use tracing::info;

use super::builder::{MigrationBuilder, MigrationPayload, MigrationRequest};
use super::decoder::decode_min_bpt_out;
use crate::chain::{BalanceQuery, CallSimulator};
use crate::error::{MigrationError, MigrationResult};
use crate::repository::{GaugeLookup, GaugeRecord, PoolLookup};
use crate::topology::{resolve_pool, PoolId, PoolNode};

/// A payload ready to sign, with the minimum BPT it was built against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMigration {
    pub payload: MigrationPayload,
    pub min_bpt_out: U256,
}

/// Resolved pools and the amount being moved
struct Position {
    user: Address,
    bpt_amount: U256,
    from: PoolNode,
    to: PoolNode,
    from_gauge: Option<Address>,
    to_gauge: Option<Address>,
}

pub struct Migrations {
    pools: Arc<dyn PoolLookup>,
    gauges: Arc<dyn GaugeLookup>,
    balances: Arc<dyn BalanceQuery>,
    builder: MigrationBuilder,
}

impl Migrations {
    pub fn new(
        relayer: Address,
        pools: Arc<dyn PoolLookup>,
        gauges: Arc<dyn GaugeLookup>,
        balances: Arc<dyn BalanceQuery>,
    ) -> Self {
        Self {
            pools,
            gauges,
            balances,
            builder: MigrationBuilder::new(relayer),
        }
    }

    pub fn with_builder(mut self, builder: MigrationBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn relayer(&self) -> Address {
        self.builder.relayer()
    }

    /// Move the user's whole unstaked BPT balance from one pool to another.
    ///
    /// Without `min_bpt_out` the payload ends with a peek of the joined
    /// amount, meant for a static call, and joins with a zero minimum.
    pub async fn pool2pool(
        &self,
        user: Address,
        from: PoolId,
        to: PoolId,
        min_bpt_out: Option<U256>,
    ) -> MigrationResult<MigrationPayload> {
        let position = self.pool_position(user, from, to).await?;
        self.build(&position, min_bpt_out)
    }

    /// Move the user's whole stake from one gauge to another; `from` and `to`
    /// are the ids of the gauges' pools.
    pub async fn gauge2gauge(
        &self,
        user: Address,
        from: PoolId,
        to: PoolId,
        min_bpt_out: Option<U256>,
    ) -> MigrationResult<MigrationPayload> {
        let position = self.gauge_position(user, from, to).await?;
        self.build(&position, min_bpt_out)
    }

    /// Minimum BPT out from the static-call result of a peek payload
    pub fn min_bpt_out(&self, return_data: &[u8]) -> MigrationResult<U256> {
        decode_min_bpt_out(return_data)
    }

    /// Peek, simulate, then rebuild with the simulated minimum
    pub async fn prepare_pool2pool(
        &self,
        user: Address,
        from: PoolId,
        to: PoolId,
        simulator: &dyn CallSimulator,
    ) -> MigrationResult<PreparedMigration> {
        let position = self.pool_position(user, from, to).await?;
        self.prepare(&position, simulator).await
    }

    pub async fn prepare_gauge2gauge(
        &self,
        user: Address,
        from: PoolId,
        to: PoolId,
        simulator: &dyn CallSimulator,
    ) -> MigrationResult<PreparedMigration> {
        let position = self.gauge_position(user, from, to).await?;
        self.prepare(&position, simulator).await
    }

    async fn pool_position(
        &self,
        user: Address,
        from: PoolId,
        to: PoolId,
    ) -> MigrationResult<Position> {
        let (from_pool, to_pool) = futures::try_join!(
            resolve_pool(&from, self.pools.as_ref()),
            resolve_pool(&to, self.pools.as_ref()),
        )?;

        let bpt_amount = self.balance(from_pool.address, user).await?;
        info!("pool2pool {} -> {}: {} BPT", from_pool.address, to_pool.address, bpt_amount);

        Ok(Position {
            user,
            bpt_amount,
            from: from_pool,
            to: to_pool,
            from_gauge: None,
            to_gauge: None,
        })
    }

    async fn gauge_position(
        &self,
        user: Address,
        from: PoolId,
        to: PoolId,
    ) -> MigrationResult<Position> {
        let (from_gauge, to_gauge) = futures::try_join!(self.gauge(&from), self.gauge(&to))?;

        let (from_pool, to_pool) = futures::try_join!(
            resolve_pool(&from_gauge.pool_id, self.pools.as_ref()),
            resolve_pool(&to_gauge.pool_id, self.pools.as_ref()),
        )?;

        let bpt_amount = self.balance(from_gauge.id, user).await?;
        info!("gauge2gauge {} -> {}: {} BPT", from_gauge.id, to_gauge.id, bpt_amount);

        Ok(Position {
            user,
            bpt_amount,
            from: from_pool,
            to: to_pool,
            from_gauge: Some(from_gauge.id),
            to_gauge: Some(to_gauge.id),
        })
    }

    fn build(
        &self,
        position: &Position,
        min_bpt_out: Option<U256>,
    ) -> MigrationResult<MigrationPayload> {
        self.builder.build(&MigrationRequest {
            user: position.user,
            bpt_amount: position.bpt_amount,
            min_bpt_out: min_bpt_out.unwrap_or(U256::ZERO),
            from: &position.from,
            to: &position.to,
            peek: min_bpt_out.is_none(),
            from_gauge: position.from_gauge,
            to_gauge: position.to_gauge,
        })
    }

    /// Peek and commit share one position so the simulated amount is the one committed
    async fn prepare(
        &self,
        position: &Position,
        simulator: &dyn CallSimulator,
    ) -> MigrationResult<PreparedMigration> {
        let peek = self.build(position, None)?;
        let min_bpt_out = self.simulate_min_out(position.user, &peek, simulator).await?;
        let payload = self.build(position, Some(min_bpt_out))?;
        Ok(PreparedMigration { payload, min_bpt_out })
    }

    async fn simulate_min_out(
        &self,
        user: Address,
        peek: &MigrationPayload,
        simulator: &dyn CallSimulator,
    ) -> MigrationResult<U256> {
        let return_data = simulator.simulate(user, peek).await?;
        let min_bpt_out = self.min_bpt_out(&return_data)?;
        info!("Simulated minimum BPT out: {}", min_bpt_out);
        Ok(min_bpt_out)
    }

    async fn gauge(&self, pool_id: &PoolId) -> MigrationResult<GaugeRecord> {
        self.gauges
            .find_by_pool_id(pool_id)
            .await?
            .ok_or_else(|| MigrationError::NotFound(format!("gauge for pool {}", pool_id)))
    }

    async fn balance(&self, token: Address, user: Address) -> MigrationResult<U256> {
        let balance = self.balances.balance_of(token, user).await?;
        if balance.is_zero() {
            return Err(MigrationError::InvalidInput(format!(
                "{} holds no {} to migrate",
                user, token
            )));
        }
        Ok(balance)
    }
}
