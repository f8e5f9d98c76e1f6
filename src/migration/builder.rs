//! Migration Step Builder
//!
//! Turns two resolved pool trees into one relayer multicall:
//! unstake, exit, swap wrappers, join, peek, restake. Which of those run is
//! decided by [`MigrationPlan`]; this module fills in the arguments and wires
//! the chained references between them.

use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes, U256};
use tracing::{debug, info, warn};

use super::paths::build_paths;
use super::plan::{MigrationPlan, PlanInputs, SourceKind, StepKind};
use super::references::ReferenceAllocator;
use super::steps::MigrationStep;
use crate::error::{MigrationError, MigrationResult};
use crate::relayer::{
    encode_multicall, pool_address, Amount, BatchSwap, ChainedReference, ExitKind, ExitPool,
    GaugeDeposit, GaugeWithdraw, JoinPool, OutputReference, PeekReference, SwapPath, SwapRoute,
};
use crate::topology::{PoolId, PoolNode, PoolType};

/// Everything one migration needs; pools must already be resolved
#[derive(Debug, Clone)]
pub struct MigrationRequest<'a> {
    pub user: Address,
    pub bpt_amount: U256,
    pub min_bpt_out: U256,
    pub from: &'a PoolNode,
    pub to: &'a PoolNode,
    /// Append a peek of the joined BPT so a static call reveals the amount
    pub peek: bool,
    pub from_gauge: Option<Address>,
    pub to_gauge: Option<Address>,
}

/// Ready to send transaction: `data` is `multicall(bytes[])` on the relayer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPayload {
    pub to: Address,
    pub data: Bytes,
    pub steps: Vec<MigrationStep>,
}

impl MigrationPayload {
    pub fn step_kinds(&self) -> Vec<StepKind> {
        self.steps.iter().map(MigrationStep::kind).collect()
    }
}

#[derive(Debug, Clone)]
pub struct MigrationBuilder {
    relayer: Address,
    swap_deadline: U256,
}

impl MigrationBuilder {
    pub fn new(relayer: Address) -> Self {
        Self {
            relayer,
            swap_deadline: U256::MAX,
        }
    }

    /// Deadline for the batch swap; the default never expires
    pub fn with_swap_deadline(mut self, deadline: U256) -> Self {
        self.swap_deadline = deadline;
        self
    }

    pub fn relayer(&self) -> Address {
        self.relayer
    }

    pub fn build(&self, request: &MigrationRequest<'_>) -> MigrationResult<MigrationPayload> {
        let (from_id, from_type) = required(request.from, "from")?;
        let (to_id, _) = required(request.to, "to")?;

        // First-version composable pools only support single token exits
        let exit_token_index = request.from.is_composable_stable_v1().then_some(0);
        let exit_slots: Vec<usize> = match exit_token_index {
            Some(idx) => vec![idx],
            None => (0..request.from.children.len()).collect(),
        };

        let paths = build_paths(&request.from.children, &request.to.children, exit_token_index)?;

        let plan = MigrationPlan::decide(&PlanInputs {
            has_from_gauge: request.from_gauge.is_some(),
            has_to_gauge: request.to_gauge.is_some(),
            source: SourceKind::of(request.from),
            paths_non_empty: paths.iter().any(|p| !p.is_empty()),
            peek: request.peek,
        });

        let mut allocator = ReferenceAllocator::new();
        let mut exit_refs: BTreeMap<usize, ChainedReference> = BTreeMap::new();
        let mut swap_refs: BTreeMap<usize, ChainedReference> = BTreeMap::new();
        let mut join_ref: Option<ChainedReference> = None;
        let mut steps = Vec::with_capacity(plan.len());

        for kind in plan.steps() {
            let step = match kind {
                StepKind::GaugeWithdraw => {
                    let gauge = request.from_gauge.ok_or_else(|| {
                        MigrationError::InvalidInput("unstake without a source gauge".to_string())
                    })?;
                    MigrationStep::GaugeWithdraw(GaugeWithdraw {
                        gauge,
                        sender: request.user,
                        recipient: self.relayer,
                        amount: request.bpt_amount,
                    })
                }

                StepKind::Exit => {
                    let mut output_references = Vec::with_capacity(exit_slots.len());
                    for &slot in &exit_slots {
                        let reference = allocator.exit_output(slot)?;
                        exit_refs.insert(slot, reference);
                        output_references.push(OutputReference { index: slot, reference });
                    }

                    let exit_kind = match exit_token_index {
                        Some(token_index) => ExitKind::SingleToken { token_index },
                        None => ExitKind::Proportional {
                            composable: from_type.is_composable_stable(),
                        },
                    };

                    MigrationStep::Exit(ExitPool {
                        pool_id: from_id,
                        assets: request.from.token_addresses(),
                        kind: exit_kind,
                        bpt_amount: request.bpt_amount,
                        sender: if request.from_gauge.is_some() { self.relayer } else { request.user },
                        recipient: self.relayer,
                        output_references,
                        to_internal_balance: true,
                    })
                }

                StepKind::Swap => {
                    let mut routes = Vec::new();
                    for (&slot, path) in exit_slots.iter().zip(&paths) {
                        if path.is_empty() {
                            continue;
                        }
                        let route = self.route(slot, path, &exit_refs, &mut allocator)?;
                        swap_refs.insert(slot, route.output_reference);
                        routes.push(route);
                    }

                    MigrationStep::Swap(BatchSwap {
                        routes,
                        sender: self.relayer,
                        recipient: self.relayer,
                        deadline: self.swap_deadline,
                        to_internal_balance: true,
                    })
                }

                StepKind::Join => {
                    let from_tokens = request.from.token_addresses();
                    let to_bpt = pool_address(&to_id);

                    let mut amounts_in = Vec::with_capacity(request.to.children.len());
                    for token in request.to.children.iter().filter(|t| t.address != to_bpt) {
                        let amount = join_amount(token.address, &from_tokens, &swap_refs, &exit_refs);
                        allocator.consume(amount, StepKind::Join)?;
                        amounts_in.push(amount);
                    }

                    let output_reference = allocator.join_output()?;
                    join_ref = Some(output_reference);

                    MigrationStep::Join(JoinPool {
                        pool_id: to_id,
                        assets: request.to.token_addresses(),
                        amounts_in,
                        min_bpt_out: request.min_bpt_out,
                        sender: self.relayer,
                        recipient: if request.to_gauge.is_some() { self.relayer } else { request.user },
                        output_reference,
                        from_internal_balance: true,
                    })
                }

                StepKind::Peek => {
                    let reference = joined_bpt(join_ref)?;
                    allocator.consume(reference.into(), StepKind::Peek)?;
                    MigrationStep::Peek(PeekReference { reference })
                }

                StepKind::GaugeDeposit => {
                    let gauge = request.to_gauge.ok_or_else(|| {
                        MigrationError::InvalidInput("restake without a destination gauge".to_string())
                    })?;
                    let reference = joined_bpt(join_ref)?;
                    allocator.consume(reference.into(), StepKind::GaugeDeposit)?;
                    MigrationStep::GaugeDeposit(GaugeDeposit {
                        gauge,
                        sender: self.relayer,
                        recipient: request.user,
                        amount: reference.into(),
                    })
                }
            };

            debug!("Step {}: {}", steps.len() + 1, step.kind());
            steps.push(step);
        }

        for reference in exit_refs.values().chain(swap_refs.values()).chain(join_ref.iter()) {
            debug!(
                "{} produced by {:?}, read by {:?}",
                reference,
                allocator.producer(reference),
                allocator.consumers(reference)
            );
        }

        let calls = steps
            .iter()
            .map(MigrationStep::encode)
            .collect::<MigrationResult<Vec<_>>>()?;
        let data = encode_multicall(calls);

        info!(
            "Migration {} -> {}: {} steps, {} bytes, references {:?}",
            request.from.address,
            request.to.address,
            steps.len(),
            data.len(),
            allocator.allocated_keys()
        );

        Ok(MigrationPayload {
            to: self.relayer,
            data,
            steps,
        })
    }

    fn route(
        &self,
        slot: usize,
        path: &SwapPath,
        exit_refs: &BTreeMap<usize, ChainedReference>,
        allocator: &mut ReferenceAllocator,
    ) -> MigrationResult<SwapRoute> {
        let amount_in: Amount = exit_refs
            .get(&slot)
            .copied()
            .ok_or_else(|| {
                MigrationError::InvalidInput(format!("swap slot {} has no exit output", slot))
            })?
            .into();
        allocator.consume(amount_in, StepKind::Swap)?;

        Ok(SwapRoute {
            path: path.clone(),
            amount_in,
            output_reference: allocator.swap_output(slot)?,
        })
    }
}

fn required<'a>(pool: &'a PoolNode, which: &str) -> MigrationResult<(PoolId, &'a PoolType)> {
    match (pool.pool_id, &pool.pool_type) {
        (Some(id), Some(pool_type)) if !pool.children.is_empty() => Ok((id, pool_type)),
        _ => Err(MigrationError::pool_data_missing(which)),
    }
}

fn joined_bpt(join_ref: Option<ChainedReference>) -> MigrationResult<ChainedReference> {
    join_ref.ok_or_else(|| MigrationError::InvalidInput("join output read before join".to_string()))
}

/// Swap output of the matching source slot, else its exit output, else zero
fn join_amount(
    token: Address,
    from_tokens: &[Address],
    swap_refs: &BTreeMap<usize, ChainedReference>,
    exit_refs: &BTreeMap<usize, ChainedReference>,
) -> Amount {
    let reference = from_tokens
        .iter()
        .position(|&address| address == token)
        .and_then(|slot| swap_refs.get(&slot).or_else(|| exit_refs.get(&slot)));

    match reference {
        Some(reference) => (*reference).into(),
        None => {
            warn!("No source amount for join token {}, joining with 0", token);
            Amount::ZERO
        }
    }
}
