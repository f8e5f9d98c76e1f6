//! Chained-Reference Allocator
//!
//! Key scheme for one migration:
//! - exit output of slot `n`: `10n`
//! - swap output of slot `n`: `20n`
//! - BPT minted by the join: `999` (read-only, so a peek does not clear it)
//!
//! Keys are decimal concatenations, so the two prefixes can never collide
//! with each other or with the join key.

use std::collections::BTreeMap;

use super::plan::StepKind;
use crate::error::{MigrationError, MigrationResult};
use crate::relayer::{Amount, ChainedReference};

pub const EXIT_KEY_PREFIX: u64 = 10;
pub const SWAP_KEY_PREFIX: u64 = 20;
pub const JOIN_OUTPUT_KEY: u64 = 999;

/// Decimal concatenation of `prefix` and `slot` (`10` and `3` give `103`)
pub fn slot_key(prefix: u64, slot: usize) -> u64 {
    let slot = slot as u64;
    let mut shift = 10;
    while shift <= slot {
        shift *= 10;
    }
    prefix * shift + slot
}

/// Tracks which step produces and which steps consume each reference
#[derive(Debug, Default)]
pub struct ReferenceAllocator {
    producers: BTreeMap<u64, StepKind>,
    consumers: Vec<(u64, StepKind)>,
}

impl ReferenceAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exit_output(&mut self, slot: usize) -> MigrationResult<ChainedReference> {
        let reference = ChainedReference::temporary(slot_key(EXIT_KEY_PREFIX, slot));
        self.produce(reference, StepKind::Exit)
    }

    pub fn swap_output(&mut self, slot: usize) -> MigrationResult<ChainedReference> {
        let reference = ChainedReference::temporary(slot_key(SWAP_KEY_PREFIX, slot));
        self.produce(reference, StepKind::Swap)
    }

    pub fn join_output(&mut self) -> MigrationResult<ChainedReference> {
        self.produce(ChainedReference::read_only(JOIN_OUTPUT_KEY), StepKind::Join)
    }

    fn produce(
        &mut self,
        reference: ChainedReference,
        step: StepKind,
    ) -> MigrationResult<ChainedReference> {
        if let Some(previous) = self.producers.get(&reference.key()) {
            return Err(MigrationError::InvalidInput(format!(
                "{} allocated by {} is already produced by {}",
                reference, step, previous
            )));
        }
        self.producers.insert(reference.key(), step);
        Ok(reference)
    }

    /// Record that `step` reads `amount`.
    ///
    /// Literal amounts always pass; references must come from an earlier step.
    pub fn consume(&mut self, amount: Amount, step: StepKind) -> MigrationResult<()> {
        let Some(reference) = amount.as_reference() else {
            return Ok(());
        };

        match self.producers.get(&reference.key()) {
            Some(producer) if *producer < step => {
                self.consumers.push((reference.key(), step));
                Ok(())
            }
            Some(producer) => Err(MigrationError::InvalidInput(format!(
                "{} read by {} is produced later by {}",
                reference, step, producer
            ))),
            None => Err(MigrationError::InvalidInput(format!(
                "{} read by {} is never produced",
                reference, step
            ))),
        }
    }

    pub fn producer(&self, reference: &ChainedReference) -> Option<StepKind> {
        self.producers.get(&reference.key()).copied()
    }

    pub fn consumers(&self, reference: &ChainedReference) -> Vec<StepKind> {
        self.consumers
            .iter()
            .filter(|(key, _)| *key == reference.key())
            .map(|(_, step)| *step)
            .collect()
    }

    /// Every key allocated so far, ascending
    pub fn allocated_keys(&self) -> Vec<u64> {
        self.producers.keys().copied().collect()
    }
}
