//! One relayer call of a migration, before multicall packing

use alloy_primitives::Bytes;

use super::plan::StepKind;
use crate::error::MigrationResult;
use crate::relayer::{BatchSwap, ExitPool, GaugeDeposit, GaugeWithdraw, JoinPool, PeekReference};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStep {
    GaugeWithdraw(GaugeWithdraw),
    Exit(ExitPool),
    Swap(BatchSwap),
    Join(JoinPool),
    Peek(PeekReference),
    GaugeDeposit(GaugeDeposit),
}

impl MigrationStep {
    pub fn kind(&self) -> StepKind {
        match self {
            MigrationStep::GaugeWithdraw(_) => StepKind::GaugeWithdraw,
            MigrationStep::Exit(_) => StepKind::Exit,
            MigrationStep::Swap(_) => StepKind::Swap,
            MigrationStep::Join(_) => StepKind::Join,
            MigrationStep::Peek(_) => StepKind::Peek,
            MigrationStep::GaugeDeposit(_) => StepKind::GaugeDeposit,
        }
    }

    /// Calldata for this step as one multicall entry
    pub fn encode(&self) -> MigrationResult<Bytes> {
        match self {
            MigrationStep::GaugeWithdraw(step) => Ok(step.encode()),
            MigrationStep::Exit(step) => step.encode(),
            MigrationStep::Swap(step) => step.encode(),
            MigrationStep::Join(step) => step.encode(),
            MigrationStep::Peek(step) => Ok(step.encode()),
            MigrationStep::GaugeDeposit(step) => Ok(step.encode()),
        }
    }
}
