//! Step selection
//!
//! Which relayer calls a migration needs is a pure function of the staking
//! positions, the source pool type, whether any wrapper conversion exists
//! and whether the caller wants a peek. The table below is the whole policy;
//! its row order is the execution order.

use std::fmt;

use crate::topology::PoolNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepKind {
    GaugeWithdraw,
    Exit,
    Swap,
    Join,
    Peek,
    GaugeDeposit,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::GaugeWithdraw => write!(f, "gaugeWithdraw"),
            StepKind::Exit => write!(f, "exitPool"),
            StepKind::Swap => write!(f, "batchSwap"),
            StepKind::Join => write!(f, "joinPool"),
            StepKind::Peek => write!(f, "peekChainedReferenceValue"),
            StepKind::GaugeDeposit => write!(f, "gaugeDeposit"),
        }
    }
}

/// Source pool classification relevant to step selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Exits into linear pool BPTs that must be swapped across
    ComposableStable,
    Other,
}

impl SourceKind {
    pub fn of(pool: &PoolNode) -> Self {
        match &pool.pool_type {
            Some(pool_type) if pool_type.is_composable_stable() => SourceKind::ComposableStable,
            _ => SourceKind::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanInputs {
    pub has_from_gauge: bool,
    pub has_to_gauge: bool,
    pub source: SourceKind,
    pub paths_non_empty: bool,
    pub peek: bool,
}

const RULES: [(StepKind, fn(&PlanInputs) -> bool); 6] = [
    (StepKind::GaugeWithdraw, |i: &PlanInputs| i.has_from_gauge),
    (StepKind::Exit, |_: &PlanInputs| true),
    (StepKind::Swap, |i: &PlanInputs| i.source == SourceKind::ComposableStable || i.paths_non_empty),
    (StepKind::Join, |_: &PlanInputs| true),
    (StepKind::Peek, |i: &PlanInputs| i.peek),
    (StepKind::GaugeDeposit, |i: &PlanInputs| i.has_to_gauge),
];

/// Ordered list of steps one migration will emit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationPlan {
    steps: Vec<StepKind>,
}

impl MigrationPlan {
    pub fn decide(inputs: &PlanInputs) -> Self {
        let steps = RULES
            .iter()
            .filter(|(_, applies)| applies(inputs))
            .map(|(step, _)| *step)
            .collect();
        Self { steps }
    }

    pub fn steps(&self) -> &[StepKind] {
        &self.steps
    }

    pub fn contains(&self, step: StepKind) -> bool {
        self.steps.contains(&step)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use StepKind::*;

    fn inputs(from_gauge: bool, to_gauge: bool, source: SourceKind, paths: bool) -> PlanInputs {
        PlanInputs {
            has_from_gauge: from_gauge,
            has_to_gauge: to_gauge,
            source,
            paths_non_empty: paths,
            peek: false,
        }
    }

    #[test]
    fn test_simple_pool_to_pool() {
        let plan = MigrationPlan::decide(&inputs(false, false, SourceKind::Other, false));
        assert_eq!(plan.steps(), &[Exit, Join]);
    }

    #[test]
    fn test_composable_always_swaps() {
        for paths in [false, true] {
            let plan = MigrationPlan::decide(&inputs(false, false, SourceKind::ComposableStable, paths));
            assert!(plan.contains(Swap));
        }
    }

    #[test]
    fn test_wrapper_paths_force_swap() {
        let plan = MigrationPlan::decide(&inputs(false, false, SourceKind::Other, true));
        assert_eq!(plan.steps(), &[Exit, Swap, Join]);
    }

    #[test]
    fn test_gauge_to_gauge_order() {
        let plan = MigrationPlan::decide(&inputs(true, true, SourceKind::Other, false));
        assert_eq!(plan.steps(), &[GaugeWithdraw, Exit, Join, GaugeDeposit]);

        let mut with_peek = inputs(true, true, SourceKind::ComposableStable, false);
        with_peek.peek = true;
        let plan = MigrationPlan::decide(&with_peek);
        assert_eq!(plan.steps(), &[GaugeWithdraw, Exit, Swap, Join, Peek, GaugeDeposit]);
    }

    #[test]
    fn test_every_plan_is_in_causal_order() {
        for bits in 0..32u8 {
            let plan = MigrationPlan::decide(&PlanInputs {
                has_from_gauge: bits & 1 != 0,
                has_to_gauge: bits & 2 != 0,
                source: if bits & 4 != 0 { SourceKind::ComposableStable } else { SourceKind::Other },
                paths_non_empty: bits & 8 != 0,
                peek: bits & 16 != 0,
            });

            assert!(plan.steps().windows(2).all(|w| w[0] < w[1]));
            assert!(plan.contains(Exit) && plan.contains(Join));
        }
    }
}
