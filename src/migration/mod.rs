//! Migration building: plan the relayer steps between two resolved pools,
//! wire their chained references and pack them into one multicall.

mod builder;
mod decoder;
mod paths;
mod plan;
mod references;
mod service;
mod steps;

pub use builder::{MigrationBuilder, MigrationPayload, MigrationRequest};
pub use decoder::decode_min_bpt_out;
pub use paths::build_paths;
pub use plan::{MigrationPlan, PlanInputs, SourceKind, StepKind};
pub use references::{slot_key, ReferenceAllocator, EXIT_KEY_PREFIX, JOIN_OUTPUT_KEY, SWAP_KEY_PREFIX};
pub use service::{Migrations, PreparedMigration};
pub use steps::MigrationStep;
