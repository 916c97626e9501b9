//! The runner/chaser state machine and its persisted form.

pub mod simulator;
pub mod snapshot;

pub use simulator::{ChaseSimulator, Phase, Positions, Role, TickOutcome};
pub use snapshot::PositionSnapshot;
