//! # park-chase-core
//!
//! A runner and a chaser circling a loop of geographic waypoints.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use park_chase_core::prelude::*;
//!
//! let track = Arc::new(WaypointTrack::jingshan_park());
//! let mut sim = ChaseSimulator::new(track, &ChaseConfig::default()).unwrap();
//!
//! sim.start();
//! let mut ticks = 0;
//! while sim.tick() != TickOutcome::Captured {
//!     ticks += 1;
//! }
//! assert_eq!(ticks + 1, 27);
//! ```

pub mod chase;
pub mod config;
pub mod driver;
pub mod error;
pub mod map;
pub mod store;
pub mod track;

pub mod prelude {
    pub use crate::chase::{ChaseSimulator, Phase, PositionSnapshot, Positions, Role, TickOutcome};
    pub use crate::config::ChaseConfig;
    pub use crate::driver::{ChaseDriver, ChaseStatus, MarkerSink};
    pub use crate::error::{ChaseError, Result};
    pub use crate::store::{JsonFileStore, KeyValueStore, MemoryStore};
    pub use crate::track::WaypointTrack;
}
