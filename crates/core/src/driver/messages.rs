use actix::Message;

use crate::{
    chase::{Phase, PositionSnapshot, Positions},
    driver::ChaseStatus,
    error::Result,
};

/// Start (or restart) ticking, cancelling any interval already running.
#[derive(Message)]
#[rtype(result = "()")]
pub struct Start;

#[derive(Message)]
#[rtype(result = "Phase")]
pub struct Pause;

#[derive(Message)]
#[rtype(result = "Phase")]
pub struct Resume;

#[derive(Message)]
#[rtype(result = "Phase")]
pub struct TogglePause;

#[derive(Message)]
#[rtype(result = "ChaseStatus")]
pub struct QueryStatus;

/// Persist current coordinates under the configured key.
#[derive(Message)]
#[rtype(result = "Result<PositionSnapshot>")]
pub struct SavePositions;

/// Snap both actors to the saved coordinates.
#[derive(Message)]
#[rtype(result = "Result<Positions>")]
pub struct LoadPositions;
