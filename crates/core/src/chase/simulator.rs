use std::sync::Arc;

use chrono::{DateTime, Utc};
use geo::Point;

use crate::{
    chase::snapshot::PositionSnapshot,
    config::ChaseConfig,
    error::{ChaseError, Result},
    track::WaypointTrack,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Runner,
    Chaser,
}

/// Lifecycle of a chase.
///
/// `Captured` is terminal: only a fresh `start` leaves it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Running,
    Paused,
    Captured,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running (idle, paused or already captured); nothing moved.
    Ignored,
    Advanced,
    /// Both actors landed on the same waypoint on this tick.
    Captured,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Positions {
    pub runner: Point,
    pub chaser: Point,
}

pub struct ChaseSimulator {
    track: Arc<WaypointTrack>,
    runner_index: usize,
    chaser_index: usize,
    runner_step: usize,
    chaser_step: usize,
    phase: Phase,
    ticks: u64,
}

impl ChaseSimulator {
    /// Both actors start on waypoint 0, idle.
    pub fn new(track: Arc<WaypointTrack>, config: &ChaseConfig) -> Result<Self> {
        config.validate()?;
        Self::with_steps(track, config.runner_step, config.chaser_step)
    }

    pub fn with_steps(
        track: Arc<WaypointTrack>,
        runner_step: usize,
        chaser_step: usize,
    ) -> Result<Self> {
        if runner_step == 0 || chaser_step == 0 {
            return Err(ChaseError::InvalidConfig(
                "step sizes must be positive".into(),
            ));
        }

        Ok(Self {
            track,
            runner_index: 0,
            chaser_index: 0,
            runner_step,
            chaser_step,
            phase: Phase::Idle,
            ticks: 0,
        })
    }

    pub fn track(&self) -> &Arc<WaypointTrack> {
        &self.track
    }

    pub fn runner_index(&self) -> usize {
        self.runner_index
    }

    pub fn chaser_index(&self) -> usize {
        self.chaser_index
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_captured(&self) -> bool {
        self.phase == Phase::Captured
    }

    /// Ticks applied since the last `start`.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn position(&self, role: Role) -> Point {
        let index = match role {
            Role::Runner => self.runner_index,
            Role::Chaser => self.chaser_index,
        };
        self.track.at(index as i64)
    }

    pub fn positions(&self) -> Positions {
        Positions {
            runner: self.position(Role::Runner),
            chaser: self.position(Role::Chaser),
        }
    }

    /// Track positions from the chaser forward to the runner.
    pub fn gap(&self) -> usize {
        let len = self.track.len();
        (self.runner_index + len - self.chaser_index) % len
    }

    /// Begin (or restart) a chase from the current positions.
    pub fn start(&mut self) {
        self.phase = Phase::Running;
        self.ticks = 0;
        tracing::info!(
            runner = self.runner_index,
            chaser = self.chaser_index,
            "chase started"
        );
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            tracing::info!(ticks = self.ticks, "chase paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            tracing::info!(ticks = self.ticks, "chase resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            Phase::Running => self.pause(),
            Phase::Paused => self.resume(),
            Phase::Idle | Phase::Captured => {}
        }
    }

    /// Advance the chaser, then the runner, and check for capture.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != Phase::Running {
            return TickOutcome::Ignored;
        }

        let len = self.track.len();
        self.chaser_index = (self.chaser_index + self.chaser_step % len) % len;
        self.runner_index = (self.runner_index + self.runner_step % len) % len;
        self.ticks += 1;

        tracing::debug!(
            tick = self.ticks,
            runner = self.runner_index,
            chaser = self.chaser_index,
            "tick"
        );

        if self.runner_index == self.chaser_index {
            self.phase = Phase::Captured;
            tracing::info!(
                ticks = self.ticks,
                index = self.runner_index,
                "runner captured"
            );
            TickOutcome::Captured
        } else {
            TickOutcome::Advanced
        }
    }

    /// First tick (counting from 1) on which the actors would meet if ticked
    /// without interruption from the current indices.
    ///
    /// Both indices return to their current values after `len` ticks, so the
    /// search never needs to look further than that.
    pub fn predicted_capture_tick(&self) -> Option<u64> {
        let len = self.track.len();
        let (mut runner, mut chaser) = (self.runner_index, self.chaser_index);

        for tick in 1..=len as u64 {
            chaser = (chaser + self.chaser_step % len) % len;
            runner = (runner + self.runner_step % len) % len;
            if runner == chaser {
                return Some(tick);
            }
        }

        None
    }

    pub fn snapshot(&self, timestamp: DateTime<Utc>) -> PositionSnapshot {
        let positions = self.positions();
        PositionSnapshot::new(positions.runner, positions.chaser, Some(timestamp))
    }

    /// Snap both actors to the waypoints nearest the saved coordinates.
    ///
    /// Leaves the phase alone, and leaves the indices alone if the snapshot
    /// is rejected.
    pub fn restore(&mut self, snapshot: &PositionSnapshot) -> Result<()> {
        snapshot.validate()?;

        let runner_index = self.track.closest_index(snapshot.runner());
        let chaser_index = self.track.closest_index(snapshot.chaser());

        self.runner_index = runner_index;
        self.chaser_index = chaser_index;

        tracing::info!(
            runner = runner_index,
            chaser = chaser_index,
            "positions restored"
        );
        Ok(())
    }

    /// Restore from a raw stored value.
    pub fn restore_value(&mut self, value: serde_json::Value) -> Result<()> {
        let snapshot = PositionSnapshot::from_value(value)?;
        self.restore(&snapshot)
    }
}

impl std::fmt::Debug for ChaseSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChaseSimulator")
            .field("waypoints", &self.track.len())
            .field("runner_index", &self.runner_index)
            .field("chaser_index", &self.chaser_index)
            .field("phase", &self.phase)
            .field("ticks", &self.ticks)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ring(len: usize) -> Arc<WaypointTrack> {
        let points = (0..len)
            .map(|i| {
                let angle = i as f64 / len as f64 * std::f64::consts::TAU;
                Point::new(angle.cos(), angle.sin())
            })
            .collect();
        Arc::new(WaypointTrack::new(points).unwrap())
    }

    fn park() -> ChaseSimulator {
        let track = Arc::new(WaypointTrack::jingshan_park());
        ChaseSimulator::new(track, &ChaseConfig::default()).unwrap()
    }

    #[test]
    fn test_new_sim_is_idle_at_origin() {
        let sim = park();
        assert_eq!(sim.phase(), Phase::Idle);
        assert_eq!(sim.runner_index(), 0);
        assert_eq!(sim.chaser_index(), 0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = ChaseConfig {
            runner_step: 0,
            ..Default::default()
        };
        assert!(ChaseSimulator::new(ring(5), &config).is_err());
    }

    #[test]
    fn test_with_steps_rejects_zero_step() {
        let result = ChaseSimulator::with_steps(ring(5), 2, 0);
        assert!(matches!(result, Err(ChaseError::InvalidConfig(_))));
    }

    #[test]
    fn test_idle_tick_is_ignored() {
        let mut sim = park();
        assert_eq!(sim.tick(), TickOutcome::Ignored);
        assert_eq!(sim.runner_index(), 0);
        assert_eq!(sim.ticks(), 0);
    }

    #[test]
    fn test_indices_follow_step_multiples() {
        let mut sim = park();
        sim.start();

        for n in 1..27u64 {
            assert_eq!(sim.tick(), TickOutcome::Advanced, "tick {n}");
            assert_eq!(sim.runner_index(), (2 * n as usize) % 27);
            assert_eq!(sim.chaser_index(), n as usize % 27);
        }
    }

    #[test]
    fn test_park_capture_happens_on_tick_27() {
        let mut sim = park();
        assert_eq!(sim.predicted_capture_tick(), Some(27));

        sim.start();
        for _ in 1..27 {
            assert_eq!(sim.tick(), TickOutcome::Advanced);
        }
        assert_eq!(sim.tick(), TickOutcome::Captured);
        assert_eq!(sim.phase(), Phase::Captured);
        assert_eq!(sim.ticks(), 27);
        assert_eq!(sim.runner_index(), 0);
        assert_eq!(sim.chaser_index(), 0);
    }

    #[test]
    fn test_captured_sim_ignores_ticks() {
        let mut sim = ChaseSimulator::with_steps(ring(10), 3, 1).unwrap();
        sim.start();
        while sim.tick() != TickOutcome::Captured {}

        let (runner, chaser) = (sim.runner_index(), sim.chaser_index());
        for _ in 0..5 {
            assert_eq!(sim.tick(), TickOutcome::Ignored);
        }
        assert_eq!(sim.runner_index(), runner);
        assert_eq!(sim.chaser_index(), chaser);

        // Pause and resume cannot leave the terminal phase
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Captured);
    }

    #[test]
    fn test_capture_matches_prediction() {
        for (len, runner_step, chaser_step) in [(10, 3, 1), (12, 5, 2), (7, 1, 3), (9, 4, 4)] {
            let mut sim = ChaseSimulator::with_steps(ring(len), runner_step, chaser_step).unwrap();
            let predicted = sim.predicted_capture_tick();

            sim.start();
            let mut captured_at = None;
            for tick in 1..=len as u64 {
                if sim.tick() == TickOutcome::Captured {
                    captured_at = Some(tick);
                    break;
                }
            }

            assert_eq!(captured_at, predicted, "len {len} steps {runner_step}/{chaser_step}");
        }
    }

    #[test]
    fn test_equal_steps_from_distinct_indices_never_capture() {
        let track = ring(6);
        let mut sim = ChaseSimulator::with_steps(track.clone(), 1, 1).unwrap();
        sim.restore(&PositionSnapshot::new(track.at(3), track.at(0), None))
            .unwrap();

        assert_eq!(sim.predicted_capture_tick(), None);
        sim.start();
        for _ in 0..20 {
            assert_eq!(sim.tick(), TickOutcome::Advanced);
        }
        assert_eq!(sim.gap(), 3);
    }

    #[test]
    fn test_paused_ticks_are_dropped() {
        let mut sim = park();
        sim.start();
        sim.tick();
        sim.tick();

        sim.pause();
        assert_eq!(sim.phase(), Phase::Paused);
        for _ in 0..10 {
            assert_eq!(sim.tick(), TickOutcome::Ignored);
        }
        assert_eq!(sim.runner_index(), 4);
        assert_eq!(sim.chaser_index(), 2);

        sim.resume();
        assert_eq!(sim.tick(), TickOutcome::Advanced);
        assert_eq!(sim.runner_index(), 6);
        assert_eq!(sim.chaser_index(), 3);
        assert_eq!(sim.ticks(), 3);
    }

    #[test]
    fn test_toggle_pause_round_trip() {
        let mut sim = park();
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Idle);

        sim.start();
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Paused);
        sim.toggle_pause();
        assert_eq!(sim.phase(), Phase::Running);
    }

    #[test]
    fn test_restart_keeps_positions_and_resets_ticks() {
        let mut sim = park();
        sim.start();
        sim.tick();
        sim.pause();

        sim.start();
        assert_eq!(sim.phase(), Phase::Running);
        assert_eq!(sim.ticks(), 0);
        assert_eq!(sim.runner_index(), 2);
        assert_eq!(sim.chaser_index(), 1);
    }

    #[test]
    fn test_restart_after_capture_separates_actors() {
        let mut sim = park();
        sim.start();
        while sim.tick() != TickOutcome::Captured {}

        sim.start();
        assert_eq!(sim.tick(), TickOutcome::Advanced);
        assert_eq!(sim.gap(), 1);
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut sim = park();
        sim.start();
        for _ in 0..11 {
            sim.tick();
        }
        let snapshot = sim.snapshot(Utc::now());
        let (runner, chaser) = (sim.runner_index(), sim.chaser_index());

        let mut other = park();
        other.restore(&snapshot).unwrap();
        assert_eq!(other.runner_index(), runner);
        assert_eq!(other.chaser_index(), chaser);
        assert_eq!(other.phase(), Phase::Idle);
    }

    #[test]
    fn test_restore_snaps_drifted_coordinates() {
        let mut sim = park();
        let track = sim.track().clone();
        let runner = track.at(12);
        let chaser = track.at(5);

        sim.restore(&PositionSnapshot::new(
            Point::new(runner.x() + 0.00003, runner.y() - 0.00002),
            Point::new(chaser.x() - 0.00001, chaser.y() + 0.00001),
            None,
        ))
        .unwrap();

        assert_eq!(sim.runner_index(), 12);
        assert_eq!(sim.chaser_index(), 5);
    }

    #[test]
    fn test_malformed_restore_leaves_indices() {
        let mut sim = park();
        sim.start();
        sim.tick();

        let result = sim.restore_value(json!({ "runnerX": 116.39, "runnerY": 39.92 }));
        assert!(matches!(result, Err(ChaseError::NotFound(_))));

        let result = sim.restore(&PositionSnapshot::new(
            Point::new(f64::NAN, 0.0),
            Point::new(0.0, 0.0),
            None,
        ));
        assert!(matches!(result, Err(ChaseError::NotFound(_))));

        assert_eq!(sim.runner_index(), 2);
        assert_eq!(sim.chaser_index(), 1);
        assert_eq!(sim.phase(), Phase::Running);
    }

    #[test]
    fn test_large_steps_wrap() {
        let mut sim = ChaseSimulator::with_steps(ring(5), 12, 1).unwrap();
        sim.start();
        sim.tick();
        assert_eq!(sim.runner_index(), 2);
        assert_eq!(sim.chaser_index(), 1);
    }

    #[test]
    fn test_actor_display() {
        assert_eq!(Role::Runner.to_string(), "runner");
        assert_eq!(Phase::Captured.to_string(), "captured");
    }
}
