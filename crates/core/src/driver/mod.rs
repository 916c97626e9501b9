//! Timer-driven chase: an actix actor that owns the simulator, its tick
//! interval, the snapshot store and the marker sink.

mod messages;

use std::sync::Arc;

use actix::{
    ActorFutureExt, AsyncContext, Context, Handler, MessageResult, ResponseActFuture,
    ResponseFuture, SpawnHandle, WrapFuture,
};
use chrono::Utc;
use geo::Point;

use crate::{
    chase::{ChaseSimulator, Phase, Positions, PositionSnapshot, Role, TickOutcome},
    config::ChaseConfig,
    error::Result,
    store::{KeyValueStore, load_snapshot, save_snapshot},
    track::WaypointTrack,
};

pub use messages::{LoadPositions, Pause, QueryStatus, Resume, SavePositions, Start, TogglePause};

/// Receives marker positions as the chase moves. Drawing them is up to the
/// implementor.
pub trait MarkerSink {
    fn place(&self, role: Role, at: Point);

    fn captured(&self, at: Point, ticks: u64) {
        let _ = (at, ticks);
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChaseStatus {
    pub phase: Phase,
    pub runner_index: usize,
    pub chaser_index: usize,
    pub ticks: u64,
    pub positions: Positions,
    /// Whether a tick interval is currently scheduled
    pub timer_active: bool,
}

pub struct ChaseDriver {
    simulator: ChaseSimulator,
    config: ChaseConfig,
    store: Arc<dyn KeyValueStore>,
    sink: Box<dyn MarkerSink>,
    timer: Option<SpawnHandle>,
}

impl ChaseDriver {
    pub fn new(
        track: Arc<WaypointTrack>,
        config: ChaseConfig,
        store: Arc<dyn KeyValueStore>,
        sink: Box<dyn MarkerSink>,
    ) -> Result<Self> {
        let simulator = ChaseSimulator::new(track, &config)?;

        Ok(Self {
            simulator,
            config,
            store,
            sink,
            timer: None,
        })
    }

    fn publish(&self) {
        let positions = self.simulator.positions();
        self.sink.place(Role::Runner, positions.runner);
        self.sink.place(Role::Chaser, positions.chaser);
    }

    fn stop_timer(&mut self, ctx: &mut Context<Self>) {
        if let Some(handle) = self.timer.take() {
            ctx.cancel_future(handle);
        }
    }

    fn on_tick(&mut self, ctx: &mut Context<Self>) {
        match self.simulator.tick() {
            TickOutcome::Ignored => {}
            TickOutcome::Advanced => self.publish(),
            TickOutcome::Captured => {
                self.publish();
                self.sink.captured(
                    self.simulator.position(Role::Runner),
                    self.simulator.ticks(),
                );
                self.stop_timer(ctx);
            }
        }
    }

    fn status(&self) -> ChaseStatus {
        ChaseStatus {
            phase: self.simulator.phase(),
            runner_index: self.simulator.runner_index(),
            chaser_index: self.simulator.chaser_index(),
            ticks: self.simulator.ticks(),
            positions: self.simulator.positions(),
            timer_active: self.timer.is_some(),
        }
    }
}

impl actix::Actor for ChaseDriver {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        tracing::info!(
            waypoints = self.simulator.track().len(),
            loop_m = self.simulator.track().length_m().round(),
            predicted_capture_tick = ?self.simulator.predicted_capture_tick(),
            "chase driver ready"
        );
        self.publish();
    }

    fn stopped(&mut self, ctx: &mut Self::Context) {
        self.stop_timer(ctx);
    }
}

impl Handler<Start> for ChaseDriver {
    type Result = ();

    fn handle(&mut self, _msg: Start, ctx: &mut Self::Context) -> Self::Result {
        // Never leave a second interval running
        self.stop_timer(ctx);
        self.simulator.start();

        let handle = ctx.run_interval(self.config.tick_interval(), |driver, ctx| {
            driver.on_tick(ctx);
        });
        self.timer = Some(handle);
    }
}

impl Handler<Pause> for ChaseDriver {
    type Result = MessageResult<Pause>;

    fn handle(&mut self, _msg: Pause, _ctx: &mut Self::Context) -> Self::Result {
        self.simulator.pause();
        MessageResult(self.simulator.phase())
    }
}

impl Handler<Resume> for ChaseDriver {
    type Result = MessageResult<Resume>;

    fn handle(&mut self, _msg: Resume, _ctx: &mut Self::Context) -> Self::Result {
        self.simulator.resume();
        MessageResult(self.simulator.phase())
    }
}

impl Handler<TogglePause> for ChaseDriver {
    type Result = MessageResult<TogglePause>;

    fn handle(&mut self, _msg: TogglePause, _ctx: &mut Self::Context) -> Self::Result {
        self.simulator.toggle_pause();
        MessageResult(self.simulator.phase())
    }
}

impl Handler<QueryStatus> for ChaseDriver {
    type Result = MessageResult<QueryStatus>;

    fn handle(&mut self, _msg: QueryStatus, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.status())
    }
}

impl Handler<SavePositions> for ChaseDriver {
    type Result = ResponseFuture<Result<PositionSnapshot>>;

    fn handle(&mut self, _msg: SavePositions, _ctx: &mut Self::Context) -> Self::Result {
        let snapshot = self.simulator.snapshot(Utc::now());
        let store = Arc::clone(&self.store);
        let key = self.config.storage_key.clone();

        Box::pin(async move {
            save_snapshot(&*store, &key, &snapshot)
                .await
                .inspect_err(|e| tracing::warn!(%e, "failed to save positions"))?;
            Ok(snapshot)
        })
    }
}

impl Handler<LoadPositions> for ChaseDriver {
    type Result = ResponseActFuture<Self, Result<Positions>>;

    fn handle(&mut self, _msg: LoadPositions, _ctx: &mut Self::Context) -> Self::Result {
        let store = Arc::clone(&self.store);
        let key = self.config.storage_key.clone();

        Box::pin(
            async move { load_snapshot(&*store, &key).await }
                .into_actor(self)
                .map(|loaded, driver, _ctx| {
                    let restored = loaded.and_then(|snapshot| driver.simulator.restore(&snapshot));
                    if let Err(e) = &restored {
                        tracing::warn!(%e, "failed to load positions");
                    }
                    restored?;

                    driver.publish();
                    Ok(driver.simulator.positions())
                }),
        )
    }
}
