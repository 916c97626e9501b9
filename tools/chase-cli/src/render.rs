use geo::Point;
use park_chase_core::{chase::Role, driver::MarkerSink, map::Viewport};

/// Marker images are square.
const MARKER_SIZE: f64 = 32.0;

/// Reports where each marker would be drawn in the map container.
pub struct LogSink {
    viewport: Viewport,
}

impl LogSink {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }
}

impl MarkerSink for LogSink {
    fn place(&self, role: Role, at: Point) {
        let origin = self.viewport.marker_origin(at, MARKER_SIZE, MARKER_SIZE);
        tracing::debug!(
            %role,
            lon = at.x(),
            lat = at.y(),
            left = origin.x.round(),
            top = origin.y.round(),
            "marker moved"
        );
    }

    fn captured(&self, at: Point, ticks: u64) {
        tracing::info!(lon = at.x(), lat = at.y(), ticks, "runner captured");
        println!("Caught! The chaser reached the runner after {ticks} ticks.");
    }
}
