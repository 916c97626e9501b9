use std::f64::consts::PI;

use geo::Point;

/// Web Mercator tiles are 256 px square at every zoom level.
pub const TILE_SIZE: f64 = 256.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

/// A map container: the coordinate at its centre, zoom level and pixel size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub center: Point,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: Point, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Normalized Web Mercator position: x grows east, y grows south, both in
    /// `[0, 1]` over the projectable world.
    pub fn normalize(point: Point) -> (f64, f64) {
        let x = (point.x() + 180.0) / 360.0;

        let lat = point.y().to_radians();
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0;

        (x, y)
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    /// Pixel position of `point` inside the container, origin at top-left.
    pub fn project(&self, point: Point) -> ScreenPoint {
        let size = self.world_size();
        let (px, py) = Self::normalize(point);
        let (cx, cy) = Self::normalize(self.center);

        ScreenPoint {
            x: (px - cx) * size + self.width / 2.0,
            y: (py - cy) * size + self.height / 2.0,
        }
    }

    /// Top-left corner for a marker of the given size so that its centre
    /// sits on `point`.
    pub fn marker_origin(&self, point: Point, marker_width: f64, marker_height: f64) -> ScreenPoint {
        let center = self.project(point);
        ScreenPoint {
            x: center.x - marker_width / 2.0,
            y: center.y - marker_height / 2.0,
        }
    }

    pub fn contains(&self, point: Point) -> bool {
        let p = self.project(point);
        (0.0..=self.width).contains(&p.x) && (0.0..=self.height).contains(&p.y)
    }
}
