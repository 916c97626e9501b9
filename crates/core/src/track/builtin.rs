use geo::Point;

use super::WaypointTrack;

/// Loop around Jingshan Park, Beijing, starting at the south gate and
/// running clockwise on the map (east side first).
const JINGSHAN_PARK: [(f64, f64); 27] = [
    (116.3934, 39.9235), // south gate
    (116.3938, 39.9238),
    (116.3942, 39.9240),
    (116.3945, 39.9242),
    (116.3948, 39.9245), // east side
    (116.3950, 39.9248),
    (116.3952, 39.9250),
    (116.3950, 39.9253),
    (116.3948, 39.9255), // north side
    (116.3945, 39.9257),
    (116.3942, 39.9258),
    (116.3938, 39.9259),
    (116.3934, 39.9260), // north gate
    (116.3930, 39.9259),
    (116.3926, 39.9258),
    (116.3923, 39.9257),
    (116.3920, 39.9255), // west side
    (116.3918, 39.9253),
    (116.3916, 39.9250),
    (116.3915, 39.9248),
    (116.3913, 39.9245),
    (116.3912, 39.9242), // south side
    (116.3915, 39.9240),
    (116.3918, 39.9238),
    (116.3922, 39.9236),
    (116.3926, 39.9235),
    (116.3930, 39.9234),
];

impl WaypointTrack {
    pub fn jingshan_park() -> Self {
        Self {
            points: JINGSHAN_PARK
                .iter()
                .map(|&(lon, lat)| Point::new(lon, lat))
                .collect(),
        }
    }
}
