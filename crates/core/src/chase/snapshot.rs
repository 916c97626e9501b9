use chrono::{DateTime, Utc};
use geo::Point;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ChaseError, Result};

/// Coordinates of both actors, as written to the key-value store.
///
/// Coordinates rather than track indices are persisted so a saved chase can
/// be resumed on a track whose points have drifted slightly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    pub runner_x: f64,
    pub runner_y: f64,
    pub chaser_x: f64,
    pub chaser_y: f64,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

/// The timestamp is informational only: RFC 3339 strings and epoch
/// milliseconds are understood, anything else reads as `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;

    Ok(match value {
        Some(serde_json::Value::String(text)) => DateTime::parse_from_rfc3339(&text)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Some(serde_json::Value::Number(millis)) => millis
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

impl PositionSnapshot {
    pub fn new(runner: Point, chaser: Point, timestamp: Option<DateTime<Utc>>) -> Self {
        Self {
            runner_x: runner.x(),
            runner_y: runner.y(),
            chaser_x: chaser.x(),
            chaser_y: chaser.y(),
            timestamp,
        }
    }

    pub fn runner(&self) -> Point {
        Point::new(self.runner_x, self.runner_y)
    }

    pub fn chaser(&self) -> Point {
        Point::new(self.chaser_x, self.chaser_y)
    }

    /// Decode a stored value. Missing or mistyped fields mean there is no
    /// usable snapshot, so they surface as `NotFound`.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let snapshot: Self = serde_json::from_value(value)
            .map_err(|e| ChaseError::NotFound(format!("malformed snapshot: {e}")))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| ChaseError::Storage(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        let finite = [self.runner_x, self.runner_y, self.chaser_x, self.chaser_y]
            .iter()
            .all(|v| v.is_finite());

        if finite {
            Ok(())
        } else {
            Err(ChaseError::NotFound(
                "malformed snapshot: non-finite coordinate".into(),
            ))
        }
    }
}
