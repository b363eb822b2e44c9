pub mod csv;

pub use csv::load_track;

use serde::{Deserialize, Serialize};

/// A single recorded sample along a ride
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RidePoint {
    /// Seconds from ride start
    pub time: f64,

    /// Latitude in degrees
    pub lat: f64,

    /// Longitude in degrees
    pub lon: f64,

    /// Elevation in meters
    pub elevation: f64,

    /// Ground speed in m/s
    pub speed: f64,
}

/// A recorded ride track
///
/// Points are kept sorted by time so lookups by virtual time can binary
/// search. The track is immutable after load.
#[derive(Debug, Clone, Default)]
pub struct RideTrack {
    points: Vec<RidePoint>,
}

impl RideTrack {
    pub fn new(mut points: Vec<RidePoint>) -> Self {
        points.sort_by(|a, b| {
            a.time
                .partial_cmp(&b.time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { points }
    }

    pub fn points(&self) -> &[RidePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total ride duration in seconds (0 for an empty track)
    pub fn duration(&self) -> f64 {
        self.points.last().map(|p| p.time).unwrap_or(0.0)
    }

    /// Latest point at or before virtual time `t`
    ///
    /// None before the first sample.
    pub fn point_at(&self, t: f64) -> Option<&RidePoint> {
        let idx = self.points.partition_point(|p| p.time <= t);
        if idx == 0 {
            None
        } else {
            self.points.get(idx - 1)
        }
    }

    /// Spans where ground speed stays below `threshold` m/s
    ///
    /// Returns (start, end) pairs in ride seconds. Consumed by whoever
    /// honors the skip-idle display toggle; the clock itself never skips.
    pub fn idle_ranges(&self, threshold: f64) -> Vec<(f64, f64)> {
        let mut ranges = Vec::new();
        let mut start: Option<f64> = None;

        for point in &self.points {
            if point.speed < threshold {
                if start.is_none() {
                    start = Some(point.time);
                }
            } else if let Some(s) = start.take() {
                if point.time > s {
                    ranges.push((s, point.time));
                }
            }
        }

        // Idle through to the end of the ride
        if let Some(s) = start {
            let end = self.duration();
            if end > s {
                ranges.push((s, end));
            }
        }

        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: f64, speed: f64) -> RidePoint {
        RidePoint {
            time,
            lat: 46.0,
            lon: 7.0,
            elevation: 1200.0,
            speed,
        }
    }

    #[test]
    fn test_empty_track_has_zero_duration() {
        let track = RideTrack::default();
        assert_eq!(track.duration(), 0.0);
        assert!(track.point_at(10.0).is_none());
        assert!(track.is_empty());
    }

    #[test]
    fn test_points_sorted_on_construction() {
        let track = RideTrack::new(vec![point(30.0, 5.0), point(10.0, 5.0), point(20.0, 5.0)]);
        let times: Vec<f64> = track.points().iter().map(|p| p.time).collect();
        assert_eq!(times, vec![10.0, 20.0, 30.0]);
        assert_eq!(track.duration(), 30.0);
    }

    #[test]
    fn test_point_at_picks_latest_at_or_before() {
        let track = RideTrack::new(vec![point(0.0, 5.0), point(10.0, 6.0), point(20.0, 7.0)]);

        assert!(track.point_at(-1.0).is_none());
        assert_eq!(track.point_at(0.0).unwrap().time, 0.0);
        assert_eq!(track.point_at(9.9).unwrap().time, 0.0);
        assert_eq!(track.point_at(10.0).unwrap().time, 10.0);
        assert_eq!(track.point_at(500.0).unwrap().time, 20.0);
    }

    #[test]
    fn test_idle_ranges() {
        let track = RideTrack::new(vec![
            point(0.0, 5.0),
            point(10.0, 0.1),
            point(20.0, 0.2),
            point(30.0, 4.0),
            point(40.0, 0.0),
            point(50.0, 0.0),
        ]);

        let ranges = track.idle_ranges(0.5);
        assert_eq!(ranges, vec![(10.0, 30.0), (40.0, 50.0)]);
    }

    #[test]
    fn test_no_idle_ranges_when_always_moving() {
        let track = RideTrack::new(vec![point(0.0, 5.0), point(10.0, 6.0)]);
        assert!(track.idle_ranges(0.5).is_empty());
    }
}
