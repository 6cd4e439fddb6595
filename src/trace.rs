//! Chart trace primitives: timestamp formatting, trailing moving average,
//! and the atomically swappable point snapshots the HTTP layer reads.

use std::sync::{Arc, PoisonError, RwLock};

use chrono::{Local, TimeZone};

/// X-axis labels use wall-clock local time with millisecond precision.
pub const X_VALUE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Record types that can feed a trace expose their epoch-seconds timestamp.
pub trait Timestamped {
    fn timestamp(&self) -> i64;
}

/// One published generation of a trace. `x` and `y` always have equal
/// length; readers hold the whole pair behind one `Arc`, so a snapshot can
/// never mix labels from one refresh cycle with values from another.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TracePoints {
    pub x: Vec<String>,
    pub y: Vec<f64>,
}

/// A named chart line. Created once at startup, refreshed in place for the
/// process lifetime by swapping the points snapshot.
#[derive(Debug)]
pub struct Trace {
    name: &'static str,
    color: &'static str,
    points: RwLock<Arc<TracePoints>>,
}

impl Trace {
    pub fn new(name: &'static str, color: &'static str) -> Self {
        Self {
            name,
            color,
            points: RwLock::new(Arc::new(TracePoints::default())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn color(&self) -> &'static str {
        self.color
    }

    /// Swaps in a new generation. The lock is held only for the pointer
    /// swap; readers that already cloned the previous `Arc` keep a
    /// consistent pair.
    pub fn publish(&self, points: TracePoints) {
        debug_assert_eq!(points.x.len(), points.y.len());
        let next = Arc::new(points);
        let mut guard = self.points.write().unwrap_or_else(PoisonError::into_inner);
        *guard = next;
    }

    pub fn snapshot(&self) -> Arc<TracePoints> {
        self.points
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Trailing moving average with window `window` (clamped to at least 1).
/// Position `i` averages the inputs at `max(0, i - window + 1) ..= i`, so
/// the window grows until full and the output length equals the input
/// length. A window of 1 passes values through unchanged.
pub fn trailing_average(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    if window == 1 {
        return values.to_vec();
    }
    let mut averaged = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        let filled = (i + 1).min(window);
        averaged.push(sum / filled as f64);
    }
    averaged
}

pub fn format_epoch(epoch_seconds: i64) -> String {
    Local
        .timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|dt| dt.format(X_VALUE_FORMAT).to_string())
        .unwrap_or_else(|| epoch_seconds.to_string())
}

/// Formats the shared x-axis once per fetch; every trace built from the
/// same record set clones these labels.
pub fn format_timestamps<R: Timestamped>(records: &[R]) -> Vec<String> {
    records
        .iter()
        .map(|record| format_epoch(record.timestamp()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_of_two_averages_adjacent_pairs() {
        let out = trailing_average(&[10.0, 20.0, 30.0, 40.0], 2);
        assert_eq!(out, vec![10.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn window_of_one_is_identity() {
        let input = vec![3.5, -1.0, 42.0];
        assert_eq!(trailing_average(&input, 1), input);
    }

    #[test]
    fn window_zero_is_clamped_to_one() {
        let input = vec![1.0, 2.0];
        assert_eq!(trailing_average(&input, 0), input);
    }

    #[test]
    fn partial_windows_grow_until_full() {
        let input = vec![2.0, 4.0, 6.0, 8.0, 10.0];
        let out = trailing_average(&input, 3);
        assert_eq!(out, vec![2.0, 3.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn window_larger_than_input_averages_prefixes() {
        let out = trailing_average(&[1.0, 2.0, 3.0], 10);
        assert_eq!(out, vec![1.0, 1.5, 2.0]);
    }

    #[test]
    fn output_matches_naive_mean_for_all_positions() {
        let input: Vec<f64> = (0..50).map(|i| (i * 7 % 13) as f64).collect();
        for window in 1..=8 {
            let out = trailing_average(&input, window);
            assert_eq!(out.len(), input.len());
            for (i, got) in out.iter().enumerate() {
                let start = i.saturating_sub(window - 1);
                let slice = &input[start..=i];
                let mean = slice.iter().sum::<f64>() / slice.len() as f64;
                assert!((got - mean).abs() < 1e-9, "window {window} position {i}");
            }
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(trailing_average(&[], 4).is_empty());
    }

    #[test]
    fn epoch_formats_with_millisecond_suffix() {
        let formatted = format_epoch(1_700_000_000);
        // Local zone varies by host; check the shape, not the instant.
        assert_eq!(formatted.len(), 23);
        assert_eq!(&formatted[4..5], "-");
        assert_eq!(&formatted[7..8], "-");
        assert_eq!(&formatted[10..11], " ");
        assert_eq!(&formatted[13..14], ":");
        assert_eq!(&formatted[16..17], ":");
        assert!(formatted.ends_with(".000"));
    }

    #[test]
    fn publish_replaces_snapshot_without_touching_old_readers() {
        let trace = Trace::new("Inlet", "#38bdf8");
        trace.publish(TracePoints {
            x: vec!["a".into()],
            y: vec![1.0],
        });
        let before = trace.snapshot();
        trace.publish(TracePoints {
            x: vec!["a".into(), "b".into()],
            y: vec![1.0, 2.0],
        });
        assert_eq!(before.x.len(), 1);
        assert_eq!(before.y.len(), 1);
        let after = trace.snapshot();
        assert_eq!(after.x.len(), 2);
        assert_eq!(after.y.len(), 2);
    }

    #[test]
    fn concurrent_readers_never_see_torn_points() {
        let trace = Trace::new("Fan 1 RPM", "#4ade80");
        std::thread::scope(|scope| {
            scope.spawn(|| {
                for round in 0..2_000usize {
                    let len = round % 17;
                    trace.publish(TracePoints {
                        x: (0..len).map(|i| i.to_string()).collect(),
                        y: (0..len).map(|i| i as f64).collect(),
                    });
                }
            });
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..2_000usize {
                        let snap = trace.snapshot();
                        assert_eq!(snap.x.len(), snap.y.len());
                    }
                });
            }
        });
    }
}
