use bincode::{Decode, Encode};

use crate::averaging::WindowAverager;
use crate::error::{RampError, Result};
use crate::types::{ArchivedPoint, CompressionStats, Snapshot, WindowedSeries};

/// Minimum raw length: header, anchor and a first snapshot
pub const MIN_SERIES_LEN: usize = 3;

/// Swinging-door compressor.
///
/// Index 0 of every raw series is a header placeholder and is skipped;
/// index 1 anchors the archive; from index 2 on each sample is tested against
/// the door opened by the live snapshot.
#[derive(Debug, Clone, Copy)]
pub struct SwingingDoor {
    deviation: f64,
}

/// Scan state threaded through each step
#[derive(Debug, Clone, Copy)]
enum DoorState {
    Unanchored,
    Anchored(ArchivedPoint),
    Open { anchor: ArchivedPoint, live: Snapshot },
}

impl SwingingDoor {
    /// `sensitivity` is a fraction (0.8 for 80%); the door deviation is
    /// `sensitivity / 100` of each sample's value.
    pub fn new(sensitivity: f64) -> Result<Self> {
        if !sensitivity.is_finite() || sensitivity < 0.0 {
            return Err(RampError::invalid(format!(
                "sensitivity must be finite and non-negative, got {}",
                sensitivity
            )));
        }
        Ok(SwingingDoor {
            deviation: sensitivity / 100.0,
        })
    }

    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    pub fn archive(&self, series: &[f64]) -> Result<CompressedSeries> {
        if series.len() < MIN_SERIES_LEN {
            return Err(RampError::invalid(format!(
                "series needs at least {} samples, got {}",
                MIN_SERIES_LEN,
                series.len()
            )));
        }
        if let Some(pos) = series.iter().skip(1).position(|v| !v.is_finite()) {
            return Err(RampError::invalid(format!(
                "non-finite sample at index {}",
                pos + 1
            )));
        }

        let mut archive = Vec::new();
        let state = series
            .iter()
            .copied()
            .enumerate()
            .skip(1)
            .fold(DoorState::Unanchored, |state, (time, value)| {
                self.step(state, &mut archive, time, value)
            });

        if let DoorState::Open { live, .. } = state {
            push_archived(&mut archive, live.archive(true));
        }

        log::debug!(
            "swinging door kept {} of {} samples (deviation {})",
            archive.len(),
            series.len(),
            self.deviation
        );

        Ok(CompressedSeries {
            deviation: self.deviation,
            raw_len: series.len(),
            archive,
        })
    }

    /// Compresses `series` and averages it into windows of `window_minutes`.
    pub fn compress(&self, series: &[f64], window_minutes: usize) -> Result<WindowedSeries> {
        self.compress_with(series, WindowAverager::new(window_minutes))
    }

    pub fn compress_with(&self, series: &[f64], averager: WindowAverager) -> Result<WindowedSeries> {
        self.archive(series)?.windowed(averager)
    }

    fn step(
        &self,
        state: DoorState,
        archive: &mut Vec<ArchivedPoint>,
        time: usize,
        value: f64,
    ) -> DoorState {
        match state {
            DoorState::Unanchored => DoorState::Anchored(push_archived(
                archive,
                ArchivedPoint {
                    value,
                    trade_date: time,
                    time,
                    is_snap: false,
                },
            )),
            DoorState::Anchored(anchor) => {
                let live = Snapshot::from_anchor(&anchor, value, time, self.deviation);
                let anchor = push_archived(archive, live.archive(false));
                DoorState::Open { anchor, live }
            }
            DoorState::Open { anchor, live } => {
                let incoming = Snapshot::from_anchor(&anchor, value, time, self.deviation);
                if live.admits(&incoming) {
                    DoorState::Open {
                        anchor,
                        live: live.tighten(incoming),
                    }
                } else {
                    let anchor = push_archived(archive, live.archive(false));
                    let live = Snapshot::from_anchor(&anchor, value, time, self.deviation);
                    DoorState::Open { anchor, live }
                }
            }
        }
    }
}

/// Appends `point` unless the tail already holds its time; returns the tail.
fn push_archived(archive: &mut Vec<ArchivedPoint>, point: ArchivedPoint) -> ArchivedPoint {
    match archive.last_mut() {
        Some(tail) if tail.time == point.time => {
            tail.is_snap |= point.is_snap;
            *tail
        }
        _ => {
            log::trace!("archived {} at {}", point.value, point.time);
            archive.push(point);
            point
        }
    }
}

/// Archived points of one compression run
#[derive(Debug, Clone, PartialEq, Encode, Decode)]
pub struct CompressedSeries {
    pub(crate) deviation: f64,
    pub(crate) raw_len: usize,
    pub(crate) archive: Vec<ArchivedPoint>,
}

impl CompressedSeries {
    pub fn points(&self) -> &[ArchivedPoint] {
        &self.archive
    }

    pub fn deviation(&self) -> f64 {
        self.deviation
    }

    /// The anchor at raw index 1.
    pub fn first(&self) -> Option<&ArchivedPoint> {
        self.archive.first()
    }

    pub fn last(&self) -> Option<&ArchivedPoint> {
        self.archive.last()
    }

    /// Values and times of every archived point after the anchor.
    pub fn emitted(&self) -> (Vec<f64>, Vec<usize>) {
        self.archive
            .iter()
            .skip(1)
            .map(|p| (p.value, p.trade_date))
            .unzip()
    }

    /// Averages the emitted points; an empty first window takes the anchor value.
    pub fn windowed(&self, averager: WindowAverager) -> Result<WindowedSeries> {
        let averager = match self.first() {
            Some(anchor) => averager.seed(anchor.value),
            None => averager,
        };
        let (values, times) = self.emitted();
        averager.bucket(&values, &times)
    }

    pub fn stats(&self) -> CompressionStats {
        let archived_len = self.archive.len();
        CompressionStats {
            raw_len: self.raw_len,
            archived_len,
            emitted_len: archived_len.saturating_sub(1),
            deviation: self.deviation,
            ratio: 1.0 - archived_len as f64 / self.raw_len as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::averaging::WindowEdges;
    use approx::assert_relative_eq;

    const RAMP: [f64; 9] = [0.0, 10.0, 10.0, 20.0, 5.0, 5.0, 5.0, 5.0, 5.0];

    fn door() -> SwingingDoor {
        SwingingDoor::new(0.8).unwrap()
    }

    #[test]
    fn test_ramp_archive() {
        let compressed = door().archive(&RAMP).unwrap();
        let kept: Vec<(f64, usize)> = compressed.points().iter().map(|p| (p.value, p.time)).collect();

        assert_eq!(kept, vec![(10.0, 1), (10.0, 2), (20.0, 3), (5.0, 4), (5.0, 8)]);
        assert!(compressed.last().unwrap().is_snap);
        assert!(compressed.points()[..4].iter().all(|p| !p.is_snap));
    }

    #[test]
    fn test_ramp_windowed() {
        let windowed = door().compress(&RAMP, 4).unwrap();

        assert_eq!(windowed.values.len(), 8);
        assert_eq!(windowed.times, (0..8).collect::<Vec<_>>());
        assert_relative_eq!(windowed.values[0], 35.0 / 3.0);
        assert_relative_eq!(windowed.values[7], 5.0);
    }

    #[test]
    fn test_emitted_skips_anchor() {
        let (values, times) = door().archive(&RAMP).unwrap().emitted();
        assert_eq!(values, vec![10.0, 20.0, 5.0, 5.0]);
        assert_eq!(times, vec![2, 3, 4, 8]);
    }

    #[test]
    fn test_minimum_length() {
        let compressed = door().archive(&[0.0, 3.0, 7.0]).unwrap();
        assert_eq!(compressed.points().len(), 2);
        assert_eq!(compressed.points()[0].value, 3.0);
        assert_eq!(compressed.points()[1].value, 7.0);
        assert!(compressed.points()[1].is_snap);

        let result = door().archive(&[0.0, 3.0]);
        assert!(matches!(result, Err(RampError::InvalidInput(_))));
    }

    #[test]
    fn test_straight_line_keeps_endpoints() {
        let line: Vec<f64> = (0..20).map(|i| 100.0 + 2.0 * i as f64).collect();
        let compressed = door().archive(&line).unwrap();
        let times: Vec<usize> = compressed.points().iter().map(|p| p.time).collect();

        assert_eq!(times, vec![1, 2, 19]);
        assert_eq!(compressed.last().unwrap().value, line[19]);
    }

    #[test]
    fn test_header_is_ignored() {
        let a = door().archive(&[f64::NAN, 1.0, 2.0, 3.0]).unwrap();
        let b = door().archive(&[-50.0, 1.0, 2.0, 3.0]).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_non_finite_samples() {
        assert!(door().archive(&[0.0, 1.0, f64::INFINITY, 3.0]).is_err());
        assert!(SwingingDoor::new(-1.0).is_err());
        assert!(SwingingDoor::new(f64::NAN).is_err());
    }

    #[test]
    fn test_zero_window_rejected() {
        assert!(door().compress(&RAMP, 0).is_err());
    }

    #[test]
    fn test_empty_first_window_takes_anchor() {
        let series = [0.0, 4.0, 8.0, 8.0];
        let windowed = door()
            .compress_with(&series, WindowAverager::new(1).edges(WindowEdges::HalfOpen))
            .unwrap();

        assert_eq!(windowed.values, vec![4.0, 4.0, 8.0]);
    }

    #[test]
    fn test_stats() {
        let stats = door().archive(&RAMP).unwrap().stats();
        assert_eq!(stats.raw_len, 9);
        assert_eq!(stats.archived_len, 5);
        assert_eq!(stats.emitted_len, 4);
        assert_relative_eq!(stats.ratio, 1.0 - 5.0 / 9.0);
        assert_relative_eq!(stats.deviation, 0.008);
    }
}
