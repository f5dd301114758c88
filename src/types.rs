use bincode::{Decode, Encode};

/// Live state of the door while scanning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Snapshot {
    pub value: f64,
    pub time: usize,
    pub trade_date: usize,
    pub slope_max: f64,
    pub slope_min: f64,
    pub slope: f64,
}

impl Snapshot {
    /// Opens the door from `anchor` to `value` observed at `time`.
    ///
    /// The bounds are the slopes to `value * (1 ± deviation)`, so the door
    /// width scales with the magnitude of the sample.
    pub fn from_anchor(anchor: &ArchivedPoint, value: f64, time: usize, deviation: f64) -> Self {
        let dt = (time - anchor.time) as f64;
        Snapshot {
            value,
            time,
            trade_date: time,
            slope_max: (value + deviation * value - anchor.value) / dt,
            slope_min: (value - deviation * value - anchor.value) / dt,
            slope: (value - anchor.value) / dt,
        }
    }

    pub fn admits(&self, incoming: &Snapshot) -> bool {
        self.slope_min <= incoming.slope && incoming.slope <= self.slope_max
    }

    /// Narrows `incoming` to the intersection of both doors.
    pub fn tighten(&self, mut incoming: Snapshot) -> Snapshot {
        incoming.slope_max = self.slope_max.min(incoming.slope_max);
        incoming.slope_min = self.slope_min.max(incoming.slope_min);
        incoming
    }

    pub fn archive(&self, is_snap: bool) -> ArchivedPoint {
        ArchivedPoint {
            value: self.value,
            trade_date: self.trade_date,
            time: self.time,
            is_snap,
        }
    }
}

/// A point kept in the compressed series
#[derive(Debug, Clone, Copy, PartialEq, Encode, Decode)]
pub struct ArchivedPoint {
    pub value: f64,
    pub trade_date: usize,
    pub time: usize,
    pub is_snap: bool,
}

/// Piecewise-constant, unit-resolution reconstruction of a compressed series
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedSeries {
    pub window_minutes: usize,
    pub values: Vec<f64>,
    pub times: Vec<usize>,
}

impl WindowedSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn windows(&self) -> usize {
        self.len().checked_div(self.window_minutes).unwrap_or(0)
    }

    /// One value per window, in window order.
    pub fn window_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().step_by(self.window_minutes.max(1)).copied()
    }
}

/// Summary of a compression run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionStats {
    pub raw_len: usize,
    pub archived_len: usize,
    pub emitted_len: usize,
    pub deviation: f64,
    pub ratio: f64,
}
