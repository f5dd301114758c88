use crate::error::{RampError, Result};
use crate::types::WindowedSeries;

/// Which window edges a point may fall on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowEdges {
    /// `[start, start + m]`: a point on an edge counts in both windows
    #[default]
    Closed,
    /// `[start, start + m)`
    HalfOpen,
}

impl WindowEdges {
    fn contains(self, start: usize, end: usize, time: usize) -> bool {
        match self {
            WindowEdges::Closed => start <= time && time <= end,
            WindowEdges::HalfOpen => start <= time && time < end,
        }
    }
}

/// Averages points into fixed windows and expands each window to unit steps.
#[derive(Debug, Clone, Copy)]
pub struct WindowAverager {
    window_minutes: usize,
    edges: WindowEdges,
    seed: Option<f64>,
}

impl WindowAverager {
    pub fn new(window_minutes: usize) -> Self {
        WindowAverager {
            window_minutes,
            edges: WindowEdges::default(),
            seed: None,
        }
    }

    pub fn edges(mut self, edges: WindowEdges) -> Self {
        self.edges = edges;
        self
    }

    /// Value used when the very first window holds no points.
    pub fn seed(mut self, value: f64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Windows run from 0 up to the last time rounded up to a whole window.
    /// `times` is expected in chronological order.
    pub fn bucket(&self, values: &[f64], times: &[usize]) -> Result<WindowedSeries> {
        let m = self.window_minutes;
        if m == 0 {
            return Err(RampError::invalid("window_minutes must be greater than 0"));
        }
        if values.len() != times.len() {
            return Err(RampError::invalid(format!(
                "{} values for {} times",
                values.len(),
                times.len()
            )));
        }
        let Some(&last) = times.last() else {
            return Err(RampError::invalid("no points to average"));
        };

        let end = last.div_ceil(m) * m;
        let mut out_values = Vec::with_capacity(end);
        let mut out_times = Vec::with_capacity(end);
        let mut previous: Option<f64> = None;

        for start in (0..end).step_by(m) {
            let (sum, count) = times
                .iter()
                .zip(values)
                .filter(|&(&t, _)| self.edges.contains(start, start + m, t))
                .fold((0.0, 0usize), |(s, c), (_, &v)| (s + v, c + 1));

            let avg = if count > 0 {
                sum / count as f64
            } else if let Some(prev) = previous {
                prev
            } else if let Some(seed) = self.seed {
                log::warn!("window at {} is empty, starting from seed {}", start, seed);
                seed
            } else {
                return Err(RampError::EmptyWindow { window_start: start });
            };

            out_values.extend(std::iter::repeat_n(avg, m));
            out_times.extend(start..start + m);
            previous = Some(avg);
        }

        log::debug!("averaged {} points into {} windows of {}", times.len(), end / m, m);

        Ok(WindowedSeries {
            window_minutes: m,
            values: out_values,
            times: out_times,
        })
    }
}
