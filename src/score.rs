use crate::error::{RampError, Result};
use crate::types::WindowedSeries;

/// Trapezoidal integral of `y` over `x`; zero for fewer than two points.
pub fn trapezoid(x: &[usize], y: &[f64]) -> f64 {
    x.windows(2)
        .zip(y.windows(2))
        .map(|(xs, ys)| (xs[1] as f64 - xs[0] as f64) * (ys[0] + ys[1]) / 2.0)
        .sum()
}

/// Time-normalized sum of per-window absolute area differences.
///
/// Both series come from window averaging: unit-step times, the competing
/// series sharing the reference time base and covering at least its range.
/// Each window starting at `i` integrates the samples at offsets
/// `[i - t_min, i - t_min + window_minutes)` of both series.
pub fn ramp_score(
    reference_times: &[usize],
    reference_values: &[f64],
    competing_times: &[usize],
    competing_values: &[f64],
    window_minutes: usize,
) -> Result<f64> {
    if window_minutes == 0 {
        return Err(RampError::invalid("window_minutes must be greater than 0"));
    }
    check_aligned(reference_times, reference_values, competing_times, competing_values)?;

    let (t_min, t_max) = match (reference_times.first(), reference_times.last()) {
        (Some(&first), Some(&last)) if last > first => (first, last),
        _ => {
            return Err(RampError::invalid(
                "reference series must span more than one time step",
            ));
        }
    };

    let total: f64 = (t_min..t_max)
        .step_by(window_minutes)
        .map(|i| {
            let start = i - t_min;
            let competing = window_integral(competing_times, competing_values, start, window_minutes);
            let reference = window_integral(reference_times, reference_values, start, window_minutes);
            (competing - reference).abs()
        })
        .sum();

    let score = total / (t_max - t_min) as f64;
    log::debug!(
        "ramp score {} over {} windows of {}",
        score,
        (t_max - t_min).div_ceil(window_minutes),
        window_minutes
    );
    Ok(score)
}

fn window_integral(times: &[usize], values: &[f64], start: usize, len: usize) -> f64 {
    let end = (start + len).min(times.len());
    if start >= end {
        return 0.0;
    }
    trapezoid(&times[start..end], &values[start..end])
}

fn check_aligned(
    reference_times: &[usize],
    reference_values: &[f64],
    competing_times: &[usize],
    competing_values: &[f64],
) -> Result<()> {
    if reference_times.len() != reference_values.len() {
        return Err(RampError::misaligned(format!(
            "reference has {} times for {} values",
            reference_times.len(),
            reference_values.len()
        )));
    }
    if competing_times.len() != competing_values.len() {
        return Err(RampError::misaligned(format!(
            "competing has {} times for {} values",
            competing_times.len(),
            competing_values.len()
        )));
    }
    if competing_times.len() < reference_times.len() {
        return Err(RampError::misaligned(format!(
            "competing series is shorter than reference ({} < {})",
            competing_times.len(),
            reference_times.len()
        )));
    }
    if let Some(pos) = reference_times
        .iter()
        .zip(competing_times)
        .position(|(r, c)| r != c)
    {
        return Err(RampError::misaligned(format!(
            "time bases diverge at offset {}: {} vs {}",
            pos, reference_times[pos], competing_times[pos]
        )));
    }
    if reference_times.windows(2).any(|w| w[1] != w[0] + 1) {
        return Err(RampError::invalid(
            "reference times must advance in unit steps",
        ));
    }
    Ok(())
}

impl WindowedSeries {
    /// Ramp score of `competing` against `self` as the reference.
    pub fn ramp_score(&self, competing: &WindowedSeries) -> Result<f64> {
        if self.window_minutes != competing.window_minutes {
            return Err(RampError::misaligned(format!(
                "window sizes differ: {} vs {}",
                self.window_minutes, competing.window_minutes
            )));
        }
        ramp_score(
            &self.times,
            &self.values,
            &competing.times,
            &competing.values,
            self.window_minutes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(values: Vec<f64>) -> (Vec<usize>, Vec<f64>) {
        ((0..values.len()).collect(), values)
    }

    #[test]
    fn test_trapezoid() {
        assert_eq!(trapezoid(&[0, 1, 2], &[0.0, 2.0, 2.0]), 3.0);
        assert_eq!(trapezoid(&[0, 2], &[1.0, 3.0]), 4.0);
        assert_eq!(trapezoid(&[5], &[9.0]), 0.0);
        assert_eq!(trapezoid(&[], &[]), 0.0);
    }

    #[test]
    fn test_identical_series_score_zero() {
        let (t, v) = series(vec![1.0, 1.0, 4.0, 4.0, 2.0, 2.0]);
        assert_eq!(ramp_score(&t, &v, &t, &v, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_known_score() {
        let (t, reference) = series(vec![0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        let competing = vec![2.0, 2.0, 4.0, 4.0, 0.0, 0.0];
        // windows [0,2) [2,4) [4,6) integrate to 2, 4 and 0 over a span of 5
        let score = ramp_score(&t, &reference, &t, &competing, 2).unwrap();
        assert_relative_eq!(score, 6.0 / 5.0);
    }

    #[test]
    fn test_score_symmetric() {
        let (t, a) = series(vec![3.0, 3.0, 1.0, 1.0]);
        let b = vec![1.0, 1.0, 5.0, 5.0];
        let ab = ramp_score(&t, &a, &t, &b, 2).unwrap();
        let ba = ramp_score(&t, &b, &t, &a, 2).unwrap();
        assert_relative_eq!(ab, ba);
        assert_relative_eq!(ab, 6.0 / 3.0);
    }

    #[test]
    fn test_longer_competing_is_accepted() {
        let (t, v) = series(vec![1.0; 4]);
        let (ct, cv) = series(vec![1.0; 8]);
        assert_eq!(ramp_score(&t, &v, &ct, &cv, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_misaligned_series() {
        let (t, v) = series(vec![1.0; 4]);
        let shifted: Vec<usize> = (1..5).collect();
        assert!(matches!(
            ramp_score(&t, &v, &shifted, &v, 2),
            Err(RampError::Alignment(_))
        ));
        assert!(matches!(
            ramp_score(&t, &v, &t[..3], &v[..3], 2),
            Err(RampError::Alignment(_))
        ));
        assert!(matches!(
            ramp_score(&t, &v[..3], &t, &v, 2),
            Err(RampError::Alignment(_))
        ));
    }

    #[test]
    fn test_degenerate_input() {
        assert!(ramp_score(&[0], &[1.0], &[0], &[1.0], 1).is_err());
        let (t, v) = series(vec![1.0; 4]);
        assert!(ramp_score(&t, &v, &t, &v, 0).is_err());
        assert!(ramp_score(&[0, 2], &[1.0, 1.0], &[0, 2], &[1.0, 1.0], 1).is_err());
    }

    #[test]
    fn test_window_size_mismatch() {
        let a = WindowedSeries {
            window_minutes: 2,
            values: vec![1.0; 4],
            times: (0..4).collect(),
        };
        let b = WindowedSeries {
            window_minutes: 4,
            ..a.clone()
        };
        assert!(a.ramp_score(&b).is_err());
        assert_eq!(a.ramp_score(&a).unwrap(), 0.0);
    }
}
