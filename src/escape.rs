// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape evaluator.  For a single point `c` on the complex
//! plane, iterate `z = z² + c` and report how quickly the orbit
//! leaves a (very large) circle around the origin.  Rather than the
//! raw iteration count, which produces visible bands when coloured,
//! we return a "smoothed" count that interpolates continuously
//! according to how far past the horizon the orbit landed.

use errors::RenderError;
use num::Complex;
use std::f64::consts::LN_2;

/// The escape radius used by the field sampler.  2^40 keeps the
/// sum-of-squares test comfortably inside f64 range while leaving a
/// lot of headroom for the double-logarithm correction.
pub const HORIZON: f64 = 1_099_511_627_776.0;

/// Returns the smoothed escape time of `c_real + i*c_imag`.
///
/// The orbit starts at `z = c`, not at zero, so the point itself is
/// the first iterate.  If the orbit escapes on step `n` (counting
/// from zero) the result is
///
/// ```text
///     n + 1 - log2(ln(|z|²)) + log_horizon
/// ```
///
/// where `log_horizon` is `log2(ln(horizon))`, computed once by the
/// caller.  If the orbit never escapes within `max_iter` steps the
/// result is `0.0`, which is the "presumed inside the set" sentinel.
/// Note that the sentinel is not distinguishable from a genuine
/// smoothed value of zero; see `Escape::classify`.
///
/// `horizon_squared` must exceed 1 for the double logarithm to be
/// defined.  Nothing here checks; bad inputs yield NaN, not a panic.
#[inline]
pub fn evaluate(
    c_real: f64,
    c_imag: f64,
    max_iter: usize,
    horizon_squared: f64,
    log_horizon: f64,
) -> f64 {
    let (mut zr, mut zi) = (c_real, c_imag);
    for n in 0..max_iter {
        let zr2 = zr * zr;
        let zi2 = zi * zi;
        let norm_sqr = zr2 + zi2;
        if norm_sqr > horizon_squared {
            return (n as f64) + 1.0 - norm_sqr.ln().ln() / LN_2 + log_horizon;
        }
        zi = 2.0 * zr * zi + c_imag;
        zr = zr2 - zi2 + c_real;
    }
    0.0
}

/// The per-render constants of the evaluator.  Computing the
/// logarithmic normalisation here, once, keeps every sample in a
/// render using the identical constant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EscapeParameters {
    max_iter: usize,
    horizon: f64,
    horizon_squared: f64,
    log_horizon: f64,
}

impl EscapeParameters {
    /// Requires a positive iteration cap and an escape radius greater
    /// than one.
    pub fn new(max_iter: usize, horizon: f64) -> Result<Self, RenderError> {
        if max_iter == 0 {
            return Err(RenderError::InvalidEscapeParameters {
                max_iter,
                horizon,
                reason: "the iteration cap must be positive",
            });
        }
        if !horizon.is_finite() || horizon <= 1.0 {
            return Err(RenderError::InvalidEscapeParameters {
                max_iter,
                horizon,
                reason: "the escape radius must be a finite number greater than 1",
            });
        }
        Ok(EscapeParameters {
            max_iter,
            horizon,
            horizon_squared: horizon * horizon,
            log_horizon: horizon.ln().ln() / LN_2,
        })
    }

    /// Parameters with the standard `HORIZON`.
    pub fn with_max_iter(max_iter: usize) -> Result<Self, RenderError> {
        EscapeParameters::new(max_iter, HORIZON)
    }

    /// The iteration cap.
    pub fn max_iter(&self) -> usize {
        self.max_iter
    }

    /// The escape radius.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// The escape radius, squared, as compared against `|z|²`.
    pub fn horizon_squared(&self) -> f64 {
        self.horizon_squared
    }

    /// `log2(ln(horizon))`.
    pub fn log_horizon(&self) -> f64 {
        self.log_horizon
    }

    /// Evaluates a single point with these parameters.
    #[inline]
    pub fn evaluate(&self, c: Complex<f64>) -> f64 {
        evaluate(c.re, c.im, self.max_iter, self.horizon_squared, self.log_horizon)
    }
}

/// A tagged reading of a field value, for consumers that would rather
/// not overload zero.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Escape {
    /// The orbit left the horizon; the smoothed escape time.
    Escaped(f64),
    /// The orbit stayed bounded for the whole iteration budget.
    Bounded,
}

impl Escape {
    /// Reads a value produced by `evaluate`.  Exactly `0.0` is taken to
    /// be the sentinel.
    pub fn classify(value: f64) -> Escape {
        if value == 0.0 {
            Escape::Bounded
        } else {
            Escape::Escaped(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(max_iter: usize) -> EscapeParameters {
        EscapeParameters::with_max_iter(max_iter).unwrap()
    }

    #[test]
    fn points_inside_the_cardioid_never_escape() {
        let params = standard(2000);
        for &(re, im) in &[(0.0, 0.0), (-0.5, 0.0), (-0.1, 0.1), (0.2, 0.3), (-0.6, -0.3)] {
            assert_eq!(params.evaluate(Complex::new(re, im)), 0.0, "{} + {}i", re, im);
        }
    }

    #[test]
    fn points_inside_the_period_two_disk_never_escape() {
        let params = standard(2000);
        for &(re, im) in &[(-1.0, 0.0), (-1.1, 0.1), (-0.9, -0.1), (-1.2, 0.0)] {
            assert_eq!(params.evaluate(Complex::new(re, im)), 0.0, "{} + {}i", re, im);
        }
    }

    #[test]
    fn interior_points_are_zero_even_with_one_iteration() {
        let params = standard(1);
        assert_eq!(params.evaluate(Complex::new(-0.5, 0.0)), 0.0);
        assert_eq!(params.evaluate(Complex::new(-1.0, 0.0)), 0.0);
    }

    #[test]
    fn two_escapes_within_a_couple_of_steps_with_a_small_horizon() {
        // With a horizon of 10, c = 2 runs 2, 6, 38 and escapes on the
        // third step.
        let horizon: f64 = 10.0;
        let log_horizon = horizon.ln().ln() / LN_2;
        let v = evaluate(2.0, 0.0, 3, horizon * horizon, log_horizon);
        assert!(v.is_finite());
        assert!(v > 1.0 && v <= 2.0, "got {}", v);
    }

    #[test]
    fn two_escapes_on_the_sixth_step_with_the_standard_horizon() {
        let v = standard(6).evaluate(Complex::new(2.0, 0.0));
        assert!(v > 4.9 && v < 5.0, "got {}", v);
        assert_eq!(standard(5).evaluate(Complex::new(2.0, 0.0)), 0.0);
    }

    #[test]
    fn smoothing_stays_close_to_the_escape_step() {
        let params = standard(500);
        for &(re, im) in &[(0.5, 0.5), (-2.1, 0.0), (1.0, 1.0), (0.0, 1.5), (-1.5, 0.5)] {
            let v = params.evaluate(Complex::new(re, im));
            assert!(v.is_finite());
            assert!(v >= 0.0 && v <= 500.0 + 1.7, "{} + {}i -> {}", re, im, v);
            assert!(v != 0.0, "{} + {}i should escape", re, im);
        }
    }

    #[test]
    fn conjugate_points_escape_identically() {
        let params = standard(300);
        let a = params.evaluate(Complex::new(-0.7435, 0.1314));
        let b = params.evaluate(Complex::new(-0.7435, -0.1314));
        assert_eq!(a, b);
    }

    #[test]
    fn a_bad_horizon_propagates_nan_rather_than_panicking() {
        // horizon_squared below one: ln(ln(s)) is undefined for s <= 1.
        let v = evaluate(0.5, 0.0, 10, 0.1, f64::NAN);
        assert!(v.is_nan());
    }

    #[test]
    fn parameters_reject_zero_iterations() {
        match EscapeParameters::new(0, HORIZON) {
            Err(RenderError::InvalidEscapeParameters { max_iter: 0, .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn parameters_reject_small_or_odd_horizons() {
        assert!(EscapeParameters::new(10, 1.0).is_err());
        assert!(EscapeParameters::new(10, 0.5).is_err());
        assert!(EscapeParameters::new(10, f64::NAN).is_err());
        assert!(EscapeParameters::new(10, f64::INFINITY).is_err());
        assert!(EscapeParameters::new(10, 2.0).is_ok());
    }

    #[test]
    fn parameters_precompute_the_normalisation() {
        let params = standard(10);
        assert_eq!(params.horizon(), HORIZON);
        assert_eq!(params.horizon_squared(), HORIZON * HORIZON);
        assert!((params.log_horizon() - (40.0 * LN_2).ln() / LN_2).abs() < 1e-12);
    }

    #[test]
    fn classify_separates_the_sentinel() {
        assert_eq!(Escape::classify(0.0), Escape::Bounded);
        assert_eq!(Escape::classify(3.25), Escape::Escaped(3.25));
    }
}
