// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contract violations detected before any sampling begins.  The
//! escape evaluator itself never fails; everything here is raised at
//! the boundary of the field sampler or the zoom transform.

/// The things a caller can get wrong.
#[derive(Debug, Clone, PartialEq, Fail)]
pub enum RenderError {
    /// The viewport has a non-positive width or height, or a bound
    /// that is not a finite number.
    #[fail(
        display = "invalid viewport [{}, {}] x [{}, {}]: bounds must be finite with min < max",
        x_min, x_max, y_min, y_max
    )]
    InvalidViewport {
        /// Left edge of the real axis.
        x_min: f64,
        /// Right edge of the real axis.
        x_max: f64,
        /// Bottom edge of the imaginary axis.
        y_min: f64,
        /// Top edge of the imaginary axis.
        y_max: f64,
    },

    /// The sample grid has no rows or no columns, or is too large to
    /// address.
    #[fail(display = "invalid resolution {}x{}: {}", columns, rows, reason)]
    InvalidResolution {
        /// Requested number of columns.
        columns: usize,
        /// Requested number of rows.
        rows: usize,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The iteration cap is zero or the escape radius does not exceed 1.
    #[fail(
        display = "invalid escape parameters (max_iter {}, horizon {}): {}",
        max_iter, horizon, reason
    )]
    InvalidEscapeParameters {
        /// Requested iteration cap.
        max_iter: usize,
        /// Requested escape radius.
        horizon: f64,
        /// What was wrong with them.
        reason: &'static str,
    },

    /// Zoom factors must be positive and finite.
    #[fail(display = "invalid zoom factor {}", factor)]
    InvalidZoomFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// A sampling thread panicked; the field is discarded.
    #[fail(display = "a sampling thread panicked")]
    WorkerPanicked,
}
