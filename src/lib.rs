#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Smooth escape-time Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points `c` on the complex plane
//! for which repeatedly squaring and adding `c` never runs off to
//! infinity.  For points outside the set, the number of iterations it
//! takes to run off (past a large "horizon") is a measure of how
//! close the point is to the set, and that number is what gets
//! coloured.  Counting whole iterations produces visible bands of
//! colour, so instead of the raw count we return a "smoothed" count
//! corrected by how far past the horizon the orbit got.
//!
//! The work splits in two.  The escape evaluator handles one point at
//! a time.  The field sampler lays a grid over a viewport of the
//! complex plane and runs the evaluator at every grid point, in
//! parallel, producing a `ScalarField`.  Everything else (sessions,
//! zooming, colour, image files) is built on those two.

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate image;
extern crate itertools;
#[macro_use]
extern crate log;
extern crate num;
extern crate num_cpus;

#[cfg(test)]
extern crate tempfile;

pub mod colour;
pub mod config;
pub mod display;
pub mod errors;
pub mod escape;
pub mod field;
pub mod planes;
pub mod session;

pub use colour::{colorize, Colormap, PowerNorm};
pub use config::RenderConfig;
pub use display::{Display, Lifecycle};
pub use errors::RenderError;
pub use escape::{evaluate, Escape, EscapeParameters, HORIZON};
pub use field::{sample, FieldSampler, ScalarField};
pub use planes::{linspace, Pixel, PlaneMapper, Resolution, Viewport};
pub use session::{Click, Session};

use num::Complex;

/// Renders `viewport` for a display `pixel_width` by `pixel_height`
/// units in size at `density` dots per unit, using every available
/// core.
pub fn render(
    viewport: &Viewport,
    pixel_width: usize,
    pixel_height: usize,
    density: usize,
    max_iter: usize,
) -> Result<ScalarField, RenderError> {
    let resolution = Resolution::from_display(pixel_width, pixel_height, density)?;
    resolution.validate()?;
    viewport.validate()?;
    let params = EscapeParameters::with_max_iter(max_iter)?;
    FieldSampler::new(*viewport, resolution, params)?.sample(num_cpus::get())
}

/// Zooms `viewport` in by `factor`, centred on the clicked point.
pub fn zoom(
    viewport: &Viewport,
    click_real: f64,
    click_imag: f64,
    factor: f64,
) -> Result<Viewport, RenderError> {
    viewport.zoom(Complex::new(click_real, click_imag), factor)
}
