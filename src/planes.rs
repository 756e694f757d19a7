// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the Viewport, a rectangle on the complex plane; the
//! Resolution, the integral size of the image; and the PlaneMapper,
//! which lays a grid of sample points over the one at the density of
//! the other.
use errors::RenderError;
use num::Complex;
use std::mem;

/// A rectangular region of the complex plane, treating the real part
/// as the x-component and the imaginary part as the y-component.
/// Viewports are never edited in place; zooming produces a new one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Left edge of the real axis.
    pub x_min: f64,
    /// Right edge of the real axis.
    pub x_max: f64,
    /// Bottom edge of the imaginary axis.
    pub y_min: f64,
    /// Top edge of the imaginary axis.
    pub y_max: f64,
}

impl Viewport {
    /// Constructor.  Bounds are not checked here; see `validate`.
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Viewport {
        Viewport {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }

    /// The midpoint of the rectangle.
    pub fn center(&self) -> Complex<f64> {
        Complex::new(
            (self.x_min + self.x_max) / 2.0,
            (self.y_min + self.y_max) / 2.0,
        )
    }

    /// Checks that every bound is finite and that the rectangle has a
    /// positive, finite width and height.
    pub fn validate(&self) -> Result<(), RenderError> {
        let finite = self.x_min.is_finite()
            && self.x_max.is_finite()
            && self.y_min.is_finite()
            && self.y_max.is_finite();
        let width = self.width();
        let height = self.height();
        if !finite || !width.is_finite() || !height.is_finite() || !(width > 0.0) || !(height > 0.0)
        {
            return Err(RenderError::InvalidViewport {
                x_min: self.x_min,
                x_max: self.x_max,
                y_min: self.y_min,
                y_max: self.y_max,
            });
        }
        Ok(())
    }

    /// Returns a new viewport centred on `center`, with the width and
    /// height each divided by `factor`.  Factors above one zoom in,
    /// factors between zero and one zoom out.
    pub fn zoom(&self, center: Complex<f64>, factor: f64) -> Result<Viewport, RenderError> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(RenderError::InvalidZoomFactor { factor });
        }
        let new_width = self.width() / factor;
        let new_height = self.height() / factor;
        let zoomed = Viewport::new(
            center.re - new_width / 2.0,
            center.re + new_width / 2.0,
            center.im - new_height / 2.0,
            center.im + new_height / 2.0,
        );
        zoomed.validate()?;
        Ok(zoomed)
    }
}

impl Default for Viewport {
    /// The whole of the set, with a little room to spare.
    fn default() -> Viewport {
        Viewport::new(-2.0, 1.0, -1.0, 1.0)
    }
}

/// The integral size of the sample grid.  Both dimensions must be
/// positive for the grid to be sampled.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// Pixels along the real axis.
    pub columns: usize,
    /// Pixels along the imaginary axis.
    pub rows: usize,
}

impl Resolution {
    /// Constructor.  Not checked; see `validate`.
    pub fn new(columns: usize, rows: usize) -> Resolution {
        Resolution { columns, rows }
    }

    /// Derives a resolution from the display size and its density in
    /// dots per unit.  Must be re-derived if either changes.
    pub fn from_display(
        width: usize,
        height: usize,
        density: usize,
    ) -> Result<Resolution, RenderError> {
        match (width.checked_mul(density), height.checked_mul(density)) {
            (Some(columns), Some(rows)) => Ok(Resolution::new(columns, rows)),
            _ => Err(RenderError::InvalidResolution {
                columns: width,
                rows: height,
                reason: "display size times density overflows",
            }),
        }
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.columns * self.rows
    }

    /// Describes that the integral plane has no area.
    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    /// Fails unless both dimensions are positive and the product fits
    /// in memory's addressing.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.is_empty() {
            return Err(RenderError::InvalidResolution {
                columns: self.columns,
                rows: self.rows,
                reason: "rows and columns must both be positive",
            });
        }
        let bytes = self
            .columns
            .checked_mul(self.rows)
            .and_then(|len| len.checked_mul(mem::size_of::<f64>()));
        if bytes.map_or(true, |b| b > isize::max_value() as usize) {
            return Err(RenderError::InvalidResolution {
                columns: self.columns,
                rows: self.rows,
                reason: "too many samples",
            });
        }
        Ok(())
    }
}

/// Describes the column, row of a pixel in the grid.  Column 0 is
/// the left edge, row 0 is the top.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Pixel(pub usize, pub usize);

/// Returns `n` evenly spaced values from `start` to `end` inclusive.
/// A single value is `start`; with more than one the ends are exact.
/// The first half counts up from `start` and the second half down from
/// `end`, so over a range symmetric about zero the value at `i` is
/// exactly the negation of the value at `n - 1 - i`.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / ((n - 1) as f64);
            (0..n)
                .map(|i| {
                    if i < n / 2 {
                        start + (i as f64) * step
                    } else {
                        end - ((n - 1 - i) as f64) * step
                    }
                })
                .collect()
        }
    }
}

/// The sample grid for one render: a real-axis coordinate for every
/// column (ascending) and an imaginary-axis coordinate for every row
/// (descending, so that row 0 is the top of the image).
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The complex rectangle being sampled.
    pub viewport: Viewport,
    /// The size of the grid laid over it.
    pub resolution: Resolution,
    real: Vec<f64>,
    imag: Vec<f64>,
}

impl PlaneMapper {
    /// Constructor.  Both the viewport and the resolution are checked
    /// before the grid is built.
    pub fn new(viewport: Viewport, resolution: Resolution) -> Result<PlaneMapper, RenderError> {
        resolution.validate()?;
        viewport.validate()?;
        Ok(PlaneMapper {
            viewport,
            resolution,
            real: linspace(viewport.x_min, viewport.x_max, resolution.columns),
            imag: linspace(viewport.y_max, viewport.y_min, resolution.rows),
        })
    }

    /// Real-axis coordinates, one per column.
    pub fn real_axis(&self) -> &[f64] {
        &self.real
    }

    /// Imaginary-axis coordinates, one per row, top first.
    pub fn imag_axis(&self) -> &[f64] {
        &self.imag
    }

    /// Given a pixel on the integral plane, return the complex number
    /// sampled there, or None if the pixel lies outside the grid.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Option<Complex<f64>> {
        match (self.real.get(pixel.0), self.imag.get(pixel.1)) {
            (Some(&re), Some(&im)) => Some(Complex::new(re, im)),
            _ => None,
        }
    }
}
