// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The field sampler.  Lays the grid described by a `PlaneMapper`
//! over the complex plane, evaluates the escape time at every grid
//! point, and assembles the results row-major into a `ScalarField`.
//! Every sample is independent of every other, so the multi-threaded
//! version simply hands each thread its own band of rows.

use escape::{evaluate, EscapeParameters};
use errors::RenderError;
use itertools::iproduct;
use planes::{PlaneMapper, Resolution, Viewport};
use std::ops::Index;
use std::time::Instant;

/// A dense, row-major grid of smoothed escape times.  Row 0 is the
/// top of the image (the largest imaginary value) and column 0 is the
/// left edge (the smallest real value).  A field is produced once and
/// never modified afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct ScalarField {
    rows: usize,
    columns: usize,
    values: Vec<f64>,
}

impl ScalarField {
    fn zeroed(resolution: Resolution) -> ScalarField {
        ScalarField {
            rows: resolution.rows,
            columns: resolution.columns,
            values: vec![0.0; resolution.len()],
        }
    }

    /// Number of rows (the imaginary axis).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (the real axis).
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    /// Every value, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// A single row, left to right.
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        if row < self.rows {
            Some(&self.values[row * self.columns..(row + 1) * self.columns])
        } else {
            None
        }
    }

    /// The value at `(row, column)`, if that is inside the field.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        if row < self.rows && column < self.columns {
            Some(self.values[row * self.columns + column])
        } else {
            None
        }
    }

    /// The smallest and largest values, ignoring NaN.  `None` if
    /// nothing but NaN is present.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .filter(|v| !v.is_nan())
            .fold(None, |acc, &v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

impl Index<(usize, usize)> for ScalarField {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &f64 {
        assert!(column < self.columns, "column {} out of range", column);
        &self.values[row * self.columns + column]
    }
}

/// Holds everything needed to sample one render: the grid and the
/// escape parameters.  Once built, it should not be mutated.
pub struct FieldSampler {
    plane: PlaneMapper,
    params: EscapeParameters,
}

impl FieldSampler {
    /// Checks the resolution and the viewport, then lays out the grid.
    /// Nothing is evaluated until one of the sample methods is called.
    pub fn new(
        viewport: Viewport,
        resolution: Resolution,
        params: EscapeParameters,
    ) -> Result<Self, RenderError> {
        let plane = PlaneMapper::new(viewport, resolution)?;
        Ok(FieldSampler { plane, params })
    }

    /// The grid being sampled.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// The escape parameters shared by every sample.
    pub fn params(&self) -> &EscapeParameters {
        &self.params
    }

    /// Evaluates one band of rows, starting at `first_row`, into
    /// `band`, whose length must be a whole number of rows.
    fn sample_rows(&self, first_row: usize, band: &mut [f64]) {
        let real = self.plane.real_axis();
        let imag = self.plane.imag_axis();
        for (offset, row) in band.chunks_mut(real.len()).enumerate() {
            let im = imag[first_row + offset];
            for (value, &re) in row.iter_mut().zip(real) {
                *value = evaluate(
                    re,
                    im,
                    self.params.max_iter(),
                    self.params.horizon_squared(),
                    self.params.log_horizon(),
                );
            }
        }
    }

    /// The single-threaded sampler.
    pub fn sample_single(&self) -> ScalarField {
        let mut field = ScalarField::zeroed(self.plane.resolution);
        let real = self.plane.real_axis();
        let imag = self.plane.imag_axis();
        for (value, (&im, &re)) in field.values.iter_mut().zip(iproduct!(imag, real)) {
            *value = evaluate(
                re,
                im,
                self.params.max_iter(),
                self.params.horizon_squared(),
                self.params.log_horizon(),
            );
        }
        field
    }

    /// A multi-threaded version of the sampler.  The field is cut into
    /// `threads` bands of whole rows and each thread fills its own
    /// band, so no locking is needed and the result is identical to
    /// `sample_single`.
    pub fn sample(&self, threads: usize) -> Result<ScalarField, RenderError> {
        let started = Instant::now();
        let mut field = ScalarField::zeroed(self.plane.resolution);
        let threads = threads.max(1).min(field.rows);
        let rows_per_band = (field.rows + threads - 1) / threads;
        let band_len = rows_per_band * field.columns;
        debug!(
            "sampling {}x{} with {} threads, {} rows each",
            field.columns, field.rows, threads, rows_per_band
        );

        crossbeam::scope(|spawner| {
            for (i, band) in field.values.chunks_mut(band_len).enumerate() {
                spawner.spawn(move |_| self.sample_rows(i * rows_per_band, band));
            }
        })
        .map_err(|_| RenderError::WorkerPanicked)?;

        info!(
            "sampled {} points in {:?}",
            field.values.len(),
            started.elapsed()
        );
        Ok(field)
    }
}

/// Samples `viewport` on a `resolution` grid with the standard escape
/// radius.  All three arguments are checked before any work begins; on
/// failure no field is produced.
pub fn sample(
    viewport: &Viewport,
    resolution: Resolution,
    max_iter: usize,
) -> Result<ScalarField, RenderError> {
    resolution.validate()?;
    viewport.validate()?;
    let params = EscapeParameters::with_max_iter(max_iter)?;
    Ok(FieldSampler::new(*viewport, resolution, params)?.sample_single())
}

#[cfg(test)]
mod tests {
    use super::*;
    use escape::HORIZON;
    use std::f64::consts::LN_2;

    fn sampler(viewport: Viewport, resolution: Resolution, max_iter: usize) -> FieldSampler {
        let params = EscapeParameters::with_max_iter(max_iter).unwrap();
        FieldSampler::new(viewport, resolution, params).unwrap()
    }

    #[test]
    fn field_has_the_requested_shape() {
        let field = sample(&Viewport::default(), Resolution::new(7, 3), 50).unwrap();
        assert_eq!(field.shape(), (3, 7));
        assert_eq!(field.values().len(), 21);
        assert_eq!(field.row(2).unwrap().len(), 7);
        assert!(field.row(3).is_none());
    }

    #[test]
    fn one_by_one_samples_the_upper_left_corner() {
        let vp = Viewport::new(-0.8, 0.4, -0.3, 0.6);
        let field = sample(&vp, Resolution::new(1, 1), 200).unwrap();
        assert_eq!(field.shape(), (1, 1));
        let log_horizon = HORIZON.ln().ln() / LN_2;
        let expected = evaluate(vp.x_min, vp.y_max, 200, HORIZON * HORIZON, log_horizon);
        assert_eq!(field[(0, 0)], expected);
    }

    #[test]
    fn field_positions_match_grid_coordinates() {
        let s = sampler(Viewport::new(-2.0, 1.0, -1.0, 1.0), Resolution::new(7, 5), 100);
        let field = s.sample_single();
        // Row 0 is the top (+1i), column 6 is the right edge (1.0).
        let expected = s.params().evaluate(::num::Complex::new(1.0, 1.0));
        assert_eq!(field.get(0, 6), Some(expected));
        // The middle row is the real axis; -1 is inside the set.
        assert_eq!(field.get(2, 2), Some(0.0));
    }

    fn assert_symmetric(field: &ScalarField) {
        let (rows, columns) = field.shape();
        for row in 0..rows / 2 {
            let mirror = rows - 1 - row;
            for column in 0..columns {
                let (a, b) = (field[(row, column)], field[(mirror, column)]);
                assert_eq!(a.to_bits(), b.to_bits(), "({}, {}) {} != {}", row, column, a, b);
            }
        }
    }

    #[test]
    fn field_is_symmetric_about_the_real_axis() {
        let vp = Viewport::new(-2.0, 1.0, -1.0, 1.0);
        for &rows in &[7, 33, 101] {
            assert_symmetric(&sample(&vp, Resolution::new(61, rows), 256).unwrap());
        }
    }

    #[test]
    fn default_grid_is_symmetric_about_the_real_axis() {
        let s = sampler(Viewport::default(), Resolution::new(648, 432), 128);
        assert_eq!(s.plane().imag_axis()[0], 1.0);
        assert_eq!(s.plane().imag_axis()[431], -1.0);
        assert_symmetric(&s.sample(4).unwrap());
    }

    #[test]
    fn overflowing_viewports_are_rejected() {
        let vp = Viewport::new(-1e308, 1e308, -1.0, 1.0);
        match sample(&vp, Resolution::new(3, 1), 10) {
            Err(RenderError::InvalidViewport { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn oversized_grids_are_rejected_before_allocating() {
        let huge = Resolution::new(usize::max_value() / 4, 2);
        match sample(&Viewport::default(), huge, 1) {
            Err(RenderError::InvalidResolution { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn values_are_zero_or_near_the_iteration_range() {
        let max_iter = 64;
        let field = sample(&Viewport::default(), Resolution::new(40, 30), max_iter).unwrap();
        for &v in field.values() {
            assert!(v.is_finite());
            assert!(v == 0.0 || (v >= 1.0 && v <= max_iter as f64 + 1.7), "{}", v);
        }
        let (lo, hi) = field.range().unwrap();
        assert_eq!(lo, 0.0);
        assert!(hi > 1.0);
    }

    #[test]
    fn sampling_is_deterministic() {
        let vp = Viewport::new(-0.35, 0.08, 0.63, 1.0);
        let a = sample(&vp, Resolution::new(33, 21), 300).unwrap();
        let b = sample(&vp, Resolution::new(33, 21), 300).unwrap();
        assert_eq!(a, b);
        for (x, y) in a.values().iter().zip(b.values()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn threaded_matches_single() {
        let s = sampler(
            Viewport::new(-0.1443, -0.1432, -0.8389, -0.8379),
            Resolution::new(37, 23),
            400,
        );
        let single = s.sample_single();
        for &threads in &[1, 2, 3, 4, 7, 64] {
            assert_eq!(s.sample(threads).unwrap(), single, "{} threads", threads);
        }
    }

    #[test]
    fn zero_rows_or_columns_is_rejected() {
        for res in &[Resolution::new(0, 10), Resolution::new(10, 0), Resolution::new(0, 0)] {
            match sample(&Viewport::default(), *res, 100) {
                Err(RenderError::InvalidResolution { .. }) => {}
                other => panic!("{:?}: unexpected {:?}", res, other),
            }
        }
    }

    #[test]
    fn degenerate_viewports_are_rejected() {
        let flat = Viewport::new(-1.0, 1.0, 0.5, 0.5);
        let narrow = Viewport::new(0.25, 0.25, -1.0, 1.0);
        for vp in &[flat, narrow] {
            match sample(vp, Resolution::new(10, 10), 100) {
                Err(RenderError::InvalidViewport { .. }) => {}
                other => panic!("{:?}: unexpected {:?}", vp, other),
            }
        }
    }

    #[test]
    fn zero_iterations_are_rejected() {
        match sample(&Viewport::default(), Resolution::new(10, 10), 0) {
            Err(RenderError::InvalidEscapeParameters { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn range_ignores_nan() {
        let field = ScalarField {
            rows: 1,
            columns: 3,
            values: vec![::std::f64::NAN, 2.0, 5.0],
        };
        assert_eq!(field.range(), Some((2.0, 5.0)));
    }
}
