// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A session is the only state that survives from one render to the
//! next: the viewport currently being looked at.  Every render takes a
//! copy of the viewport when it starts, so a zoom that lands while a
//! render is running cannot tear it.

use config::RenderConfig;
use errors::RenderError;
use field::{FieldSampler, ScalarField};
use num::Complex;
use planes::{Pixel, PlaneMapper, Viewport};

/// A click, already taken out of whatever event loop produced it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Click {
    /// A pixel of the most recent image.
    Pixel(Pixel),
    /// A point on the complex plane.
    Point(Complex<f64>),
    /// Somewhere that isn't the image at all.
    Outside,
}

/// Owns the current viewport and the configuration it was built from.
#[derive(Debug)]
pub struct Session {
    config: RenderConfig,
    viewport: Viewport,
}

impl Session {
    /// Checks the configuration and starts at its extent.
    pub fn new(config: RenderConfig) -> Result<Self, RenderError> {
        config.validate()?;
        Ok(Session {
            config,
            viewport: config.extent,
        })
    }

    /// The configuration.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// A snapshot of the current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Renders the current viewport on `threads` threads.
    pub fn render(&self, threads: usize) -> Result<ScalarField, RenderError> {
        let viewport = self.viewport();
        info!(
            "rendering [{}, {}] x [{}, {}] at {} iterations",
            viewport.x_min, viewport.x_max, viewport.y_min, viewport.y_max, self.config.max_iter
        );
        let sampler = FieldSampler::new(
            viewport,
            self.config.resolution()?,
            self.config.escape_parameters()?,
        )?;
        sampler.sample(threads)
    }

    /// Zooms in on a click by the configured factor.  Returns the new
    /// viewport, or None if the click missed the image and nothing
    /// changed.
    pub fn click(&mut self, click: Click) -> Result<Option<Viewport>, RenderError> {
        let point = match click {
            Click::Point(point) => Some(point),
            Click::Pixel(pixel) => {
                PlaneMapper::new(self.viewport, self.config.resolution()?)?.pixel_to_point(&pixel)
            }
            Click::Outside => None,
        };
        match point {
            Some(point) => {
                self.viewport = self.viewport.zoom(point, self.config.zoom)?;
                debug!("zoomed to {:?}", self.viewport);
                Ok(Some(self.viewport))
            }
            None => {
                debug!("ignoring {:?}", click);
                Ok(None)
            }
        }
    }

    /// Goes back to the configured extent.
    pub fn reset(&mut self) {
        self.viewport = self.config.extent;
    }
}
