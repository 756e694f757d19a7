// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The knobs and dials of a rendering session.  Nothing here is read
//! from the environment; callers build a `RenderConfig` (usually by
//! starting from `Default`) and pass it in.

use colour::{Colormap, PowerNorm};
use errors::RenderError;
use escape::EscapeParameters;
use planes::{Resolution, Viewport};

/// Everything a session needs to know to render and zoom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Display width, in units.
    pub width: usize,
    /// Display height, in units.
    pub height: usize,
    /// Dots per unit.
    pub density: usize,
    /// The viewport the session starts from, and returns to on reset.
    pub extent: Viewport,
    /// Iteration cap per sample.
    pub max_iter: usize,
    /// How much each click zooms in.
    pub zoom: f64,
    /// Colour map for the presentation layer.
    pub colormap: Colormap,
    /// Exponent of the power-law normalisation.
    pub gamma: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            width: 9,
            height: 6,
            density: 72,
            extent: Viewport::default(),
            max_iter: 128,
            zoom: 2.0,
            colormap: Colormap::default(),
            gamma: PowerNorm::default().gamma,
        }
    }
}

impl RenderConfig {
    /// The sample grid size implied by the display size and density.
    pub fn resolution(&self) -> Result<Resolution, RenderError> {
        Resolution::from_display(self.width, self.height, self.density)
    }

    /// The escape parameters implied by the iteration cap.
    pub fn escape_parameters(&self) -> Result<EscapeParameters, RenderError> {
        EscapeParameters::with_max_iter(self.max_iter)
    }

    /// The normalisation for the presentation layer.
    pub fn norm(&self) -> PowerNorm {
        PowerNorm::new(self.gamma)
    }

    /// Checks everything that can be checked before a render: the
    /// grid, the extent, the escape parameters and the zoom factor.
    pub fn validate(&self) -> Result<(), RenderError> {
        self.resolution()?.validate()?;
        self.extent.validate()?;
        self.escape_parameters()?;
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(RenderError::InvalidZoomFactor { factor: self.zoom });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.resolution().unwrap(), Resolution::new(648, 432));
        assert_eq!(config.extent, Viewport::new(-2.0, 1.0, -1.0, 1.0));
    }

    #[test]
    fn validate_catches_each_field() {
        let bad = [
            RenderConfig {
                density: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                max_iter: 0,
                ..RenderConfig::default()
            },
            RenderConfig {
                zoom: 0.0,
                ..RenderConfig::default()
            },
            RenderConfig {
                extent: Viewport::new(1.0, -2.0, -1.0, 1.0),
                ..RenderConfig::default()
            },
        ];
        for config in &bad {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }
}
