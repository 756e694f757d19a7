// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a scalar field into pixels.  A `PowerNorm` squeezes the
//! field into `[0, 1]`, emphasising the low end where most of the
//! escape times live, and a `Colormap` turns that into RGB.  The field
//! itself is never touched; recolouring means calling `colorize`
//! again.

use field::ScalarField;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Power-law normalisation, autoscaled to the field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PowerNorm {
    /// The exponent applied after linear scaling.
    pub gamma: f64,
}

impl Default for PowerNorm {
    fn default() -> Self {
        PowerNorm { gamma: 0.3 }
    }
}

impl PowerNorm {
    /// Constructor.
    pub fn new(gamma: f64) -> Self {
        PowerNorm { gamma }
    }

    /// Maps `value` from `[vmin, vmax]` onto `[0, 1]` and raises it to
    /// `gamma`.  Anything outside the range is clamped; a range with
    /// no width, or a NaN, maps to zero.
    pub fn apply(&self, value: f64, vmin: f64, vmax: f64) -> f64 {
        if !(vmax > vmin) || value.is_nan() {
            return 0.0;
        }
        let t = ((value - vmin) / (vmax - vmin)).max(0.0).min(1.0);
        t.powf(self.gamma)
    }
}

/// The colour maps we know how to draw.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Colormap {
    /// Black to white.
    Gray,
    /// Dave Green's cubehelix: monotonically increasing brightness
    /// with a rotating hue.
    Cubehelix,
    /// The gnuplot "rgbformulae 30,31,32" scheme: black, blue, red,
    /// yellow, white.
    Gnuplot2,
}

impl Default for Colormap {
    fn default() -> Self {
        Colormap::Cubehelix
    }
}

impl Colormap {
    /// The RGB components, each in `[0, 1]`, of position `x` in
    /// `[0, 1]` along the map.
    pub fn rgb(&self, x: f64) -> [f64; 3] {
        let x = x.max(0.0).min(1.0);
        match *self {
            Colormap::Gray => [x, x, x],
            Colormap::Cubehelix => cubehelix(x, 0.5, -1.5, 1.0, 1.0),
            Colormap::Gnuplot2 => [
                clamp_unit(x / 0.32 - 0.78125),
                clamp_unit(2.0 * x - 0.84),
                clamp_unit(if x < 0.25 {
                    4.0 * x
                } else if x < 0.92 {
                    -2.0 * x + 1.84
                } else {
                    x / 0.08 - 11.5
                }),
            ],
        }
    }

    /// The 8-bit RGB triple for position `x`.
    pub fn rgb8(&self, x: f64) -> [u8; 3] {
        let [r, g, b] = self.rgb(x);
        [to_byte(r), to_byte(g), to_byte(b)]
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Colormap::Gray => "gray",
            Colormap::Cubehelix => "cubehelix",
            Colormap::Gnuplot2 => "gnuplot2",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Colormap {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gray" | "grey" => Ok(Colormap::Gray),
            "cubehelix" => Ok(Colormap::Cubehelix),
            "gnuplot2" => Ok(Colormap::Gnuplot2),
            other => Err(format!(
                "Unknown colour map '{}'; expected gray, cubehelix or gnuplot2",
                other
            )),
        }
    }
}

fn clamp_unit(v: f64) -> f64 {
    v.max(0.0).min(1.0)
}

fn to_byte(v: f64) -> u8 {
    (clamp_unit(v) * 255.0).round() as u8
}

/// Green, D. A., 2011, "A colour scheme for the display of
/// astronomical intensity images", Bull. Astr. Soc. India, 39, 289.
fn cubehelix(x: f64, start: f64, rotations: f64, hue: f64, gamma: f64) -> [f64; 3] {
    let xg = x.powf(gamma);
    let amplitude = hue * xg * (1.0 - xg) / 2.0;
    let phi = 2.0 * PI * (start / 3.0 + rotations * x);
    let (sin, cos) = phi.sin_cos();
    [
        clamp_unit(xg + amplitude * (-0.14861 * cos + 1.78277 * sin)),
        clamp_unit(xg + amplitude * (-0.29227 * cos - 0.90649 * sin)),
        clamp_unit(xg + amplitude * (1.97294 * cos)),
    ]
}

/// Colours every value of `field`, returning packed 8-bit RGB, row
/// by row from the top.  The normalisation range is taken from the
/// field itself.
pub fn colorize(field: &ScalarField, norm: &PowerNorm, colormap: Colormap) -> Vec<u8> {
    let (vmin, vmax) = field.range().unwrap_or((0.0, 0.0));
    let mut pixels = Vec::with_capacity(field.values().len() * 3);
    for &value in field.values() {
        pixels.extend_from_slice(&colormap.rgb8(norm.apply(value, vmin, vmax)));
    }
    pixels
}
