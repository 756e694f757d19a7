// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The presentation layer, such as it is: colour a field and put it
//! in an image file.  The first frame sets the output up; every frame
//! after that redraws it in place.

use colour::{colorize, Colormap, PowerNorm};
use field::ScalarField;
use image::pnm::PNMEncoder;
use image::pnm::{PNMSubtype, SampleEncoding};
use image::ColorType;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

/// Where a display is in its life.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    /// Nothing has been shown yet.
    Uninitialized,
    /// At least one frame is showing; `redraws` counts the frames
    /// since the first.
    Displaying {
        /// Frames drawn over the first one.
        redraws: usize,
    },
}

/// Writes coloured fields to a single image file.
#[derive(Debug)]
pub struct Display {
    path: PathBuf,
    colormap: Colormap,
    norm: PowerNorm,
    state: Lifecycle,
}

impl Display {
    /// Nothing is written until the first `show`.
    pub fn new<P: AsRef<Path>>(path: P, colormap: Colormap, norm: PowerNorm) -> Display {
        Display {
            path: path.as_ref().to_path_buf(),
            colormap,
            norm,
            state: Lifecycle::Uninitialized,
        }
    }

    /// Where frames go.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where the display is in its life.
    pub fn state(&self) -> Lifecycle {
        self.state
    }

    /// Colours `field` and writes it out, setting the output up on the
    /// first call and redrawing it on later ones.
    pub fn show(&mut self, field: &ScalarField) -> io::Result<()> {
        let pixels = colorize(field, &self.norm, self.colormap);
        let bounds = (field.columns(), field.rows());
        self.state = match self.state {
            Lifecycle::Uninitialized => {
                info!(
                    "creating {} ({}x{}, {})",
                    self.path.display(),
                    bounds.0,
                    bounds.1,
                    self.colormap
                );
                write_image(&self.path, &pixels, bounds)?;
                Lifecycle::Displaying { redraws: 0 }
            }
            Lifecycle::Displaying { redraws } => {
                info!("redrawing {}", self.path.display());
                write_image(&self.path, &pixels, bounds)?;
                Lifecycle::Displaying {
                    redraws: redraws + 1,
                }
            }
        };
        Ok(())
    }
}

fn is_pnm(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ext.eq_ignore_ascii_case("ppm") || ext.eq_ignore_ascii_case("pnm"),
        None => false,
    }
}

/// Writes packed RGB pixels.  PNM files go through the PNM encoder;
/// anything else is left to `image` to work out from the extension.
pub fn write_image(path: &Path, pixels: &[u8], bounds: (usize, usize)) -> io::Result<()> {
    if is_pnm(path) {
        let output = File::create(path)?;
        let mut encoder =
            PNMEncoder::new(output).with_subtype(PNMSubtype::Pixmap(SampleEncoding::Binary));
        encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGB(8))?;
        Ok(())
    } else {
        image::save_buffer(
            path,
            pixels,
            bounds.0 as u32,
            bounds.1 as u32,
            ColorType::RGB(8),
        )
    }
}
