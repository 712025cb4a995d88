//! Three-band RGB composite.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use ndarray::{stack, Axis};
use tiff::encoder::{colortype, TiffEncoder};
use tracing::{debug, info};

use super::error::RasterError;
use super::profile::GeoProfile;
use super::reader::BandRaster;
use super::stretch::{StretchMode, StretchRange};
use crate::band::Band;

/// An 8-bit RGB image on the grid of its blue input band.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbComposite {
    profile: GeoProfile,
    range: StretchRange,
    pixels: Vec<u8>,
}

impl RgbComposite {
    /// Stack the bands (blue, green, red), resolve one clip range over the
    /// whole stack and map every band through it.
    ///
    /// The composite takes the blue band's profile.
    pub fn build(
        blue: &BandRaster,
        green: &BandRaster,
        red: &BandRaster,
        mode: &StretchMode,
    ) -> Result<Self, RasterError> {
        ensure_same_grid(blue, green, Band::B3)?;
        ensure_same_grid(blue, red, Band::B4)?;

        let stacked = stack(
            Axis(0),
            &[blue.data.view(), green.data.view(), red.data.view()],
        )?;
        let range = mode.resolve(stacked.iter())?;

        let mut pixels = Vec::with_capacity(stacked.len());
        for ((r, g), b) in red
            .data
            .iter()
            .zip(green.data.iter())
            .zip(blue.data.iter())
        {
            pixels.extend_from_slice(&[range.apply(*r), range.apply(*g), range.apply(*b)]);
        }

        debug!(
            width = blue.width(),
            height = blue.height(),
            low = range.low,
            high = range.high,
            "Composite built"
        );

        Ok(Self {
            profile: blue.profile.clone(),
            range,
            pixels,
        })
    }

    /// Georeferencing written with the composite.
    pub fn profile(&self) -> &GeoProfile {
        &self.profile
    }

    /// Clip range the bands were stretched with.
    pub fn range(&self) -> StretchRange {
        self.range
    }

    /// Interleaved RGB bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Write the composite as a 3-sample 8-bit GeoTIFF.
    pub fn write(&self, path: &Path) -> Result<(), RasterError> {
        let file = File::create(path).map_err(|e| RasterError::io(path, e))?;
        let mut writer = BufWriter::new(file);

        {
            let mut encoder =
                TiffEncoder::new(&mut writer).map_err(|e| RasterError::tiff(path, e))?;
            let mut image = encoder
                .new_image::<colortype::RGB8>(self.profile.width, self.profile.height)
                .map_err(|e| RasterError::tiff(path, e))?;

            self.profile
                .write_tags(image.encoder())
                .map_err(|e| RasterError::tiff(path, e))?;
            image
                .write_data(&self.pixels)
                .map_err(|e| RasterError::tiff(path, e))?;
        }

        writer.flush().map_err(|e| RasterError::io(path, e))?;

        info!(
            path = %path.display(),
            width = self.profile.width,
            height = self.profile.height,
            "Wrote RGB composite"
        );
        Ok(())
    }
}

fn ensure_same_grid(
    reference: &BandRaster,
    raster: &BandRaster,
    band: Band,
) -> Result<(), RasterError> {
    if reference.width() != raster.width() || reference.height() != raster.height() {
        return Err(RasterError::DimensionMismatch {
            band: band.name().to_string(),
            width: reference.width(),
            height: reference.height(),
            found_width: raster.width(),
            found_height: raster.height(),
        });
    }
    Ok(())
}
