//! Single-band GeoTIFF reading.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array2;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;
use tracing::debug;

use super::error::RasterError;
use super::profile::GeoProfile;

/// One band of reflectance values plus its georeferencing.
#[derive(Debug, Clone, PartialEq)]
pub struct BandRaster {
    /// Pixel values, shape `(height, width)`.
    pub data: Array2<f64>,
    /// Grid size and georeferencing tags.
    pub profile: GeoProfile,
}

impl BandRaster {
    /// Build a band from values and a profile.
    ///
    /// Fails when the array shape disagrees with the profile's grid size.
    pub fn new(data: Array2<f64>, profile: GeoProfile) -> Result<Self, RasterError> {
        let (rows, cols) = data.dim();
        if rows != profile.height as usize || cols != profile.width as usize {
            return Err(RasterError::DimensionMismatch {
                band: "input".to_string(),
                width: profile.width,
                height: profile.height,
                found_width: cols as u32,
                found_height: rows as u32,
            });
        }
        Ok(Self { data, profile })
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.profile.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.profile.height
    }

    /// Read the first image of a single-band GeoTIFF.
    pub fn open(path: &Path) -> Result<Self, RasterError> {
        let file = File::open(path).map_err(|e| RasterError::io(path, e))?;
        let mut decoder = Decoder::new(BufReader::new(file))
            .map_err(|e| RasterError::tiff(path, e))?
            .with_limits(Limits::unlimited());

        let color = decoder.colortype().map_err(|e| RasterError::tiff(path, e))?;
        if !matches!(color, ColorType::Gray(_)) {
            return Err(RasterError::UnsupportedLayout {
                path: path.to_path_buf(),
                reason: format!("expected one sample per pixel, found {:?}", color),
            });
        }

        let profile = GeoProfile::read(&mut decoder).map_err(|e| RasterError::tiff(path, e))?;
        let pixels = decoder.read_image().map_err(|e| RasterError::tiff(path, e))?;
        let values = to_f64(pixels).ok_or_else(|| RasterError::UnsupportedLayout {
            path: path.to_path_buf(),
            reason: "unsupported sample format".to_string(),
        })?;

        let data = Array2::from_shape_vec(
            (profile.height as usize, profile.width as usize),
            values,
        )?;

        debug!(
            path = %path.display(),
            width = profile.width,
            height = profile.height,
            georeferenced = profile.is_georeferenced(),
            "Read band"
        );

        Ok(Self { data, profile })
    }
}

fn to_f64(pixels: DecodingResult) -> Option<Vec<f64>> {
    let values = match pixels {
        DecodingResult::U8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::U64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::I8(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I16(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::I64(buf) => buf.into_iter().map(|v| v as f64).collect(),
        DecodingResult::F32(buf) => buf.into_iter().map(f64::from).collect(),
        DecodingResult::F64(buf) => buf,
        #[allow(unreachable_patterns)]
        _ => return None,
    };
    Some(values)
}
