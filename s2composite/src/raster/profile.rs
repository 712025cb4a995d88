//! Georeferencing profile carried from the input bands to the composite.

use std::io::{Read, Seek, Write};

use tiff::decoder::Decoder;
use tiff::encoder::{DirectoryEncoder, TiffKind};
use tiff::tags::Tag;
use tiff::TiffResult;

/// Grid size and GeoTIFF georeferencing tags of a raster.
///
/// Tags are kept in their raw TIFF representation so that they can be
/// written back unchanged.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoProfile {
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// ModelPixelScaleTag (33550): `[sx, sy, sz]`.
    pub pixel_scale: Option<Vec<f64>>,
    /// ModelTiepointTag (33922): `[i, j, k, x, y, z, ...]`.
    pub tiepoints: Option<Vec<f64>>,
    /// ModelTransformationTag (34264): 4×4 affine matrix.
    pub transformation: Option<Vec<f64>>,
    /// GeoKeyDirectoryTag (34735).
    pub geo_key_directory: Option<Vec<u16>>,
    /// GeoDoubleParamsTag (34736).
    pub geo_double_params: Option<Vec<f64>>,
    /// GeoAsciiParamsTag (34737).
    pub geo_ascii_params: Option<String>,
    /// GDAL_NODATA (42113).
    pub nodata: Option<String>,
}

impl GeoProfile {
    /// Whether any georeferencing is present.
    pub fn is_georeferenced(&self) -> bool {
        self.geo_key_directory.is_some()
            && (self.transformation.is_some()
                || (self.pixel_scale.is_some() && self.tiepoints.is_some()))
    }

    /// Read the grid size and georeferencing tags from the current image.
    pub(crate) fn read<R: Read + Seek>(decoder: &mut Decoder<R>) -> TiffResult<Self> {
        let (width, height) = decoder.dimensions()?;

        Ok(Self {
            width,
            height,
            pixel_scale: decoder
                .find_tag(Tag::ModelPixelScaleTag)?
                .map(|v| v.into_f64_vec())
                .transpose()?,
            tiepoints: decoder
                .find_tag(Tag::ModelTiepointTag)?
                .map(|v| v.into_f64_vec())
                .transpose()?,
            transformation: decoder
                .find_tag(Tag::ModelTransformationTag)?
                .map(|v| v.into_f64_vec())
                .transpose()?,
            geo_key_directory: decoder
                .find_tag(Tag::GeoKeyDirectoryTag)?
                .map(|v| v.into_u16_vec())
                .transpose()?,
            geo_double_params: decoder
                .find_tag(Tag::GeoDoubleParamsTag)?
                .map(|v| v.into_f64_vec())
                .transpose()?,
            geo_ascii_params: decoder
                .find_tag(Tag::GeoAsciiParamsTag)?
                .map(|v| v.into_string())
                .transpose()?,
            nodata: decoder
                .find_tag(Tag::GdalNodata)?
                .map(|v| v.into_string())
                .transpose()?,
        })
    }

    /// Write the georeferencing tags into an image directory.
    ///
    /// Grid size is set when the image is created, not here.
    pub(crate) fn write_tags<W: Write + Seek, K: TiffKind>(
        &self,
        dir: &mut DirectoryEncoder<'_, W, K>,
    ) -> TiffResult<()> {
        if let Some(scale) = &self.pixel_scale {
            dir.write_tag(Tag::ModelPixelScaleTag, scale.as_slice())?;
        }
        if let Some(tiepoints) = &self.tiepoints {
            dir.write_tag(Tag::ModelTiepointTag, tiepoints.as_slice())?;
        }
        if let Some(matrix) = &self.transformation {
            dir.write_tag(Tag::ModelTransformationTag, matrix.as_slice())?;
        }
        if let Some(keys) = &self.geo_key_directory {
            dir.write_tag(Tag::GeoKeyDirectoryTag, keys.as_slice())?;
        }
        if let Some(params) = &self.geo_double_params {
            dir.write_tag(Tag::GeoDoubleParamsTag, params.as_slice())?;
        }
        if let Some(params) = &self.geo_ascii_params {
            dir.write_tag(Tag::GeoAsciiParamsTag, params.as_str())?;
        }
        if let Some(nodata) = &self.nodata {
            dir.write_tag(Tag::GdalNodata, nodata.as_str())?;
        }
        Ok(())
    }
}
