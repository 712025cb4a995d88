//! The fetch → composite → cleanup run.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::{FetchReport, FetchRequest, PipelineError};
use crate::aoi::{self, Aoi};
use crate::band::Band;
use crate::download::{download_to_file, ZipExtractor};
use crate::earthengine::expression::{self, ValueNode};
use crate::earthengine::{EarthEngineClient, ExportTask, HttpClient};
use crate::raster::{BandRaster, RgbComposite};

/// Run the whole pipeline for one request.
///
/// Steps, in order:
/// 1. build the region and pick the least-cloudy scene
/// 2. for B4, B3, B2: optionally submit a Drive export, then download and
///    unzip the band into the working directory
/// 3. stretch the three bands together and write the RGB composite
/// 4. delete the per-band intermediates unless asked to keep them
///
/// Any failure returns immediately; files written so far stay on disk.
pub fn fetch_composite<C: HttpClient>(
    client: &EarthEngineClient<C>,
    request: &FetchRequest,
) -> Result<FetchReport, PipelineError> {
    let region = aoi::square(request.lon, request.lat, request.size)?;
    request.stretch.validate()?;

    fs::create_dir_all(&request.work_dir).map_err(|source| PipelineError::WorkDir {
        path: request.work_dir.clone(),
        source,
    })?;

    info!(
        region = %region,
        start = %request.query.start,
        end = %request.query.end,
        collection = %request.query.collection,
        "Searching for scene"
    );
    let scene = client.find_scene(&request.query, &region)?;
    let image = expression::scene(&request.query, &region);

    let extractor = ZipExtractor::new();
    let mut exports = Vec::new();
    for band in Band::ACQUISITION_ORDER {
        if let Some(task) = acquire_band(client, &extractor, request, &image, band, &region)? {
            exports.push(task);
        }
    }

    let dir = request.work_dir.as_path();
    let [blue, green, red] = open_bands(dir)?;

    let composite = RgbComposite::build(&blue, &green, &red, &request.stretch)?;
    composite.write(&request.output)?;

    let removed = if request.keep_intermediates {
        info!(dir = %dir.display(), "Keeping intermediate band files");
        Vec::new()
    } else {
        remove_intermediates(dir)?
    };

    Ok(FetchReport {
        scene,
        output: request.output.clone(),
        width: composite.profile().width,
        height: composite.profile().height,
        range: composite.range(),
        exports,
        removed,
    })
}

/// Export (optionally), download and unzip one band.
fn acquire_band<C: HttpClient>(
    client: &EarthEngineClient<C>,
    extractor: &ZipExtractor,
    request: &FetchRequest,
    image: &ValueNode,
    band: Band,
    region: &Aoi,
) -> Result<Option<ExportTask>, PipelineError> {
    let export = if request.drive_export {
        Some(client.start_drive_export(image, band, &request.grid, region)?)
    } else {
        None
    };

    let url = client.download_url(image, band, &request.grid, region)?;
    let archive = band.archive_path(&request.work_dir);
    let raster = band.raster_path(&request.work_dir);

    let downloaded = download_to_file(client.http(), &url, &archive)?;
    let extracted = extractor.extract_single(&archive, &raster)?;

    info!(
        band = %band,
        archive_bytes = downloaded,
        raster_bytes = extracted,
        path = %raster.display(),
        "Band ready"
    );
    Ok(export)
}

/// Open the extracted rasters in [`Band::STACK_ORDER`].
fn open_bands(dir: &Path) -> Result<[BandRaster; 3], PipelineError> {
    let [first, second, third] = Band::STACK_ORDER;
    Ok([
        BandRaster::open(&first.raster_path(dir))?,
        BandRaster::open(&second.raster_path(dir))?,
        BandRaster::open(&third.raster_path(dir))?,
    ])
}

/// Delete every per-band raster and archive in `dir`.
fn remove_intermediates(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    let mut removed = Vec::with_capacity(Band::ACQUISITION_ORDER.len() * 2);

    for band in Band::ACQUISITION_ORDER {
        for path in [band.raster_path(dir), band.archive_path(dir)] {
            fs::remove_file(&path).map_err(|source| PipelineError::Cleanup {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "Removed intermediate");
            removed.push(path);
        }
    }

    info!(files = removed.len(), "Cleaned up intermediates");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    use serde_json::json;
    use tempfile::TempDir;
    use tiff::encoder::{colortype, TiffEncoder};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use crate::earthengine::{EarthEngineError, MockHttpClient};
    use crate::raster::{GeoProfile, StretchMode};

    fn band_profile() -> GeoProfile {
        GeoProfile {
            width: 4,
            height: 3,
            pixel_scale: Some(vec![0.00027, 0.00027, 0.0]),
            tiepoints: Some(vec![0.0, 0.0, 0.0, -122.45, 37.85, 0.0]),
            geo_key_directory: Some(vec![1, 1, 0, 1, 2048, 0, 1, 4326]),
            ..Default::default()
        }
    }

    /// A single-band Gray16 GeoTIFF whose pixels start at `offset`.
    fn band_tiff(offset: u16) -> Vec<u8> {
        let profile = band_profile();
        let pixels: Vec<u16> = (0..profile.width * profile.height)
            .map(|i| offset + i as u16 * 100)
            .collect();

        let mut tiff = Cursor::new(Vec::new());
        {
            let mut encoder = TiffEncoder::new(&mut tiff).unwrap();
            let mut image = encoder
                .new_image::<colortype::Gray16>(profile.width, profile.height)
                .unwrap();
            profile.write_tags(image.encoder()).unwrap();
            image.write_data(&pixels).unwrap();
        }
        tiff.into_inner()
    }

    /// [`band_tiff`] wrapped in a zip archive.
    fn zipped_band(offset: u16) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("download.tif", SimpleFileOptions::default())
            .unwrap();
        zip.write_all(&band_tiff(offset)).unwrap();
        zip.finish().unwrap().into_inner()
    }

    fn scene_routes(mock: MockHttpClient) -> MockHttpClient {
        mock.with_json_when("value:compute", "Collection.size", json!({"result": 2}))
            .with_json_when(
                "value:compute",
                "system:index",
                json!({"result": "20200415T183919_20200415T184435_T10SEG"}),
            )
            .with_json("value:compute", json!({"result": 1.5}))
    }

    fn full_mock() -> MockHttpClient {
        let mut mock = MockHttpClient::new();
        for (band, offset) in [("B4", 300u16), ("B3", 200), ("B2", 100)] {
            let id = band.to_lowercase();
            mock = mock
                .with_response(&format!("{}:getPixels", id), zipped_band(offset))
                .with_json_when(
                    "thumbnails",
                    &format!("\"bandIds\":[\"{}\"]", band),
                    json!({"name": format!("projects/proj/thumbnails/{}", id)}),
                );
        }
        scene_routes(mock).with_json(
            "image:export",
            json!({"name": "projects/proj/operations/EXPORT123"}),
        )
    }

    fn client(mock: MockHttpClient) -> EarthEngineClient<MockHttpClient> {
        EarthEngineClient::new(mock, "proj").unwrap()
    }

    fn request(temp: &TempDir) -> FetchRequest {
        FetchRequest::new(-122.4, 37.8, 0.1, temp.path().join("composite.tif"))
            .with_work_dir(temp.path().join("work"))
    }

    #[test]
    fn test_open_bands_in_stack_order() {
        let temp = TempDir::new().unwrap();
        for (band, offset) in [(Band::B4, 300u16), (Band::B3, 200), (Band::B2, 100)] {
            std::fs::write(band.raster_path(temp.path()), band_tiff(offset)).unwrap();
        }

        let bands = open_bands(temp.path()).unwrap();

        let firsts: Vec<f64> = bands.iter().map(|b| b.data[[0, 0]]).collect();
        assert_eq!(firsts, vec![100.0, 200.0, 300.0]);
    }

    #[test]
    fn test_open_bands_missing_raster() {
        let temp = TempDir::new().unwrap();
        std::fs::write(Band::B2.raster_path(temp.path()), band_tiff(0)).unwrap();

        let result = open_bands(temp.path());
        assert!(matches!(result, Err(PipelineError::Raster(_))));
    }

    #[test]
    fn test_full_run_cleans_up() {
        let temp = TempDir::new().unwrap();
        let client = client(full_mock());

        let report = fetch_composite(&client, &request(&temp)).unwrap();

        assert!(report.output.exists());
        assert_eq!((report.width, report.height), (4, 3));
        assert_eq!(report.scene.matching, 2);
        assert_eq!(report.exports.len(), 3);
        assert_eq!(report.removed.len(), 6);
        for path in &report.removed {
            assert!(!path.exists(), "{} should be gone", path.display());
        }
    }

    #[test]
    fn test_bands_fetched_red_first() {
        let temp = TempDir::new().unwrap();
        let client = client(full_mock());

        fetch_composite(&client, &request(&temp).with_drive_export(false)).unwrap();

        let downloads: Vec<String> = client
            .http()
            .requests()
            .into_iter()
            .filter(|r| r.method == "GET")
            .map(|r| r.url)
            .collect();
        assert_eq!(downloads.len(), 3);
        assert!(downloads[0].ends_with("b4:getPixels"));
        assert!(downloads[1].ends_with("b3:getPixels"));
        assert!(downloads[2].ends_with("b2:getPixels"));
    }

    #[test]
    fn test_drive_export_disabled() {
        let temp = TempDir::new().unwrap();
        let client = client(full_mock());

        let report = fetch_composite(&client, &request(&temp).with_drive_export(false)).unwrap();

        assert!(report.exports.is_empty());
        assert!(!client
            .http()
            .requests()
            .iter()
            .any(|r| r.url.ends_with("image:export")));
    }

    #[test]
    fn test_keep_intermediates() {
        let temp = TempDir::new().unwrap();
        let client = client(full_mock());
        let request = request(&temp).with_keep_intermediates(true);

        let report = fetch_composite(&client, &request).unwrap();

        assert!(report.removed.is_empty());
        for band in Band::ACQUISITION_ORDER {
            assert!(band.raster_path(&request.work_dir).exists());
            assert!(band.archive_path(&request.work_dir).exists());
        }
    }

    #[test]
    fn test_no_scene_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let mock = MockHttpClient::new().with_json("value:compute", json!({"result": 0}));
        let client = client(mock);
        let request = request(&temp);

        let result = fetch_composite(&client, &request);

        assert!(matches!(
            result,
            Err(PipelineError::EarthEngine(EarthEngineError::NoScene { .. }))
        ));
        assert!(!request.output.exists());
        assert!(!Band::B4.archive_path(&request.work_dir).exists());
    }

    #[test]
    fn test_invalid_region_before_any_request() {
        let temp = TempDir::new().unwrap();
        let client = client(full_mock());
        let mut request = request(&temp);
        request.lat = 91.0;

        let result = fetch_composite(&client, &request);

        assert!(matches!(result, Err(PipelineError::Region(_))));
        assert!(client.http().requests().is_empty());
    }

    #[test]
    fn test_invalid_stretch_before_any_request() {
        let temp = TempDir::new().unwrap();
        let client = client(full_mock());
        let request = request(&temp).with_stretch(StretchMode::Fixed {
            vmin: 3000.0,
            vmax: 0.0,
        });

        let result = fetch_composite(&client, &request);

        assert!(matches!(result, Err(PipelineError::Raster(_))));
        assert!(client.http().requests().is_empty());
    }

    #[test]
    fn test_failed_band_keeps_earlier_intermediates() {
        let temp = TempDir::new().unwrap();
        let mock = scene_routes(
            MockHttpClient::new()
                .with_response("b4:getPixels", zipped_band(300))
                .with_error(
                    "b3:getPixels",
                    EarthEngineError::Http("connection reset".to_string()),
                )
                .with_json_when(
                    "thumbnails",
                    "\"bandIds\":[\"B4\"]",
                    json!({"name": "projects/proj/thumbnails/b4"}),
                )
                .with_json_when(
                    "thumbnails",
                    "\"bandIds\":[\"B3\"]",
                    json!({"name": "projects/proj/thumbnails/b3"}),
                ),
        );
        let client = client(mock);
        let request = request(&temp).with_drive_export(false);

        let result = fetch_composite(&client, &request);

        assert!(matches!(result, Err(PipelineError::Download(_))));
        assert!(Band::B4.raster_path(&request.work_dir).exists());
        assert!(Band::B4.archive_path(&request.work_dir).exists());
        assert!(!request.output.exists());
    }
}
