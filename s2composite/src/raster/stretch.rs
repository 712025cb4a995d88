//! Contrast stretch from reflectance to 8-bit display values.
//!
//! The default stretch clips at the 2nd and 98th percentiles of all bands
//! taken together, so the relative colour balance between bands survives.

use tracing::debug;

use super::error::RasterError;

/// Default lower percentile.
pub const DEFAULT_LOW_PERCENTILE: f64 = 2.0;

/// Default upper percentile.
pub const DEFAULT_HIGH_PERCENTILE: f64 = 98.0;

/// How the clip range is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StretchMode {
    /// Clip bounds taken from percentiles (0-100) of the stacked bands.
    Percentile { low: f64, high: f64 },
    /// Fixed reflectance bounds.
    Fixed { vmin: f64, vmax: f64 },
}

impl Default for StretchMode {
    fn default() -> Self {
        StretchMode::Percentile {
            low: DEFAULT_LOW_PERCENTILE,
            high: DEFAULT_HIGH_PERCENTILE,
        }
    }
}

impl StretchMode {
    /// Reject out-of-range or inverted bounds.
    pub fn validate(&self) -> Result<(), RasterError> {
        match *self {
            StretchMode::Percentile { low, high } => {
                if !(0.0..=100.0).contains(&low) || !(0.0..=100.0).contains(&high) {
                    return Err(RasterError::InvalidStretch(format!(
                        "percentiles must lie in [0, 100], got {} and {}",
                        low, high
                    )));
                }
                if low >= high {
                    return Err(RasterError::InvalidStretch(format!(
                        "low percentile {} must be below high percentile {}",
                        low, high
                    )));
                }
            }
            StretchMode::Fixed { vmin, vmax } => {
                if !vmin.is_finite() || !vmax.is_finite() || vmin >= vmax {
                    return Err(RasterError::InvalidStretch(format!(
                        "vmin {} must be finite and below vmax {}",
                        vmin, vmax
                    )));
                }
            }
        }
        Ok(())
    }

    /// Resolve the clip range for the given pixel values.
    pub fn resolve<'a>(
        &self,
        values: impl IntoIterator<Item = &'a f64>,
    ) -> Result<StretchRange, RasterError> {
        self.validate()?;

        match *self {
            StretchMode::Fixed { vmin, vmax } => Ok(StretchRange::new(vmin, vmax)),
            StretchMode::Percentile { low, high } => {
                let mut sorted: Vec<f64> = values
                    .into_iter()
                    .copied()
                    .filter(|v| v.is_finite())
                    .collect();
                if sorted.is_empty() {
                    return Err(RasterError::NoValidPixels);
                }
                sorted.sort_unstable_by(f64::total_cmp);

                let range = StretchRange::new(
                    percentile_of_sorted(&sorted, low),
                    percentile_of_sorted(&sorted, high),
                );
                debug!(
                    pixels = sorted.len(),
                    low = range.low,
                    high = range.high,
                    "Percentile clip range"
                );
                Ok(range)
            }
        }
    }
}

/// Inclusive clip range mapped onto 0..=255.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StretchRange {
    pub low: f64,
    pub high: f64,
}

impl StretchRange {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// Clip `value` to the range and scale it linearly to 0..=255.
    ///
    /// Non-finite values and degenerate ranges map to 0.
    pub fn apply(&self, value: f64) -> u8 {
        let span = self.high - self.low;
        if !value.is_finite() || !span.is_finite() || span <= 0.0 {
            return 0;
        }

        let scaled = (value.clamp(self.low, self.high) - self.low) / span * 255.0;
        scaled.round().clamp(0.0, 255.0) as u8
    }
}

/// Percentile of pre-sorted finite values, interpolating linearly between
/// the two closest ranks.
///
/// `p` is in percent. Panics on an empty slice.
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let rank = (p / 100.0).clamp(0.0, 1.0) * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
