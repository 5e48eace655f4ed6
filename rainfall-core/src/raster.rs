//! In-memory raster images.
//!
//! A [`Raster`] is an immutable multi-band grid with date metadata and an
//! optional assigned [`GroupKey`]. Operations derive new rasters rather than
//! mutating in place, matching the source imagery model where composites are
//! always new images.

use crate::calendar::GroupKey;
use crate::errors::{RainfallError, RainfallResult};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Floating point type used for pixel values.
pub type FloatValue = f64;

/// Geo-referencing for a raster collection: a regular lon/lat grid.
///
/// `west`/`north` locate the outer corner of the top-left pixel and
/// `pixel_size_deg` is the edge length of a square pixel in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub west: f64,
    pub north: f64,
    pub pixel_size_deg: f64,
    pub rows: usize,
    pub cols: usize,
}

impl GridSpec {
    pub fn new(west: f64, north: f64, pixel_size_deg: f64, rows: usize, cols: usize) -> Self {
        assert!(pixel_size_deg > 0.0, "pixel size must be positive");
        Self {
            west,
            north,
            pixel_size_deg,
            rows,
            cols,
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Longitude/latitude of the center of pixel `(row, col)`.
    pub fn center(&self, row: usize, col: usize) -> (f64, f64) {
        let lon = self.west + (col as f64 + 0.5) * self.pixel_size_deg;
        let lat = self.north - (row as f64 + 0.5) * self.pixel_size_deg;
        (lon, lat)
    }

    /// Pixel index containing the point, or `None` if it falls outside the grid.
    pub fn index_of(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        let col = (lon - self.west) / self.pixel_size_deg;
        let row = (self.north - lat) / self.pixel_size_deg;
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row < self.rows && col < self.cols {
            Some((row, col))
        } else {
            None
        }
    }
}

/// Calendar date metadata attached to a raster.
///
/// Monthly aggregates carry `day = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl RasterDate {
    pub fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    pub fn is_leap_day(&self) -> bool {
        self.month == 2 && self.day == 29
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Band {
    name: String,
    data: Array2<FloatValue>,
}

/// A single multi-band raster image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Raster {
    date: RasterDate,
    key: Option<GroupKey>,
    bands: Vec<Band>,
}

impl Raster {
    /// Create a raster with a single band.
    pub fn new(date: RasterDate, band_name: impl Into<String>, data: Array2<FloatValue>) -> Self {
        Self {
            date,
            key: None,
            bands: vec![Band {
                name: band_name.into(),
                data,
            }],
        }
    }

    pub fn date(&self) -> RasterDate {
        self.date
    }

    pub fn key(&self) -> Option<GroupKey> {
        self.key
    }

    /// Tag the raster with a group key, consuming it.
    pub fn with_key(mut self, key: GroupKey) -> Self {
        self.key = Some(key);
        self
    }

    pub fn shape(&self) -> (usize, usize) {
        self.bands
            .first()
            .map(|b| b.data.dim())
            .unwrap_or((0, 0))
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    pub fn band(&self, name: &str) -> RainfallResult<&Array2<FloatValue>> {
        self.bands
            .iter()
            .find(|b| b.name == name)
            .map(|b| &b.data)
            .ok_or_else(|| RainfallError::BandNotFound(name.to_string()))
    }

    /// Append a band, erroring on duplicate names or mismatched shapes.
    pub fn with_band(
        mut self,
        name: impl Into<String>,
        data: Array2<FloatValue>,
    ) -> RainfallResult<Self> {
        let name = name.into();
        if self.bands.iter().any(|b| b.name == name) {
            return Err(RainfallError::DuplicateBand(name));
        }
        if !self.bands.is_empty() && data.dim() != self.shape() {
            return Err(RainfallError::ShapeMismatch {
                expected: self.shape(),
                actual: data.dim(),
            });
        }
        self.bands.push(Band { name, data });
        Ok(self)
    }

    /// Select a band, rename it and multiply every pixel by `factor`,
    /// appending the result as a new band. The source band is preserved.
    pub fn scaled_band(&self, src: &str, dst: &str, factor: FloatValue) -> RainfallResult<Self> {
        let scaled = self.band(src)?.mapv(|v| v * factor);
        self.clone().with_band(dst, scaled)
    }

    /// Pixel-wise mean across rasters sharing a band schema.
    ///
    /// The band schema of the first raster defines the output; date metadata
    /// is taken from the first raster and the group key is cleared (callers
    /// tag the composite explicitly).
    pub fn mean_of(rasters: &[&Raster]) -> RainfallResult<Raster> {
        let first = rasters
            .first()
            .ok_or_else(|| RainfallError::Error("cannot average zero rasters".to_string()))?;
        let n = rasters.len() as FloatValue;
        let mut bands = Vec::with_capacity(first.bands.len());
        for band in &first.bands {
            let mut sum = Array2::<FloatValue>::zeros(band.data.dim());
            for raster in rasters {
                let data = raster.band(&band.name)?;
                if data.dim() != band.data.dim() {
                    return Err(RainfallError::ShapeMismatch {
                        expected: band.data.dim(),
                        actual: data.dim(),
                    });
                }
                sum += data;
            }
            bands.push(Band {
                name: band.name.clone(),
                data: sum.mapv_into(|v| v / n),
            });
        }
        Ok(Raster {
            date: first.date,
            key: None,
            bands,
        })
    }
}
