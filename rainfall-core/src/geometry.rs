//! Areas of interest and spatial reduction.
//!
//! An area of interest is either a literal bounding rectangle or a polygon
//! looked up from a named administrative boundary dataset by attribute match.
//! [`reduce_region_mean`] computes the arithmetic mean of a raster band over
//! all sample points intersecting the geometry at a fixed ground sampling
//! distance, the local equivalent of a region reduction on the hosted
//! platform.

use crate::errors::{RainfallError, RainfallResult};
use crate::raster::{FloatValue, GridSpec, Raster};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Approximate meters per degree of latitude, used to convert a ground
/// sampling distance into grid degrees.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Axis-aligned bounding rectangle in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rect {
    /// Build from `[west, south, east, north]` coordinate bounds.
    pub fn from_bounds(bounds: [f64; 4]) -> Self {
        Self {
            west: bounds[0],
            south: bounds[1],
            east: bounds[2],
            north: bounds[3],
        }
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.west && lon <= self.east && lat >= self.south && lat <= self.north
    }
}

/// Simple polygon defined by its exterior ring (lon, lat vertices).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    exterior: Vec<(f64, f64)>,
}

impl Polygon {
    /// # Panics
    ///
    /// Panics if fewer than 3 vertices are supplied.
    pub fn new(exterior: Vec<(f64, f64)>) -> Self {
        assert!(
            exterior.len() >= 3,
            "polygon requires at least 3 vertices, got {}",
            exterior.len()
        );
        Self { exterior }
    }

    /// Even-odd ray casting point-in-polygon test.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        let mut inside = false;
        let n = self.exterior.len();
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.exterior[i];
            let (xj, yj) = self.exterior[j];
            if ((yi > lat) != (yj > lat))
                && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    pub fn bounding_rect(&self) -> Rect {
        let mut rect = Rect {
            west: f64::INFINITY,
            south: f64::INFINITY,
            east: f64::NEG_INFINITY,
            north: f64::NEG_INFINITY,
        };
        for &(lon, lat) in &self.exterior {
            rect.west = rect.west.min(lon);
            rect.east = rect.east.max(lon);
            rect.south = rect.south.min(lat);
            rect.north = rect.north.max(lat);
        }
        rect
    }
}

/// Area-of-interest geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Rect(Rect),
    Polygon(Polygon),
}

impl Geometry {
    /// Literal rectangle from `[west, south, east, north]` bounds, accepted
    /// without any boundary-dataset lookup.
    pub fn rectangle(bounds: [f64; 4]) -> Self {
        Geometry::Rect(Rect::from_bounds(bounds))
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        match self {
            Geometry::Rect(rect) => rect.contains(lon, lat),
            Geometry::Polygon(polygon) => polygon.contains(lon, lat),
        }
    }

    pub fn bounding_rect(&self) -> Rect {
        match self {
            Geometry::Rect(rect) => *rect,
            Geometry::Polygon(polygon) => polygon.bounding_rect(),
        }
    }
}

/// A vector feature: string attributes plus a geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    attributes: HashMap<String, String>,
    geometry: Geometry,
}

impl Feature {
    pub fn new(attributes: HashMap<String, String>, geometry: Geometry) -> Self {
        Self {
            attributes,
            geometry,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }
}

/// A named vector boundary dataset, e.g. country outlines.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundaryCollection {
    features: Vec<Feature>,
}

impl BoundaryCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Keep features whose attribute exactly matches `value`.
    pub fn filter_eq(&self, attribute: &str, value: &str) -> Self {
        Self {
            features: self
                .features
                .iter()
                .filter(|f| f.attribute(attribute) == Some(value))
                .cloned()
                .collect(),
        }
    }

    pub fn first(&self) -> Option<&Feature> {
        self.features.first()
    }

    /// Geometry of the first feature matching an exact attribute filter.
    pub fn aoi(&self, attribute: &str, value: &str) -> RainfallResult<Geometry> {
        self.filter_eq(attribute, value)
            .first()
            .map(|f| f.geometry().clone())
            .ok_or_else(|| RainfallError::NoMatchingFeature {
                attribute: attribute.to_string(),
                value: value.to_string(),
            })
    }
}

/// Arithmetic mean of `band` over all sample points inside `geometry`,
/// sampled on a regular lattice with `scale_m` ground spacing. Points are
/// resolved to pixel values by nearest containment in `grid`.
pub fn reduce_region_mean(
    raster: &Raster,
    grid: &GridSpec,
    band: &str,
    geometry: &Geometry,
    scale_m: f64,
) -> RainfallResult<FloatValue> {
    if scale_m <= 0.0 {
        return Err(RainfallError::Error(format!(
            "sampling scale must be positive, got {}",
            scale_m
        )));
    }
    let data = raster.band(band)?;
    let bounds = geometry.bounding_rect();
    let step = scale_m / METERS_PER_DEGREE;

    let mut sum = 0.0;
    let mut count: usize = 0;
    let mut lat = bounds.south + step / 2.0;
    while lat < bounds.north {
        let mut lon = bounds.west + step / 2.0;
        while lon < bounds.east {
            if geometry.contains(lon, lat) {
                if let Some((row, col)) = grid.index_of(lon, lat) {
                    sum += data[[row, col]];
                    count += 1;
                }
            }
            lon += step;
        }
        lat += step;
    }

    if count == 0 {
        return Err(RainfallError::EmptyRegion);
    }
    Ok(sum / count as FloatValue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::RasterDate;
    use is_close::is_close;
    use ndarray::array;

    fn square_polygon() -> Polygon {
        Polygon::new(vec![(29.0, -3.0), (31.0, -3.0), (31.0, -1.0), (29.0, -1.0)])
    }

    #[test]
    fn rect_containment() {
        let rect = Rect::from_bounds([28.8482, -2.8581, 30.9158, -1.0466]);
        assert!(rect.contains(29.5, -2.0));
        assert!(!rect.contains(31.5, -2.0));
        assert!(!rect.contains(29.5, -3.5));
    }

    #[test]
    fn polygon_containment() {
        let polygon = square_polygon();
        assert!(polygon.contains(30.0, -2.0));
        assert!(!polygon.contains(32.0, -2.0));
        assert!(!polygon.contains(30.0, 0.0));
    }

    #[test]
    fn polygon_bounding_rect() {
        let rect = square_polygon().bounding_rect();
        assert_eq!(rect.west, 29.0);
        assert_eq!(rect.north, -1.0);
    }

    #[test]
    #[should_panic(expected = "polygon requires at least 3 vertices")]
    fn degenerate_polygon_panics() {
        Polygon::new(vec![(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn filter_eq_exact_match() {
        let mut attributes = HashMap::new();
        attributes.insert("ADM0_NAME".to_string(), "Rwanda".to_string());
        let boundaries = BoundaryCollection::new(vec![Feature::new(
            attributes,
            Geometry::Polygon(square_polygon()),
        )]);

        assert_eq!(boundaries.filter_eq("ADM0_NAME", "Rwanda").len(), 1);
        assert!(boundaries.filter_eq("ADM0_NAME", "Burundi").is_empty());
        assert!(boundaries.aoi("ADM0_NAME", "Rwanda").is_ok());
        assert!(matches!(
            boundaries.aoi("ADM0_NAME", "Burundi"),
            Err(RainfallError::NoMatchingFeature { .. })
        ));
    }

    #[test]
    fn region_mean_over_uniform_raster() {
        let grid = GridSpec::new(29.0, -1.0, 0.5, 4, 4);
        let raster = Raster::new(
            RasterDate::new(2010, 1, 1),
            "p",
            array![
                [2.0, 2.0, 2.0, 2.0],
                [2.0, 2.0, 2.0, 2.0],
                [2.0, 2.0, 2.0, 2.0],
                [2.0, 2.0, 2.0, 2.0]
            ],
        );
        let aoi = Geometry::rectangle([29.0, -3.0, 31.0, -1.0]);
        let mean = reduce_region_mean(&raster, &grid, "p", &aoi, 10_000.0).unwrap();
        assert!(is_close!(mean, 2.0));
    }

    #[test]
    fn region_mean_weighs_sampled_pixels() {
        // Left half 1.0, right half 3.0; AOI covering both halves evenly.
        let grid = GridSpec::new(0.0, 2.0, 1.0, 2, 2);
        let raster = Raster::new(
            RasterDate::new(2010, 1, 1),
            "p",
            array![[1.0, 3.0], [1.0, 3.0]],
        );
        let aoi = Geometry::rectangle([0.0, 0.0, 2.0, 2.0]);
        let mean = reduce_region_mean(&raster, &grid, "p", &aoi, 11_132.0).unwrap();
        assert!(is_close!(mean, 2.0));
    }

    #[test]
    fn empty_region_is_an_error() {
        let grid = GridSpec::new(29.0, -1.0, 0.5, 2, 2);
        let raster = Raster::new(RasterDate::new(2010, 1, 1), "p", array![[1.0, 1.0], [1.0, 1.0]]);
        // AOI entirely outside the grid.
        let aoi = Geometry::rectangle([100.0, 10.0, 101.0, 11.0]);
        assert!(matches!(
            reduce_region_mean(&raster, &grid, "p", &aoi, 10_000.0),
            Err(RainfallError::EmptyRegion)
        ));
    }

    #[test]
    fn non_positive_scale_is_rejected() {
        let grid = GridSpec::new(29.0, -1.0, 0.5, 2, 2);
        let raster = Raster::new(RasterDate::new(2010, 1, 1), "p", array![[1.0, 1.0], [1.0, 1.0]]);
        let aoi = Geometry::rectangle([29.0, -2.0, 30.0, -1.0]);
        assert!(reduce_region_mean(&raster, &grid, "p", &aoi, 0.0).is_err());
    }
}
