//! Injected data sources.
//!
//! Datasets are consumed by name through the [`Catalog`] capability so the
//! grouping, aggregation and reduction logic never touches the network.
//! [`MemoryCatalog`] backs tests and synthetic data; [`FileCatalog`] reads
//! JSON documents from a directory, one per dataset.

use crate::collection::RasterCollection;
use crate::errors::{RainfallError, RainfallResult};
use crate::geometry::BoundaryCollection;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Capability for resolving named raster and boundary datasets.
pub trait Catalog {
    fn load_rasters(&self, name: &str) -> RainfallResult<RasterCollection>;
    fn load_boundaries(&self, name: &str) -> RainfallResult<BoundaryCollection>;
}

/// In-memory catalog, primarily for tests and synthetic data.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    rasters: HashMap<String, RasterCollection>,
    boundaries: HashMap<String, BoundaryCollection>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rasters(mut self, name: impl Into<String>, collection: RasterCollection) -> Self {
        self.rasters.insert(name.into(), collection);
        self
    }

    pub fn with_boundaries(
        mut self,
        name: impl Into<String>,
        boundaries: BoundaryCollection,
    ) -> Self {
        self.boundaries.insert(name.into(), boundaries);
        self
    }
}

impl Catalog for MemoryCatalog {
    fn load_rasters(&self, name: &str) -> RainfallResult<RasterCollection> {
        self.rasters
            .get(name)
            .cloned()
            .ok_or_else(|| RainfallError::DatasetNotFound(name.to_string()))
    }

    fn load_boundaries(&self, name: &str) -> RainfallResult<BoundaryCollection> {
        self.boundaries
            .get(name)
            .cloned()
            .ok_or_else(|| RainfallError::DatasetNotFound(name.to_string()))
    }
}

/// Directory-backed catalog.
///
/// A dataset named `ECMWF/ERA5/MONTHLY` is stored as
/// `<root>/ECMWF_ERA5_MONTHLY.json`, serialized with serde_json.
#[derive(Debug, Clone)]
pub struct FileCatalog {
    root: PathBuf,
}

impl FileCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn dataset_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.json", name.replace('/', "_")))
    }

    fn open(&self, name: &str) -> RainfallResult<BufReader<File>> {
        let path = self.dataset_path(name);
        if !path.exists() {
            return Err(RainfallError::DatasetNotFound(name.to_string()));
        }
        Ok(BufReader::new(File::open(path)?))
    }

    /// Serialize a raster collection into the catalog directory.
    pub fn store_rasters(&self, name: &str, collection: &RasterCollection) -> RainfallResult<()> {
        self.store(name, collection)
    }

    /// Serialize a boundary collection into the catalog directory.
    pub fn store_boundaries(
        &self,
        name: &str,
        boundaries: &BoundaryCollection,
    ) -> RainfallResult<()> {
        self.store(name, boundaries)
    }

    fn store<T: serde::Serialize>(&self, name: &str, value: &T) -> RainfallResult<()> {
        std::fs::create_dir_all(&self.root)?;
        let file = File::create(self.dataset_path(name))?;
        serde_json::to_writer(file, value)?;
        Ok(())
    }
}

impl Catalog for FileCatalog {
    fn load_rasters(&self, name: &str) -> RainfallResult<RasterCollection> {
        log::debug!("loading raster dataset '{}' from {:?}", name, self.root);
        Ok(serde_json::from_reader(self.open(name)?)?)
    }

    fn load_boundaries(&self, name: &str) -> RainfallResult<BoundaryCollection> {
        log::debug!("loading boundary dataset '{}' from {:?}", name, self.root);
        Ok(serde_json::from_reader(self.open(name)?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Feature, Geometry};
    use crate::raster::{GridSpec, Raster, RasterDate};
    use ndarray::array;

    fn sample_collection() -> RasterCollection {
        RasterCollection::from_rasters(
            GridSpec::new(29.0, -1.0, 0.5, 2, 2),
            vec![Raster::new(
                RasterDate::new(2010, 1, 1),
                "total_precipitation",
                array![[0.01, 0.02], [0.03, 0.04]],
            )],
        )
        .unwrap()
    }

    #[test]
    fn memory_catalog_lookup() {
        let catalog = MemoryCatalog::new().with_rasters("ECMWF/ERA5/MONTHLY", sample_collection());
        assert_eq!(catalog.load_rasters("ECMWF/ERA5/MONTHLY").unwrap().len(), 1);
        assert!(matches!(
            catalog.load_rasters("missing"),
            Err(RainfallError::DatasetNotFound(_))
        ));
        assert!(matches!(
            catalog.load_boundaries("missing"),
            Err(RainfallError::DatasetNotFound(_))
        ));
    }

    #[test]
    fn file_catalog_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path());

        catalog
            .store_rasters("ECMWF/ERA5/MONTHLY", &sample_collection())
            .unwrap();
        let loaded = catalog.load_rasters("ECMWF/ERA5/MONTHLY").unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.iter().next().unwrap().band("total_precipitation").unwrap()[[1, 0]],
            0.03
        );

        let mut attributes = HashMap::new();
        attributes.insert("ADM0_NAME".to_string(), "Rwanda".to_string());
        let boundaries = BoundaryCollection::new(vec![Feature::new(
            attributes,
            Geometry::rectangle([28.8, -2.9, 30.9, -1.0]),
        )]);
        catalog
            .store_boundaries("FAO/GAUL/2015/level0", &boundaries)
            .unwrap();
        let loaded = catalog.load_boundaries("FAO/GAUL/2015/level0").unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn missing_file_maps_to_dataset_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = FileCatalog::new(dir.path());
        assert!(matches!(
            catalog.load_rasters("nope"),
            Err(RainfallError::DatasetNotFound(_))
        ));
    }
}
