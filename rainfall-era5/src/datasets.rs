//! Dataset names and analysis constants.

/// ERA5 monthly precipitation aggregates.
pub const ERA5_MONTHLY: &str = "ECMWF/ERA5/MONTHLY";

/// ERA5 daily precipitation aggregates.
pub const ERA5_DAILY: &str = "ECMWF/ERA5/DAILY";

/// GAUL level-0 country boundaries.
pub const GAUL_LEVEL0: &str = "FAO/GAUL/2015/level0";

/// Attribute used to look up a country in the boundary dataset.
pub const COUNTRY_ATTRIBUTE: &str = "ADM0_NAME";

/// Country whose climatology the analyses target.
pub const COUNTRY: &str = "Rwanda";

/// Precipitation band, in meters.
pub const PRECIPITATION_BAND: &str = "total_precipitation";

/// Converted precipitation band, in centimeters.
pub const PRECIPITATION_CM_BAND: &str = "total_precipitation_cm";

pub const METERS_TO_CENTIMETERS: f64 = 100.0;

/// Ground sampling distance for spatial reduction, in meters.
pub const DEFAULT_SCALE_M: f64 = 10_000.0;

/// Closed year window for the climatology, inclusive of both ends.
pub const DEFAULT_START_YEAR: i32 = 2009;
pub const DEFAULT_END_YEAR: i32 = 2019;

/// Literal area-of-interest rectangle, `[west, south, east, north]`.
pub const RWANDA_RECT: [f64; 4] = [28.8482, -2.8581, 30.9158, -1.0466];

/// Default export destination.
pub const EXPORT_FOLDER: &str = "Earth Engine";
pub const EXPORT_PREFIX: &str = "rwa_rainfall";
