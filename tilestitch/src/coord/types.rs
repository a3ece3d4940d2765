//! Coordinate and grid type definitions

use std::fmt;

/// Earth radius in meters (WGS84 equatorial, spherical Web Mercator).
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Half the projected world width in meters (pi * R).
///
/// The projected plane spans `[-ORIGIN_SHIFT_M, ORIGIN_SHIFT_M]` on both
/// axes; the tile grid's top-left world corner sits at
/// `(-ORIGIN_SHIFT_M, +ORIGIN_SHIFT_M)`.
pub const ORIGIN_SHIFT_M: f64 = EARTH_RADIUS_M * std::f64::consts::PI;

/// Valid longitude range
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Latitude bound. The Mercator projection is singular at the poles, so
/// valid latitudes lie strictly inside `(-POLE_LAT, POLE_LAT)`.
pub const POLE_LAT: f64 = 90.0;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, strictly inside (-90, 90)
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180
    pub longitude: f64,
}

impl GeoPoint {
    /// Creates a point, validating both coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || latitude <= -POLE_LAT || latitude >= POLE_LAT {
            return Err(CoordError::InvalidLatitude(latitude));
        }
        if !longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&longitude) {
            return Err(CoordError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// A geographic rectangle given by its northeast and southwest corners.
///
/// The box must not cross the antimeridian: the northeast corner is
/// required to be at or north and at or east of the southwest corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub northeast: GeoPoint,
    pub southwest: GeoPoint,
}

impl BoundingBox {
    /// Creates a bounding box, validating corner ordering.
    pub fn new(northeast: GeoPoint, southwest: GeoPoint) -> Result<Self, CoordError> {
        if northeast.latitude < southwest.latitude {
            return Err(CoordError::InvalidBoundingBox(
                "northeast corner is south of southwest corner",
            ));
        }
        if northeast.longitude < southwest.longitude {
            return Err(CoordError::InvalidBoundingBox(
                "northeast corner is west of southwest corner (antimeridian crossing is not supported)",
            ));
        }
        Ok(Self {
            northeast,
            southwest,
        })
    }

    /// Creates a bounding box from raw corner coordinates.
    pub fn from_corners(
        ne_lat: f64,
        ne_lon: f64,
        sw_lat: f64,
        sw_lon: f64,
    ) -> Result<Self, CoordError> {
        Self::new(GeoPoint::new(ne_lat, ne_lon)?, GeoPoint::new(sw_lat, sw_lon)?)
    }
}

/// Integer tile coordinates in the Web Mercator / slippy-map pyramid.
///
/// The zoom level is carried alongside, not inside: one stitch run uses a
/// single fixed zoom for every tile it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileIndex {
    /// Column (west to east)
    pub x: i64,
    /// Row (north to south)
    pub y: i64,
}

impl fmt::Display for TileIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The rectangular set of tiles covering a bounding box at one zoom level.
///
/// Tiles are enumerated row-major: outer loop over rows (y ascending),
/// inner loop over columns (x ascending), so `indices[i]` corresponds to
/// grid cell `(i % width, i / width)`. Enumeration order is draw order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    indices: Vec<TileIndex>,
    width: u32,
    height: u32,
}

impl TileGrid {
    pub(super) fn new(indices: Vec<TileIndex>, width: u32, height: u32) -> Self {
        debug_assert_eq!(indices.len() as u64, width as u64 * height as u64);
        Self {
            indices,
            width,
            height,
        }
    }

    /// Grid width in tiles.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in tiles.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of tiles (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The tiles in row-major enumeration order.
    #[inline]
    pub fn indices(&self) -> &[TileIndex] {
        &self.indices
    }

    /// Iterates tiles in row-major enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.indices.iter().copied()
    }

    /// Grid cell `(column, row)` for the tile at enumeration position `slot`.
    #[inline]
    pub fn cell(&self, slot: usize) -> (u32, u32) {
        (
            (slot as u64 % self.width as u64) as u32,
            (slot as u64 / self.width as u64) as u32,
        )
    }

    /// Output size in pixels for a given source tile edge length.
    pub fn pixel_size(&self, tile_size: u32) -> (u64, u64) {
        (
            self.width as u64 * tile_size as u64,
            self.height as u64 * tile_size as u64,
        )
    }
}

/// Errors that can occur during coordinate conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordError {
    /// Latitude at or beyond the poles, where the projection is undefined
    InvalidLatitude(f64),
    /// Longitude outside -180 to 180
    InvalidLongitude(f64),
    /// Bounding box corners are misordered or cross the antimeridian
    InvalidBoundingBox(&'static str),
    /// The covering grid does not fit in 32-bit tile dimensions
    GridTooLarge { width: u64, height: u64 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidLatitude(lat) => {
                write!(
                    f,
                    "Invalid latitude: {} (must be strictly between -{} and {})",
                    lat, POLE_LAT, POLE_LAT
                )
            }
            CoordError::InvalidLongitude(lon) => {
                write!(
                    f,
                    "Invalid longitude: {} (must be between {} and {})",
                    lon, MIN_LON, MAX_LON
                )
            }
            CoordError::InvalidBoundingBox(reason) => {
                write!(f, "Invalid bounding box: {}", reason)
            }
            CoordError::GridTooLarge { width, height } => {
                write!(f, "Tile grid {}x{} is too large", width, height)
            }
        }
    }
}

impl std::error::Error for CoordError {}
