//! Coordinate conversion module
//!
//! Provides conversions from geographic coordinates (latitude/longitude) to
//! Web Mercator tile indices, and from a geographic bounding box to the
//! rectangular tile grid covering it.

mod types;

pub use types::{
    BoundingBox, CoordError, GeoPoint, TileGrid, TileIndex, EARTH_RADIUS_M, MAX_LON, MIN_LON,
    ORIGIN_SHIFT_M, POLE_LAT,
};

use std::f64::consts::PI;

/// Projects geographic coordinates onto the Web Mercator plane, in meters.
///
/// Uses the spherical forward projection with Earth radius
/// [`EARTH_RADIUS_M`]. The result is undefined (infinite) at the poles;
/// callers must keep latitude strictly inside (-90, 90), which
/// [`lat_lng_to_tile`] enforces.
#[inline]
pub fn project_to_plane(lat: f64, lon: f64) -> (f64, f64) {
    let x = lon * ORIGIN_SHIFT_M / 180.0;
    let y = ((90.0 + lat) * PI / 360.0).tan().ln() / (PI / 180.0);
    (x, y * ORIGIN_SHIFT_M / 180.0)
}

/// Plane meters covered by one tile edge at the given zoom level.
#[inline]
fn tile_unit(zoom: u8) -> f64 {
    2.0 * ORIGIN_SHIFT_M / 2.0_f64.powi(zoom as i32)
}

/// Converts geographic coordinates to the tile index containing them.
///
/// # Arguments
///
/// * `lat` - Latitude in degrees, strictly inside (-90, 90)
/// * `lon` - Longitude in degrees (-180 to 180)
/// * `zoom` - Zoom level
///
/// # Returns
///
/// The tile index, or an error when either coordinate is outside the
/// projection's domain. Precision degrades for zoom levels beyond ~30.
#[inline]
pub fn lat_lng_to_tile(lat: f64, lon: f64, zoom: u8) -> Result<TileIndex, CoordError> {
    let point = GeoPoint::new(lat, lon)?;
    let (x_m, y_m) = project_to_plane(point.latitude, point.longitude);
    let unit = tile_unit(zoom);

    // Grid origin is the plane's top-left corner: x grows east, y grows south.
    let x = ((x_m + ORIGIN_SHIFT_M) / unit).floor() as i64;
    let y = ((ORIGIN_SHIFT_M - y_m) / unit).floor() as i64;

    Ok(TileIndex { x, y })
}

/// Computes the rectangular tile grid covering a bounding box.
///
/// The grid spans both corner tiles inclusively on each axis. Corner tile
/// ordering may coincide or swap depending on hemisphere, so the span is
/// taken as `min..=max` per axis. Tiles are enumerated row-major (y outer
/// ascending, x inner ascending), which is also draw order.
pub fn bounding_box_to_grid(bbox: &BoundingBox, zoom: u8) -> Result<TileGrid, CoordError> {
    let (ne, sw) = corner_tiles(bbox, zoom)?;
    let (width, height) = span_dimensions(&ne, &sw)?;

    let mut indices = Vec::with_capacity(width as usize * height as usize);
    for y in ne.y.min(sw.y)..=ne.y.max(sw.y) {
        for x in ne.x.min(sw.x)..=ne.x.max(sw.x) {
            indices.push(TileIndex { x, y });
        }
    }

    Ok(TileGrid::new(indices, width, height))
}

/// Grid width/height in tiles for a bounding box, without materializing
/// the index list. Backs the pre-flight size estimate.
pub fn grid_dimensions(bbox: &BoundingBox, zoom: u8) -> Result<(u32, u32), CoordError> {
    let (ne, sw) = corner_tiles(bbox, zoom)?;
    span_dimensions(&ne, &sw)
}

fn corner_tiles(bbox: &BoundingBox, zoom: u8) -> Result<(TileIndex, TileIndex), CoordError> {
    let ne = lat_lng_to_tile(bbox.northeast.latitude, bbox.northeast.longitude, zoom)?;
    let sw = lat_lng_to_tile(bbox.southwest.latitude, bbox.southwest.longitude, zoom)?;
    Ok((ne, sw))
}

fn span_dimensions(ne: &TileIndex, sw: &TileIndex) -> Result<(u32, u32), CoordError> {
    let width = ne.x.abs_diff(sw.x) + 1;
    let height = ne.y.abs_diff(sw.y) + 1;

    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(CoordError::GridTooLarge { width, height }),
    }
}
