use geo::Point;
use serde::{Deserialize, Serialize};

/// Default spatial reference identifier assigned to geodetic points without one.
pub const WGS84_SRID: i32 = 4326;

/// A 2D or 3D point with a spatial reference identifier.
///
/// `geodetic` marks longitude/latitude coordinates on the ellipsoid
/// (a geography point) as opposed to planar coordinates (a geometry point).
///
/// # Examples
///
/// ```
/// use tempora_types::point::SpatialPoint;
///
/// // A drone hovering at 100 meters
/// let drone = SpatialPoint::new_3d(-74.0060, 40.7128, 100.0).geodetic();
/// assert!(drone.has_z());
/// assert_eq!(drone.srid, 4326);
///
/// let halfway = drone.lerp(&SpatialPoint::new_3d(-74.0070, 40.7138, 200.0).geodetic(), 0.5);
/// assert_eq!(halfway.z(), Some(150.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialPoint {
    /// The 2D position (longitude/latitude or x/y)
    pub point: Point<f64>,
    /// Optional elevation or z-coordinate
    pub z: Option<f64>,
    /// Spatial reference identifier, 0 when unknown
    pub srid: i32,
    pub geodetic: bool,
}

impl SpatialPoint {
    /// Create a planar 2D point with an unknown SRID.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z: None,
            srid: 0,
            geodetic: false,
        }
    }

    /// Create a planar 3D point with an unknown SRID.
    pub fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            z: Some(z),
            ..Self::new(x, y)
        }
    }

    pub fn from_point(point: Point<f64>) -> Self {
        Self::new(point.x(), point.y())
    }

    pub fn with_srid(mut self, srid: i32) -> Self {
        self.srid = srid;
        self
    }

    /// Mark the point as geodetic, defaulting the SRID to WGS 84.
    pub fn geodetic(mut self) -> Self {
        self.geodetic = true;
        if self.srid == 0 {
            self.srid = WGS84_SRID;
        }
        self
    }

    pub fn x(&self) -> f64 {
        self.point.x()
    }

    pub fn y(&self) -> f64 {
        self.point.y()
    }

    pub fn z(&self) -> Option<f64> {
        self.z
    }

    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    /// True when both points share SRID, dimensionality and geodetic flag.
    pub fn same_frame(&self, other: &SpatialPoint) -> bool {
        self.srid == other.srid
            && self.has_z() == other.has_z()
            && self.geodetic == other.geodetic
    }

    /// Linear interpolation toward `other` at `ratio` in [0, 1].
    ///
    /// Geodetic points are interpolated on their coordinates, which is exact
    /// enough for the short segments of a sampled trajectory.
    pub fn lerp(&self, other: &SpatialPoint, ratio: f64) -> SpatialPoint {
        let x = self.x() + (other.x() - self.x()) * ratio;
        let y = self.y() + (other.y() - self.y()) * ratio;
        let z = match (self.z, other.z) {
            (Some(z1), Some(z2)) => Some(z1 + (z2 - z1) * ratio),
            _ => None,
        };
        SpatialPoint {
            point: Point::new(x, y),
            z,
            srid: self.srid,
            geodetic: self.geodetic,
        }
    }

    /// Coordinates as an array, z is 0 for 2D points.
    pub fn coords(&self) -> [f64; 3] {
        [self.x(), self.y(), self.z.unwrap_or(0.0)]
    }

    /// Planar Euclidean distance, including z when both points have it.
    pub fn distance(&self, other: &SpatialPoint) -> f64 {
        let dx = self.x() - other.x();
        let dy = self.y() - other.y();
        let dz = match (self.z, other.z) {
            (Some(z1), Some(z2)) => z1 - z2,
            _ => 0.0,
        };
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_creation() {
        let p = SpatialPoint::new_3d(-74.0, 40.7, 100.0);
        assert_eq!(p.x(), -74.0);
        assert_eq!(p.y(), 40.7);
        assert_eq!(p.z(), Some(100.0));
        assert_eq!(p.srid, 0);
        assert!(!p.geodetic);
    }

    #[test]
    fn test_geodetic_defaults_srid() {
        let p = SpatialPoint::new(1.0, 2.0).geodetic();
        assert_eq!(p.srid, WGS84_SRID);
        let q = SpatialPoint::new(1.0, 2.0).with_srid(4269).geodetic();
        assert_eq!(q.srid, 4269);
    }

    #[test]
    fn test_same_frame() {
        let a = SpatialPoint::new(0.0, 0.0).with_srid(3857);
        let b = SpatialPoint::new(1.0, 1.0).with_srid(3857);
        let c = SpatialPoint::new_3d(1.0, 1.0, 1.0).with_srid(3857);
        assert!(a.same_frame(&b));
        assert!(!a.same_frame(&c));
    }

    #[test]
    fn test_lerp_and_distance() {
        let a = SpatialPoint::new(0.0, 0.0);
        let b = SpatialPoint::new(3.0, 4.0);
        assert_eq!(a.distance(&b), 5.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.x(), 1.5);
        assert_eq!(mid.y(), 2.0);
        assert_eq!(mid.z(), None);
    }
}
