use crate::point::SpatialPoint;
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// A unit quaternion describing a 3D rotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quaternion {
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion {
    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Self { w, x, y, z }
    }

    pub fn norm(&self) -> f64 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn dot(&self, other: &Quaternion) -> f64 {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Normalized linear interpolation along the shortest arc.
    pub fn nlerp(&self, other: &Quaternion, ratio: f64) -> Quaternion {
        let sign = if self.dot(other) < 0.0 { -1.0 } else { 1.0 };
        let mix = |a: f64, b: f64| a + (sign * b - a) * ratio;
        let q = Quaternion::new(
            mix(self.w, other.w),
            mix(self.x, other.x),
            mix(self.y, other.y),
            mix(self.z, other.z),
        );
        let n = q.norm();
        if n == 0.0 {
            *self
        } else {
            Quaternion::new(q.w / n, q.x / n, q.y / n, q.z / n)
        }
    }
}

/// Heading of a pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Rotation angle in radians, normalized to (-pi, pi]
    Planar(f64),
    Spatial(Quaternion),
}

/// A position together with an orientation, e.g. a vehicle and its heading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: SpatialPoint,
    pub orientation: Orientation,
}

impl Pose {
    /// Create a planar pose, normalizing the angle.
    pub fn planar(position: SpatialPoint, theta: f64) -> Self {
        Self {
            position,
            orientation: Orientation::Planar(normalize_angle(theta)),
        }
    }

    pub fn spatial(position: SpatialPoint, rotation: Quaternion) -> Self {
        Self {
            position,
            orientation: Orientation::Spatial(rotation),
        }
    }

    /// Interpolate position linearly and orientation along the shortest rotation.
    ///
    /// Returns `None` when the orientations are of different kinds.
    pub fn lerp(&self, other: &Pose, ratio: f64) -> Option<Pose> {
        let orientation = match (self.orientation, other.orientation) {
            (Orientation::Planar(a), Orientation::Planar(b)) => {
                let delta = normalize_angle(b - a);
                Orientation::Planar(normalize_angle(a + delta * ratio))
            }
            (Orientation::Spatial(a), Orientation::Spatial(b)) => {
                Orientation::Spatial(a.nlerp(&b, ratio))
            }
            _ => return None,
        };
        Some(Pose {
            position: self.position.lerp(&other.position, ratio),
            orientation,
        })
    }
}

/// Bring an angle into (-pi, pi].
pub fn normalize_angle(theta: f64) -> f64 {
    let mut a = theta.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-12);
        assert!((normalize_angle(-PI / 2.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_planar_lerp_shortest_arc() {
        let a = Pose::planar(SpatialPoint::new(0.0, 0.0), 3.0);
        let b = Pose::planar(SpatialPoint::new(2.0, 0.0), -3.0);
        let mid = a.lerp(&b, 0.5).expect("same orientation kind");
        match mid.orientation {
            // halfway across the +-pi seam
            Orientation::Planar(theta) => assert!((theta.abs() - PI).abs() < 1e-9),
            Orientation::Spatial(_) => panic!("expected planar orientation"),
        }
        assert_eq!(mid.position.x(), 1.0);
    }

    #[test]
    fn test_mixed_orientation_kinds() {
        let a = Pose::planar(SpatialPoint::new(0.0, 0.0), 0.0);
        let b = Pose::spatial(
            SpatialPoint::new(0.0, 0.0),
            Quaternion::new(1.0, 0.0, 0.0, 0.0),
        );
        assert!(a.lerp(&b, 0.5).is_none());
    }
}
