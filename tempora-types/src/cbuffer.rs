use crate::point::SpatialPoint;
use serde::{Deserialize, Serialize};

/// A circle around a moving center, e.g. the uncertainty region of a position fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircularBuffer {
    pub center: SpatialPoint,
    pub radius: f64,
}

impl CircularBuffer {
    pub fn new(center: SpatialPoint, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Interpolate center and radius independently.
    pub fn lerp(&self, other: &CircularBuffer, ratio: f64) -> CircularBuffer {
        CircularBuffer {
            center: self.center.lerp(&other.center, ratio),
            radius: self.radius + (other.radius - self.radius) * ratio,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cbuffer_lerp() {
        let a = CircularBuffer::new(SpatialPoint::new(0.0, 0.0), 1.0);
        let b = CircularBuffer::new(SpatialPoint::new(2.0, 0.0), 3.0);
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.center.x(), 1.0);
        assert_eq!(mid.radius, 2.0);
    }
}
