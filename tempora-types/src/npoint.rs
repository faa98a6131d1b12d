use serde::{Deserialize, Serialize};

/// A position along a route of a road network.
///
/// `position` is the fraction of the route length in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkPoint {
    pub route: i64,
    pub position: f64,
}

impl NetworkPoint {
    pub fn new(route: i64, position: f64) -> Self {
        Self { route, position }
    }

    pub fn same_route(&self, other: &NetworkPoint) -> bool {
        self.route == other.route
    }

    /// Interpolate the position, keeping the route of `self`.
    pub fn lerp(&self, other: &NetworkPoint, ratio: f64) -> NetworkPoint {
        NetworkPoint {
            route: self.route,
            position: self.position + (other.position - self.position) * ratio,
        }
    }
}
