use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use tempora_types::{CircularBuffer, NetworkPoint, Pose, SpatialPoint};

/// Tag identifying the base type of a value.
///
/// `Custom` tags identify base types supplied from outside the crate; their
/// values travel as opaque [`Datum::Custom`] payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeTag {
    Bool,
    Int,
    BigInt,
    Float,
    Text,
    GeomPoint,
    GeogPoint,
    Cbuffer,
    Pose,
    Npoint,
    Custom(u16),
}

impl TypeTag {
    /// Spatial base types carry an SRID and a dimensionality.
    pub fn is_spatial(&self) -> bool {
        matches!(
            self,
            TypeTag::GeomPoint | TypeTag::GeogPoint | TypeTag::Cbuffer | TypeTag::Pose
        )
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeTag::Int | TypeTag::BigInt | TypeTag::Float)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeTag::Bool => write!(f, "bool"),
            TypeTag::Int => write!(f, "int"),
            TypeTag::BigInt => write!(f, "bigint"),
            TypeTag::Float => write!(f, "float"),
            TypeTag::Text => write!(f, "text"),
            TypeTag::GeomPoint => write!(f, "geompoint"),
            TypeTag::GeogPoint => write!(f, "geogpoint"),
            TypeTag::Cbuffer => write!(f, "cbuffer"),
            TypeTag::Pose => write!(f, "pose"),
            TypeTag::Npoint => write!(f, "npoint"),
            TypeTag::Custom(id) => write!(f, "custom({})", id),
        }
    }
}

/// Opaque value of an externally registered base type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomValue {
    pub tag: u16,
    pub payload: Bytes,
}

/// A base value sampled at one instant.
///
/// Equality, ordering and hashing of datums go through the base-type registry;
/// the derived `PartialEq` only compares representations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Datum {
    Bool(bool),
    Int(i32),
    BigInt(i64),
    Float(f64),
    Text(String),
    Point(SpatialPoint),
    Cbuffer(CircularBuffer),
    Pose(Pose),
    Npoint(NetworkPoint),
    Custom(CustomValue),
}

impl Datum {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Datum::Bool(_) => TypeTag::Bool,
            Datum::Int(_) => TypeTag::Int,
            Datum::BigInt(_) => TypeTag::BigInt,
            Datum::Float(_) => TypeTag::Float,
            Datum::Text(_) => TypeTag::Text,
            Datum::Point(p) if p.geodetic => TypeTag::GeogPoint,
            Datum::Point(_) => TypeTag::GeomPoint,
            Datum::Cbuffer(_) => TypeTag::Cbuffer,
            Datum::Pose(_) => TypeTag::Pose,
            Datum::Npoint(_) => TypeTag::Npoint,
            Datum::Custom(c) => TypeTag::Custom(c.tag),
        }
    }

    /// Numeric value widened to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Datum::Int(v) => Some(*v as f64),
            Datum::BigInt(v) => Some(*v as f64),
            Datum::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Datum::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The reference point of a spatial value.
    pub fn spatial_point(&self) -> Option<&SpatialPoint> {
        match self {
            Datum::Point(p) => Some(p),
            Datum::Cbuffer(c) => Some(&c.center),
            Datum::Pose(p) => Some(&p.position),
            _ => None,
        }
    }

    pub fn srid(&self) -> Option<i32> {
        self.spatial_point().map(|p| p.srid)
    }

    pub fn has_z(&self) -> bool {
        self.spatial_point().is_some_and(|p| p.has_z())
    }
}

impl From<bool> for Datum {
    fn from(v: bool) -> Self {
        Datum::Bool(v)
    }
}

impl From<i32> for Datum {
    fn from(v: i32) -> Self {
        Datum::Int(v)
    }
}

impl From<i64> for Datum {
    fn from(v: i64) -> Self {
        Datum::BigInt(v)
    }
}

impl From<f64> for Datum {
    fn from(v: f64) -> Self {
        Datum::Float(v)
    }
}

impl From<&str> for Datum {
    fn from(v: &str) -> Self {
        Datum::Text(v.to_string())
    }
}

impl From<String> for Datum {
    fn from(v: String) -> Self {
        Datum::Text(v)
    }
}

impl From<SpatialPoint> for Datum {
    fn from(v: SpatialPoint) -> Self {
        Datum::Point(v)
    }
}

impl From<CircularBuffer> for Datum {
    fn from(v: CircularBuffer) -> Self {
        Datum::Cbuffer(v)
    }
}

impl From<Pose> for Datum {
    fn from(v: Pose) -> Self {
        Datum::Pose(v)
    }
}

impl From<NetworkPoint> for Datum {
    fn from(v: NetworkPoint) -> Self {
        Datum::Npoint(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tag_of_points() {
        let geom = Datum::from(SpatialPoint::new(1.0, 2.0));
        let geog = Datum::from(SpatialPoint::new(1.0, 2.0).geodetic());
        assert_eq!(geom.type_tag(), TypeTag::GeomPoint);
        assert_eq!(geog.type_tag(), TypeTag::GeogPoint);
        assert_eq!(geog.srid(), Some(4326));
    }

    #[test]
    fn test_numeric_widening() {
        assert_eq!(Datum::Int(3).as_f64(), Some(3.0));
        assert_eq!(Datum::BigInt(-4).as_f64(), Some(-4.0));
        assert_eq!(Datum::from("x").as_f64(), None);
        assert!(TypeTag::Int.is_numeric());
        assert!(!TypeTag::Text.is_numeric());
    }

    #[test]
    fn test_custom_tag() {
        let datum = Datum::Custom(CustomValue {
            tag: 7,
            payload: Bytes::from_static(b"\x01\x02"),
        });
        assert_eq!(datum.type_tag(), TypeTag::Custom(7));
        assert!(!datum.has_z());
    }
}
