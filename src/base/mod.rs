//! Base-type registry and the values it describes.

pub mod builtin;
pub mod datum;
pub mod registry;

pub use datum::{CustomValue, Datum, TypeTag};
pub use registry::{
    BaseType, Extent, Registry, RegistryBuilder, SpatialExtent, TypeLength, install_registry,
    lookup, registry,
};

use crate::error::{Result, TemporaError};
use std::cmp::Ordering;

/// Equality of two values, widening mixed numeric types to `f64`.
pub fn datum_eq(a: &Datum, b: &Datum) -> Result<bool> {
    let (tag1, tag2) = (a.type_tag(), b.type_tag());
    if tag1 == tag2 {
        return Ok(lookup(tag1)?.eq(a, b));
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Ok(builtin::float_eq(x, y)),
        _ => Err(incomparable(tag1, tag2)),
    }
}

/// Three-way comparison of two values, widening mixed numeric types to `f64`.
pub fn datum_cmp(a: &Datum, b: &Datum) -> Result<Ordering> {
    let (tag1, tag2) = (a.type_tag(), b.type_tag());
    if tag1 == tag2 {
        return Ok(lookup(tag1)?.cmp(a, b));
    }
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => Ok(builtin::float_cmp(x, y)),
        _ => Err(incomparable(tag1, tag2)),
    }
}

fn incomparable(tag1: TypeTag, tag2: TypeTag) -> TemporaError {
    TemporaError::TypeMismatch(format!("Cannot compare {} with {}", tag1, tag2))
}
