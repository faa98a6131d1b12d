//! Precondition checks shared by the constructors and the engines.
//!
//! Each function checks one precondition and reports a typed error; callers
//! run all of them before building anything.

use crate::base::{Datum, TypeTag, lookup};
use crate::config::config;
use crate::error::{Result, TemporaError};
use crate::temporal::Interpolation;
use tempora_types::Timestamp;

/// Validates that a component list is not empty.
///
/// # Examples
///
/// ```
/// use tempora::validation::ensure_not_empty;
///
/// assert!(ensure_not_empty(&[1, 2], "instants").is_ok());
/// assert!(ensure_not_empty::<i32>(&[], "instants").is_err());
/// ```
pub fn ensure_not_empty<T>(items: &[T], what: &str) -> Result<()> {
    if items.is_empty() {
        return Err(TemporaError::InvalidArgument(format!(
            "The {} of a temporal value cannot be empty",
            what
        )));
    }
    Ok(())
}

/// Validates the number of components against the configured limit.
pub fn ensure_max_instants(count: usize) -> Result<()> {
    if let Some(max) = config().max_instants
        && count > max
    {
        return Err(TemporaError::InvalidArgument(format!(
            "Too many instants: {} exceeds the configured maximum of {}",
            count, max
        )));
    }
    Ok(())
}

/// Validates that the base type admits the interpolation.
///
/// Linear interpolation requires a continuous base type.
///
/// # Examples
///
/// ```
/// use tempora::base::TypeTag;
/// use tempora::temporal::Interpolation;
/// use tempora::validation::ensure_valid_interpolation;
///
/// assert!(ensure_valid_interpolation(TypeTag::Float, Interpolation::Linear).is_ok());
/// assert!(ensure_valid_interpolation(TypeTag::Int, Interpolation::Linear).is_err());
/// assert!(ensure_valid_interpolation(TypeTag::Int, Interpolation::Step).is_ok());
/// ```
pub fn ensure_valid_interpolation(tag: TypeTag, interp: Interpolation) -> Result<()> {
    let base_type = lookup(tag)?;
    if interp == Interpolation::Linear && !base_type.continuous() {
        return Err(TemporaError::InvalidInterpolation(format!(
            "The base type {} does not support linear interpolation",
            base_type.name()
        )));
    }
    Ok(())
}

/// Validates that two components carry the same base type.
pub fn ensure_same_base_type(a: &Datum, b: &Datum) -> Result<()> {
    if a.type_tag() != b.type_tag() {
        return Err(TemporaError::TypeMismatch(format!(
            "All values of a temporal value must have the same base type: {} and {}",
            a.type_tag(),
            b.type_tag()
        )));
    }
    Ok(())
}

/// Validates that two spatial values share SRID and dimensionality.
///
/// Non-spatial values always pass.
pub fn ensure_same_frame(a: &Datum, b: &Datum) -> Result<()> {
    let (Some(p), Some(q)) = (a.spatial_point(), b.spatial_point()) else {
        return Ok(());
    };

    if p.srid != q.srid {
        return Err(TemporaError::TypeMismatch(format!(
            "Operation on mixed SRID: {} and {}",
            p.srid, q.srid
        )));
    }

    if p.has_z() != q.has_z() {
        return Err(TemporaError::TypeMismatch(
            "Operation on mixed 2D/3D dimensions".to_string(),
        ));
    }

    if p.geodetic != q.geodetic {
        return Err(TemporaError::TypeMismatch(
            "Operation on mixed planar and geodetic coordinates".to_string(),
        ));
    }

    Ok(())
}

/// Validates that two network points of a continuous sequence share the route.
pub fn ensure_same_route(a: &Datum, b: &Datum) -> Result<()> {
    if let (Datum::Npoint(x), Datum::Npoint(y)) = (a, b)
        && !x.same_route(y)
    {
        return Err(TemporaError::InvalidArgument(format!(
            "All network points of a continuous sequence must have the same route: {} and {}",
            x.route, y.route
        )));
    }
    Ok(())
}

/// Validates that consecutive timestamps strictly increase.
pub fn ensure_increasing(t1: Timestamp, t2: Timestamp) -> Result<()> {
    if t1 >= t2 {
        return Err(TemporaError::InvalidArgument(format!(
            "Timestamps for temporal value must be increasing: {}, {}",
            t1, t2
        )));
    }
    Ok(())
}

/// Validates the bounds of a sequence.
///
/// Instantaneous and discrete sequences need both bounds inclusive.
pub fn ensure_valid_bounds(
    count: usize,
    interp: Interpolation,
    lower_inc: bool,
    upper_inc: bool,
) -> Result<()> {
    if (count == 1 || interp == Interpolation::Discrete) && !(lower_inc && upper_inc) {
        return Err(TemporaError::InvalidArgument(
            "Instantaneous and discrete sequences must have inclusive bounds".to_string(),
        ));
    }
    Ok(())
}

/// Validates a strictly positive count.
pub fn ensure_positive(n: usize, what: &str) -> Result<()> {
    if n == 0 {
        return Err(TemporaError::InvalidArgument(format!(
            "The {} must be greater than zero",
            what
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_types::{NetworkPoint, SpatialPoint};

    #[test]
    fn test_same_frame_rejects_mixed_srid() {
        let a = Datum::from(SpatialPoint::new(0.0, 0.0).with_srid(3857));
        let b = Datum::from(SpatialPoint::new(0.0, 0.0).with_srid(4326));
        let err = ensure_same_frame(&a, &b).unwrap_err();
        assert!(matches!(err, TemporaError::TypeMismatch(_)));
    }

    #[test]
    fn test_same_frame_rejects_mixed_dimensions() {
        let a = Datum::from(SpatialPoint::new(0.0, 0.0));
        let b = Datum::from(SpatialPoint::new_3d(0.0, 0.0, 1.0));
        assert!(ensure_same_frame(&a, &b).is_err());
        assert!(ensure_same_frame(&Datum::Int(1), &Datum::Int(2)).is_ok());
    }

    #[test]
    fn test_same_route() {
        let a = Datum::from(NetworkPoint::new(1, 0.5));
        let b = Datum::from(NetworkPoint::new(2, 0.5));
        assert!(ensure_same_route(&a, &a).is_ok());
        assert!(ensure_same_route(&a, &b).is_err());
    }

    #[test]
    fn test_increasing_timestamps() {
        let t = Timestamp::from_secs;
        assert!(ensure_increasing(t(1), t(2)).is_ok());
        assert!(ensure_increasing(t(2), t(2)).is_err());
    }

    #[test]
    fn test_bounds() {
        assert!(ensure_valid_bounds(1, Interpolation::Linear, true, false).is_err());
        assert!(ensure_valid_bounds(3, Interpolation::Discrete, false, true).is_err());
        assert!(ensure_valid_bounds(3, Interpolation::Step, false, false).is_ok());
    }
}
