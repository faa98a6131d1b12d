//! Conversions between temporal integers and temporal floats.

use crate::base::{Datum, TypeTag};
use crate::error::{Result, TemporaError};
use crate::lifting::LiftedFunction;
use crate::temporal::Temporal;

/// Temporal integer as a temporal float, keeping its interpolation.
pub fn tint_to_tfloat(temp: &Temporal) -> Result<Temporal> {
    LiftedFunction::unary(TypeTag::Float, |v| match v {
        Datum::Int(i) => Ok(Datum::Float(f64::from(*i))),
        other => Err(TemporaError::TypeMismatch(format!(
            "Expected an integer, got {}",
            other.type_tag()
        ))),
    })
    .with_arg_types(&[TypeTag::Int])
    .apply(temp)
}

/// Temporal float as a temporal integer, truncating every value.
///
/// Only discrete and step values convert; a linear float has no integer
/// counterpart.
pub fn tfloat_to_tint(temp: &Temporal) -> Result<Temporal> {
    LiftedFunction::unary(TypeTag::Int, |v| match v {
        Datum::Float(f) if f.is_finite() => Ok(Datum::Int(f.trunc() as i32)),
        Datum::Float(f) => Err(TemporaError::InvalidArgument(format!(
            "Cannot convert {} to an integer",
            f
        ))),
        other => Err(TemporaError::TypeMismatch(format!(
            "Expected a float, got {}",
            other.type_tag()
        ))),
    })
    .with_arg_types(&[TypeTag::Float])
    .apply(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::{Interpolation, TInstant, TSequence};
    use tempora_types::Timestamp;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    #[test]
    fn test_tint_to_tfloat_keeps_step() {
        let seq: Temporal = TSequence::new(
            vec![TInstant::new(1, t(0)), TInstant::new(4, t(5))],
            true,
            true,
            Interpolation::Step,
            true,
        )
        .unwrap()
        .into();
        let result = tint_to_tfloat(&seq).unwrap();
        assert_eq!(result.base_type(), TypeTag::Float);
        assert_eq!(result.interpolation(), Some(Interpolation::Step));
        assert_eq!(result.end_instant().value(), &Datum::Float(4.0));
    }

    #[test]
    fn test_tfloat_to_tint() {
        let discrete: Temporal =
            TSequence::discrete(vec![TInstant::new(1.9, t(0)), TInstant::new(-2.7, t(1))])
                .unwrap()
                .into();
        let result = tfloat_to_tint(&discrete).unwrap();
        assert_eq!(result.start_instant().value(), &Datum::Int(1));
        assert_eq!(result.end_instant().value(), &Datum::Int(-2));

        let linear: Temporal = TSequence::new(
            vec![TInstant::new(1.0, t(0)), TInstant::new(2.0, t(5))],
            true,
            true,
            Interpolation::Linear,
            true,
        )
        .unwrap()
        .into();
        assert!(matches!(
            tfloat_to_tint(&linear),
            Err(TemporaError::InvalidInterpolation(_))
        ));
    }
}
