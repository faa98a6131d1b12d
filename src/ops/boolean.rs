//! Temporal booleans.

use crate::base::{Datum, TypeTag};
use crate::error::{Result, TemporaError};
use crate::lifting::LiftedFunction;
use crate::temporal::Temporal;

fn boolean(value: &Datum) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        TemporaError::TypeMismatch(format!("Expected a boolean, got {}", value.type_tag()))
    })
}

fn connective(func: fn(bool, bool) -> bool) -> LiftedFunction {
    LiftedFunction::binary(TypeTag::Bool, move |a, b| {
        Ok(Datum::Bool(func(boolean(a)?, boolean(b)?)))
    })
    .with_arg_types(&[TypeTag::Bool, TypeTag::Bool])
}

pub fn tand(temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
    connective(|a, b| a && b).apply_temporal(temp1, temp2)
}

pub fn tor(temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
    connective(|a, b| a || b).apply_temporal(temp1, temp2)
}

pub fn tand_base(temp: &Temporal, value: bool) -> Result<Temporal> {
    connective(|a, b| a && b).apply_base(temp, &Datum::Bool(value))
}

pub fn tor_base(temp: &Temporal, value: bool) -> Result<Temporal> {
    connective(|a, b| a || b).apply_base(temp, &Datum::Bool(value))
}

pub fn tnot(temp: &Temporal) -> Result<Temporal> {
    LiftedFunction::unary(TypeTag::Bool, |v| Ok(Datum::Bool(!boolean(v)?)))
        .with_arg_types(&[TypeTag::Bool])
        .apply(temp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::{Interpolation, TInstant, TSequence};
    use tempora_types::Timestamp;

    fn bools(values: &[(bool, i64)]) -> Temporal {
        let instants = values
            .iter()
            .map(|&(v, s)| TInstant::new(v, Timestamp::from_secs(s)))
            .collect();
        TSequence::new(instants, true, true, Interpolation::Step, true).unwrap().into()
    }

    #[test]
    fn test_tand_over_common_domain() {
        let a = bools(&[(true, 0), (false, 5), (false, 10)]);
        let b = bools(&[(true, 2), (true, 12)]);
        let result = tand(&a, &b).unwrap().unwrap();
        assert_eq!(result.start_timestamp(), Timestamp::from_secs(2));
        assert_eq!(
            result.value_at_timestamp(Timestamp::from_secs(3), true).unwrap(),
            Some(Datum::Bool(true))
        );
        assert_eq!(result.end_instant().value(), &Datum::Bool(false));
    }

    #[test]
    fn test_tor_base_and_tnot() {
        let a = bools(&[(true, 0), (false, 5)]);
        let always = tor_base(&a, true).unwrap();
        assert!(always.instants().iter().all(|i| i.value() == &Datum::Bool(true)));

        let negated = tnot(&a).unwrap();
        assert_eq!(negated.start_instant().value(), &Datum::Bool(false));
        assert_eq!(negated.end_instant().value(), &Datum::Bool(true));
    }

    #[test]
    fn test_rejects_non_boolean() {
        let inst: Temporal = TInstant::new(1.0, Timestamp::from_secs(0)).into();
        assert!(matches!(tnot(&inst), Err(TemporaError::TypeMismatch(_))));
        assert!(matches!(tand_base(&inst, true), Err(TemporaError::TypeMismatch(_))));
    }
}
