use super::{LiftedFunction, truth};
use crate::base::Datum;
use crate::error::Result;
use crate::temporal::Temporal;

impl LiftedFunction {
    /// Whether a boolean operation is true at some instant of the common
    /// time domain of two temporal values.
    ///
    /// Returns `Ok(None)` when the time domains do not overlap.
    pub fn ever(&self, temp1: &Temporal, temp2: &Temporal) -> Result<Option<bool>> {
        self.apply_temporal(temp1, temp2)?
            .map(|result| any_true(&result))
            .transpose()
    }

    /// Whether a boolean operation is true at every instant of the common
    /// time domain of two temporal values.
    pub fn always(&self, temp1: &Temporal, temp2: &Temporal) -> Result<Option<bool>> {
        self.apply_temporal(temp1, temp2)?
            .map(|result| all_true(&result))
            .transpose()
    }

    pub fn ever_base(&self, temp: &Temporal, value: &Datum) -> Result<bool> {
        any_true(&self.apply_base(temp, value)?)
    }

    pub fn always_base(&self, temp: &Temporal, value: &Datum) -> Result<bool> {
        all_true(&self.apply_base(temp, value)?)
    }
}

// Every instant of a boolean result carries a value that is actually taken:
// step sequences with an exclusive upper bound repeat their previous value.
fn any_true(result: &Temporal) -> Result<bool> {
    for inst in result.instants() {
        if truth(inst.value())? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn all_true(result: &Temporal) -> Result<bool> {
    for inst in result.instants() {
        if !truth(inst.value())? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use crate::base::{Datum, TypeTag, datum_eq};
    use crate::error::TemporaError;
    use crate::lifting::LiftedFunction;
    use crate::temporal::{Interpolation, TInstant, TSequence, Temporal};
    use tempora_types::Timestamp;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn linear(a: f64, b: f64, s: i64, e: i64) -> Temporal {
        TSequence::new(
            vec![TInstant::new(a, t(s)), TInstant::new(b, t(e))],
            true,
            true,
            Interpolation::Linear,
            true,
        )
        .unwrap()
        .into()
    }

    fn equals() -> LiftedFunction {
        LiftedFunction::binary(TypeTag::Bool, |a, b| Ok(Datum::Bool(datum_eq(a, b)?)))
            .discontinuous()
            .with_result_interpolation(Interpolation::Step)
    }

    #[test]
    fn test_ever_at_crossing_only() {
        let a = linear(0.0, 10.0, 0, 10);
        let b = linear(10.0, 0.0, 0, 10);
        assert_eq!(equals().ever(&a, &b).unwrap(), Some(true));
        assert_eq!(equals().always(&a, &b).unwrap(), Some(false));
    }

    #[test]
    fn test_ever_disjoint_is_none() {
        let a = linear(0.0, 10.0, 0, 10);
        let b = linear(0.0, 10.0, 20, 30);
        assert_eq!(equals().ever(&a, &b).unwrap(), None);
    }

    #[test]
    fn test_ever_and_always_base() {
        let a = linear(0.0, 10.0, 0, 10);
        assert!(equals().ever_base(&a, &Datum::Float(3.5)).unwrap());
        assert!(!equals().ever_base(&a, &Datum::Float(11.0)).unwrap());
        assert!(!equals().always_base(&a, &Datum::Float(3.5)).unwrap());

        let flat = linear(2.0, 2.0, 0, 10);
        assert!(equals().always_base(&flat, &Datum::Int(2)).unwrap());
    }

    #[test]
    fn test_ever_needs_boolean_results() {
        let add = LiftedFunction::binary(TypeTag::Float, |a, _| Ok(a.clone()));
        let a = linear(0.0, 10.0, 0, 10);
        let err = add.ever_base(&a, &Datum::Float(1.0)).unwrap_err();
        assert!(matches!(err, TemporaError::TypeMismatch(_)));
    }
}
