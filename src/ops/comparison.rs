//! Temporal and ever/always comparisons.
//!
//! Mixed numeric operands (an integer against a float) compare as `f64`.
//! Comparisons of continuous values jump where the operands meet, so their
//! results are step values split at those instants.

use crate::base::{Datum, TypeTag, datum_cmp, datum_eq};
use crate::error::{Result, TemporaError};
use crate::lifting::LiftedFunction;
use crate::temporal::{Interpolation, Temporal};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl Comparison {
    pub fn eval(self, a: &Datum, b: &Datum) -> Result<bool> {
        Ok(match self {
            Comparison::Eq => datum_eq(a, b)?,
            Comparison::Ne => !datum_eq(a, b)?,
            Comparison::Lt => datum_cmp(a, b)? == Ordering::Less,
            Comparison::Le => datum_cmp(a, b)? != Ordering::Greater,
            Comparison::Gt => datum_cmp(a, b)? == Ordering::Greater,
            Comparison::Ge => datum_cmp(a, b)? != Ordering::Less,
        })
    }

    pub fn lifted(self) -> LiftedFunction {
        LiftedFunction::binary(TypeTag::Bool, move |a, b| Ok(Datum::Bool(self.eval(a, b)?)))
            .discontinuous()
            .with_result_interpolation(Interpolation::Step)
    }
}

/// Validates that values of the two base types can be compared.
fn ensure_comparable(tag1: TypeTag, tag2: TypeTag) -> Result<()> {
    if tag1 == tag2 || (tag1.is_numeric() && tag2.is_numeric()) {
        return Ok(());
    }
    Err(TemporaError::TypeMismatch(format!(
        "Cannot compare {} with {}",
        tag1, tag2
    )))
}

/// Temporal comparison of two temporal values.
pub fn tcomp(cmp: Comparison, temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
    ensure_comparable(temp1.base_type(), temp2.base_type())?;
    cmp.lifted().apply_temporal(temp1, temp2)
}

/// Temporal comparison of a temporal value with a base value on its right.
pub fn tcomp_base(cmp: Comparison, temp: &Temporal, value: &Datum) -> Result<Temporal> {
    ensure_comparable(temp.base_type(), value.type_tag())?;
    cmp.lifted().apply_base(temp, value)
}

/// Temporal comparison of a base value on the left with a temporal value.
pub fn tcomp_base_left(cmp: Comparison, value: &Datum, temp: &Temporal) -> Result<Temporal> {
    ensure_comparable(value.type_tag(), temp.base_type())?;
    cmp.lifted().apply_base_left(value, temp)
}

fn ever_comp(cmp: Comparison, temp1: &Temporal, temp2: &Temporal) -> Result<Option<bool>> {
    ensure_comparable(temp1.base_type(), temp2.base_type())?;
    cmp.lifted().ever(temp1, temp2)
}

fn always_comp(cmp: Comparison, temp1: &Temporal, temp2: &Temporal) -> Result<Option<bool>> {
    ensure_comparable(temp1.base_type(), temp2.base_type())?;
    cmp.lifted().always(temp1, temp2)
}

fn ever_comp_base(cmp: Comparison, temp: &Temporal, value: &Datum) -> Result<bool> {
    ensure_comparable(temp.base_type(), value.type_tag())?;
    cmp.lifted().ever_base(temp, value)
}

fn always_comp_base(cmp: Comparison, temp: &Temporal, value: &Datum) -> Result<bool> {
    ensure_comparable(temp.base_type(), value.type_tag())?;
    cmp.lifted().always_base(temp, value)
}

macro_rules! comparison_ops {
    ($($cmp:ident => $t:ident, $t_base:ident, $ever:ident, $ever_base:ident, $always:ident, $always_base:ident;)*) => {
        $(
            pub fn $t(temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
                tcomp(Comparison::$cmp, temp1, temp2)
            }

            pub fn $t_base(temp: &Temporal, value: &Datum) -> Result<Temporal> {
                tcomp_base(Comparison::$cmp, temp, value)
            }

            pub fn $ever(temp1: &Temporal, temp2: &Temporal) -> Result<Option<bool>> {
                ever_comp(Comparison::$cmp, temp1, temp2)
            }

            pub fn $ever_base(temp: &Temporal, value: &Datum) -> Result<bool> {
                ever_comp_base(Comparison::$cmp, temp, value)
            }

            pub fn $always(temp1: &Temporal, temp2: &Temporal) -> Result<Option<bool>> {
                always_comp(Comparison::$cmp, temp1, temp2)
            }

            pub fn $always_base(temp: &Temporal, value: &Datum) -> Result<bool> {
                always_comp_base(Comparison::$cmp, temp, value)
            }
        )*
    };
}

comparison_ops! {
    Eq => teq, teq_base, ever_eq, ever_eq_base, always_eq, always_eq_base;
    Ne => tne, tne_base, ever_ne, ever_ne_base, always_ne, always_ne_base;
    Lt => tlt, tlt_base, ever_lt, ever_lt_base, always_lt, always_lt_base;
    Le => tle, tle_base, ever_le, ever_le_base, always_le, always_le_base;
    Gt => tgt, tgt_base, ever_gt, ever_gt_base, always_gt, always_gt_base;
    Ge => tge, tge_base, ever_ge, ever_ge_base, always_ge, always_ge_base;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::temporal::{TInstant, TSequence};
    use tempora_types::Timestamp;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn seq(values: &[(f64, i64)], interp: Interpolation) -> Temporal {
        let instants = values.iter().map(|&(v, s)| TInstant::new(v, t(s))).collect();
        TSequence::new(instants, true, true, interp, true).unwrap().into()
    }

    #[test]
    fn test_eval() {
        let (one, two) = (Datum::Int(1), Datum::Float(2.0));
        assert!(Comparison::Lt.eval(&one, &two).unwrap());
        assert!(Comparison::Le.eval(&one, &one).unwrap());
        assert!(Comparison::Ne.eval(&one, &two).unwrap());
        assert!(!Comparison::Ge.eval(&one, &two).unwrap());
    }

    #[test]
    fn test_tlt_linear_sequences() {
        let a = seq(&[(0.0, 0), (10.0, 10)], Interpolation::Linear);
        let b = seq(&[(10.0, 0), (0.0, 10)], Interpolation::Linear);
        let result = tlt(&a, &b).unwrap().unwrap();
        assert_eq!(result.value_at_timestamp(t(2), true).unwrap(), Some(Datum::Bool(true)));
        assert_eq!(result.value_at_timestamp(t(5), true).unwrap(), Some(Datum::Bool(false)));
        assert_eq!(result.value_at_timestamp(t(8), true).unwrap(), Some(Datum::Bool(false)));
    }

    #[test]
    fn test_ever_eq_base_on_step_sequence() {
        let a = seq(&[(1.0, 0), (1.0, 5), (3.0, 10)], Interpolation::Step);
        assert!(!ever_eq_base(&a, &Datum::Float(2.0)).unwrap());
        assert!(ever_eq_base(&a, &Datum::Int(3)).unwrap());
        assert!(always_le_base(&a, &Datum::Float(3.0)).unwrap());
    }

    #[test]
    fn test_base_on_the_left() {
        let a = seq(&[(0.0, 0), (10.0, 10)], Interpolation::Linear);
        let result = tcomp_base_left(Comparison::Lt, &Datum::Float(4.0), &a).unwrap();
        assert_eq!(result.value_at_timestamp(t(2), true).unwrap(), Some(Datum::Bool(false)));
        assert_eq!(result.value_at_timestamp(t(6), true).unwrap(), Some(Datum::Bool(true)));
    }

    #[test]
    fn test_incomparable_types() {
        let a = seq(&[(0.0, 0), (10.0, 10)], Interpolation::Linear);
        let err = teq_base(&a, &Datum::from("x")).unwrap_err();
        assert!(matches!(err, TemporaError::TypeMismatch(_)));
    }
}
