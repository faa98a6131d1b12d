//! Temporal operators built on the lifting engine.
//!
//! Every operator is a [`LiftedFunction`](crate::lifting::LiftedFunction)
//! over base values. Operators on two temporal values return `Ok(None)`
//! when the operands do not overlap in time.

pub mod arithmetic;
pub mod boolean;
pub mod cast;
pub mod comparison;

pub use arithmetic::{
    ArithmeticOp, add, add_base, add_base_left, div, div_base, div_base_left, mul, mul_base,
    mul_base_left, sub, sub_base, sub_base_left,
};
pub use boolean::{tand, tand_base, tnot, tor, tor_base};
pub use cast::{tfloat_to_tint, tint_to_tfloat};
pub use comparison::{
    Comparison, always_eq, always_eq_base, always_ge, always_ge_base, always_gt, always_gt_base,
    always_le, always_le_base, always_lt, always_lt_base, always_ne, always_ne_base, ever_eq,
    ever_eq_base, ever_ge, ever_ge_base, ever_gt, ever_gt_base, ever_le, ever_le_base, ever_lt,
    ever_lt_base, ever_ne, ever_ne_base, tcomp, tcomp_base, tcomp_base_left, teq, teq_base, tge,
    tge_base, tgt, tgt_base, tle, tle_base, tlt, tlt_base, tne, tne_base,
};

use crate::base::TypeTag;
use crate::error::{Result, TemporaError};

/// Validates that a base type is one of the numeric types.
pub(crate) fn ensure_numeric(tag: TypeTag) -> Result<()> {
    if !tag.is_numeric() {
        return Err(TemporaError::TypeMismatch(format!(
            "Operation requires a numeric base type, got {}",
            tag
        )));
    }
    Ok(())
}

/// Result type of arithmetic on two numeric types.
pub(crate) fn numeric_result_type(tag1: TypeTag, tag2: TypeTag) -> Result<TypeTag> {
    ensure_numeric(tag1)?;
    ensure_numeric(tag2)?;
    Ok(match (tag1, tag2) {
        (TypeTag::Float, _) | (_, TypeTag::Float) => TypeTag::Float,
        (TypeTag::BigInt, _) | (_, TypeTag::BigInt) => TypeTag::BigInt,
        _ => TypeTag::Int,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_result_type() {
        assert_eq!(numeric_result_type(TypeTag::Int, TypeTag::Int).unwrap(), TypeTag::Int);
        assert_eq!(numeric_result_type(TypeTag::Int, TypeTag::BigInt).unwrap(), TypeTag::BigInt);
        assert_eq!(numeric_result_type(TypeTag::BigInt, TypeTag::Float).unwrap(), TypeTag::Float);
        assert!(numeric_result_type(TypeTag::Text, TypeTag::Int).is_err());
    }
}
