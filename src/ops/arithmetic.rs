//! Temporal arithmetic on numbers.

use super::numeric_result_type;
use crate::base::{Datum, TypeTag};
use crate::config::config;
use crate::error::{Result, TemporaError};
use crate::lifting::LiftedFunction;
use crate::ops::comparison::ever_eq_base;
use crate::sync::{SyncMode, synchronize};
use crate::temporal::{TInstant, Temporal};
use tempora_types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    /// Apply the operation to two numeric values, producing `result_type`.
    pub fn eval(self, a: &Datum, b: &Datum, result_type: TypeTag) -> Result<Datum> {
        match result_type {
            TypeTag::Float => {
                let (x, y) = (number(a)?, number(b)?);
                Ok(Datum::Float(match self {
                    ArithmeticOp::Add => x + y,
                    ArithmeticOp::Sub => x - y,
                    ArithmeticOp::Mul => x * y,
                    ArithmeticOp::Div => x / y,
                }))
            }
            TypeTag::BigInt => self.eval_integer(integer(a)?, integer(b)?).map(Datum::BigInt),
            TypeTag::Int => {
                let value = self.eval_integer(integer(a)?, integer(b)?)?;
                i32::try_from(value).map(Datum::Int).map_err(|_| overflow())
            }
            other => Err(TemporaError::TypeMismatch(format!(
                "Arithmetic cannot produce {}",
                other
            ))),
        }
    }

    fn eval_integer(self, x: i64, y: i64) -> Result<i64> {
        let value = match self {
            ArithmeticOp::Add => x.checked_add(y),
            ArithmeticOp::Sub => x.checked_sub(y),
            ArithmeticOp::Mul => x.checked_mul(y),
            ArithmeticOp::Div => {
                if y == 0 {
                    return Err(division_by_zero());
                }
                x.checked_div(y)
            }
        };
        value.ok_or_else(overflow)
    }

    fn lifted(self, tag1: TypeTag, tag2: TypeTag) -> Result<LiftedFunction> {
        let result_type = numeric_result_type(tag1, tag2)?;
        let lifted = LiftedFunction::binary(result_type, move |a, b| self.eval(a, b, result_type));
        Ok(match self {
            ArithmeticOp::Mul | ArithmeticOp::Div => lifted
                .with_turning_point(move |start1, end1, start2, end2| {
                    turning_point(self, start1, end1, start2, end2)
                }),
            _ => lifted,
        })
    }
}

fn number(value: &Datum) -> Result<f64> {
    value.as_f64().ok_or_else(|| {
        TemporaError::TypeMismatch(format!("Expected a number, got {}", value.type_tag()))
    })
}

fn integer(value: &Datum) -> Result<i64> {
    match value {
        Datum::Int(v) => Ok(i64::from(*v)),
        Datum::BigInt(v) => Ok(*v),
        other => Err(TemporaError::TypeMismatch(format!(
            "Expected an integer, got {}",
            other.type_tag()
        ))),
    }
}

fn overflow() -> TemporaError {
    TemporaError::InvalidArgument("Integer overflow in temporal arithmetic".to_string())
}

fn division_by_zero() -> TemporaError {
    TemporaError::InvalidArgument("Division by zero".to_string())
}

/// Instant halfway between the zeros of two synchronized linear segments.
///
/// With `s` the fraction of the segment, the product
/// `(a1 + b1 s)(a2 + b2 s)` peaks halfway between `-a1 / b1` and `-a2 / b2`.
/// A quotient gets an instant at the same fraction.
fn turning_point(
    op: ArithmeticOp,
    start1: &TInstant,
    end1: &TInstant,
    start2: &TInstant,
    end2: &TInstant,
) -> Result<Option<TInstant>> {
    let (a1, a2) = (number(start1.value())?, number(start2.value())?);
    let (b1, b2) = (number(end1.value())? - a1, number(end2.value())? - a2);
    if b1 == 0.0 || b2 == 0.0 {
        return Ok(None);
    }
    let (zero1, zero2) = (-a1 / b1, -a2 / b2);
    let (min, max) = (zero1.min(zero2), zero1.max(zero2));
    let fraction = min + (max - min) / 2.0;
    let eps = config().epsilon;
    if fraction <= eps || fraction >= 1.0 - eps {
        return Ok(None);
    }
    let (lower, upper) = (start1.timestamp(), end1.timestamp());
    let t: Timestamp = lower.offset_by((upper - lower) as f64 * fraction);
    if t <= lower || t >= upper {
        return Ok(None);
    }
    // The value at the truncated timestamp keeps the instant on the segment
    let s = (t - lower) as f64 / (upper - lower) as f64;
    let (x, y) = (a1 + b1 * s, a2 + b2 * s);
    let value = match op {
        ArithmeticOp::Div => x / y,
        _ => x * y,
    };
    Ok(Some(TInstant::new(value, t)))
}

fn ensure_nonzero_value(value: &Datum) -> Result<()> {
    if value.as_f64().is_some_and(|v| v.abs() < config().epsilon) {
        return Err(division_by_zero());
    }
    Ok(())
}

fn zero_of(temp: &Temporal) -> Datum {
    match temp.base_type() {
        TypeTag::Float => Datum::Float(0.0),
        TypeTag::BigInt => Datum::BigInt(0),
        _ => Datum::Int(0),
    }
}

/// Arithmetic on two temporal numbers.
pub fn arithmetic(
    op: ArithmeticOp,
    temp1: &Temporal,
    temp2: &Temporal,
) -> Result<Option<Temporal>> {
    let lifted = op.lifted(temp1.base_type(), temp2.base_type())?;
    if op == ArithmeticOp::Div {
        let Some((_, divisor)) = synchronize(temp1, temp2, SyncMode::Intersection)? else {
            return Ok(None);
        };
        if ever_eq_base(&divisor, &zero_of(&divisor))? {
            return Err(division_by_zero());
        }
    }
    lifted.apply_temporal(temp1, temp2)
}

/// Arithmetic on a temporal number and a number on its right.
pub fn arithmetic_base(op: ArithmeticOp, temp: &Temporal, value: &Datum) -> Result<Temporal> {
    let lifted = op.lifted(temp.base_type(), value.type_tag())?;
    if op == ArithmeticOp::Div {
        ensure_nonzero_value(value)?;
    }
    lifted.apply_base(temp, value)
}

/// Arithmetic on a number on the left and a temporal number.
pub fn arithmetic_base_left(op: ArithmeticOp, value: &Datum, temp: &Temporal) -> Result<Temporal> {
    let lifted = op.lifted(value.type_tag(), temp.base_type())?;
    if op == ArithmeticOp::Div && ever_eq_base(temp, &zero_of(temp))? {
        return Err(division_by_zero());
    }
    lifted.apply_base_left(value, temp)
}

pub fn add(temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
    arithmetic(ArithmeticOp::Add, temp1, temp2)
}

pub fn add_base(temp: &Temporal, value: &Datum) -> Result<Temporal> {
    arithmetic_base(ArithmeticOp::Add, temp, value)
}

pub fn add_base_left(value: &Datum, temp: &Temporal) -> Result<Temporal> {
    arithmetic_base_left(ArithmeticOp::Add, value, temp)
}

pub fn sub(temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
    arithmetic(ArithmeticOp::Sub, temp1, temp2)
}

pub fn sub_base(temp: &Temporal, value: &Datum) -> Result<Temporal> {
    arithmetic_base(ArithmeticOp::Sub, temp, value)
}

pub fn sub_base_left(value: &Datum, temp: &Temporal) -> Result<Temporal> {
    arithmetic_base_left(ArithmeticOp::Sub, value, temp)
}

/// Product of two temporal numbers, with the extrema of products of linear
/// segments added as instants.
pub fn mul(temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
    arithmetic(ArithmeticOp::Mul, temp1, temp2)
}

pub fn mul_base(temp: &Temporal, value: &Datum) -> Result<Temporal> {
    arithmetic_base(ArithmeticOp::Mul, temp, value)
}

pub fn mul_base_left(value: &Datum, temp: &Temporal) -> Result<Temporal> {
    arithmetic_base_left(ArithmeticOp::Mul, value, temp)
}

/// Quotient of two temporal numbers; the divisor must never be zero on the
/// common time domain. Quotients of linear segments get an instant halfway
/// between the zeros of the operands, as products do.
pub fn div(temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
    arithmetic(ArithmeticOp::Div, temp1, temp2)
}

pub fn div_base(temp: &Temporal, value: &Datum) -> Result<Temporal> {
    arithmetic_base(ArithmeticOp::Div, temp, value)
}

pub fn div_base_left(value: &Datum, temp: &Temporal) -> Result<Temporal> {
    arithmetic_base_left(ArithmeticOp::Div, value, temp)
}
