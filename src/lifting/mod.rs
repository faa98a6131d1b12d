//! Pointwise application of base-type operations across temporal values.
//!
//! A [`LiftedFunction`] describes one operation on base values. The engine
//! walks the time-varying structure of its operands, calls the operation on
//! every instant and rebuilds a temporal value of the matching subtype.
//! Operations whose result jumps when the operands meet (comparisons, for
//! instance) are flagged [`LiftedFunction::discontinuous`] and produce
//! step results split at those instants.

mod binary;
mod ever;
mod scalar;
mod segments;
mod unary;

use crate::base::{Datum, TypeTag, lookup};
use crate::error::{Result, TemporaError};
use crate::temporal::{Interpolation, TInstant};
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

pub type UnaryFn = Arc<dyn Fn(&Datum) -> Result<Datum> + Send + Sync>;
pub type BinaryFn = Arc<dyn Fn(&Datum, &Datum) -> Result<Datum> + Send + Sync>;

/// Turning point of `f(segment, value)` strictly inside a linear segment.
pub type BaseTurningPointFn =
    Arc<dyn Fn(&TInstant, &TInstant, &Datum) -> Result<Option<TInstant>> + Send + Sync>;

/// Turning point of `f(segment1, segment2)` strictly inside two synchronized
/// linear segments.
pub type TurningPointFn = Arc<
    dyn Fn(&TInstant, &TInstant, &TInstant, &TInstant) -> Result<Option<TInstant>> + Send + Sync,
>;

#[derive(Clone)]
pub enum LiftedOp {
    Unary(UnaryFn),
    Binary(BinaryFn),
}

/// Descriptor of an operation lifted to temporal values.
///
/// # Examples
///
/// ```
/// use tempora::base::{Datum, TypeTag};
/// use tempora::lifting::LiftedFunction;
/// use tempora::temporal::{Interpolation, TInstant, TSequence, Temporal};
/// use tempora_types::Timestamp;
///
/// let double = LiftedFunction::unary(TypeTag::Float, |v| {
///     Ok(Datum::Float(v.as_f64().unwrap_or_default() * 2.0))
/// });
/// let t = Timestamp::from_secs;
/// let seq: Temporal = TSequence::new(
///     vec![TInstant::new(1.0, t(0)), TInstant::new(3.0, t(10))],
///     true, true, Interpolation::Linear, true,
/// ).unwrap().into();
///
/// let doubled = double.apply(&seq).unwrap();
/// assert_eq!(doubled.end_instant().value(), &Datum::Float(6.0));
/// ```
#[derive(Clone)]
pub struct LiftedFunction {
    op: LiftedOp,
    arg_types: SmallVec<[TypeTag; 2]>,
    result_type: TypeTag,
    invert: bool,
    discontinuous: bool,
    result_interp: Option<Interpolation>,
    turning_point_base: Option<BaseTurningPointFn>,
    turning_point: Option<TurningPointFn>,
}

impl LiftedFunction {
    pub fn unary<F>(result_type: TypeTag, func: F) -> Self
    where
        F: Fn(&Datum) -> Result<Datum> + Send + Sync + 'static,
    {
        Self::with_op(LiftedOp::Unary(Arc::new(func)), result_type)
    }

    pub fn binary<F>(result_type: TypeTag, func: F) -> Self
    where
        F: Fn(&Datum, &Datum) -> Result<Datum> + Send + Sync + 'static,
    {
        Self::with_op(LiftedOp::Binary(Arc::new(func)), result_type)
    }

    fn with_op(op: LiftedOp, result_type: TypeTag) -> Self {
        Self {
            op,
            arg_types: SmallVec::new(),
            result_type,
            invert: false,
            discontinuous: false,
            result_interp: None,
            turning_point_base: None,
            turning_point: None,
        }
    }

    /// Restrict the operand base types, in argument order.
    ///
    /// Without declared argument types any operand is accepted and the
    /// operation itself rejects what it cannot handle.
    pub fn with_arg_types(mut self, types: &[TypeTag]) -> Self {
        self.arg_types = types.iter().copied().collect();
        self
    }

    /// Mark the operation as jumping at the instants where its operands meet.
    pub fn discontinuous(mut self) -> Self {
        self.discontinuous = true;
        self
    }

    /// Swap the arguments before calling the operation.
    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }

    /// Force the interpolation of results built from continuous operands.
    pub fn with_result_interpolation(mut self, interp: Interpolation) -> Self {
        self.result_interp = Some(interp);
        self
    }

    pub fn with_base_turning_point<F>(mut self, func: F) -> Self
    where
        F: Fn(&TInstant, &TInstant, &Datum) -> Result<Option<TInstant>> + Send + Sync + 'static,
    {
        self.turning_point_base = Some(Arc::new(func));
        self
    }

    pub fn with_turning_point<F>(mut self, func: F) -> Self
    where
        F: Fn(&TInstant, &TInstant, &TInstant, &TInstant) -> Result<Option<TInstant>>
            + Send
            + Sync
            + 'static,
    {
        self.turning_point = Some(Arc::new(func));
        self
    }

    pub fn result_type(&self) -> TypeTag {
        self.result_type
    }

    pub fn is_discontinuous(&self) -> bool {
        self.discontinuous
    }

    pub fn arity(&self) -> usize {
        match self.op {
            LiftedOp::Unary(_) => 1,
            LiftedOp::Binary(_) => 2,
        }
    }

    pub(crate) fn ensure_arity(&self, arity: usize) -> Result<()> {
        if self.arity() != arity {
            return Err(TemporaError::InvalidArgument(format!(
                "Operation of arity {} applied to {} operand(s)",
                self.arity(),
                arity
            )));
        }
        Ok(())
    }

    /// Call the unary operation, checking the type of its result.
    pub(crate) fn call1(&self, value: &Datum) -> Result<Datum> {
        match &self.op {
            LiftedOp::Unary(func) => self.checked(func(value)?),
            LiftedOp::Binary(_) => Err(TemporaError::InvalidArgument(
                "Binary operation applied to a single operand".to_string(),
            )),
        }
    }

    /// Call the binary operation, honoring the inversion flag.
    pub(crate) fn call2(&self, value1: &Datum, value2: &Datum) -> Result<Datum> {
        match &self.op {
            LiftedOp::Binary(func) => {
                let result = if self.invert {
                    func(value2, value1)?
                } else {
                    func(value1, value2)?
                };
                self.checked(result)
            }
            LiftedOp::Unary(_) => Err(TemporaError::InvalidArgument(
                "Unary operation applied to two operands".to_string(),
            )),
        }
    }

    pub(super) fn checked(&self, result: Datum) -> Result<Datum> {
        if result.type_tag() != self.result_type {
            return Err(TemporaError::TypeMismatch(format!(
                "Lifted operation returned {} instead of {}",
                result.type_tag(),
                self.result_type
            )));
        }
        Ok(result)
    }

    /// Check the base type of the operand at `position` in argument order.
    pub(crate) fn ensure_arg_type(&self, position: usize, tag: TypeTag) -> Result<()> {
        let position = if self.invert && self.arity() == 2 {
            1 - position
        } else {
            position
        };
        match self.arg_types.get(position) {
            Some(expected) if *expected != tag => Err(TemporaError::TypeMismatch(format!(
                "Operation expects {} as argument {}, got {}",
                expected,
                position + 1,
                tag
            ))),
            _ => Ok(()),
        }
    }

    /// Interpolation of a result built from operands interpolated with `interp`.
    pub(crate) fn result_interpolation(&self, interp: Interpolation) -> Result<Interpolation> {
        if interp == Interpolation::Discrete {
            return Ok(Interpolation::Discrete);
        }
        if let Some(forced) = self.result_interp {
            return Ok(forced);
        }
        if interp == Interpolation::Linear && !lookup(self.result_type)?.continuous() {
            return Err(TemporaError::InvalidInterpolation(format!(
                "Linear operands cannot produce a {} result",
                self.result_type
            )));
        }
        Ok(interp)
    }

    pub(crate) fn base_turning_point(
        &self,
        inst1: &TInstant,
        inst2: &TInstant,
        value: &Datum,
    ) -> Result<Option<TInstant>> {
        match &self.turning_point_base {
            Some(func) => func(inst1, inst2, value),
            None => Ok(None),
        }
    }

    pub(crate) fn has_base_turning_point(&self) -> bool {
        self.turning_point_base.is_some()
    }

    pub(crate) fn temporal_turning_point(
        &self,
        start1: &TInstant,
        end1: &TInstant,
        start2: &TInstant,
        end2: &TInstant,
    ) -> Result<Option<TInstant>> {
        match &self.turning_point {
            Some(func) if self.invert => func(start2, end2, start1, end1),
            Some(func) => func(start1, end1, start2, end2),
            None => Ok(None),
        }
    }

    pub(crate) fn has_turning_point(&self) -> bool {
        self.turning_point.is_some()
    }
}

impl fmt::Debug for LiftedFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiftedFunction")
            .field("arity", &self.arity())
            .field("arg_types", &self.arg_types)
            .field("result_type", &self.result_type)
            .field("invert", &self.invert)
            .field("discontinuous", &self.discontinuous)
            .field("result_interp", &self.result_interp)
            .finish()
    }
}

/// Truth value of a boolean result.
pub(crate) fn truth(value: &Datum) -> Result<bool> {
    value.as_bool().ok_or_else(|| {
        TemporaError::TypeMismatch(format!("Expected a boolean result, got {}", value.type_tag()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn negate() -> LiftedFunction {
        LiftedFunction::unary(TypeTag::Float, |v| Ok(Datum::Float(-v.as_f64().unwrap_or(0.0))))
    }

    #[test]
    fn test_result_type_is_checked() {
        let wrong = LiftedFunction::unary(TypeTag::Int, |v| Ok(v.clone()));
        let err = wrong.call1(&Datum::Float(1.0)).unwrap_err();
        assert!(matches!(err, TemporaError::TypeMismatch(_)));
    }

    #[test]
    fn test_inverted_arguments() {
        let minus = LiftedFunction::binary(TypeTag::Float, |a, b| {
            Ok(Datum::Float(a.as_f64().unwrap_or(0.0) - b.as_f64().unwrap_or(0.0)))
        });
        assert_eq!(minus.call2(&5.0.into(), &2.0.into()).unwrap(), Datum::Float(3.0));
        let inverted = minus.inverted();
        assert_eq!(inverted.call2(&5.0.into(), &2.0.into()).unwrap(), Datum::Float(-3.0));
    }

    #[test]
    fn test_arity_mismatch() {
        assert!(negate().call2(&1.0.into(), &2.0.into()).is_err());
        assert_eq!(negate().call1(&1.0.into()).unwrap(), Datum::Float(-1.0));
    }

    #[test]
    fn test_result_interpolation() {
        let to_bool = LiftedFunction::unary(TypeTag::Bool, |_| Ok(Datum::Bool(true)));
        assert!(matches!(
            to_bool.result_interpolation(Interpolation::Linear),
            Err(TemporaError::InvalidInterpolation(_))
        ));
        assert_eq!(
            to_bool.result_interpolation(Interpolation::Discrete).unwrap(),
            Interpolation::Discrete
        );
        let forced = to_bool.with_result_interpolation(Interpolation::Step);
        assert_eq!(
            forced.result_interpolation(Interpolation::Linear).unwrap(),
            Interpolation::Step
        );
        assert_eq!(
            negate().result_interpolation(Interpolation::Linear).unwrap(),
            Interpolation::Linear
        );
    }

    #[test]
    fn test_declared_argument_types() {
        let f = LiftedFunction::binary(TypeTag::Float, |a, _| Ok(a.clone()))
            .with_arg_types(&[TypeTag::Float, TypeTag::Int]);
        assert!(f.ensure_arg_type(0, TypeTag::Float).is_ok());
        assert!(f.ensure_arg_type(1, TypeTag::Float).is_err());
        let inverted = f.inverted();
        assert!(inverted.ensure_arg_type(0, TypeTag::Int).is_ok());
    }
}
