use super::LiftedFunction;
use super::segments::{
    assemble, constant_like, discontinuous_pieces, map_sequence, map_with_turning_points,
};
use crate::base::Datum;
use crate::config::config;
use crate::error::Result;
use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};
use crate::validation::ensure_same_frame;

impl LiftedFunction {
    /// Apply a binary operation to `temp` and the constant `value`, in that
    /// argument order.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::base::{Datum, TypeTag, datum_eq};
    /// use tempora::lifting::LiftedFunction;
    /// use tempora::temporal::{Interpolation, TInstant, TSequence, Temporal};
    /// use tempora_types::Timestamp;
    ///
    /// let eq = LiftedFunction::binary(TypeTag::Bool, |a, b| Ok(Datum::Bool(datum_eq(a, b)?)))
    ///     .discontinuous()
    ///     .with_result_interpolation(Interpolation::Step);
    /// let t = Timestamp::from_secs;
    /// let seq: Temporal = TSequence::new(
    ///     vec![TInstant::new(0.0, t(0)), TInstant::new(10.0, t(10))],
    ///     true, true, Interpolation::Linear, true,
    /// ).unwrap().into();
    ///
    /// let result = eq.apply_base(&seq, &Datum::Float(5.0)).unwrap();
    /// assert_eq!(result.value_at_timestamp(t(5), true).unwrap(), Some(Datum::Bool(true)));
    /// assert_eq!(result.value_at_timestamp(t(6), true).unwrap(), Some(Datum::Bool(false)));
    /// ```
    pub fn apply_base(&self, temp: &Temporal, value: &Datum) -> Result<Temporal> {
        self.lift_base(temp, value)
    }

    /// Apply a binary operation to the constant `value` and `temp`, in that
    /// argument order.
    pub fn apply_base_left(&self, value: &Datum, temp: &Temporal) -> Result<Temporal> {
        self.clone().inverted().lift_base(temp, value)
    }

    fn lift_base(&self, temp: &Temporal, value: &Datum) -> Result<Temporal> {
        self.ensure_arity(2)?;
        self.ensure_arg_type(0, temp.base_type())?;
        self.ensure_arg_type(1, value.type_tag())?;
        ensure_same_frame(temp.start_instant().value(), value)?;

        let result = match temp {
            Temporal::Instant(inst) => {
                TInstant::new(self.call2(inst.value(), value)?, inst.timestamp()).into()
            }
            Temporal::Sequence(seq) => assemble(self.base_pieces(seq, value)?, true)?,
            Temporal::SequenceSet(ss) => {
                let mut pieces = Vec::with_capacity(ss.num_sequences());
                for seq in ss.sequences() {
                    pieces.extend(self.base_pieces(seq, value)?);
                }
                let normalize = self.is_discontinuous() || config().normalize;
                TSequenceSet::make(pieces, normalize)?.into()
            }
        };
        Ok(result)
    }

    fn base_pieces(&self, seq: &TSequence, value: &Datum) -> Result<Vec<TSequence>> {
        if seq.interpolation() != Interpolation::Linear {
            return Ok(vec![map_sequence(self, seq, |v| self.call2(v, value))?]);
        }
        if self.is_discontinuous() {
            let constant = constant_like(seq, value)?;
            return discontinuous_pieces(self, seq, &constant);
        }
        if self.has_base_turning_point() {
            return Ok(vec![map_with_turning_points(self, seq, value)?]);
        }
        Ok(vec![map_sequence(self, seq, |v| self.call2(v, value))?])
    }
}
