use super::LiftedFunction;
use super::segments::{assemble, discontinuous_pieces, mixed_pieces, zip_sequences};
use crate::error::{Result, TemporaError};
use crate::sync::{SyncMode, synchronize};
use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};

impl LiftedFunction {
    /// Apply a binary operation to two temporal values.
    ///
    /// Both operands are synchronized first; the result covers their common
    /// time domain and `Ok(None)` means they do not overlap.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::base::{Datum, TypeTag};
    /// use tempora::lifting::LiftedFunction;
    /// use tempora::temporal::{Interpolation, TInstant, TSequence, Temporal};
    /// use tempora_types::Timestamp;
    ///
    /// let add = LiftedFunction::binary(TypeTag::Float, |a, b| {
    ///     Ok(Datum::Float(a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0)))
    /// });
    /// let t = Timestamp::from_secs;
    /// let linear = |a: f64, b: f64, s: i64, e: i64| -> Temporal {
    ///     TSequence::new(
    ///         vec![TInstant::new(a, t(s)), TInstant::new(b, t(e))],
    ///         true, true, Interpolation::Linear, true,
    ///     ).unwrap().into()
    /// };
    ///
    /// let sum = add.apply_temporal(&linear(0.0, 10.0, 0, 10), &linear(5.0, 5.0, 5, 15)).unwrap().unwrap();
    /// assert_eq!(sum.start_timestamp(), t(5));
    /// assert_eq!(sum.start_instant().value(), &Datum::Float(10.0));
    ///
    /// let disjoint = add.apply_temporal(&linear(0.0, 1.0, 0, 1), &linear(0.0, 1.0, 5, 6)).unwrap();
    /// assert!(disjoint.is_none());
    /// ```
    pub fn apply_temporal(&self, temp1: &Temporal, temp2: &Temporal) -> Result<Option<Temporal>> {
        self.ensure_arity(2)?;
        self.ensure_arg_type(0, temp1.base_type())?;
        self.ensure_arg_type(1, temp2.base_type())?;
        let Some((sync1, sync2)) = synchronize(temp1, temp2, SyncMode::Synchronize)? else {
            return Ok(None);
        };

        let result = match (&sync1, &sync2) {
            (Temporal::Instant(inst1), Temporal::Instant(inst2)) => {
                TInstant::new(self.call2(inst1.value(), inst2.value())?, inst1.timestamp()).into()
            }
            (Temporal::Sequence(seq1), Temporal::Sequence(seq2)) => {
                assemble(self.synced_pieces(seq1, seq2)?, true)?
            }
            (Temporal::SequenceSet(ss1), Temporal::SequenceSet(ss2)) => {
                let mut pieces = Vec::with_capacity(ss1.num_sequences());
                for (seq1, seq2) in ss1.sequences().iter().zip(ss2.sequences()) {
                    pieces.extend(self.synced_pieces(seq1, seq2)?);
                }
                TSequenceSet::make(pieces, true)?.into()
            }
            _ => {
                return Err(TemporaError::InternalType(format!(
                    "Synchronization produced a {:?} and a {:?}",
                    sync1.subtype(),
                    sync2.subtype()
                )));
            }
        };
        Ok(Some(result))
    }

    /// Result pieces of two synchronized sequences.
    fn synced_pieces(&self, seq1: &TSequence, seq2: &TSequence) -> Result<Vec<TSequence>> {
        use Interpolation::{Discrete, Linear};
        let (interp1, interp2) = (seq1.interpolation(), seq2.interpolation());
        if interp1 == Discrete || interp2 == Discrete {
            return Ok(vec![zip_sequences(self, seq1, seq2)?]);
        }
        if self.is_discontinuous() && (interp1 == Linear || interp2 == Linear) {
            return discontinuous_pieces(self, seq1, seq2);
        }
        if interp1 == interp2 {
            return Ok(vec![zip_sequences(self, seq1, seq2)?]);
        }
        mixed_pieces(self, seq1, seq2)
    }
}
