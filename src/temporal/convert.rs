//! Conversions between subtypes and interpolations.

use super::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};
use crate::base::{datum_eq, lookup};
use crate::error::{Result, TemporaError};
use crate::validation::ensure_valid_interpolation;

impl Temporal {
    /// The single instant of the value.
    pub fn to_instant(&self) -> Result<TInstant> {
        match self {
            Temporal::Instant(inst) => Ok(inst.clone()),
            Temporal::Sequence(seq) if seq.num_instants() == 1 => Ok(seq.start_instant().clone()),
            Temporal::SequenceSet(ss) if ss.num_instants() == 1 => {
                Ok(ss.start_sequence().start_instant().clone())
            }
            _ => Err(TemporaError::InvalidArgument(
                "Cannot transform input value to a temporal instant".to_string(),
            )),
        }
    }

    /// The value as one sequence with the given interpolation.
    ///
    /// `None` keeps the interpolation of a sequence and picks linear (or step
    /// for non-continuous base types) otherwise.
    pub fn to_sequence(&self, interp: Option<Interpolation>) -> Result<TSequence> {
        match self {
            Temporal::Instant(inst) => {
                let interp = interp.unwrap_or_else(|| default_interpolation(inst));
                TSequence::from_instant(inst.clone(), interp)
            }
            Temporal::Sequence(seq) => {
                let interp = interp.unwrap_or(seq.interpolation());
                match sequence_set_interp(seq, interp)? {
                    Temporal::Sequence(seq) => Ok(seq),
                    _ => Err(TemporaError::InvalidArgument(
                        "Cannot transform input value to a single temporal sequence".to_string(),
                    )),
                }
            }
            Temporal::SequenceSet(ss) if ss.num_sequences() == 1 => {
                let seq = ss.start_sequence();
                let interp = interp.unwrap_or(seq.interpolation());
                Temporal::Sequence(seq.clone()).to_sequence(Some(interp))
            }
            Temporal::SequenceSet(_) => Err(TemporaError::InvalidArgument(
                "Cannot transform a sequence set with more than one member to a sequence"
                    .to_string(),
            )),
        }
    }

    /// The value as a sequence set with the given continuous interpolation.
    pub fn to_sequence_set(&self, interp: Option<Interpolation>) -> Result<TSequenceSet> {
        if interp == Some(Interpolation::Discrete) {
            return Err(TemporaError::InvalidInterpolation(
                "A sequence set cannot have discrete interpolation".to_string(),
            ));
        }
        match self {
            Temporal::Instant(inst) => {
                let interp = interp.unwrap_or_else(|| default_interpolation(inst));
                let seq = TSequence::from_instant(inst.clone(), interp)?;
                TSequenceSet::make(vec![seq], false)
            }
            Temporal::Sequence(seq) if seq.interpolation() == Interpolation::Discrete => {
                let first = seq.start_instant();
                let interp = interp.unwrap_or_else(|| default_interpolation(first));
                ensure_valid_interpolation(first.base_type(), interp)?;
                let sequences = seq
                    .instants()
                    .iter()
                    .map(|inst| TSequence::make(vec![inst.clone()], true, true, interp, false))
                    .collect::<Result<Vec<_>>>()?;
                TSequenceSet::make(sequences, false)
            }
            Temporal::Sequence(seq) => {
                let interp = interp.unwrap_or(seq.interpolation());
                match sequence_set_interp(seq, interp)? {
                    Temporal::Sequence(seq) => TSequenceSet::make(vec![seq], false),
                    Temporal::SequenceSet(ss) => Ok(ss),
                    Temporal::Instant(_) => Err(internal_conversion()),
                }
            }
            Temporal::SequenceSet(ss) => {
                let interp = interp.unwrap_or(ss.interpolation());
                if interp == ss.interpolation() {
                    return Ok(ss.clone());
                }
                let mut sequences = Vec::with_capacity(ss.num_sequences());
                for seq in ss.sequences() {
                    match sequence_set_interp(seq, interp)? {
                        Temporal::Sequence(seq) => sequences.push(seq),
                        Temporal::SequenceSet(part) => sequences.extend(part.into_sequences()),
                        Temporal::Instant(_) => return Err(internal_conversion()),
                    }
                }
                TSequenceSet::make(sequences, false)
            }
        }
    }

    /// The value as a discrete sequence.
    ///
    /// Continuous values must consist of instantaneous sequences only.
    pub fn to_discrete(&self) -> Result<TSequence> {
        match self {
            Temporal::Instant(inst) => TSequence::from_instant(inst.clone(), Interpolation::Discrete),
            Temporal::Sequence(seq) => sequence_set_interp(seq, Interpolation::Discrete)
                .and_then(|temp| match temp {
                    Temporal::Sequence(seq) => Ok(seq),
                    _ => Err(internal_conversion()),
                }),
            Temporal::SequenceSet(ss) => {
                if ss.sequences().iter().any(|seq| !seq.is_instantaneous()) {
                    return Err(TemporaError::InvalidArgument(
                        "Cannot transform input value to a temporal discrete sequence".to_string(),
                    ));
                }
                let instants = ss.instants().cloned().collect();
                TSequence::make(instants, true, true, Interpolation::Discrete, false)
            }
        }
    }

    /// Turn step segments into linear ones.
    ///
    /// Each step segment becomes a linear piece holding its start value,
    /// followed by the jump as its own member, so the result is a sequence set.
    pub fn step_to_linear(&self) -> Result<Temporal> {
        if !lookup(self.base_type())?.continuous() {
            return Err(TemporaError::InvalidInterpolation(format!(
                "The base type {} does not support linear interpolation",
                self.base_type()
            )));
        }
        match self {
            Temporal::Instant(inst) => Ok(Temporal::Instant(inst.clone())),
            Temporal::Sequence(seq) => match seq.interpolation() {
                Interpolation::Step => Ok(Temporal::SequenceSet(TSequenceSet::make(
                    step_to_linear_sequences(seq)?,
                    false,
                )?)),
                Interpolation::Linear => Ok(Temporal::Sequence(seq.clone())),
                Interpolation::Discrete => Err(TemporaError::InvalidInterpolation(
                    "A discrete sequence has no step segments".to_string(),
                )),
            },
            Temporal::SequenceSet(ss) if ss.interpolation() == Interpolation::Step => {
                let mut sequences = Vec::with_capacity(ss.num_instants());
                for seq in ss.sequences() {
                    sequences.extend(step_to_linear_sequences(seq)?);
                }
                Ok(Temporal::SequenceSet(TSequenceSet::make(sequences, false)?))
            }
            Temporal::SequenceSet(ss) => Ok(Temporal::SequenceSet(ss.clone())),
        }
    }
}

fn internal_conversion() -> TemporaError {
    TemporaError::InvalidArgument("Unexpected subtype produced by a conversion".to_string())
}

pub(crate) fn default_interpolation(inst: &TInstant) -> Interpolation {
    match lookup(inst.base_type()) {
        Ok(base_type) if base_type.continuous() => Interpolation::Linear,
        _ => Interpolation::Step,
    }
}

/// Change the interpolation of a sequence.
///
/// Most changes keep one sequence; turning a step sequence into a linear one
/// may produce a sequence set.
fn sequence_set_interp(seq: &TSequence, interp: Interpolation) -> Result<Temporal> {
    let current = seq.interpolation();
    if current == interp {
        return Ok(Temporal::Sequence(seq.clone()));
    }
    ensure_valid_interpolation(seq.base_type(), interp)?;

    match (current, interp) {
        (_, Interpolation::Discrete) | (Interpolation::Discrete, _) => {
            if seq.num_instants() != 1 {
                return Err(TemporaError::InvalidArgument(format!(
                    "Cannot transform a {} sequence with more than one instant to {} interpolation",
                    current, interp
                )));
            }
            Ok(Temporal::Sequence(TSequence::make(
                seq.instants().to_vec(),
                true,
                true,
                interp,
                false,
            )?))
        }
        (Interpolation::Step, Interpolation::Linear) => {
            let mut sequences = step_to_linear_sequences(seq)?;
            if sequences.len() == 1 {
                Ok(Temporal::Sequence(sequences.remove(0)))
            } else {
                Ok(Temporal::SequenceSet(TSequenceSet::make(sequences, false)?))
            }
        }
        _ => {
            let first = seq.start_instant().value();
            for inst in &seq.instants()[1..] {
                if !datum_eq(first, inst.value())? {
                    return Err(TemporaError::InvalidInterpolation(
                        "Cannot transform a non-constant linear sequence to step interpolation"
                            .to_string(),
                    ));
                }
            }
            Ok(Temporal::Sequence(TSequence::make(
                seq.instants().to_vec(),
                seq.lower_inc(),
                seq.upper_inc(),
                interp,
                false,
            )?))
        }
    }
}

/// Linear pieces equivalent to a step sequence.
fn step_to_linear_sequences(seq: &TSequence) -> Result<Vec<TSequence>> {
    let instants = seq.instants();
    if instants.len() == 1 {
        return Ok(vec![TSequence::make(
            instants.to_vec(),
            true,
            true,
            Interpolation::Linear,
            false,
        )?]);
    }

    let n = instants.len();
    let last_equal = datum_eq(instants[n - 2].value(), instants[n - 1].value())?;
    let mut result = Vec::with_capacity(n);
    let mut lower_inc = seq.lower_inc();
    for i in 0..n - 1 {
        let (inst1, inst2) = (&instants[i], &instants[i + 1]);
        let upper_inc = i == n - 2 && seq.upper_inc() && last_equal;
        let piece = vec![inst1.clone(), inst2.with_value(inst1.value().clone())];
        result.push(TSequence::make(
            piece,
            lower_inc,
            upper_inc,
            Interpolation::Linear,
            false,
        )?);
        lower_inc = true;
    }
    if seq.upper_inc() && !last_equal {
        result.push(TSequence::make(
            vec![instants[n - 1].clone()],
            true,
            true,
            Interpolation::Linear,
            false,
        )?);
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Datum;
    use tempora_types::Timestamp;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn step(values: &[(f64, i64)], upper_inc: bool) -> TSequence {
        let instants = values.iter().map(|&(v, s)| TInstant::new(v, t(s))).collect();
        TSequence::new(instants, true, upper_inc, Interpolation::Step, false).unwrap()
    }

    #[test]
    fn test_to_instant() {
        let seq = Temporal::from(step(&[(1.0, 0)], true));
        assert_eq!(seq.to_instant().unwrap().timestamp(), t(0));
        let longer = Temporal::from(step(&[(1.0, 0), (2.0, 3)], true));
        assert!(longer.to_instant().is_err());
    }

    #[test]
    fn test_step_to_linear_pieces() {
        let seq = Temporal::from(step(&[(1.0, 0), (2.0, 5), (3.0, 10)], true));
        let Temporal::SequenceSet(ss) = seq.step_to_linear().unwrap() else {
            panic!("expected a sequence set");
        };
        assert_eq!(ss.num_sequences(), 3);
        let first = ss.start_sequence();
        assert_eq!(first.end_instant().value(), &Datum::Float(1.0));
        assert!(!first.upper_inc());
        assert!(ss.end_sequence().is_instantaneous());
        assert_eq!(ss.value_at_timestamp(t(7), true).unwrap(), Some(Datum::Float(2.0)));
        assert_eq!(ss.value_at_timestamp(t(10), true).unwrap(), Some(Datum::Float(3.0)));
    }

    #[test]
    fn test_step_to_linear_equal_tail() {
        let seq = Temporal::from(step(&[(1.0, 0), (1.0, 5)], false));
        let linear = seq.to_sequence(Some(Interpolation::Linear)).unwrap();
        assert_eq!(linear.interpolation(), Interpolation::Linear);
        assert!(!linear.upper_inc());
    }

    #[test]
    fn test_discrete_to_sequence_set() {
        let seq = TSequence::discrete(vec![TInstant::new(1, t(0)), TInstant::new(2, t(5))]).unwrap();
        let ss = Temporal::from(seq).to_sequence_set(None).unwrap();
        assert_eq!(ss.num_sequences(), 2);
        assert_eq!(ss.interpolation(), Interpolation::Step);

        let back = Temporal::from(ss).to_discrete().unwrap();
        assert_eq!(back.num_instants(), 2);
    }

    #[test]
    fn test_linear_int_is_rejected() {
        let inst = Temporal::from(TInstant::new(1, t(0)));
        assert!(inst.to_sequence(Some(Interpolation::Linear)).is_err());
        assert_eq!(inst.to_sequence(None).unwrap().interpolation(), Interpolation::Step);
    }
}
