use super::LiftedFunction;
use super::segments::map_sequence;
use crate::config::config;
use crate::error::Result;
use crate::temporal::{TInstant, TSequence, TSequenceSet, Temporal};

impl LiftedFunction {
    /// Apply a unary operation to every instant of `temp`.
    ///
    /// The result keeps the subtype of `temp`; its interpolation is the
    /// interpolation of `temp` unless the descriptor forces another one.
    pub fn apply(&self, temp: &Temporal) -> Result<Temporal> {
        self.ensure_arity(1)?;
        self.ensure_arg_type(0, temp.base_type())?;
        let result = match temp {
            Temporal::Instant(inst) => {
                TInstant::new(self.call1(inst.value())?, inst.timestamp()).into()
            }
            Temporal::Sequence(seq) => map_sequence(self, seq, |v| self.call1(v))?.into(),
            Temporal::SequenceSet(ss) => {
                let sequences = ss
                    .sequences()
                    .iter()
                    .map(|seq| map_sequence(self, seq, |v| self.call1(v)))
                    .collect::<Result<Vec<TSequence>>>()?;
                TSequenceSet::make(sequences, config().normalize)?.into()
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use crate::base::{Datum, TypeTag};
    use crate::error::TemporaError;
    use crate::lifting::LiftedFunction;
    use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};
    use tempora_types::Timestamp;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn round() -> LiftedFunction {
        LiftedFunction::unary(TypeTag::Int, |v| Ok(Datum::Int(v.as_f64().unwrap_or(0.0).round() as i32)))
    }

    #[test]
    fn test_apply_instant() {
        let inst: Temporal = TInstant::new(2.6, t(1)).into();
        let result = round().apply(&inst).unwrap();
        assert_eq!(result.start_instant().value(), &Datum::Int(3));
        assert_eq!(result.start_timestamp(), t(1));
    }

    #[test]
    fn test_apply_rejects_linear_to_discrete_result() {
        let seq: Temporal = TSequence::new(
            vec![TInstant::new(1.0, t(0)), TInstant::new(2.0, t(1))],
            true,
            true,
            Interpolation::Linear,
            true,
        )
        .unwrap()
        .into();
        let err = round().apply(&seq).unwrap_err();
        assert!(matches!(err, TemporaError::InvalidInterpolation(_)));

        let step = round().with_result_interpolation(Interpolation::Step);
        let result = step.apply(&seq).unwrap();
        assert_eq!(result.interpolation(), Some(Interpolation::Step));
    }

    #[test]
    fn test_apply_sequence_set_per_member() {
        let make = |a: f64, b: f64, s: i64| {
            TSequence::new(
                vec![TInstant::new(a, t(s)), TInstant::new(b, t(s + 1))],
                true,
                true,
                Interpolation::Step,
                true,
            )
            .unwrap()
        };
        let ss: Temporal = TSequenceSet::new(vec![make(1.2, 1.4, 0), make(5.0, 5.6, 3)], true)
            .unwrap()
            .into();
        let result = round().apply(&ss).unwrap();
        assert_eq!(result.num_sequences().unwrap(), 2);
        let values: Vec<_> = result.instants().iter().map(|i| i.value().clone()).collect();
        assert_eq!(values, vec![Datum::Int(1), Datum::Int(1), Datum::Int(5), Datum::Int(6)]);
    }

    #[test]
    fn test_apply_binary_function_is_rejected() {
        let add = LiftedFunction::binary(TypeTag::Float, |a, _| Ok(a.clone()));
        let inst: Temporal = TInstant::new(1.0, t(0)).into();
        assert!(matches!(add.apply(&inst), Err(TemporaError::InvalidArgument(_))));
    }
}
