use super::{Interpolation, TInstant, TSequence};
use crate::base::{Datum, TypeTag, lookup};
use crate::boxes::BoundingBox;
use crate::config::config;
use crate::error::{Result, TemporaError};
use crate::period::Period;
use crate::validation::{ensure_max_instants, ensure_not_empty, ensure_same_base_type, ensure_same_frame};
use tempora_types::Timestamp;

/// Time-ordered, non-overlapping continuous sequences separated by gaps.
#[derive(Debug, Clone)]
pub struct TSequenceSet {
    sequences: Vec<TSequence>,
    total_count: usize,
    bbox: BoundingBox,
}

impl TSequenceSet {
    /// Build a sequence set from validated member sequences.
    ///
    /// With `normalize` set, adjacent members that continue each other are
    /// joined into one.
    pub fn new(sequences: Vec<TSequence>, normalize: bool) -> Result<Self> {
        Self::validate(&sequences)?;
        Self::make(sequences, normalize)
    }

    /// Like [`TSequenceSet::new`], normalizing as configured.
    pub fn with_defaults(sequences: Vec<TSequence>) -> Result<Self> {
        Self::new(sequences, config().normalize)
    }

    fn validate(sequences: &[TSequence]) -> Result<()> {
        ensure_not_empty(sequences, "sequences")?;
        ensure_max_instants(sequences.iter().map(TSequence::num_instants).sum())?;
        if sequences[0].interpolation() == Interpolation::Discrete {
            return Err(TemporaError::InvalidInterpolation(
                "The members of a sequence set cannot have discrete interpolation".to_string(),
            ));
        }

        for pair in sequences.windows(2) {
            let (seq1, seq2) = (&pair[0], &pair[1]);
            if seq1.interpolation() != seq2.interpolation() {
                return Err(TemporaError::InvalidInterpolation(format!(
                    "All members of a sequence set must have the same interpolation: {} and {}",
                    seq1.interpolation(),
                    seq2.interpolation()
                )));
            }
            let (v1, v2) = (seq1.end_instant().value(), seq2.start_instant().value());
            ensure_same_base_type(v1, v2)?;
            ensure_same_frame(v1, v2)?;

            let (p1, p2) = (seq1.period(), seq2.period());
            if p1.upper() > p2.lower()
                || (p1.upper() == p2.lower() && p1.upper_inc() && p2.lower_inc())
            {
                return Err(TemporaError::InvalidArgument(format!(
                    "The temporal sequences must be increasing: {} and {}",
                    p1.upper(),
                    p2.lower()
                )));
            }
        }
        Ok(())
    }

    /// Build without validating; callers guarantee the invariants.
    pub(crate) fn make(sequences: Vec<TSequence>, normalize: bool) -> Result<Self> {
        ensure_not_empty(&sequences, "sequences")?;
        let sequences = if normalize && sequences.len() > 1 {
            normalize_sequences(sequences)?
        } else {
            sequences
        };

        let total_count = sequences.iter().map(TSequence::num_instants).sum();
        let mut bbox = *sequences[0].bbox();
        for seq in &sequences[1..] {
            bbox.expand(seq.bbox());
        }
        Ok(Self {
            sequences,
            total_count,
            bbox,
        })
    }

    pub fn sequences(&self) -> &[TSequence] {
        &self.sequences
    }

    pub fn into_sequences(self) -> Vec<TSequence> {
        self.sequences
    }

    pub fn num_sequences(&self) -> usize {
        self.sequences.len()
    }

    /// The n-th member, counting from 1.
    pub fn sequence_n(&self, n: usize) -> Option<&TSequence> {
        n.checked_sub(1).and_then(|i| self.sequences.get(i))
    }

    /// Sum of the member instant counts.
    ///
    /// An instant shared by the bounds of two members counts once per member.
    pub fn num_instants(&self) -> usize {
        self.total_count
    }

    /// The n-th instant over all members, counting from 1.
    pub fn instant_n(&self, n: usize) -> Option<&TInstant> {
        let mut remaining = n.checked_sub(1)?;
        for seq in &self.sequences {
            if remaining < seq.num_instants() {
                return seq.instants().get(remaining);
            }
            remaining -= seq.num_instants();
        }
        None
    }

    pub fn instants(&self) -> impl Iterator<Item = &TInstant> {
        self.sequences.iter().flat_map(|seq| seq.instants().iter())
    }

    pub fn start_sequence(&self) -> &TSequence {
        &self.sequences[0]
    }

    pub fn end_sequence(&self) -> &TSequence {
        &self.sequences[self.sequences.len() - 1]
    }

    pub fn interpolation(&self) -> Interpolation {
        self.start_sequence().interpolation()
    }

    pub fn period(&self) -> &Period {
        self.bbox.period()
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn base_type(&self) -> TypeTag {
        self.start_sequence().base_type()
    }

    /// Distinct timestamps in increasing order.
    pub fn timestamps(&self) -> Vec<Timestamp> {
        let mut result: Vec<Timestamp> = self.instants().map(TInstant::timestamp).collect();
        result.dedup();
        result
    }

    /// Locate `t` among the members.
    ///
    /// Returns `(true, i)` when member `i` contains `t`, otherwise `(false, i)`
    /// where `i` is the first member lying after `t`.
    pub fn find_timestamp(&self, t: Timestamp) -> (bool, usize) {
        let loc = self.sequences.partition_point(|seq| {
            let p = seq.period();
            p.upper() < t || (p.upper() == t && !p.upper_inc())
        });
        let found = self
            .sequences
            .get(loc)
            .is_some_and(|seq| seq.period().contains(t));
        (found, loc)
    }

    /// Value at `t`, or `None` in a gap or outside the set.
    ///
    /// Without `strict`, exclusive member bounds still yield the value of the
    /// boundary instant.
    pub fn value_at_timestamp(&self, t: Timestamp, strict: bool) -> Result<Option<Datum>> {
        let (found, loc) = self.find_timestamp(t);
        if found {
            return self.sequences[loc].value_at_timestamp(t, strict);
        }
        if strict {
            return Ok(None);
        }
        if let Some(before) = loc.checked_sub(1).and_then(|i| self.sequences.get(i))
            && before.period().upper() == t
        {
            return Ok(Some(before.end_instant().value().clone()));
        }
        if let Some(after) = self.sequences.get(loc)
            && after.period().lower() == t
        {
            return Ok(Some(after.start_instant().value().clone()));
        }
        Ok(None)
    }

    pub fn at_timestamp(&self, t: Timestamp) -> Result<Option<TInstant>> {
        Ok(self
            .value_at_timestamp(t, true)?
            .map(|value| TInstant::new(value, t)))
    }

    /// Keep the last `n` members.
    pub(crate) fn restart(&mut self, n: usize) -> Result<()> {
        if n >= self.sequences.len() {
            return Ok(());
        }
        let kept = self.sequences.split_off(self.sequences.len() - n);
        *self = Self::make(kept, false)?;
        Ok(())
    }
}

/// How two adjacent members are joined: drop the last instant of the
/// first, drop the first instant of the second.
type Join = (bool, bool);

fn join_kind(seq1: &TSequence, seq2: &TSequence) -> Result<Option<Join>> {
    let (p1, p2) = (seq1.period(), seq2.period());
    let adjacent = p1.upper() == p2.lower() && (p1.upper_inc() || p2.lower_inc());
    if !adjacent {
        return Ok(None);
    }

    let base_type = lookup(seq1.base_type())?;
    let step = seq1.interpolation() == Interpolation::Step;
    let last1 = seq1.end_instant();
    let first1 = seq2.start_instant();
    let last1_eq_first1 = base_type.eq(last1.value(), first1.value());

    if seq1.num_instants() > 1 && seq2.num_instants() > 1 {
        let last2 = &seq1.instants()[seq1.num_instants() - 2];
        let first2 = &seq2.instants()[1];
        let last2_eq_last1 = base_type.eq(last2.value(), last1.value());
        let both_ends_flat = last2_eq_last1
            && last1_eq_first1
            && base_type.eq(first1.value(), first2.value());

        let continues = if step {
            last2_eq_last1 && last1_eq_first1
        } else {
            let ratio = (first1.timestamp() - last2.timestamp()) as f64
                / (first2.timestamp() - last2.timestamp()) as f64;
            both_ends_flat
                || (last1_eq_first1
                    && base_type.collinear(
                        last2.value(),
                        first1.value(),
                        first2.value(),
                        ratio,
                        config().epsilon,
                    ))
        };
        if continues {
            return Ok(Some((true, true)));
        }
    }

    if step && !p1.upper_inc() {
        return Ok(Some((true, false)));
    }
    if last1_eq_first1 {
        return Ok(Some((false, true)));
    }
    Ok(None)
}

fn join(seq1: TSequence, seq2: TSequence, (remove_last, remove_first): Join) -> Result<TSequence> {
    let lower_inc = seq1.lower_inc();
    let upper_inc = seq2.upper_inc();
    let interp = seq1.interpolation();

    let mut instants = seq1.into_instants();
    if remove_last {
        instants.pop();
    }
    instants.extend(seq2.into_instants().into_iter().skip(usize::from(remove_first)));
    TSequence::make(instants, lower_inc, upper_inc, interp, false)
}

fn normalize_sequences(sequences: Vec<TSequence>) -> Result<Vec<TSequence>> {
    let mut result = Vec::with_capacity(sequences.len());
    let mut iter = sequences.into_iter();
    let Some(mut current) = iter.next() else {
        return Ok(result);
    };
    for next in iter {
        match join_kind(&current, &next)? {
            Some(kind) => current = join(current, next, kind)?,
            None => result.push(std::mem::replace(&mut current, next)),
        }
    }
    result.push(current);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn seq(values: &[(f64, i64)], lower_inc: bool, upper_inc: bool, interp: Interpolation) -> TSequence {
        let instants = values.iter().map(|&(v, s)| TInstant::new(v, t(s))).collect();
        TSequence::new(instants, lower_inc, upper_inc, interp, true).unwrap()
    }

    #[test]
    fn test_rejects_overlapping_members() {
        let a = seq(&[(1.0, 0), (2.0, 5)], true, true, Interpolation::Linear);
        let b = seq(&[(2.0, 5), (3.0, 9)], true, true, Interpolation::Linear);
        assert!(TSequenceSet::new(vec![a, b], true).is_err());
    }

    #[test]
    fn test_rejects_discrete_members() {
        let a = TSequence::discrete(vec![TInstant::new(1.0, t(0))]).unwrap();
        let err = TSequenceSet::new(vec![a], true).unwrap_err();
        assert!(matches!(err, TemporaError::InvalidInterpolation(_)));
    }

    #[test]
    fn test_normalization_joins_collinear_members() {
        let a = seq(&[(1.0, 0), (2.0, 5)], true, false, Interpolation::Linear);
        let b = seq(&[(2.0, 5), (3.0, 10)], true, true, Interpolation::Linear);
        let set = TSequenceSet::new(vec![a, b], true).unwrap();
        assert_eq!(set.num_sequences(), 1);
        assert_eq!(set.timestamps(), vec![t(0), t(10)]);
    }

    #[test]
    fn test_normalization_joins_step_members() {
        let a = seq(&[(1.0, 0), (1.0, 5)], true, false, Interpolation::Step);
        let b = seq(&[(4.0, 5), (4.0, 10)], true, true, Interpolation::Step);
        let set = TSequenceSet::new(vec![a, b], true).unwrap();
        assert_eq!(set.num_sequences(), 1);
        let joined = set.start_sequence();
        assert_eq!(joined.timestamps(), vec![t(0), t(5), t(10)]);
        assert_eq!(joined.instants()[1].value(), &Datum::Float(4.0));
    }

    #[test]
    fn test_gap_keeps_members() {
        let a = seq(&[(1.0, 0), (2.0, 5)], true, true, Interpolation::Linear);
        let b = seq(&[(2.0, 7), (3.0, 10)], true, true, Interpolation::Linear);
        let set = TSequenceSet::new(vec![a, b], true).unwrap();
        assert_eq!(set.num_sequences(), 2);
        assert_eq!(set.num_instants(), 4);
        assert_eq!(set.instant_n(3).map(|i| i.timestamp()), Some(t(7)));
        assert_eq!(set.period().lower(), t(0));
        assert_eq!(set.period().upper(), t(10));
    }

    #[test]
    fn test_find_timestamp() {
        let a = seq(&[(1.0, 0), (2.0, 5)], true, false, Interpolation::Linear);
        let b = seq(&[(2.0, 7), (3.0, 10)], false, true, Interpolation::Linear);
        let set = TSequenceSet::new(vec![a, b], true).unwrap();
        assert_eq!(set.find_timestamp(t(2)), (true, 0));
        assert_eq!(set.find_timestamp(t(5)), (false, 1));
        assert_eq!(set.find_timestamp(t(6)), (false, 1));
        assert_eq!(set.find_timestamp(t(7)), (false, 1));
        assert_eq!(set.find_timestamp(t(8)), (true, 1));
        assert_eq!(set.find_timestamp(t(11)), (false, 2));

        assert_eq!(set.value_at_timestamp(t(5), true).unwrap(), None);
        assert_eq!(set.value_at_timestamp(t(5), false).unwrap(), Some(Datum::Float(2.0)));
        assert_eq!(set.value_at_timestamp(t(7), false).unwrap(), Some(Datum::Float(2.0)));
    }

    #[test]
    fn test_restart_keeps_last_members() {
        let a = seq(&[(1.0, 0), (2.0, 5)], true, true, Interpolation::Linear);
        let b = seq(&[(2.0, 7), (3.0, 10)], true, true, Interpolation::Linear);
        let mut set = TSequenceSet::new(vec![a, b], true).unwrap();
        set.restart(1).unwrap();
        assert_eq!(set.num_sequences(), 1);
        assert_eq!(set.num_instants(), 2);
        assert_eq!(set.period().lower(), t(7));
    }
}
