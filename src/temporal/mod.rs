//! Temporal values: instants, sequences and sequence sets.

pub mod convert;
pub mod instant;
pub mod sequence;
pub mod sequenceset;

pub use instant::TInstant;
pub use sequence::TSequence;
pub use sequenceset::TSequenceSet;

use crate::base::{Datum, TypeTag, lookup};
use crate::boxes::BoundingBox;
use crate::error::{Result, TemporaError};
use crate::period::Period;
use crate::validation::ensure_positive;
use serde::{Deserialize, Serialize};
use std::fmt;
use tempora_types::Timestamp;

/// How values are inferred between consecutive instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interpolation {
    /// Values exist only at the instants.
    Discrete = 1,
    /// A value holds until the next instant.
    Step = 2,
    Linear = 3,
}

impl Interpolation {
    pub fn is_continuous(&self) -> bool {
        *self != Interpolation::Discrete
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Interpolation::Discrete => write!(f, "discrete"),
            Interpolation::Step => write!(f, "step"),
            Interpolation::Linear => write!(f, "linear"),
        }
    }
}

/// Structural variant of a temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Subtype {
    Instant = 1,
    Sequence = 2,
    SequenceSet = 3,
}

/// Flag bits summarizing a temporal value.
pub mod flags {
    pub const BYVAL: u16 = 0x0001;
    pub const CONTINUOUS: u16 = 0x0002;
    /// Two bits holding the interpolation ordinal, zero for instants
    pub const INTERP: u16 = 0x000C;
    pub const X: u16 = 0x0010;
    pub const Z: u16 = 0x0020;
    pub const T: u16 = 0x0040;
    pub const GEODETIC: u16 = 0x0080;
}

/// A value that changes over time.
#[derive(Debug, Clone)]
pub enum Temporal {
    Instant(TInstant),
    Sequence(TSequence),
    SequenceSet(TSequenceSet),
}

impl Temporal {
    pub fn subtype(&self) -> Subtype {
        match self {
            Temporal::Instant(_) => Subtype::Instant,
            Temporal::Sequence(_) => Subtype::Sequence,
            Temporal::SequenceSet(_) => Subtype::SequenceSet,
        }
    }

    pub fn base_type(&self) -> TypeTag {
        match self {
            Temporal::Instant(inst) => inst.base_type(),
            Temporal::Sequence(seq) => seq.base_type(),
            Temporal::SequenceSet(ss) => ss.base_type(),
        }
    }

    /// Interpolation of a sequence or sequence set; `None` for instants.
    pub fn interpolation(&self) -> Option<Interpolation> {
        match self {
            Temporal::Instant(_) => None,
            Temporal::Sequence(seq) => Some(seq.interpolation()),
            Temporal::SequenceSet(ss) => Some(ss.interpolation()),
        }
    }

    /// Whether values between instants are defined.
    pub fn is_continuous(&self) -> bool {
        self.interpolation().is_some_and(|i| i.is_continuous())
    }

    pub fn num_instants(&self) -> usize {
        match self {
            Temporal::Instant(_) => 1,
            Temporal::Sequence(seq) => seq.num_instants(),
            Temporal::SequenceSet(ss) => ss.num_instants(),
        }
    }

    /// The n-th instant, counting from 1 over all members.
    pub fn instant_n(&self, n: usize) -> Option<&TInstant> {
        match self {
            Temporal::Instant(inst) => (n == 1).then_some(inst),
            Temporal::Sequence(seq) => seq.instant_n(n),
            Temporal::SequenceSet(ss) => ss.instant_n(n),
        }
    }

    pub fn instants(&self) -> Vec<&TInstant> {
        match self {
            Temporal::Instant(inst) => vec![inst],
            Temporal::Sequence(seq) => seq.instants().iter().collect(),
            Temporal::SequenceSet(ss) => ss.instants().collect(),
        }
    }

    /// Number of continuous sequences.
    pub fn num_sequences(&self) -> Result<usize> {
        match self {
            Temporal::Sequence(seq) if seq.interpolation().is_continuous() => Ok(1),
            Temporal::SequenceSet(ss) => Ok(ss.num_sequences()),
            _ => Err(not_continuous()),
        }
    }

    /// The n-th continuous sequence, counting from 1.
    pub fn sequence_n(&self, n: usize) -> Result<Option<&TSequence>> {
        match self {
            Temporal::Sequence(seq) if seq.interpolation().is_continuous() => {
                Ok((n == 1).then_some(seq))
            }
            Temporal::SequenceSet(ss) => Ok(ss.sequence_n(n)),
            _ => Err(not_continuous()),
        }
    }

    pub fn start_instant(&self) -> &TInstant {
        match self {
            Temporal::Instant(inst) => inst,
            Temporal::Sequence(seq) => seq.start_instant(),
            Temporal::SequenceSet(ss) => ss.start_sequence().start_instant(),
        }
    }

    pub fn end_instant(&self) -> &TInstant {
        match self {
            Temporal::Instant(inst) => inst,
            Temporal::Sequence(seq) => seq.end_instant(),
            Temporal::SequenceSet(ss) => ss.end_sequence().end_instant(),
        }
    }

    pub fn start_timestamp(&self) -> Timestamp {
        self.start_instant().timestamp()
    }

    pub fn end_timestamp(&self) -> Timestamp {
        self.end_instant().timestamp()
    }

    /// Distinct timestamps in increasing order.
    pub fn timestamps(&self) -> Vec<Timestamp> {
        match self {
            Temporal::Instant(inst) => vec![inst.timestamp()],
            Temporal::Sequence(seq) => seq.timestamps(),
            Temporal::SequenceSet(ss) => ss.timestamps(),
        }
    }

    /// Bounding period of the whole value.
    pub fn period(&self) -> Period {
        match self {
            Temporal::Instant(inst) => Period::instant(inst.timestamp()),
            Temporal::Sequence(seq) => *seq.period(),
            Temporal::SequenceSet(ss) => *ss.period(),
        }
    }

    /// Cached box of sequences and sequence sets, computed for instants.
    pub fn bbox(&self) -> Result<BoundingBox> {
        match self {
            Temporal::Instant(inst) => BoundingBox::of_instant(inst),
            Temporal::Sequence(seq) => Ok(*seq.bbox()),
            Temporal::SequenceSet(ss) => Ok(*ss.bbox()),
        }
    }

    pub fn srid(&self) -> Option<i32> {
        self.start_instant().value().srid()
    }

    pub fn has_z(&self) -> bool {
        self.start_instant().value().has_z()
    }

    pub fn is_geodetic(&self) -> bool {
        self.start_instant()
            .value()
            .spatial_point()
            .is_some_and(|p| p.geodetic)
    }

    /// Flag bits, see [`flags`].
    pub fn flags(&self) -> u16 {
        let mut result = flags::T;
        if let Ok(base_type) = lookup(self.base_type()) {
            if base_type.by_value() {
                result |= flags::BYVAL;
            }
            if base_type.continuous() {
                result |= flags::CONTINUOUS;
            }
        }
        if let Some(interp) = self.interpolation() {
            result |= (interp as u16) << 2;
        }
        let dims = self.base_type().is_numeric() || self.base_type().is_spatial();
        if dims {
            result |= flags::X;
        }
        if self.has_z() {
            result |= flags::Z;
        }
        if self.is_geodetic() {
            result |= flags::GEODETIC;
        }
        result
    }

    /// Estimated size in bytes of the value as one contiguous record.
    pub fn memory_size(&self) -> usize {
        match self {
            Temporal::Instant(inst) => instant_size(inst),
            Temporal::Sequence(seq) => sequence_size(seq),
            Temporal::SequenceSet(ss) => {
                16 + ss.bbox().byte_size()
                    + 8 * ss.num_sequences()
                    + ss.sequences().iter().map(sequence_size).sum::<usize>()
            }
        }
    }

    /// Value at `t`, or `None` when the value is not defined there.
    ///
    /// With `strict` unset, exclusive bounds yield the value of the boundary instant.
    pub fn value_at_timestamp(&self, t: Timestamp, strict: bool) -> Result<Option<Datum>> {
        match self {
            Temporal::Instant(inst) => Ok((inst.timestamp() == t).then(|| inst.value().clone())),
            Temporal::Sequence(seq) => seq.value_at_timestamp(t, strict),
            Temporal::SequenceSet(ss) => ss.value_at_timestamp(t, strict),
        }
    }

    /// Restriction to the instant at `t`.
    pub fn at_timestamp(&self, t: Timestamp) -> Result<Option<TInstant>> {
        match self {
            Temporal::Instant(inst) => Ok((inst.timestamp() == t).then(|| inst.clone())),
            Temporal::Sequence(seq) => seq.at_timestamp(t),
            Temporal::SequenceSet(ss) => ss.at_timestamp(t),
        }
    }

    /// Truncate to the last `n` instants of a sequence or the last `n`
    /// members of a sequence set.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempora::temporal::{Interpolation, TInstant, TSequence, Temporal};
    /// use tempora_types::Timestamp;
    ///
    /// let t = Timestamp::from_secs;
    /// let seq = TSequence::discrete(vec![
    ///     TInstant::new(1, t(0)),
    ///     TInstant::new(2, t(1)),
    ///     TInstant::new(3, t(2)),
    /// ])
    /// .unwrap();
    /// let mut temp = Temporal::from(seq);
    /// temp.restart(2).unwrap();
    /// assert_eq!(temp.timestamps(), vec![t(1), t(2)]);
    /// assert!(temp.restart(0).is_err());
    /// ```
    pub fn restart(&mut self, n: usize) -> Result<()> {
        ensure_positive(n, "number of elements to keep")?;
        match self {
            Temporal::Instant(_) => Err(TemporaError::InvalidArgument(
                "Cannot restart a temporal instant".to_string(),
            )),
            Temporal::Sequence(seq) => seq.restart(n),
            Temporal::SequenceSet(ss) => ss.restart(n),
        }
    }
}

fn not_continuous() -> TemporaError {
    TemporaError::InvalidArgument(
        "The temporal value must have continuous interpolation".to_string(),
    )
}

fn instant_size(inst: &TInstant) -> usize {
    let value = inst.value();
    let value_size = lookup(value.type_tag()).map_or(0, |t| t.byte_size(value));
    16 + value_size.div_ceil(8) * 8
}

fn sequence_size(seq: &TSequence) -> usize {
    16 + seq.bbox().byte_size()
        + 8 * seq.num_instants()
        + seq.instants().iter().map(instant_size).sum::<usize>()
}

impl From<TInstant> for Temporal {
    fn from(inst: TInstant) -> Self {
        Temporal::Instant(inst)
    }
}

impl From<TSequence> for Temporal {
    fn from(seq: TSequence) -> Self {
        Temporal::Sequence(seq)
    }
}

impl From<TSequenceSet> for Temporal {
    fn from(ss: TSequenceSet) -> Self {
        Temporal::SequenceSet(ss)
    }
}

fn write_instant(f: &mut fmt::Formatter<'_>, inst: &TInstant) -> fmt::Result {
    let value = inst.value();
    match lookup(value.type_tag()) {
        Ok(base_type) => write!(f, "{}@{}", base_type.output(value), inst.timestamp()),
        Err(_) => write!(f, "{:?}@{}", value, inst.timestamp()),
    }
}

// Step is the default of non-continuous types and is only spelled out for
// continuous ones
fn shows_step(interp: Interpolation, tag: TypeTag) -> bool {
    interp == Interpolation::Step && lookup(tag).is_ok_and(|base_type| base_type.continuous())
}

fn write_sequence(f: &mut fmt::Formatter<'_>, seq: &TSequence, with_interp: bool) -> fmt::Result {
    if with_interp && shows_step(seq.interpolation(), seq.base_type()) {
        write!(f, "Interp=Step;")?;
    }
    let (open, close) = match seq.interpolation() {
        Interpolation::Discrete => ('{', '}'),
        _ => (
            if seq.lower_inc() { '[' } else { '(' },
            if seq.upper_inc() { ']' } else { ')' },
        ),
    };
    write!(f, "{}", open)?;
    for (i, inst) in seq.instants().iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write_instant(f, inst)?;
    }
    write!(f, "{}", close)
}

impl fmt::Display for Temporal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Temporal::Instant(inst) => write_instant(f, inst),
            Temporal::Sequence(seq) => write_sequence(f, seq, true),
            Temporal::SequenceSet(ss) => {
                if shows_step(ss.interpolation(), ss.base_type()) {
                    write!(f, "Interp=Step;")?;
                }
                write!(f, "{{")?;
                for (i, seq) in ss.sequences().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_sequence(f, seq, false)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn linear(values: &[(f64, i64)]) -> TSequence {
        let instants = values.iter().map(|&(v, s)| TInstant::new(v, t(s))).collect();
        TSequence::new(instants, true, true, Interpolation::Linear, false).unwrap()
    }

    #[test]
    fn test_step_prefix_for_continuous_types() {
        let step = |instants: Vec<TInstant>| -> Temporal {
            TSequence::new(instants, true, true, Interpolation::Step, false).unwrap().into()
        };
        let floats = step(vec![TInstant::new(1.0, t(0)), TInstant::new(2.0, t(1))]);
        let points = step(vec![
            TInstant::new(tempora_types::SpatialPoint::new(0.0, 0.0), t(0)),
            TInstant::new(tempora_types::SpatialPoint::new(1.0, 1.0), t(1)),
        ]);
        let ints = step(vec![TInstant::new(1, t(0)), TInstant::new(2, t(1))]);

        assert!(floats.to_string().starts_with("Interp=Step;["));
        assert!(points.to_string().starts_with("Interp=Step;["));
        assert!(ints.to_string().starts_with('['));
        assert!(!Temporal::from(linear(&[(1.0, 0), (2.0, 1)])).to_string().contains("Interp"));
    }

    #[test]
    fn test_interpolation_order() {
        assert!(Interpolation::Discrete < Interpolation::Step);
        assert!(Interpolation::Step < Interpolation::Linear);
        assert!(Subtype::Instant < Subtype::SequenceSet);
    }

    #[test]
    fn test_flags() {
        let inst = Temporal::from(TInstant::new(1.0, t(0)));
        let seq = Temporal::from(linear(&[(1.0, 0), (2.0, 1)]));
        assert_eq!(inst.flags() & flags::INTERP, 0);
        assert_eq!((seq.flags() & flags::INTERP) >> 2, Interpolation::Linear as u16);
        assert_ne!(seq.flags() & flags::CONTINUOUS, 0);
        assert_ne!(seq.flags() & flags::BYVAL, 0);
        assert_ne!(seq.flags() & flags::X, 0);
    }

    #[test]
    fn test_accessors_across_subtypes() {
        let a = linear(&[(1.0, 0), (2.0, 5)]);
        let b = linear(&[(4.0, 10), (3.0, 15)]);
        let set = Temporal::from(TSequenceSet::new(vec![a, b], true).unwrap());
        assert_eq!(set.num_instants(), 4);
        assert_eq!(set.num_sequences().unwrap(), 2);
        assert_eq!(set.start_timestamp(), t(0));
        assert_eq!(set.end_timestamp(), t(15));
        assert_eq!(set.sequence_n(2).unwrap().map(|s| s.num_instants()), Some(2));
        assert_eq!(set.value_at_timestamp(t(7), true).unwrap(), None);
        assert_eq!(set.to_string(), format!("{{[1@{}, 2@{}], [4@{}, 3@{}]}}", t(0), t(5), t(10), t(15)));

        let inst = Temporal::from(TInstant::new(1.0, t(3)));
        assert!(inst.num_sequences().is_err());
        assert_eq!(inst.instant_n(1).map(|i| i.timestamp()), Some(t(3)));
    }

    #[test]
    fn test_memory_size_grows_with_instants() {
        let small = Temporal::from(linear(&[(1.0, 0), (2.0, 5)]));
        let large = Temporal::from(linear(&[(1.0, 0), (2.0, 5), (1.0, 8)]));
        assert!(small.memory_size() < large.memory_size());
    }

    #[test]
    fn test_restart_instant_fails() {
        let mut inst = Temporal::from(TInstant::new(1.0, t(3)));
        let err = inst.restart(1).unwrap_err();
        assert!(matches!(err, TemporaError::InvalidArgument(_)));
    }
}
