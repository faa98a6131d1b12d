//! Equality, total order and hashing of temporal values.
//!
//! Equality looks through the representation: an instant equals a sequence
//! of that single instant and a sequence set holding only that sequence,
//! whatever their interpolation. A discrete sequence equals a set of
//! singleton members carrying the same instants.
//!
//! [`temporal_cmp`] is the index order. It falls back to hashes, sizes and
//! flags when the subtypes differ, so two equal values of different
//! subtypes do not compare `Equal` under it, and [`temporal_hash`] may
//! tell them apart. The `Ord` and `Hash` impls of [`Temporal`] work on the
//! representation-free view instead and agree with `==`.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashSet;
//! use tempora::ordering::{temporal_cmp, temporal_eq};
//! use tempora::temporal::{Interpolation, TInstant, TSequence, Temporal};
//! use tempora_types::Timestamp;
//!
//! let inst = TInstant::new(1.5, Timestamp::from_secs(3));
//! let seq = TSequence::from_instant(inst.clone(), Interpolation::Linear).unwrap();
//! let (inst, seq) = (Temporal::from(inst), Temporal::from(seq));
//! assert!(temporal_eq(&inst, &seq));
//! assert!(temporal_cmp(&inst, &seq).is_ne());
//! assert_eq!(inst.cmp(&seq), std::cmp::Ordering::Equal);
//! assert_eq!(HashSet::from([inst, seq]).len(), 1);
//!
//! let a: Temporal = TInstant::new(1.0, Timestamp::from_secs(1)).into();
//! let b: Temporal = TInstant::new(1.0, Timestamp::from_secs(2)).into();
//! assert!(temporal_cmp(&a, &b).is_lt());
//! ```

use crate::base::registry::{hash_i64, hash_u32, seeded_hash};
use crate::base::{TypeTag, lookup};
use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

const SEQ_LOWER_INC: u32 = 0x01;
const SEQ_UPPER_INC: u32 = 0x02;

fn base_eq(tag: TypeTag, a: &TInstant, b: &TInstant) -> bool {
    lookup(tag).map(|bt| bt.eq(a.value(), b.value())).unwrap_or(false)
}

fn instant_eq(a: &TInstant, b: &TInstant) -> bool {
    a.timestamp() == b.timestamp()
        && a.base_type() == b.base_type()
        && base_eq(a.base_type(), a, b)
}

fn sequence_eq(a: &TSequence, b: &TSequence) -> bool {
    a.num_instants() == b.num_instants()
        && a.interpolation() == b.interpolation()
        && a.period() == b.period()
        && a.bbox() == b.bbox()
        && a.instants().iter().zip(b.instants()).all(|(x, y)| instant_eq(x, y))
}

fn single_instant(seq: &TSequence) -> Option<&TInstant> {
    (seq.num_instants() == 1).then(|| seq.start_instant())
}

/// A temporal value stripped of the choices that do not change the
/// function of time it denotes.
///
/// Values defined at isolated instants only (instants, discrete sequences,
/// single-instant sequences, sets of single-instant members) become their
/// instants. Everything else becomes its continuous pieces.
enum Canonical<'a> {
    Instants(Vec<&'a TInstant>),
    Pieces(Vec<&'a TSequence>),
}

fn canonical(temp: &Temporal) -> Canonical<'_> {
    match temp {
        Temporal::Instant(inst) => Canonical::Instants(vec![inst]),
        Temporal::Sequence(seq)
            if seq.interpolation() == Interpolation::Discrete || seq.num_instants() == 1 =>
        {
            Canonical::Instants(seq.instants().iter().collect())
        }
        Temporal::Sequence(seq) => Canonical::Pieces(vec![seq]),
        Temporal::SequenceSet(ss) if ss.sequences().iter().all(|m| m.num_instants() == 1) => {
            Canonical::Instants(ss.sequences().iter().map(|m| m.start_instant()).collect())
        }
        Temporal::SequenceSet(ss) => Canonical::Pieces(ss.sequences().iter().collect()),
    }
}

// Single-instant pieces carry no meaningful interpolation
fn piece_eq(a: &TSequence, b: &TSequence) -> bool {
    match (single_instant(a), single_instant(b)) {
        (Some(x), Some(y)) => instant_eq(x, y),
        (None, None) => sequence_eq(a, b),
        _ => false,
    }
}

fn piece_cmp(a: &TSequence, b: &TSequence) -> Ordering {
    match (single_instant(a), single_instant(b)) {
        (Some(x), Some(y)) => instant_cmp(x, y),
        _ => sequence_cmp(a, b),
    }
}

fn piece_hash(seq: &TSequence) -> u32 {
    single_instant(seq).map_or_else(|| sequence_hash(seq), instant_hash)
}

fn pairwise_eq<T>(a: &[T], b: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| eq(x, y))
}

fn lexicographic<T>(a: &[T], b: &[T], cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let order = cmp(x, y);
        if order != Ordering::Equal {
            return order;
        }
    }
    a.len().cmp(&b.len())
}

fn canonical_eq(a: &Canonical<'_>, b: &Canonical<'_>) -> bool {
    match (a, b) {
        (Canonical::Instants(x), Canonical::Instants(y)) => {
            pairwise_eq(x, y, |p, q| instant_eq(p, q))
        }
        (Canonical::Pieces(x), Canonical::Pieces(y)) => pairwise_eq(x, y, |p, q| piece_eq(p, q)),
        _ => false,
    }
}

fn canonical_cmp(a: &Canonical<'_>, b: &Canonical<'_>) -> Ordering {
    match (a, b) {
        (Canonical::Instants(x), Canonical::Instants(y)) => {
            lexicographic(x, y, |p, q| instant_cmp(p, q))
        }
        (Canonical::Pieces(x), Canonical::Pieces(y)) => {
            lexicographic(x, y, |p, q| piece_cmp(p, q))
        }
        (Canonical::Instants(_), Canonical::Pieces(_)) => Ordering::Less,
        (Canonical::Pieces(_), Canonical::Instants(_)) => Ordering::Greater,
    }
}

/// Whether two temporal values denote the same function of time.
pub fn temporal_eq(temp1: &Temporal, temp2: &Temporal) -> bool {
    temp1.base_type() == temp2.base_type() && canonical_eq(&canonical(temp1), &canonical(temp2))
}

pub fn temporal_ne(temp1: &Temporal, temp2: &Temporal) -> bool {
    !temporal_eq(temp1, temp2)
}

fn instant_cmp(a: &TInstant, b: &TInstant) -> Ordering {
    a.timestamp().cmp(&b.timestamp()).then_with(|| {
        lookup(a.base_type())
            .map(|bt| bt.cmp(a.value(), b.value()))
            .unwrap_or(Ordering::Equal)
    })
}

fn sequence_cmp(a: &TSequence, b: &TSequence) -> Ordering {
    for (x, y) in a.instants().iter().zip(b.instants()) {
        let order = instant_cmp(x, y);
        if order != Ordering::Equal {
            return order;
        }
    }
    a.num_instants()
        .cmp(&b.num_instants())
        .then_with(|| a.lower_inc().cmp(&b.lower_inc()).reverse())
        .then_with(|| a.upper_inc().cmp(&b.upper_inc()))
        .then_with(|| a.interpolation().cmp(&b.interpolation()))
}

fn sequence_set_cmp(a: &TSequenceSet, b: &TSequenceSet) -> Ordering {
    for (x, y) in a.sequences().iter().zip(b.sequences()) {
        let order = sequence_cmp(x, y);
        if order != Ordering::Equal {
            return order;
        }
    }
    a.num_sequences()
        .cmp(&b.num_sequences())
        .then_with(|| a.interpolation().cmp(&b.interpolation()))
}

/// Strict total order over temporal values.
///
/// Values of different base types order by their type tag.
pub fn temporal_cmp(temp1: &Temporal, temp2: &Temporal) -> Ordering {
    let by_type = temp1.base_type().cmp(&temp2.base_type());
    if by_type != Ordering::Equal {
        return by_type;
    }
    let by_period = temp1.period().span_cmp(&temp2.period());
    if by_period != Ordering::Equal {
        return by_period;
    }
    if let (Ok(box1), Ok(box2)) = (temp1.bbox(), temp2.bbox()) {
        let by_box = box1.total_cmp(&box2);
        if by_box != Ordering::Equal {
            return by_box;
        }
    }

    let structural = match (temp1, temp2) {
        (Temporal::Instant(a), Temporal::Instant(b)) => Some(instant_cmp(a, b)),
        (Temporal::Sequence(a), Temporal::Sequence(b)) => Some(sequence_cmp(a, b)),
        (Temporal::SequenceSet(a), Temporal::SequenceSet(b)) => Some(sequence_set_cmp(a, b)),
        _ => None,
    };
    if let Some(order) = structural {
        return order;
    }

    temporal_hash(temp1)
        .cmp(&temporal_hash(temp2))
        .then_with(|| temp1.memory_size().cmp(&temp2.memory_size()))
        .then_with(|| temp1.flags().cmp(&temp2.flags()))
        .then_with(|| temp1.subtype().cmp(&temp2.subtype()))
}

pub fn temporal_lt(temp1: &Temporal, temp2: &Temporal) -> bool {
    temporal_cmp(temp1, temp2) == Ordering::Less
}

pub fn temporal_le(temp1: &Temporal, temp2: &Temporal) -> bool {
    temporal_cmp(temp1, temp2) != Ordering::Greater
}

pub fn temporal_gt(temp1: &Temporal, temp2: &Temporal) -> bool {
    temporal_cmp(temp1, temp2) == Ordering::Greater
}

pub fn temporal_ge(temp1: &Temporal, temp2: &Temporal) -> bool {
    temporal_cmp(temp1, temp2) != Ordering::Less
}

fn bound_flags(seq: &TSequence) -> u32 {
    let mut flags = 0;
    if seq.lower_inc() {
        flags |= SEQ_LOWER_INC;
    }
    if seq.upper_inc() {
        flags |= SEQ_UPPER_INC;
    }
    flags
}

fn instant_hash(inst: &TInstant) -> u32 {
    let value_hash = lookup(inst.base_type())
        .map(|bt| bt.hash32(inst.value()))
        .unwrap_or(0);
    value_hash.rotate_left(1) ^ hash_i64(inst.timestamp().micros())
}

fn sequence_hash(seq: &TSequence) -> u32 {
    seq.instants()
        .iter()
        .fold(hash_u32(bound_flags(seq)), |h, inst| {
            h.wrapping_mul(31).wrapping_add(instant_hash(inst))
        })
}

/// 32-bit hash of a temporal value.
///
/// Equal values of the same subtype hash alike; values equal across
/// subtypes may not.
pub fn temporal_hash(temp: &Temporal) -> u32 {
    match temp {
        Temporal::Instant(inst) => instant_hash(inst),
        Temporal::Sequence(seq) => sequence_hash(seq),
        Temporal::SequenceSet(ss) => ss
            .sequences()
            .iter()
            .fold(1u32, |h, seq| h.wrapping_mul(31).wrapping_add(sequence_hash(seq))),
    }
}

fn instant_hash_extended(inst: &TInstant, seed: u64) -> u64 {
    let value_hash = lookup(inst.base_type())
        .map(|bt| bt.hash64(inst.value(), seed))
        .unwrap_or(seed);
    value_hash.rotate_left(1) ^ seeded_hash(&inst.timestamp().micros(), seed)
}

fn sequence_hash_extended(seq: &TSequence, seed: u64) -> u64 {
    seq.instants()
        .iter()
        .fold(seeded_hash(&bound_flags(seq), seed), |h, inst| {
            h.wrapping_mul(31).wrapping_add(instant_hash_extended(inst, seed))
        })
}

/// Seeded 64-bit hash of a temporal value.
///
/// With seed `0` its folded value is not required to match [`temporal_hash`].
pub fn temporal_hash_extended(temp: &Temporal, seed: u64) -> u64 {
    match temp {
        Temporal::Instant(inst) => instant_hash_extended(inst, seed),
        Temporal::Sequence(seq) => sequence_hash_extended(seq, seed),
        Temporal::SequenceSet(ss) => ss.sequences().iter().fold(1u64, |h, seq| {
            h.wrapping_mul(31).wrapping_add(sequence_hash_extended(seq, seed))
        }),
    }
}

impl PartialEq for Temporal {
    fn eq(&self, other: &Self) -> bool {
        temporal_eq(self, other)
    }
}

impl Eq for Temporal {}

impl PartialOrd for Temporal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Orders by base type, then by the instants or pieces of the value. Unlike
/// [`temporal_cmp`] this is `Equal` exactly when the values are `==`.
impl Ord for Temporal {
    fn cmp(&self, other: &Self) -> Ordering {
        self.base_type()
            .cmp(&other.base_type())
            .then_with(|| canonical_cmp(&canonical(self), &canonical(other)))
    }
}

impl Hash for Temporal {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.base_type().hash(state);
        match canonical(self) {
            Canonical::Instants(instants) => {
                state.write_u8(0);
                instants.iter().for_each(|inst| state.write_u32(instant_hash(inst)));
            }
            Canonical::Pieces(pieces) => {
                state.write_u8(1);
                pieces.iter().for_each(|seq| state.write_u32(piece_hash(seq)));
            }
        }
    }
}
