//! Alignment of two temporal values on their common time domain.
//!
//! Both outputs of [`synchronize`] have the same subtype and cover the same
//! time span. In [`SyncMode::Synchronize`] continuous outputs also expose
//! identical timestamps, including the instants where linear segments cross.

pub mod segment;

use crate::base::{Datum, datum_eq};
use crate::error::{Result, TemporaError};
use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};
use crate::validation::ensure_same_frame;
use std::cmp::Ordering;
use tempora_types::Timestamp;

/// What [`synchronize`] adds on top of restricting both values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// Restrict both values to the common time domain.
    Intersection,
    /// Also insert the instants where two segments take the same value.
    Synchronize,
}

impl SyncMode {
    fn crossings(self) -> bool {
        self == SyncMode::Synchronize
    }
}

type SeqPair = (TSequence, TSequence);

/// Restrict two temporal values to their common time domain.
///
/// Returns `Ok(None)` when the time domains do not overlap.
///
/// # Examples
///
/// ```
/// use tempora::sync::{SyncMode, synchronize};
/// use tempora::temporal::{Interpolation, TInstant, TSequence, Temporal};
/// use tempora_types::Timestamp;
///
/// let t = Timestamp::from_secs;
/// let a = TSequence::new(
///     vec![TInstant::new(0.0, t(0)), TInstant::new(10.0, t(10))],
///     true, true, Interpolation::Linear, true,
/// ).unwrap();
/// let b = TSequence::new(
///     vec![TInstant::new(10.0, t(0)), TInstant::new(0.0, t(10))],
///     true, true, Interpolation::Linear, true,
/// ).unwrap();
///
/// let (a, b) = synchronize(&a.into(), &b.into(), SyncMode::Synchronize).unwrap().unwrap();
/// assert_eq!(a.timestamps(), vec![t(0), t(5), t(10)]);
/// assert_eq!(a.timestamps(), b.timestamps());
/// ```
pub fn synchronize(
    temp1: &Temporal,
    temp2: &Temporal,
    mode: SyncMode,
) -> Result<Option<(Temporal, Temporal)>> {
    ensure_same_frame(temp1.start_instant().value(), temp2.start_instant().value())?;
    if !temp1.period().overlaps(&temp2.period()) {
        log::trace!("Synchronization of disjoint time domains yields no value");
        return Ok(None);
    }

    let crossings = mode.crossings();
    let result = match (temp1, temp2) {
        (Temporal::Instant(inst1), Temporal::Instant(inst2)) => {
            (inst1.timestamp() == inst2.timestamp())
                .then(|| (inst1.clone().into(), inst2.clone().into()))
        }
        (Temporal::Instant(inst), other) => other
            .at_timestamp(inst.timestamp())?
            .map(|inst2| (inst.clone().into(), inst2.into())),
        (other, Temporal::Instant(inst)) => other
            .at_timestamp(inst.timestamp())?
            .map(|inst1| (inst1.into(), inst.clone().into())),
        (Temporal::Sequence(seq1), Temporal::Sequence(seq2)) => {
            sync_sequences(seq1, seq2, crossings)?.map(into_temporal_pair)
        }
        (Temporal::SequenceSet(ss), Temporal::Sequence(seq)) => {
            if seq.interpolation() == Interpolation::Discrete {
                intersect_set_discrete(ss, seq)?.map(into_temporal_pair)
            } else {
                sync_set_sequence(ss, seq, crossings)?.map(into_set_pair)
            }
        }
        (Temporal::Sequence(seq), Temporal::SequenceSet(ss)) => {
            if seq.interpolation() == Interpolation::Discrete {
                intersect_set_discrete(ss, seq)?.map(|(a, b)| into_temporal_pair((b, a)))
            } else {
                sync_set_sequence(ss, seq, crossings)?.map(|(a, b)| into_set_pair((b, a)))
            }
        }
        (Temporal::SequenceSet(ss1), Temporal::SequenceSet(ss2)) => {
            sync_sets(ss1, ss2, crossings)?.map(into_set_pair)
        }
    };
    Ok(result)
}

fn into_temporal_pair((a, b): SeqPair) -> (Temporal, Temporal) {
    (Temporal::Sequence(a), Temporal::Sequence(b))
}

fn into_set_pair((a, b): (TSequenceSet, TSequenceSet)) -> (Temporal, Temporal) {
    (Temporal::SequenceSet(a), Temporal::SequenceSet(b))
}

/// Sequence × sequence, dispatching on interpolation.
fn sync_sequences(seq1: &TSequence, seq2: &TSequence, crossings: bool) -> Result<Option<SeqPair>> {
    use Interpolation::Discrete;
    match (seq1.interpolation() == Discrete, seq2.interpolation() == Discrete) {
        (true, true) => intersect_discrete(seq1, seq2),
        (false, true) => intersect_continuous_discrete(seq1, seq2),
        (true, false) => Ok(intersect_continuous_discrete(seq2, seq1)?.map(|(a, b)| (b, a))),
        (false, false) => sync_continuous(seq1, seq2, crossings),
    }
}

fn discrete_pair(instants1: Vec<TInstant>, instants2: Vec<TInstant>) -> Result<Option<SeqPair>> {
    if instants1.is_empty() {
        return Ok(None);
    }
    let seq1 = TSequence::make(instants1, true, true, Interpolation::Discrete, false)?;
    let seq2 = TSequence::make(instants2, true, true, Interpolation::Discrete, false)?;
    Ok(Some((seq1, seq2)))
}

/// Instants of both discrete sequences sharing a timestamp.
fn intersect_discrete(seq1: &TSequence, seq2: &TSequence) -> Result<Option<SeqPair>> {
    let (a, b) = (seq1.instants(), seq2.instants());
    let (mut i, mut j) = (0, 0);
    let (mut out1, mut out2) = (Vec::new(), Vec::new());
    while i < a.len() && j < b.len() {
        match a[i].timestamp().cmp(&b[j].timestamp()) {
            Ordering::Equal => {
                out1.push(a[i].clone());
                out2.push(b[j].clone());
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    discrete_pair(out1, out2)
}

/// The continuous sequence sampled at every instant of the discrete one it covers.
fn intersect_continuous_discrete(cont: &TSequence, disc: &TSequence) -> Result<Option<SeqPair>> {
    let (mut out1, mut out2) = (Vec::new(), Vec::new());
    for inst in disc.instants() {
        if cont.period().upper() < inst.timestamp() {
            break;
        }
        if let Some(sampled) = cont.at_timestamp(inst.timestamp())? {
            out1.push(sampled);
            out2.push(inst.clone());
        }
    }
    discrete_pair(out1, out2)
}

/// Value of a continuous sequence at `t`, where `instants[idx]` is the
/// first instant at or after `t`.
fn sample(seq: &TSequence, idx: usize, t: Timestamp) -> Result<Datum> {
    let instants = seq.instants();
    let Some(next) = instants.get(idx) else {
        return Err(outside(t));
    };
    if next.timestamp() == t {
        return Ok(next.value().clone());
    }
    let prev = idx
        .checked_sub(1)
        .and_then(|i| instants.get(i))
        .ok_or_else(|| outside(t))?;
    segment::value_at(prev, next, seq.interpolation() == Interpolation::Linear, t)
}

fn outside(t: Timestamp) -> TemporaError {
    TemporaError::InvalidArgument(format!("Timestamp {} lies outside the sequence", t))
}

fn bound_value(seq: &TSequence, t: Timestamp) -> Result<Datum> {
    seq.value_at_timestamp(t, false)?.ok_or_else(|| outside(t))
}

/// Two continuous sequences on the merged timestamps of their common period.
fn sync_continuous(seq1: &TSequence, seq2: &TSequence, crossings: bool) -> Result<Option<SeqPair>> {
    let Some(inter) = seq1.period().intersection(seq2.period()) else {
        return Ok(None);
    };
    let (interp1, interp2) = (seq1.interpolation(), seq2.interpolation());

    if inter.is_instant() {
        log::trace!("Sequences intersect at the single instant {}", inter.lower());
        let t = inter.lower();
        let inst1 = TInstant::new(bound_value(seq1, t)?, t);
        let inst2 = TInstant::new(bound_value(seq2, t)?, t);
        return Ok(Some((
            TSequence::make(vec![inst1], true, true, interp1, false)?,
            TSequence::make(vec![inst2], true, true, interp2, false)?,
        )));
    }

    let linear1 = interp1 == Interpolation::Linear;
    let linear2 = interp2 == Interpolation::Linear;
    let (lower, upper) = (inter.lower(), inter.upper());
    let (a, b) = (seq1.instants(), seq2.instants());

    let capacity = a.len() + b.len();
    let mut out1: Vec<TInstant> = Vec::with_capacity(capacity);
    let mut out2: Vec<TInstant> = Vec::with_capacity(capacity);
    out1.push(TInstant::new(bound_value(seq1, lower)?, lower));
    out2.push(TInstant::new(bound_value(seq2, lower)?, lower));

    let mut i = a.partition_point(|inst| inst.timestamp() <= lower);
    let mut j = b.partition_point(|inst| inst.timestamp() <= lower);
    loop {
        let t = match (a.get(i), b.get(j)) {
            (Some(x), Some(y)) => x.timestamp().min(y.timestamp()),
            _ => break,
        };
        if t > upper {
            break;
        }
        let inst1 = TInstant::new(sample(seq1, i, t)?, t);
        let inst2 = TInstant::new(sample(seq2, j, t)?, t);

        if crossings && (linear1 || linear2) {
            let (prev1, prev2) = (&out1[out1.len() - 1], &out2[out2.len() - 1]);
            if let Some(tc) = segment::intersection(prev1, &inst1, linear1, prev2, &inst2, linear2)? {
                let cross1 = TInstant::new(segment::value_at(prev1, &inst1, linear1, tc)?, tc);
                let cross2 = TInstant::new(segment::value_at(prev2, &inst2, linear2, tc)?, tc);
                out1.push(cross1);
                out2.push(cross2);
            }
        }

        out1.push(inst1);
        out2.push(inst2);
        if a[i].timestamp() == t {
            i += 1;
        }
        if b[j].timestamp() == t {
            j += 1;
        }
        if t == upper {
            break;
        }
    }

    if !inter.upper_inc() {
        fix_step_end(&mut out1, linear1)?;
        fix_step_end(&mut out2, linear2)?;
    }

    Ok(Some((
        TSequence::make(out1, inter.lower_inc(), inter.upper_inc(), interp1, false)?,
        TSequence::make(out2, inter.lower_inc(), inter.upper_inc(), interp2, false)?,
    )))
}

/// A step sequence with an exclusive upper bound ends on the value it holds.
fn fix_step_end(instants: &mut [TInstant], linear: bool) -> Result<()> {
    let k = instants.len();
    if linear || k < 2 {
        return Ok(());
    }
    let prev = instants[k - 2].value().clone();
    if !datum_eq(&prev, instants[k - 1].value())? {
        instants[k - 1] = instants[k - 1].with_value(prev);
    }
    Ok(())
}

/// Sequence set × continuous sequence, member by member.
fn sync_set_sequence(
    ss: &TSequenceSet,
    seq: &TSequence,
    crossings: bool,
) -> Result<Option<(TSequenceSet, TSequenceSet)>> {
    let (_, loc) = ss.find_timestamp(seq.period().lower());
    let (mut out1, mut out2) = (Vec::new(), Vec::new());
    for seq1 in &ss.sequences()[loc..] {
        if let Some((a, b)) = sync_continuous(seq1, seq, crossings)? {
            out1.push(a);
            out2.push(b);
        }
        let (p, p1) = (seq.period(), seq1.period());
        match p.upper().cmp(&p1.upper()) {
            Ordering::Less => break,
            Ordering::Equal if !p.upper_inc() || p1.upper_inc() => break,
            _ => {}
        }
    }
    set_pair(out1, out2)
}

fn set_pair(out1: Vec<TSequence>, out2: Vec<TSequence>) -> Result<Option<(TSequenceSet, TSequenceSet)>> {
    if out1.is_empty() {
        return Ok(None);
    }
    Ok(Some((
        TSequenceSet::make(out1, false)?,
        TSequenceSet::make(out2, false)?,
    )))
}

/// Sequence set × sequence set, walking both member lists.
fn sync_sets(
    ss1: &TSequenceSet,
    ss2: &TSequenceSet,
    crossings: bool,
) -> Result<Option<(TSequenceSet, TSequenceSet)>> {
    let (a, b) = (ss1.sequences(), ss2.sequences());
    let (mut i, mut j) = (0, 0);
    let (mut out1, mut out2) = (Vec::new(), Vec::new());
    while i < a.len() && j < b.len() {
        let (seq1, seq2) = (&a[i], &b[j]);
        if let Some((x, y)) = sync_continuous(seq1, seq2, crossings)? {
            out1.push(x);
            out2.push(y);
        }
        let (p1, p2) = (seq1.period(), seq2.period());
        match p1.upper().cmp(&p2.upper()) {
            Ordering::Equal if p1.upper_inc() == p2.upper_inc() => {
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Equal if !p1.upper_inc() => i += 1,
            _ => j += 1,
        }
    }
    set_pair(out1, out2)
}

/// Sequence set sampled at the instants of a discrete sequence.
fn intersect_set_discrete(ss: &TSequenceSet, disc: &TSequence) -> Result<Option<SeqPair>> {
    let (a, b) = (ss.sequences(), disc.instants());
    let (mut i, mut j) = (0, 0);
    let (mut out1, mut out2) = (Vec::new(), Vec::new());
    while i < a.len() && j < b.len() {
        let (seq, inst) = (&a[i], &b[j]);
        if let Some(sampled) = seq.at_timestamp(inst.timestamp())? {
            out1.push(sampled);
            out2.push(inst.clone());
        }
        match seq.period().upper().cmp(&inst.timestamp()) {
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    discrete_pair(out1, out2)
}
