//! Sequence builders shared by the lifting entry points.
//!
//! The binary builders take two synchronized sequences: both expose the same
//! timestamps and the same bounds.

use super::LiftedFunction;
use crate::base::{Datum, datum_eq};
use crate::config::config;
use crate::error::Result;
use crate::sync::segment;
use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};
use tempora_types::Timestamp;

/// Build a result sequence, enforcing the step end rule.
pub(super) fn build_sequence(
    mut instants: Vec<TInstant>,
    lower_inc: bool,
    upper_inc: bool,
    interp: Interpolation,
) -> Result<TSequence> {
    let n = instants.len();
    if interp == Interpolation::Step && !upper_inc && n > 1 {
        // A step sequence with an exclusive upper bound never shows its last value
        let held = instants[n - 2].value().clone();
        instants[n - 1] = instants[n - 1].with_value(held);
    }
    TSequence::make(instants, lower_inc, upper_inc, interp, config().normalize)
}

/// Apply `func` to every instant of `seq`.
pub(super) fn map_sequence<F>(lf: &LiftedFunction, seq: &TSequence, mut func: F) -> Result<TSequence>
where
    F: FnMut(&Datum) -> Result<Datum>,
{
    let interp = lf.result_interpolation(seq.interpolation())?;
    let instants = seq
        .instants()
        .iter()
        .map(|inst| Ok(TInstant::new(func(inst.value())?, inst.timestamp())))
        .collect::<Result<Vec<_>>>()?;
    build_sequence(instants, seq.lower_inc(), seq.upper_inc(), interp)
}

/// Apply the operation to a linear sequence and a value, adding the turning
/// points of every segment.
pub(super) fn map_with_turning_points(
    lf: &LiftedFunction,
    seq: &TSequence,
    value: &Datum,
) -> Result<TSequence> {
    let interp = lf.result_interpolation(seq.interpolation())?;
    let source = seq.instants();
    let mut instants = Vec::with_capacity(source.len() * 2);
    for (i, inst) in source.iter().enumerate() {
        if i > 0
            && !datum_eq(source[i - 1].value(), inst.value())?
            && let Some(turn) = lf.base_turning_point(&source[i - 1], inst, value)?
        {
            instants.push(checked_instant(lf, turn)?);
        }
        instants.push(TInstant::new(lf.call2(inst.value(), value)?, inst.timestamp()));
    }
    build_sequence(instants, seq.lower_inc(), seq.upper_inc(), interp)
}

/// Pointwise application over two synchronized sequences with the same
/// interpolation.
pub(super) fn zip_sequences(
    lf: &LiftedFunction,
    seq1: &TSequence,
    seq2: &TSequence,
) -> Result<TSequence> {
    let interp = lf.result_interpolation(seq1.interpolation().min(seq2.interpolation()))?;
    let turning = lf.has_turning_point()
        && seq1.interpolation() == Interpolation::Linear
        && seq2.interpolation() == Interpolation::Linear;
    let (source1, source2) = (seq1.instants(), seq2.instants());
    let mut instants = Vec::with_capacity(source1.len() * 2);
    for (i, (inst1, inst2)) in source1.iter().zip(source2).enumerate() {
        if turning
            && i > 0
            && let Some(turn) =
                lf.temporal_turning_point(&source1[i - 1], inst1, &source2[i - 1], inst2)?
        {
            instants.push(checked_instant(lf, turn)?);
        }
        instants.push(TInstant::new(
            lf.call2(inst1.value(), inst2.value())?,
            inst1.timestamp(),
        ));
    }
    build_sequence(instants, seq1.lower_inc(), seq1.upper_inc(), interp)
}

/// Segment-wise application over two synchronized sequences with different
/// interpolations.
///
/// Every segment becomes one piece with an exclusive upper bound; an
/// inclusive upper bound adds a final instant.
pub(super) fn mixed_pieces(
    lf: &LiftedFunction,
    seq1: &TSequence,
    seq2: &TSequence,
) -> Result<Vec<TSequence>> {
    let interp = lf.result_interpolation(Interpolation::Linear)?;
    let mut pieces = Vec::with_capacity(seq1.num_instants());
    let mut lower_inc = seq1.lower_inc();
    for seg in Segments::new(seq1, seq2) {
        let start = lf.call2(seg.start_value1(), seg.start_value2())?;
        let end = if interp == Interpolation::Step {
            start.clone()
        } else {
            lf.call2(seg.end_value1(), seg.end_value2())?
        };
        pieces.push(TSequence::make(
            vec![TInstant::new(start, seg.lower()), TInstant::new(end, seg.upper())],
            lower_inc,
            false,
            interp,
            false,
        )?);
        lower_inc = true;
    }
    push_final_instant(lf, seq1, seq2, interp, &mut pieces)?;
    Ok(pieces)
}

/// Segment-wise application of a discontinuous operation.
///
/// Each segment yields between one and three pieces: the result before the
/// instant where the operands meet, the result at that instant, and the
/// result after it.
pub(super) fn discontinuous_pieces(
    lf: &LiftedFunction,
    seq1: &TSequence,
    seq2: &TSequence,
) -> Result<Vec<TSequence>> {
    let interp = lf.result_interpolation(seq1.interpolation().max(seq2.interpolation()))?;
    let stretch = |value: &Datum, lower: Timestamp, upper: Timestamp, lower_inc, upper_inc| {
        TSequence::make(
            vec![TInstant::new(value.clone(), lower), TInstant::new(value.clone(), upper)],
            lower_inc,
            upper_inc,
            interp,
            false,
        )
    };
    let single = |value: Datum, t: Timestamp| {
        TSequence::make(vec![TInstant::new(value, t)], true, true, interp, false)
    };

    let mut pieces = Vec::with_capacity(seq1.num_instants() * 3);
    let mut lower_inc = seq1.lower_inc();
    for seg in Segments::new(seq1, seq2) {
        let (lower, upper) = (seg.lower(), seg.upper());
        let start = lf.call2(seg.start_value1(), seg.start_value2())?;
        let end = lf.call2(seg.end_value1(), seg.end_value2())?;

        if datum_eq(seg.start_value1(), seg.end_value1())?
            && datum_eq(seg.start_value2(), seg.end_value2())?
        {
            pieces.push(stretch(&start, lower, upper, lower_inc, false)?);
        } else if datum_eq(seg.start_value1(), seg.start_value2())?
            || (seg.linear1
                && seg.linear2
                && datum_eq(seg.end_value1(), seg.end_value2())?)
        {
            // The operands meet at a bound: the inside of the segment takes
            // the value at its midpoint
            let middle = seg.result_at(lf, lower.midpoint(upper))?;
            let lower_eq = lower_inc && datum_eq(&start, &middle)?;
            if lower_inc && !lower_eq {
                pieces.push(single(start, lower)?);
            }
            pieces.push(stretch(&middle, lower, upper, lower_eq, false)?);
        } else {
            match seg.crossing()? {
                Some(t) => {
                    let cross = seg.result_at(lf, t)?;
                    let lower_eq = datum_eq(&start, &cross)?;
                    let upper_eq = datum_eq(&cross, &end)?;
                    if lower_eq && upper_eq {
                        pieces.push(stretch(&start, lower, upper, lower_inc, false)?);
                    } else {
                        pieces.push(stretch(&start, lower, t, lower_inc, lower_eq)?);
                        if !lower_eq && !upper_eq {
                            pieces.push(single(cross, t)?);
                        }
                        pieces.push(stretch(&end, t, upper, upper_eq, false)?);
                    }
                }
                None => pieces.push(stretch(&start, lower, upper, lower_inc, false)?),
            }
        }
        lower_inc = true;
    }
    push_final_instant(lf, seq1, seq2, interp, &mut pieces)?;
    Ok(pieces)
}

fn push_final_instant(
    lf: &LiftedFunction,
    seq1: &TSequence,
    seq2: &TSequence,
    interp: Interpolation,
    pieces: &mut Vec<TSequence>,
) -> Result<()> {
    if seq1.upper_inc() {
        let (last1, last2) = (seq1.end_instant(), seq2.end_instant());
        let value = lf.call2(last1.value(), last2.value())?;
        pieces.push(TSequence::make(
            vec![TInstant::new(value, last1.timestamp())],
            true,
            true,
            interp,
            false,
        )?);
    }
    Ok(())
}

/// Gather result pieces into a value, collapsing a single piece to a
/// sequence when `collapse` is set.
pub(super) fn assemble(mut pieces: Vec<TSequence>, collapse: bool) -> Result<Temporal> {
    if collapse && pieces.len() == 1 {
        return Ok(pieces.swap_remove(0).into());
    }
    let set = TSequenceSet::make(pieces, true)?;
    if collapse && set.num_sequences() == 1 {
        return Ok(set.into_sequences().swap_remove(0).into());
    }
    Ok(set.into())
}

/// A step sequence taking `value` at every timestamp of `seq`.
pub(super) fn constant_like(seq: &TSequence, value: &Datum) -> Result<TSequence> {
    let instants = seq
        .instants()
        .iter()
        .map(|inst| TInstant::new(value.clone(), inst.timestamp()))
        .collect();
    TSequence::make(instants, seq.lower_inc(), seq.upper_inc(), Interpolation::Step, false)
}

fn checked_instant(lf: &LiftedFunction, inst: TInstant) -> Result<TInstant> {
    let t = inst.timestamp();
    Ok(TInstant::new(lf.checked(inst.into_value())?, t))
}

/// One pair of synchronized segments.
struct Segment<'a> {
    start1: &'a TInstant,
    end1: &'a TInstant,
    start2: &'a TInstant,
    end2: &'a TInstant,
    linear1: bool,
    linear2: bool,
}

impl Segment<'_> {
    fn lower(&self) -> Timestamp {
        self.start1.timestamp()
    }

    fn upper(&self) -> Timestamp {
        self.end1.timestamp()
    }

    fn start_value1(&self) -> &Datum {
        self.start1.value()
    }

    fn start_value2(&self) -> &Datum {
        self.start2.value()
    }

    /// Value approached at the upper bound; a step segment keeps its start value.
    fn end_value1(&self) -> &Datum {
        if self.linear1 { self.end1.value() } else { self.start1.value() }
    }

    fn end_value2(&self) -> &Datum {
        if self.linear2 { self.end2.value() } else { self.start2.value() }
    }

    fn result_at(&self, lf: &LiftedFunction, t: Timestamp) -> Result<Datum> {
        let value1 = segment::value_at(self.start1, self.end1, self.linear1, t)?;
        let value2 = segment::value_at(self.start2, self.end2, self.linear2, t)?;
        lf.call2(&value1, &value2)
    }

    fn crossing(&self) -> Result<Option<Timestamp>> {
        segment::intersection(
            self.start1,
            self.end1,
            self.linear1,
            self.start2,
            self.end2,
            self.linear2,
        )
    }
}

struct Segments<'a> {
    instants1: &'a [TInstant],
    instants2: &'a [TInstant],
    linear1: bool,
    linear2: bool,
    next: usize,
}

impl<'a> Segments<'a> {
    fn new(seq1: &'a TSequence, seq2: &'a TSequence) -> Self {
        Self {
            instants1: seq1.instants(),
            instants2: seq2.instants(),
            linear1: seq1.interpolation() == Interpolation::Linear,
            linear2: seq2.interpolation() == Interpolation::Linear,
            next: 1,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let i = self.next;
        if i >= self.instants1.len() || i >= self.instants2.len() {
            return None;
        }
        self.next += 1;
        Some(Segment {
            start1: &self.instants1[i - 1],
            end1: &self.instants1[i],
            start2: &self.instants2[i - 1],
            end2: &self.instants2[i],
            linear1: self.linear1,
            linear2: self.linear2,
        })
    }
}
