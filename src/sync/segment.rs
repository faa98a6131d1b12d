//! Operations on a single segment between two consecutive instants.

use crate::base::{Datum, datum_eq, lookup};
use crate::config::config;
use crate::error::Result;
use crate::temporal::TInstant;
use tempora_types::Timestamp;

/// Value of the segment `inst1 -> inst2` at `t`, with `t` inside the segment.
pub fn value_at(inst1: &TInstant, inst2: &TInstant, linear: bool, t: Timestamp) -> Result<Datum> {
    let (v1, v2) = (inst1.value(), inst2.value());
    if t == inst1.timestamp() || (!linear && t < inst2.timestamp()) || datum_eq(v1, v2)? {
        return Ok(v1.clone());
    }
    if t == inst2.timestamp() {
        return Ok(v2.clone());
    }
    let ratio = (t - inst1.timestamp()) as f64 / (inst2.timestamp() - inst1.timestamp()) as f64;
    lookup(v1.type_tag())?.interpolate(v1, v2, ratio)
}

/// Timestamp strictly inside the segment for a fraction of its duration.
fn timestamp_at(inst1: &TInstant, inst2: &TInstant, fraction: f64) -> Option<Timestamp> {
    let (lower, upper) = (inst1.timestamp(), inst2.timestamp());
    let t = lower.offset_by((upper - lower) as f64 * fraction);
    (t > lower && t < upper).then_some(t)
}

/// Timestamp strictly inside the linear segment `inst1 -> inst2` where it
/// takes `value`.
pub fn intersection_value(inst1: &TInstant, inst2: &TInstant, value: &Datum) -> Result<Option<Timestamp>> {
    let (v1, v2) = (inst1.value(), inst2.value());
    let base_type = lookup(v1.type_tag())?;
    if base_type.eq(v1, v2) {
        return Ok(None);
    }
    Ok(base_type
        .locate(v1, v2, value, config().epsilon)
        .and_then(|fraction| timestamp_at(inst1, inst2, fraction)))
}

/// Timestamp strictly inside two synchronized segments where their values meet.
///
/// The segments span the same period; a step segment is a constant holding
/// its start value.
pub fn intersection(
    start1: &TInstant,
    end1: &TInstant,
    linear1: bool,
    start2: &TInstant,
    end2: &TInstant,
    linear2: bool,
) -> Result<Option<Timestamp>> {
    match (linear1, linear2) {
        (false, false) => Ok(None),
        (true, false) => intersection_value(start1, end1, start2.value()),
        (false, true) => intersection_value(start2, end2, start1.value()),
        (true, true) => {
            let base_type = lookup(start1.base_type())?;
            Ok(base_type
                .segment_crossing(
                    start1.value(),
                    end1.value(),
                    start2.value(),
                    end2.value(),
                    config().epsilon,
                )
                .and_then(|fraction| timestamp_at(start1, end1, fraction)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inst(value: f64, secs: i64) -> TInstant {
        TInstant::new(value, Timestamp::from_secs(secs))
    }

    #[test]
    fn test_value_at() {
        let (a, b) = (inst(0.0, 0), inst(10.0, 10));
        let t = Timestamp::from_secs;
        assert_eq!(value_at(&a, &b, true, t(3)).unwrap(), Datum::Float(3.0));
        assert_eq!(value_at(&a, &b, false, t(3)).unwrap(), Datum::Float(0.0));
        assert_eq!(value_at(&a, &b, false, t(10)).unwrap(), Datum::Float(10.0));
    }

    #[test]
    fn test_intersection_value_inside_only() {
        let (a, b) = (inst(0.0, 0), inst(10.0, 10));
        assert_eq!(
            intersection_value(&a, &b, &Datum::Float(5.0)).unwrap(),
            Some(Timestamp::from_secs(5))
        );
        assert_eq!(intersection_value(&a, &b, &Datum::Float(10.0)).unwrap(), None);
        assert_eq!(intersection_value(&a, &b, &Datum::Int(2)).unwrap(), Some(Timestamp::from_secs(2)));
    }

    #[test]
    fn test_intersection_of_crossing_segments() {
        let t = intersection(&inst(0.0, 0), &inst(4.0, 4), true, &inst(4.0, 0), &inst(0.0, 4), true)
            .unwrap();
        assert_eq!(t, Some(Timestamp::from_secs(2)));

        let step = intersection(&inst(0.0, 0), &inst(4.0, 4), true, &inst(1.0, 0), &inst(9.0, 4), false)
            .unwrap();
        assert_eq!(step, Some(Timestamp::from_secs(1)));

        let parallel = intersection(&inst(0.0, 0), &inst(4.0, 4), true, &inst(1.0, 0), &inst(5.0, 4), true)
            .unwrap();
        assert_eq!(parallel, None);
    }
}
