use rustc_hash::FxHashSet;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tempora::ordering::{temporal_ge, temporal_hash_extended, temporal_le, temporal_ne};
use tempora::prelude::*;

fn t(secs: i64) -> Timestamp {
    Timestamp::from_secs(secs)
}

fn seq(values: &[(f64, i64)], interp: Interpolation) -> TSequence {
    let instants = values.iter().map(|&(v, s)| TInstant::new(v, t(s))).collect();
    TSequence::new(instants, true, true, interp, true).unwrap()
}

fn sample() -> Vec<Temporal> {
    vec![
        TInstant::new(1.0, t(0)).into(),
        TInstant::new(1.0, t(1)).into(),
        TInstant::new(-3.0, t(1)).into(),
        seq(&[(1.0, 0), (1.0, 4)], Interpolation::Step).into(),
        seq(&[(1.0, 0), (2.0, 4)], Interpolation::Linear).into(),
        seq(&[(1.0, 0), (2.0, 4)], Interpolation::Step).into(),
        TSequence::discrete(vec![TInstant::new(1.0, t(0)), TInstant::new(2.0, t(4))])
            .unwrap()
            .into(),
        TSequenceSet::new(
            vec![
                seq(&[(1.0, 0), (2.0, 4)], Interpolation::Linear),
                seq(&[(5.0, 6), (5.0, 9)], Interpolation::Linear),
            ],
            true,
        )
        .unwrap()
        .into(),
    ]
}

#[test]
fn test_sorting_is_deterministic() {
    let mut forward = sample();
    let mut backward = sample();
    backward.reverse();
    forward.sort_by(temporal_cmp);
    backward.sort_by(temporal_cmp);
    for (a, b) in forward.iter().zip(&backward) {
        assert_eq!(temporal_cmp(a, b), Ordering::Equal);
    }
    for pair in forward.windows(2) {
        assert!(temporal_le(&pair[0], &pair[1]));
    }
}

#[test]
fn test_order_is_transitive() {
    let values = sample();
    for a in &values {
        for b in &values {
            for c in &values {
                if temporal_le(a, b) && temporal_le(b, c) {
                    assert!(temporal_le(a, c));
                }
            }
        }
    }
}

#[test]
fn test_equal_values_across_representations() {
    let inst = TInstant::new(4.0, t(2));
    let stepped = TSequence::from_instant(inst.clone(), Interpolation::Step).unwrap();
    let linear = TSequence::from_instant(inst.clone(), Interpolation::Linear).unwrap();
    let discrete = TSequence::from_instant(inst.clone(), Interpolation::Discrete).unwrap();
    let set = TSequenceSet::new(vec![linear.clone()], true).unwrap();

    let inst = Temporal::from(inst);
    let others: [Temporal; 4] = [stepped.into(), linear.into(), discrete.into(), set.into()];
    for other in others {
        assert_eq!(inst, other);
        assert_eq!(other, inst);
    }
}

#[test]
fn test_different_values_are_not_equal() {
    let values = sample();
    for (i, a) in values.iter().enumerate() {
        for (j, b) in values.iter().enumerate() {
            if i != j {
                assert!(temporal_ne(a, b), "{} and {} compare equal", a, b);
            }
        }
    }
}

#[test]
fn test_same_subtype_cmp_agrees_with_eq() {
    let a: Temporal = seq(&[(1.0, 0), (2.0, 4)], Interpolation::Linear).into();
    let b: Temporal = seq(&[(1.0, 0), (2.0, 4)], Interpolation::Linear).into();
    assert_eq!(temporal_cmp(&a, &b), Ordering::Equal);
    assert_eq!(temporal_hash(&a), temporal_hash(&b));
    assert_eq!(temporal_hash_extended(&a, 42), temporal_hash_extended(&b, 42));

    let later: Temporal = seq(&[(1.0, 1), (2.0, 4)], Interpolation::Linear).into();
    assert!(temporal_ge(&later, &a));
}

#[test]
fn test_equality_is_transitive() {
    let inst = TInstant::new(4.0, t(2));
    let values: Vec<Temporal> = vec![
        inst.clone().into(),
        TSequence::from_instant(inst.clone(), Interpolation::Step).unwrap().into(),
        TSequence::from_instant(inst.clone(), Interpolation::Linear).unwrap().into(),
        TSequence::from_instant(inst.clone(), Interpolation::Discrete).unwrap().into(),
    ];
    for a in &values {
        for b in &values {
            assert_eq!(a, b);
        }
    }
}

#[test]
fn test_trait_order_matches_equality() {
    let mut values = sample();
    let inst = TInstant::new(1.0, t(0));
    values.push(TSequence::from_instant(inst.clone(), Interpolation::Linear).unwrap().into());
    let member = TSequence::from_instant(inst, Interpolation::Step).unwrap();
    values.push(TSequenceSet::new(vec![member], true).unwrap().into());

    for a in &values {
        for b in &values {
            assert_eq!(a.cmp(b) == Ordering::Equal, a == b, "{} vs {}", a, b);
            assert_eq!(a.cmp(b), b.cmp(a).reverse());
        }
    }

    let mut sorted = values.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(sorted.len(), sample().len());
    assert_eq!(values.iter().collect::<BTreeSet<_>>().len(), sample().len());
}

#[test]
fn test_hash_set_deduplicates() {
    let mut seen = FxHashSet::default();
    for value in sample().into_iter().chain(sample()) {
        seen.insert(value);
    }
    assert_eq!(seen.len(), sample().len());

    // an instant and its single-instant sequence are one value
    let inst = TInstant::new(1.0, t(0));
    let as_seq = TSequence::from_instant(inst.clone(), Interpolation::Step).unwrap();
    assert!(!seen.insert(as_seq.into()));
    assert!(!seen.insert(inst.into()));
}
