use super::{Interpolation, TInstant};
use crate::base::{Datum, TypeTag, datum_eq, lookup};
use crate::boxes::BoundingBox;
use crate::config::config;
use crate::error::{Result, TemporaError};
use crate::period::Period;
use crate::sync::segment;
use crate::validation::{
    ensure_increasing, ensure_max_instants, ensure_not_empty, ensure_same_base_type,
    ensure_same_frame, ensure_same_route, ensure_valid_bounds, ensure_valid_interpolation,
};
use tempora_types::Timestamp;

/// An ordered run of instants sharing one interpolation.
///
/// # Examples
///
/// ```
/// use tempora::temporal::{Interpolation, TInstant, TSequence};
/// use tempora_types::Timestamp;
///
/// let t = Timestamp::from_secs;
/// let seq = TSequence::new(
///     vec![TInstant::new(1.0, t(0)), TInstant::new(2.0, t(5)), TInstant::new(3.0, t(10))],
///     true,
///     false,
///     Interpolation::Linear,
///     true,
/// )
/// .unwrap();
///
/// // The middle instant is collinear and is dropped
/// assert_eq!(seq.num_instants(), 2);
/// assert_eq!(seq.value_at_timestamp(t(5), true).unwrap(), Some(2.0.into()));
/// assert_eq!(seq.value_at_timestamp(t(10), true).unwrap(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TSequence {
    instants: Vec<TInstant>,
    interp: Interpolation,
    period: Period,
    bbox: BoundingBox,
}

impl TSequence {
    /// Build a sequence from validated components.
    ///
    /// With `normalize` set, redundant instants are removed; discrete
    /// sequences are never normalized.
    pub fn new(
        instants: Vec<TInstant>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
        normalize: bool,
    ) -> Result<Self> {
        Self::validate(&instants, lower_inc, upper_inc, interp)?;
        Self::make(instants, lower_inc, upper_inc, interp, normalize)
    }

    /// Like [`TSequence::new`], normalizing as configured.
    pub fn with_defaults(
        instants: Vec<TInstant>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
    ) -> Result<Self> {
        Self::new(instants, lower_inc, upper_inc, interp, config().normalize)
    }

    pub fn discrete(instants: Vec<TInstant>) -> Result<Self> {
        Self::new(instants, true, true, Interpolation::Discrete, false)
    }

    /// A sequence holding a single instant.
    pub fn from_instant(instant: TInstant, interp: Interpolation) -> Result<Self> {
        ensure_valid_interpolation(instant.base_type(), interp)?;
        Self::make(vec![instant], true, true, interp, false)
    }

    fn validate(
        instants: &[TInstant],
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
    ) -> Result<()> {
        ensure_not_empty(instants, "instants")?;
        ensure_max_instants(instants.len())?;
        ensure_valid_bounds(instants.len(), interp, lower_inc, upper_inc)?;
        ensure_valid_interpolation(instants[0].base_type(), interp)?;

        for pair in instants.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            ensure_same_base_type(a.value(), b.value())?;
            ensure_same_frame(a.value(), b.value())?;
            if interp != Interpolation::Discrete {
                ensure_same_route(a.value(), b.value())?;
            }
            ensure_increasing(a.timestamp(), b.timestamp())?;
        }

        let n = instants.len();
        if interp == Interpolation::Step
            && n > 1
            && !upper_inc
            && !datum_eq(instants[n - 2].value(), instants[n - 1].value())?
        {
            return Err(TemporaError::InvalidArgument(
                "Invalid end value for temporal sequence with step interpolation".to_string(),
            ));
        }
        Ok(())
    }

    /// Build without validating; callers guarantee the invariants.
    pub(crate) fn make(
        mut instants: Vec<TInstant>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
        normalize: bool,
    ) -> Result<Self> {
        ensure_not_empty(&instants, "instants")?;
        if normalize && interp != Interpolation::Discrete && instants.len() > 2 {
            instants = normalize_instants(instants, interp)?;
        }
        let (lower_inc, upper_inc) = if instants.len() == 1 {
            (true, true)
        } else {
            (lower_inc, upper_inc)
        };
        let period = Period::new_unchecked(
            instants[0].timestamp(),
            instants[instants.len() - 1].timestamp(),
            lower_inc,
            upper_inc,
        );
        let bbox = BoundingBox::of_instants(&instants, period)?;
        Ok(Self {
            instants,
            interp,
            period,
            bbox,
        })
    }

    pub fn instants(&self) -> &[TInstant] {
        &self.instants
    }

    pub fn into_instants(self) -> Vec<TInstant> {
        self.instants
    }

    pub fn num_instants(&self) -> usize {
        self.instants.len()
    }

    /// The n-th instant, counting from 1.
    pub fn instant_n(&self, n: usize) -> Option<&TInstant> {
        n.checked_sub(1).and_then(|i| self.instants.get(i))
    }

    pub fn start_instant(&self) -> &TInstant {
        &self.instants[0]
    }

    pub fn end_instant(&self) -> &TInstant {
        &self.instants[self.instants.len() - 1]
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interp
    }

    pub fn period(&self) -> &Period {
        &self.period
    }

    pub fn lower_inc(&self) -> bool {
        self.period.lower_inc()
    }

    pub fn upper_inc(&self) -> bool {
        self.period.upper_inc()
    }

    pub fn bbox(&self) -> &BoundingBox {
        &self.bbox
    }

    pub fn base_type(&self) -> TypeTag {
        self.start_instant().base_type()
    }

    pub fn is_instantaneous(&self) -> bool {
        self.instants.len() == 1
    }

    pub fn timestamps(&self) -> Vec<Timestamp> {
        self.instants.iter().map(TInstant::timestamp).collect()
    }

    /// Index of the segment holding `t`, honoring the bounds.
    ///
    /// Meaningful for continuous sequences; an instantaneous sequence has
    /// the single segment 0.
    pub(crate) fn find_segment(&self, t: Timestamp) -> Option<usize> {
        if !self.period.contains(t) {
            return None;
        }
        let n = self.instants.len();
        if n == 1 {
            return Some(0);
        }
        let after = self.instants.partition_point(|inst| inst.timestamp() <= t);
        Some(after.saturating_sub(1).min(n - 2))
    }

    /// Value at `t`, or `None` outside the sequence.
    ///
    /// Without `strict`, exclusive bounds still yield the value of the
    /// boundary instant.
    pub fn value_at_timestamp(&self, t: Timestamp, strict: bool) -> Result<Option<Datum>> {
        if self.interp == Interpolation::Discrete {
            return Ok(self
                .instants
                .binary_search_by(|inst| inst.timestamp().cmp(&t))
                .ok()
                .map(|i| self.instants[i].value().clone()));
        }

        let Some(n) = self.find_segment(t) else {
            if !strict {
                if t == self.period.lower() {
                    return Ok(Some(self.start_instant().value().clone()));
                }
                if t == self.period.upper() {
                    return Ok(Some(self.end_instant().value().clone()));
                }
            }
            return Ok(None);
        };

        let inst1 = &self.instants[n];
        if self.is_instantaneous() || inst1.timestamp() == t {
            return Ok(Some(inst1.value().clone()));
        }
        let inst2 = &self.instants[n + 1];
        segment::value_at(inst1, inst2, self.interp == Interpolation::Linear, t).map(Some)
    }

    /// Restriction to the instant at `t`.
    pub fn at_timestamp(&self, t: Timestamp) -> Result<Option<TInstant>> {
        Ok(self
            .value_at_timestamp(t, true)?
            .map(|value| TInstant::new(value, t)))
    }

    /// Keep the last `n` instants; the new first instant becomes an inclusive bound.
    pub(crate) fn restart(&mut self, n: usize) -> Result<()> {
        if n >= self.instants.len() {
            return Ok(());
        }
        let kept = self.instants.split_off(self.instants.len() - n);
        let upper_inc = self.upper_inc();
        *self = Self::make(kept, true, upper_inc, self.interp, false)?;
        Ok(())
    }
}

/// Remove instants whose value follows from their neighbours.
fn normalize_instants(instants: Vec<TInstant>, interp: Interpolation) -> Result<Vec<TInstant>> {
    let base_type = lookup(instants[0].base_type())?;
    let eps = config().epsilon;
    let linear = interp == Interpolation::Linear;

    let mut result = Vec::with_capacity(instants.len());
    let mut iter = instants.into_iter();
    let (Some(mut inst1), Some(mut inst2)) = (iter.next(), iter.next()) else {
        return Err(TemporaError::InvalidArgument(
            "Normalization needs at least two instants".to_string(),
        ));
    };

    for inst3 in iter {
        let (v1, v2, v3) = (inst1.value(), inst2.value(), inst3.value());
        let v1_eq_v2 = base_type.eq(v1, v2);
        let redundant = if linear {
            let ratio = (inst2.timestamp() - inst1.timestamp()) as f64
                / (inst3.timestamp() - inst1.timestamp()) as f64;
            (v1_eq_v2 && base_type.eq(v2, v3)) || base_type.collinear(v1, v2, v3, ratio, eps)
        } else {
            v1_eq_v2
        };

        if redundant {
            inst2 = inst3;
        } else {
            result.push(std::mem::replace(&mut inst1, inst2));
            inst2 = inst3;
        }
    }
    result.push(inst1);
    result.push(inst2);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    fn floats(values: &[(f64, i64)]) -> Vec<TInstant> {
        values.iter().map(|&(v, s)| TInstant::new(v, t(s))).collect()
    }

    #[test]
    fn test_rejects_empty_and_unordered() {
        assert!(TSequence::new(vec![], true, true, Interpolation::Step, true).is_err());
        let err = TSequence::new(floats(&[(1.0, 5), (2.0, 5)]), true, true, Interpolation::Linear, true)
            .unwrap_err();
        assert!(matches!(err, TemporaError::InvalidArgument(_)));
    }

    #[test]
    fn test_rejects_linear_int() {
        let instants = vec![TInstant::new(1, t(0)), TInstant::new(2, t(1))];
        let err = TSequence::new(instants, true, true, Interpolation::Linear, true).unwrap_err();
        assert!(matches!(err, TemporaError::InvalidInterpolation(_)));
    }

    #[test]
    fn test_rejects_mixed_base_types() {
        let instants = vec![TInstant::new(1, t(0)), TInstant::new(2.0, t(1))];
        let err = TSequence::new(instants, true, true, Interpolation::Step, true).unwrap_err();
        assert!(matches!(err, TemporaError::TypeMismatch(_)));
    }

    #[test]
    fn test_step_exclusive_upper_needs_equal_end_values() {
        let instants = floats(&[(1.0, 0), (2.0, 5)]);
        assert!(TSequence::new(instants, true, false, Interpolation::Step, true).is_err());
        let instants = floats(&[(1.0, 0), (1.0, 5)]);
        assert!(TSequence::new(instants, true, false, Interpolation::Step, true).is_ok());
    }

    #[test]
    fn test_step_normalization_drops_repeats() {
        let instants = floats(&[(1.0, 0), (1.0, 5), (3.0, 10), (3.0, 15)]);
        let seq = TSequence::new(instants, true, true, Interpolation::Step, true).unwrap();
        assert_eq!(seq.timestamps(), vec![t(0), t(10), t(15)]);
    }

    #[test]
    fn test_discrete_is_not_normalized() {
        let seq = TSequence::discrete(floats(&[(1.0, 0), (1.0, 5), (1.0, 10)])).unwrap();
        assert_eq!(seq.num_instants(), 3);
        assert_eq!(seq.value_at_timestamp(t(5), true).unwrap(), Some(Datum::Float(1.0)));
        assert_eq!(seq.value_at_timestamp(t(4), true).unwrap(), None);
    }

    #[test]
    fn test_value_at_step_and_linear() {
        let step = TSequence::new(floats(&[(1.0, 0), (3.0, 10)]), true, true, Interpolation::Step, true)
            .unwrap();
        assert_eq!(step.value_at_timestamp(t(9), true).unwrap(), Some(Datum::Float(1.0)));
        assert_eq!(step.value_at_timestamp(t(10), true).unwrap(), Some(Datum::Float(3.0)));

        let linear = TSequence::new(floats(&[(0.0, 0), (10.0, 10)]), false, true, Interpolation::Linear, true)
            .unwrap();
        assert_eq!(linear.value_at_timestamp(t(4), true).unwrap(), Some(Datum::Float(4.0)));
        assert_eq!(linear.value_at_timestamp(t(0), true).unwrap(), None);
        assert_eq!(linear.value_at_timestamp(t(0), false).unwrap(), Some(Datum::Float(0.0)));
    }

    #[test]
    fn test_restart_keeps_last_instants() {
        let mut seq = TSequence::new(
            floats(&[(0.0, 0), (5.0, 1), (1.0, 2), (7.0, 3)]),
            false,
            false,
            Interpolation::Linear,
            true,
        )
        .unwrap();
        seq.restart(2).unwrap();
        assert_eq!(seq.timestamps(), vec![t(2), t(3)]);
        assert!(seq.lower_inc());
        assert!(!seq.upper_inc());

        seq.restart(1).unwrap();
        assert!(seq.is_instantaneous());
        assert!(seq.lower_inc() && seq.upper_inc());
    }

    #[test]
    fn test_instant_n_is_one_based() {
        let seq = TSequence::discrete(floats(&[(1.0, 0), (2.0, 5)])).unwrap();
        assert_eq!(seq.instant_n(1).map(|i| i.timestamp()), Some(t(0)));
        assert!(seq.instant_n(0).is_none());
        assert!(seq.instant_n(3).is_none());
    }
}
