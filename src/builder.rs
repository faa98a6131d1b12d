//! Fluent construction of temporal sequences
//!
//! Collects instants and bounds, then validates everything at once in
//! [`SequenceBuilder::build`].

use crate::base::Datum;
use crate::config::config;
use crate::error::Result;
use crate::temporal::convert::default_interpolation;
use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};
use crate::validation::ensure_not_empty;
use tempora_types::Timestamp;

/// Builder for sequences with optional bounds, interpolation and normalization.
///
/// # Examples
///
/// ```
/// use tempora::builder::SequenceBuilder;
/// use tempora::temporal::Interpolation;
/// use tempora_types::Timestamp;
///
/// let seq = SequenceBuilder::new()
///     .instant(1.0, Timestamp::from_secs(0))
///     .instant(3.0, Timestamp::from_secs(10))
///     .upper_inc(false)
///     .build()
///     .unwrap();
/// assert_eq!(seq.interpolation(), Interpolation::Linear);
/// assert!(!seq.upper_inc());
/// ```
#[derive(Debug, Clone)]
pub struct SequenceBuilder {
    instants: Vec<TInstant>,
    lower_inc: bool,
    upper_inc: bool,
    interp: Option<Interpolation>,
    normalize: Option<bool>,
}

impl SequenceBuilder {
    /// Create a builder for a sequence with inclusive bounds.
    pub fn new() -> Self {
        Self {
            instants: Vec::new(),
            lower_inc: true,
            upper_inc: true,
            interp: None,
            normalize: None,
        }
    }

    /// Append one instant.
    pub fn instant(mut self, value: impl Into<Datum>, t: Timestamp) -> Self {
        self.instants.push(TInstant::new(value, t));
        self
    }

    /// Append instants in order.
    pub fn instants<I: IntoIterator<Item = TInstant>>(mut self, instants: I) -> Self {
        self.instants.extend(instants);
        self
    }

    pub fn lower_inc(mut self, inclusive: bool) -> Self {
        self.lower_inc = inclusive;
        self
    }

    pub fn upper_inc(mut self, inclusive: bool) -> Self {
        self.upper_inc = inclusive;
        self
    }

    pub fn bounds(self, lower_inc: bool, upper_inc: bool) -> Self {
        self.lower_inc(lower_inc).upper_inc(upper_inc)
    }

    /// Set the interpolation. Without one, continuous base types interpolate
    /// linearly and the others stepwise.
    pub fn interpolation(mut self, interp: Interpolation) -> Self {
        self.interp = Some(interp);
        self
    }

    pub fn discrete(self) -> Self {
        self.interpolation(Interpolation::Discrete)
    }

    /// Override the configured normalization for this sequence.
    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = Some(normalize);
        self
    }

    pub fn len(&self) -> usize {
        self.instants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instants.is_empty()
    }

    /// Validate the collected instants and build the sequence.
    pub fn build(self) -> Result<TSequence> {
        ensure_not_empty(&self.instants, "instants")?;
        let interp = self
            .interp
            .unwrap_or_else(|| default_interpolation(&self.instants[0]));
        let normalize = self.normalize.unwrap_or(config().normalize);
        if interp == Interpolation::Discrete {
            return TSequence::new(self.instants, true, true, interp, false);
        }
        TSequence::new(self.instants, self.lower_inc, self.upper_inc, interp, normalize)
    }

    /// Build the value, keeping a single instant as an instant.
    pub fn build_temporal(self) -> Result<Temporal> {
        if self.instants.len() == 1 && self.interp.is_none() {
            let mut instants = self.instants;
            return Ok(instants.swap_remove(0).into());
        }
        self.build().map(Temporal::from)
    }

    /// Build the sequence as the only member of a sequence set.
    pub fn build_set(self) -> Result<TSequenceSet> {
        let normalize = self.normalize.unwrap_or(config().normalize);
        TSequenceSet::new(vec![self.build()?], normalize)
    }
}

impl Default for SequenceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TemporaError;
    use tempora_types::SpatialPoint;

    fn t(secs: i64) -> Timestamp {
        Timestamp::from_secs(secs)
    }

    #[test]
    fn test_builder_default() {
        let builder = SequenceBuilder::new();
        assert!(builder.is_empty());
        assert!(builder.lower_inc && builder.upper_inc);
        assert!(builder.interp.is_none());
    }

    #[test]
    fn test_builder_rejects_empty() {
        let err = SequenceBuilder::new().build().unwrap_err();
        assert!(matches!(err, TemporaError::InvalidArgument(_)));
    }

    #[test]
    fn test_builder_default_interpolation() {
        let floats = SequenceBuilder::new()
            .instant(1.0, t(0))
            .instant(2.0, t(1))
            .build()
            .unwrap();
        assert_eq!(floats.interpolation(), Interpolation::Linear);

        let ints = SequenceBuilder::new()
            .instant(1, t(0))
            .instant(2, t(1))
            .build()
            .unwrap();
        assert_eq!(ints.interpolation(), Interpolation::Step);

        let points = SequenceBuilder::new()
            .instant(SpatialPoint::new(0.0, 0.0), t(0))
            .instant(SpatialPoint::new(1.0, 1.0), t(1))
            .build()
            .unwrap();
        assert_eq!(points.interpolation(), Interpolation::Linear);
    }

    #[test]
    fn test_builder_normalize_override() {
        let build = |normalize| {
            SequenceBuilder::new()
                .instant(1.0, t(0))
                .instant(2.0, t(1))
                .instant(3.0, t(2))
                .normalize(normalize)
                .build()
                .unwrap()
        };
        assert_eq!(build(true).num_instants(), 2);
        assert_eq!(build(false).num_instants(), 3);
    }

    #[test]
    fn test_builder_discrete_ignores_bounds() {
        let seq = SequenceBuilder::new()
            .instants(vec![TInstant::new(1, t(0)), TInstant::new(1, t(1))])
            .bounds(false, false)
            .discrete()
            .build()
            .unwrap();
        assert_eq!(seq.num_instants(), 2);
        assert!(seq.lower_inc() && seq.upper_inc());
    }

    #[test]
    fn test_builder_temporal_variants() {
        let single = SequenceBuilder::new().instant(true, t(0)).build_temporal().unwrap();
        assert!(matches!(single, Temporal::Instant(_)));

        let set = SequenceBuilder::new()
            .instant(true, t(0))
            .instant(false, t(1))
            .build_set()
            .unwrap();
        assert_eq!(set.num_sequences(), 1);
    }
}
