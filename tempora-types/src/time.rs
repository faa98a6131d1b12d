use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const MICROS_PER_SECOND: i64 = 1_000_000;

/// A point in time with microsecond resolution, counted from the Unix epoch.
///
/// Timestamps before the epoch are negative.
///
/// # Examples
///
/// ```
/// use tempora_types::time::Timestamp;
/// use std::time::{Duration, UNIX_EPOCH};
///
/// let t = Timestamp::from(UNIX_EPOCH + Duration::from_secs(10));
/// assert_eq!(t, Timestamp::from_secs(10));
/// assert_eq!(t - Timestamp::from_secs(4), 6_000_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const MIN: Timestamp = Timestamp(i64::MIN);
    pub const MAX: Timestamp = Timestamp(i64::MAX);

    pub const fn from_micros(micros: i64) -> Self {
        Self(micros)
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(MICROS_PER_SECOND))
    }

    pub const fn micros(self) -> i64 {
        self.0
    }

    pub fn now() -> Self {
        Self::from(SystemTime::now())
    }

    /// Convert back to a `SystemTime`.
    pub fn to_system_time(self) -> SystemTime {
        if self.0 >= 0 {
            UNIX_EPOCH + Duration::from_micros(self.0 as u64)
        } else {
            UNIX_EPOCH - Duration::from_micros(self.0.unsigned_abs())
        }
    }

    pub fn checked_add_micros(self, micros: i64) -> Option<Self> {
        self.0.checked_add(micros).map(Self)
    }

    /// Move the timestamp forward by a fractional number of microseconds,
    /// truncating toward the start and saturating at the representable range.
    pub fn offset_by(self, micros: f64) -> Self {
        Self::saturating(i128::from(self.0) + micros as i128)
    }

    /// Timestamp halfway between `self` and `other`, rounded toward `self`.
    pub fn midpoint(self, other: Timestamp) -> Self {
        Self::saturating(i128::from(self.0) + (other - self) / 2)
    }

    fn saturating(micros: i128) -> Self {
        Self(micros.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        match time.duration_since(UNIX_EPOCH) {
            Ok(elapsed) => Self(i64::try_from(elapsed.as_micros()).unwrap_or(i64::MAX)),
            Err(before) => Self(
                i64::try_from(before.duration().as_micros())
                    .map(|micros| -micros)
                    .unwrap_or(i64::MIN),
            ),
        }
    }
}

impl From<Timestamp> for SystemTime {
    fn from(t: Timestamp) -> Self {
        t.to_system_time()
    }
}

impl Sub for Timestamp {
    type Output = i128;

    /// Elapsed microseconds between two timestamps. Exact over the whole
    /// timestamp range.
    fn sub(self, rhs: Timestamp) -> i128 {
        i128::from(self.0) - i128::from(rhs.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.0.div_euclid(MICROS_PER_SECOND);
        let micros = self.0.rem_euclid(MICROS_PER_SECOND);
        write!(f, "{}.{:06}", secs, micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_time_roundtrip() {
        let t = Timestamp::from_micros(1_234_567);
        assert_eq!(Timestamp::from(t.to_system_time()), t);
    }

    #[test]
    fn test_before_epoch() {
        let before = UNIX_EPOCH - Duration::from_secs(2);
        let t = Timestamp::from(before);
        assert_eq!(t.micros(), -2_000_000);
        assert_eq!(t.to_system_time(), before);
    }

    #[test]
    fn test_midpoint_and_offset() {
        let a = Timestamp::from_micros(10);
        let b = Timestamp::from_micros(21);
        assert_eq!(a.midpoint(b), Timestamp::from_micros(15));
        assert_eq!(a.offset_by(2.9), Timestamp::from_micros(12));
    }

    #[test]
    fn test_arithmetic_at_the_range_limits() {
        assert_eq!(Timestamp::MAX - Timestamp::MIN, u64::MAX as i128);
        assert_eq!(Timestamp::MIN - Timestamp::MAX, -(u64::MAX as i128));
        assert_eq!(Timestamp::MIN.midpoint(Timestamp::MAX), Timestamp::from_micros(-1));
        assert_eq!(Timestamp::MAX.midpoint(Timestamp::MIN), Timestamp::from_micros(0));
        assert_eq!(Timestamp::MAX.offset_by(10.0), Timestamp::MAX);
        assert_eq!(
            Timestamp::MIN.offset_by(1.0e19),
            Timestamp::from_micros(776_627_963_145_224_192)
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Timestamp::from_micros(1_500_000).to_string(), "1.500000");
        assert_eq!(Timestamp::from_micros(-1).to_string(), "-1.999999");
    }
}
