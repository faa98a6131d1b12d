use crate::base::{Datum, TypeTag};
use serde::{Deserialize, Serialize};
use tempora_types::Timestamp;

/// One base value at one timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TInstant {
    value: Datum,
    t: Timestamp,
}

impl TInstant {
    pub fn new(value: impl Into<Datum>, t: Timestamp) -> Self {
        Self {
            value: value.into(),
            t,
        }
    }

    pub fn value(&self) -> &Datum {
        &self.value
    }

    pub fn timestamp(&self) -> Timestamp {
        self.t
    }

    pub fn base_type(&self) -> TypeTag {
        self.value.type_tag()
    }

    /// Same timestamp, new value.
    pub fn with_value(&self, value: Datum) -> Self {
        Self { value, t: self.t }
    }

    pub fn into_value(self) -> Datum {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let inst = TInstant::new(2.5, Timestamp::from_secs(10));
        assert_eq!(inst.value(), &Datum::Float(2.5));
        assert_eq!(inst.timestamp(), Timestamp::from_secs(10));
        assert_eq!(inst.base_type(), TypeTag::Float);
        assert_eq!(inst.with_value(Datum::Float(1.0)).timestamp(), inst.timestamp());
    }
}
