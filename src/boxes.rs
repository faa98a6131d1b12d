//! Bounding boxes cached by sequences and sequence sets.

use crate::base::builtin::float_cmp;
use crate::base::{Extent, SpatialExtent, lookup};
use crate::error::Result;
use crate::period::Period;
use crate::temporal::TInstant;
use geo::Rect;
use std::cmp::Ordering;

/// Numeric value span crossed with a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TBox {
    pub min: f64,
    pub max: f64,
    pub period: Period,
}

/// Spatial extent crossed with a period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct STBox {
    pub rect: Rect<f64>,
    /// z extent of 3D values
    pub z: Option<(f64, f64)>,
    pub srid: i32,
    pub geodetic: bool,
    pub period: Period,
}

impl STBox {
    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    fn union_rect(&self, other: &STBox) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.min_x().min(other.min_x()), y: self.min_y().min(other.min_y()) },
            geo::coord! { x: self.max_x().max(other.max_x()), y: self.max_y().max(other.max_y()) },
        )
    }

    fn intersects(&self, other: &STBox) -> bool {
        let xy = !(self.max_x() < other.min_x()
            || self.min_x() > other.max_x()
            || self.max_y() < other.min_y()
            || self.min_y() > other.max_y());
        let z = match (self.z, other.z) {
            (Some((a1, a2)), Some((b1, b2))) => !(a2 < b1 || a1 > b2),
            _ => true,
        };
        xy && z
    }
}

/// Summary of a temporal value used for cheap comparisons and overlap tests.
///
/// The variant is determined by the base type: numbers get a [`TBox`],
/// spatial values an [`STBox`] and everything else only its [`Period`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingBox {
    Period(Period),
    TBox(TBox),
    STBox(STBox),
}

impl BoundingBox {
    /// Box of a single instant.
    pub fn of_instant(instant: &TInstant) -> Result<Self> {
        let period = Period::instant(instant.timestamp());
        let value = instant.value();
        let extent = lookup(value.type_tag())?.extent(value);
        Ok(Self::from_extent(extent, period))
    }

    /// Box covering every instant, with the time dimension given by `period`.
    pub fn of_instants(instants: &[TInstant], period: Period) -> Result<Self> {
        let mut boxes = instants.iter().map(Self::of_instant);
        let mut bbox = match boxes.next() {
            Some(first) => first?,
            None => return Ok(BoundingBox::Period(period)),
        };
        for next in boxes {
            bbox.expand(&next?);
        }
        bbox.set_period(period);
        Ok(bbox)
    }

    fn from_extent(extent: Extent, period: Period) -> Self {
        match extent {
            Extent::None => BoundingBox::Period(period),
            Extent::Value(v) => BoundingBox::TBox(TBox {
                min: v,
                max: v,
                period,
            }),
            Extent::Space(SpatialExtent {
                rect,
                z,
                srid,
                geodetic,
            }) => BoundingBox::STBox(STBox {
                rect,
                z,
                srid,
                geodetic,
                period,
            }),
        }
    }

    pub fn period(&self) -> &Period {
        match self {
            BoundingBox::Period(p) => p,
            BoundingBox::TBox(b) => &b.period,
            BoundingBox::STBox(b) => &b.period,
        }
    }

    pub(crate) fn set_period(&mut self, period: Period) {
        match self {
            BoundingBox::Period(p) => *p = period,
            BoundingBox::TBox(b) => b.period = period,
            BoundingBox::STBox(b) => b.period = period,
        }
    }

    /// Grow this box to cover `other`.
    ///
    /// Boxes of different kinds only merge their periods.
    pub fn expand(&mut self, other: &BoundingBox) {
        let period = self.period().expand(other.period());
        match (self, other) {
            (BoundingBox::TBox(a), BoundingBox::TBox(b)) => {
                a.min = a.min.min(b.min);
                a.max = a.max.max(b.max);
                a.period = period;
            }
            (BoundingBox::STBox(a), BoundingBox::STBox(b)) => {
                a.rect = a.union_rect(b);
                a.z = match (a.z, b.z) {
                    (Some((a1, a2)), Some((b1, b2))) => Some((a1.min(b1), a2.max(b2))),
                    (z, None) | (None, z) => z,
                };
                a.period = period;
            }
            (this, _) => this.set_period(period),
        }
    }

    /// Boxes overlap in time and, when both have one, in value or space.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        if !self.period().overlaps(other.period()) {
            return false;
        }
        match (self, other) {
            (BoundingBox::TBox(a), BoundingBox::TBox(b)) => !(a.max < b.min || a.min > b.max),
            (BoundingBox::STBox(a), BoundingBox::STBox(b)) => a.intersects(b),
            _ => true,
        }
    }

    fn kind(&self) -> u8 {
        match self {
            BoundingBox::Period(_) => 0,
            BoundingBox::TBox(_) => 1,
            BoundingBox::STBox(_) => 2,
        }
    }

    /// Total order: period first, then the value or spatial extent.
    pub fn total_cmp(&self, other: &BoundingBox) -> Ordering {
        let by_period = self.period().span_cmp(other.period());
        if by_period != Ordering::Equal {
            return by_period;
        }
        match (self, other) {
            (BoundingBox::Period(_), BoundingBox::Period(_)) => Ordering::Equal,
            (BoundingBox::TBox(a), BoundingBox::TBox(b)) => {
                float_cmp(a.min, b.min).then_with(|| float_cmp(a.max, b.max))
            }
            (BoundingBox::STBox(a), BoundingBox::STBox(b)) => float_cmp(a.min_x(), b.min_x())
                .then_with(|| float_cmp(a.min_y(), b.min_y()))
                .then_with(|| cmp_z(a.z.map(|z| z.0), b.z.map(|z| z.0)))
                .then_with(|| float_cmp(a.max_x(), b.max_x()))
                .then_with(|| float_cmp(a.max_y(), b.max_y()))
                .then_with(|| cmp_z(a.z.map(|z| z.1), b.z.map(|z| z.1)))
                .then_with(|| a.srid.cmp(&b.srid))
                .then_with(|| a.geodetic.cmp(&b.geodetic)),
            _ => self.kind().cmp(&other.kind()),
        }
    }

    /// Bytes taken by the cached box.
    pub fn byte_size(&self) -> usize {
        match self {
            BoundingBox::Period(_) => 24,
            BoundingBox::TBox(_) => 40,
            BoundingBox::STBox(_) => 80,
        }
    }
}

fn cmp_z(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => float_cmp(x, y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::Datum;
    use tempora_types::{CircularBuffer, SpatialPoint, Timestamp};

    fn inst(value: impl Into<Datum>, secs: i64) -> TInstant {
        TInstant::new(value, Timestamp::from_secs(secs))
    }

    #[test]
    fn test_numeric_box() {
        let instants = vec![inst(3.0, 0), inst(-1.0, 5), inst(2.0, 10)];
        let period = Period::new(Timestamp::from_secs(0), Timestamp::from_secs(10), true, true).unwrap();
        let bbox = BoundingBox::of_instants(&instants, period).unwrap();
        match bbox {
            BoundingBox::TBox(b) => {
                assert_eq!((b.min, b.max), (-1.0, 3.0));
                assert_eq!(b.period, period);
            }
            other => panic!("expected a TBox, got {:?}", other),
        }
    }

    #[test]
    fn test_cbuffer_box_includes_radius() {
        let center = SpatialPoint::new(1.0, 1.0);
        let bbox = BoundingBox::of_instant(&inst(CircularBuffer::new(center, 0.5), 0)).unwrap();
        let BoundingBox::STBox(b) = bbox else {
            panic!("expected an STBox");
        };
        assert_eq!((b.min_x(), b.max_x()), (0.5, 1.5));
        assert_eq!(b.z, None);
    }

    #[test]
    fn test_text_box_is_period() {
        let bbox = BoundingBox::of_instant(&inst("a", 3)).unwrap();
        assert_eq!(bbox, BoundingBox::Period(Period::instant(Timestamp::from_secs(3))));
    }

    #[test]
    fn test_cmp_and_overlap() {
        let a = BoundingBox::of_instant(&inst(1.0, 0)).unwrap();
        let b = BoundingBox::of_instant(&inst(2.0, 0)).unwrap();
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert!(!a.overlaps(&b));

        let mut c = a;
        c.expand(&b);
        assert!(c.overlaps(&a) && c.overlaps(&b));
    }
}
