//! Base types shipped with the crate.

use super::datum::{Datum, TypeTag};
use super::registry::{BaseType, Extent, SpatialExtent, TypeLength, seeded_hash};
use crate::error::{Result, TemporaError};
use geo::{Coord, Rect};
use std::cmp::Ordering;
use tempora_types::pose::normalize_angle;
use tempora_types::{CircularBuffer, NetworkPoint, Orientation, Pose, Quaternion, SpatialPoint};

pub(crate) fn builtin_types() -> Vec<Box<dyn BaseType>> {
    vec![
        Box::new(BoolType),
        Box::new(IntType),
        Box::new(BigIntType),
        Box::new(FloatType),
        Box::new(TextType),
        Box::new(PointType { geodetic: false }),
        Box::new(PointType { geodetic: true }),
        Box::new(CbufferType),
        Box::new(PoseType),
        Box::new(NpointType),
    ]
}

/// Total order on floats: NaN sorts after every number and `-0.0 == 0.0`.
pub fn float_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

pub fn float_eq(a: f64, b: f64) -> bool {
    float_cmp(a, b) == Ordering::Equal
}

/// Bits of a float with `-0.0` and every NaN mapped to one representation.
pub fn canonical_bits(v: f64) -> u64 {
    if v == 0.0 {
        0
    } else if v.is_nan() {
        f64::NAN.to_bits()
    } else {
        v.to_bits()
    }
}

fn mismatch(name: &str, value: &Datum) -> TemporaError {
    TemporaError::TypeMismatch(format!(
        "Expected a {} value, got {}",
        name,
        value.type_tag()
    ))
}

fn parse_error(name: &str, text: &str) -> TemporaError {
    TemporaError::InvalidArgument(format!("Invalid input syntax for type {}: \"{}\"", name, text))
}

fn parse_f64(name: &str, text: &str) -> Result<f64> {
    text.trim().parse::<f64>().map_err(|_| parse_error(name, text))
}

/// Fraction of `v1 -> v2` where the segment takes `value`, excluding the endpoints.
fn locate_number(v1: f64, v2: f64, value: f64, eps: f64) -> Option<f64> {
    if value == v1 || value == v2 {
        return None;
    }
    let (min, max) = if v1 < v2 { (v1, v2) } else { (v2, v1) };
    if value < min || value > max {
        return None;
    }
    let span = max - min;
    let partial = value - min;
    let fraction = if v1 < v2 {
        partial / span
    } else {
        1.0 - partial / span
    };
    if fraction < -eps || fraction > 1.0 + eps {
        return None;
    }
    Some(fraction)
}

/// Fraction where the segments `x1 -> x2` and `x3 -> x4` meet.
fn cross_numbers(x1: f64, x2: f64, x3: f64, x4: f64, eps: f64) -> Option<f64> {
    let denom = x2 - x1 - x4 + x3;
    if denom == 0.0 {
        return None;
    }
    let fraction = (x3 - x1) / denom;
    if fraction < -eps || fraction > 1.0 + eps {
        return None;
    }
    Some(fraction)
}

fn number_collinear(v1: f64, v2: f64, v3: f64, ratio: f64, eps: f64) -> bool {
    let value = v1 + (v3 - v1) * ratio;
    (v2 - value).abs() <= eps
}

/// Fraction where the moving difference `d1 -> d2` reaches the origin.
///
/// The fraction is solved on the axis with the largest change and then
/// checked on every axis.
fn solve_zero(d1: [f64; 3], d2: [f64; 3], eps: f64) -> Option<f64> {
    let delta = [d2[0] - d1[0], d2[1] - d1[1], d2[2] - d1[2]];
    let axis = (0..3).max_by(|&a, &b| float_cmp(delta[a].abs(), delta[b].abs()))?;
    if delta[axis] == 0.0 {
        return None;
    }
    let fraction = -d1[axis] / delta[axis];
    if fraction < -eps || fraction > 1.0 + eps {
        return None;
    }
    let on_all_axes = (0..3).all(|i| (d1[i] + delta[i] * fraction).abs() <= eps);
    on_all_axes.then_some(fraction)
}

fn point_collinear(p1: &SpatialPoint, p2: &SpatialPoint, p3: &SpatialPoint, ratio: f64, eps: f64) -> bool {
    p1.lerp(p3, ratio).distance(p2) <= eps
}

fn point_cmp(a: &SpatialPoint, b: &SpatialPoint) -> Ordering {
    a.srid
        .cmp(&b.srid)
        .then_with(|| a.geodetic.cmp(&b.geodetic))
        .then_with(|| float_cmp(a.x(), b.x()))
        .then_with(|| float_cmp(a.y(), b.y()))
        .then_with(|| match (a.z, b.z) {
            (Some(z1), Some(z2)) => float_cmp(z1, z2),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
        })
}

fn point_eq(a: &SpatialPoint, b: &SpatialPoint) -> bool {
    a.same_frame(b) && point_cmp(a, b) == Ordering::Equal
}

fn point_hash(p: &SpatialPoint, seed: u64) -> u64 {
    let z = p.z.map(canonical_bits);
    seeded_hash(
        &(p.srid, p.geodetic, canonical_bits(p.x()), canonical_bits(p.y()), z),
        seed,
    )
}

fn point_text(p: &SpatialPoint) -> String {
    let body = match p.z {
        Some(z) => format!("POINT Z({} {} {})", p.x(), p.y(), z),
        None => format!("POINT({} {})", p.x(), p.y()),
    };
    if p.srid != 0 {
        format!("SRID={};{}", p.srid, body)
    } else {
        body
    }
}

/// Parse `[SRID=n;]POINT[ Z](x y [z])`.
fn parse_point(name: &str, text: &str, geodetic: bool) -> Result<SpatialPoint> {
    let trimmed = text.trim();
    let (srid, body) = match trimmed.split_once(';') {
        Some((prefix, rest)) => {
            let digits = prefix
                .trim()
                .strip_prefix("SRID=")
                .or_else(|| prefix.trim().strip_prefix("srid="))
                .ok_or_else(|| parse_error(name, text))?;
            let srid = digits.parse::<i32>().map_err(|_| parse_error(name, text))?;
            (Some(srid), rest.trim())
        }
        None => (None, trimmed),
    };

    let upper = body.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("POINT")
        .ok_or_else(|| parse_error(name, text))?
        .trim_start();
    let (has_z, rest) = match rest.strip_prefix('Z') {
        Some(r) => (true, r.trim_start()),
        None => (false, rest),
    };
    let coords = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .ok_or_else(|| parse_error(name, text))?;
    let values = coords
        .split_whitespace()
        .map(|s| s.parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .map_err(|_| parse_error(name, text))?;

    let mut point = match (has_z, values.as_slice()) {
        (false, [x, y]) => SpatialPoint::new(*x, *y),
        (_, [x, y, z]) => SpatialPoint::new_3d(*x, *y, *z),
        _ => return Err(parse_error(name, text)),
    };
    if let Some(srid) = srid {
        point = point.with_srid(srid);
    }
    if geodetic {
        point = point.geodetic();
    }
    Ok(point)
}

/// Split `POINT(...)rest` after the closing parenthesis of the point.
fn split_point_prefix<'a>(name: &str, text: &'a str) -> Result<(&'a str, &'a str)> {
    let end = text.find(')').ok_or_else(|| parse_error(name, text))?;
    Ok(text.split_at(end + 1))
}

/// Strip a case-insensitive `Name(` prefix and the matching `)` suffix.
fn strip_call<'a>(name: &str, keyword: &str, text: &'a str) -> Result<&'a str> {
    let trimmed = text.trim();
    let open = trimmed.find('(').ok_or_else(|| parse_error(name, text))?;
    if !trimmed[..open].trim().eq_ignore_ascii_case(keyword) {
        return Err(parse_error(name, text));
    }
    trimmed[open + 1..]
        .strip_suffix(')')
        .ok_or_else(|| parse_error(name, text))
}

fn point_extent(p: &SpatialPoint, margin: f64) -> SpatialExtent {
    SpatialExtent {
        rect: Rect::new(
            Coord {
                x: p.x() - margin,
                y: p.y() - margin,
            },
            Coord {
                x: p.x() + margin,
                y: p.y() + margin,
            },
        ),
        z: p.z.map(|z| (z - margin, z + margin)),
        srid: p.srid,
        geodetic: p.geodetic,
    }
}

pub struct BoolType;

impl BaseType for BoolType {
    fn tag(&self) -> TypeTag {
        TypeTag::Bool
    }

    fn name(&self) -> &'static str {
        "bool"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Fixed(1)
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        matches!((a, b), (Datum::Bool(x), Datum::Bool(y)) if x == y)
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::Bool(x), Datum::Bool(y)) => x.cmp(y),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        seeded_hash(&value.as_bool(), seed)
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Bool(true) => "t".to_string(),
            Datum::Bool(false) => "f".to_string(),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        match text.trim().to_ascii_lowercase().as_str() {
            "t" | "true" => Ok(Datum::Bool(true)),
            "f" | "false" => Ok(Datum::Bool(false)),
            _ => Err(parse_error(self.name(), text)),
        }
    }
}

pub struct IntType;

impl BaseType for IntType {
    fn tag(&self) -> TypeTag {
        TypeTag::Int
    }

    fn name(&self) -> &'static str {
        "int"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Fixed(4)
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        matches!((a, b), (Datum::Int(x), Datum::Int(y)) if x == y)
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::Int(x), Datum::Int(y)) => x.cmp(y),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::Int(v) => seeded_hash(v, seed),
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Int(v) => v.to_string(),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        text.trim()
            .parse::<i32>()
            .map(Datum::Int)
            .map_err(|_| parse_error(self.name(), text))
    }

    fn extent(&self, value: &Datum) -> Extent {
        value.as_f64().map_or(Extent::None, Extent::Value)
    }
}

pub struct BigIntType;

impl BaseType for BigIntType {
    fn tag(&self) -> TypeTag {
        TypeTag::BigInt
    }

    fn name(&self) -> &'static str {
        "bigint"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Fixed(8)
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        matches!((a, b), (Datum::BigInt(x), Datum::BigInt(y)) if x == y)
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::BigInt(x), Datum::BigInt(y)) => x.cmp(y),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::BigInt(v) => seeded_hash(v, seed),
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::BigInt(v) => v.to_string(),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        text.trim()
            .parse::<i64>()
            .map(Datum::BigInt)
            .map_err(|_| parse_error(self.name(), text))
    }

    fn extent(&self, value: &Datum) -> Extent {
        value.as_f64().map_or(Extent::None, Extent::Value)
    }
}

pub struct FloatType;

impl BaseType for FloatType {
    fn tag(&self) -> TypeTag {
        TypeTag::Float
    }

    fn name(&self) -> &'static str {
        "float"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Fixed(8)
    }

    fn continuous(&self) -> bool {
        true
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        matches!((a, b), (Datum::Float(x), Datum::Float(y)) if float_eq(*x, *y))
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::Float(x), Datum::Float(y)) => float_cmp(*x, *y),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::Float(v) => seeded_hash(&canonical_bits(*v), seed),
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Float(v) => v.to_string(),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        parse_f64(self.name(), text).map(Datum::Float)
    }

    fn interpolate(&self, a: &Datum, b: &Datum, ratio: f64) -> Result<Datum> {
        match (a, b) {
            (Datum::Float(x), Datum::Float(y)) => Ok(Datum::Float(x + (y - x) * ratio)),
            (Datum::Float(_), other) | (other, _) => Err(mismatch(self.name(), other)),
        }
    }

    fn collinear(&self, a: &Datum, b: &Datum, c: &Datum, ratio: f64, eps: f64) -> bool {
        match (a, b, c) {
            (Datum::Float(x1), Datum::Float(x2), Datum::Float(x3)) => {
                number_collinear(*x1, *x2, *x3, ratio, eps)
            }
            _ => false,
        }
    }

    fn locate(&self, start: &Datum, end: &Datum, value: &Datum, eps: f64) -> Option<f64> {
        match (start, end) {
            (Datum::Float(v1), Datum::Float(v2)) => locate_number(*v1, *v2, value.as_f64()?, eps),
            _ => None,
        }
    }

    fn segment_crossing(
        &self,
        start1: &Datum,
        end1: &Datum,
        start2: &Datum,
        end2: &Datum,
        eps: f64,
    ) -> Option<f64> {
        cross_numbers(
            start1.as_f64()?,
            end1.as_f64()?,
            start2.as_f64()?,
            end2.as_f64()?,
            eps,
        )
    }

    fn extent(&self, value: &Datum) -> Extent {
        value.as_f64().map_or(Extent::None, Extent::Value)
    }
}

pub struct TextType;

impl BaseType for TextType {
    fn tag(&self) -> TypeTag {
        TypeTag::Text
    }

    fn name(&self) -> &'static str {
        "text"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Variable
    }

    fn byte_size(&self, value: &Datum) -> usize {
        match value {
            Datum::Text(s) => s.len() + 4,
            _ => 4,
        }
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        matches!((a, b), (Datum::Text(x), Datum::Text(y)) if x == y)
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::Text(x), Datum::Text(y)) => x.cmp(y),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::Text(s) => seeded_hash(s.as_str(), seed),
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Text(s) => s.clone(),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        Ok(Datum::Text(text.to_string()))
    }
}

/// Geometry (planar) or geography (geodetic) points.
pub struct PointType {
    pub geodetic: bool,
}

impl PointType {
    fn points<'a>(&self, a: &'a Datum, b: &'a Datum) -> Option<(&'a SpatialPoint, &'a SpatialPoint)> {
        match (a, b) {
            (Datum::Point(p), Datum::Point(q)) => Some((p, q)),
            _ => None,
        }
    }
}

impl BaseType for PointType {
    fn tag(&self) -> TypeTag {
        if self.geodetic {
            TypeTag::GeogPoint
        } else {
            TypeTag::GeomPoint
        }
    }

    fn name(&self) -> &'static str {
        if self.geodetic {
            "geogpoint"
        } else {
            "geompoint"
        }
    }

    fn length(&self) -> TypeLength {
        TypeLength::Variable
    }

    fn byte_size(&self, value: &Datum) -> usize {
        if value.has_z() { 32 } else { 24 }
    }

    fn continuous(&self) -> bool {
        true
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        self.points(a, b).is_some_and(|(p, q)| point_eq(p, q))
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match self.points(a, b) {
            Some((p, q)) => point_cmp(p, q),
            None => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::Point(p) => point_hash(p, seed),
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Point(p) => point_text(p),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        parse_point(self.name(), text, self.geodetic).map(Datum::Point)
    }

    fn interpolate(&self, a: &Datum, b: &Datum, ratio: f64) -> Result<Datum> {
        match self.points(a, b) {
            Some((p, q)) => Ok(Datum::Point(p.lerp(q, ratio))),
            None => Err(mismatch(self.name(), if matches!(a, Datum::Point(_)) { b } else { a })),
        }
    }

    fn collinear(&self, a: &Datum, b: &Datum, c: &Datum, ratio: f64, eps: f64) -> bool {
        match (a, b, c) {
            (Datum::Point(p1), Datum::Point(p2), Datum::Point(p3)) => {
                point_collinear(p1, p2, p3, ratio, eps)
            }
            _ => false,
        }
    }

    fn locate(&self, start: &Datum, end: &Datum, value: &Datum, eps: f64) -> Option<f64> {
        let (p1, p2) = self.points(start, end)?;
        let Datum::Point(q) = value else {
            return None;
        };
        if point_eq(p1, q) || point_eq(p2, q) {
            return None;
        }
        let (a, b, v) = (p1.coords(), p2.coords(), q.coords());
        let d1 = [a[0] - v[0], a[1] - v[1], a[2] - v[2]];
        let d2 = [b[0] - v[0], b[1] - v[1], b[2] - v[2]];
        solve_zero(d1, d2, eps)
    }

    fn segment_crossing(
        &self,
        start1: &Datum,
        end1: &Datum,
        start2: &Datum,
        end2: &Datum,
        eps: f64,
    ) -> Option<f64> {
        let (a1, a2) = self.points(start1, end1)?;
        let (b1, b2) = self.points(start2, end2)?;
        let (a1, a2, b1, b2) = (a1.coords(), a2.coords(), b1.coords(), b2.coords());
        let d1 = [a1[0] - b1[0], a1[1] - b1[1], a1[2] - b1[2]];
        let d2 = [a2[0] - b2[0], a2[1] - b2[1], a2[2] - b2[2]];
        solve_zero(d1, d2, eps)
    }

    fn extent(&self, value: &Datum) -> Extent {
        match value {
            Datum::Point(p) => Extent::Space(point_extent(p, 0.0)),
            _ => Extent::None,
        }
    }
}

pub struct CbufferType;

impl BaseType for CbufferType {
    fn tag(&self) -> TypeTag {
        TypeTag::Cbuffer
    }

    fn name(&self) -> &'static str {
        "cbuffer"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Variable
    }

    fn byte_size(&self, value: &Datum) -> usize {
        if value.has_z() { 40 } else { 32 }
    }

    fn continuous(&self) -> bool {
        true
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        matches!((a, b), (Datum::Cbuffer(x), Datum::Cbuffer(y))
            if point_eq(&x.center, &y.center) && float_eq(x.radius, y.radius))
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::Cbuffer(x), Datum::Cbuffer(y)) => point_cmp(&x.center, &y.center)
                .then_with(|| float_cmp(x.radius, y.radius)),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::Cbuffer(c) => seeded_hash(&canonical_bits(c.radius), point_hash(&c.center, seed)),
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Cbuffer(c) => format!("Cbuffer({},{})", point_text(&c.center), c.radius),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        let inner = strip_call(self.name(), "cbuffer", text)?;
        let (point, rest) = split_point_prefix(self.name(), inner)?;
        let radius_text = rest
            .trim_start()
            .strip_prefix(',')
            .ok_or_else(|| parse_error(self.name(), text))?;
        let radius = parse_f64(self.name(), radius_text)?;
        if radius < 0.0 {
            return Err(TemporaError::InvalidArgument(format!(
                "The radius of a circular buffer cannot be negative: {}",
                radius
            )));
        }
        let center = parse_point(self.name(), point, false)?;
        Ok(Datum::Cbuffer(CircularBuffer::new(center, radius)))
    }

    fn interpolate(&self, a: &Datum, b: &Datum, ratio: f64) -> Result<Datum> {
        match (a, b) {
            (Datum::Cbuffer(x), Datum::Cbuffer(y)) => Ok(Datum::Cbuffer(x.lerp(y, ratio))),
            (Datum::Cbuffer(_), other) | (other, _) => Err(mismatch(self.name(), other)),
        }
    }

    fn collinear(&self, a: &Datum, b: &Datum, c: &Datum, ratio: f64, eps: f64) -> bool {
        match (a, b, c) {
            (Datum::Cbuffer(c1), Datum::Cbuffer(c2), Datum::Cbuffer(c3)) => {
                point_collinear(&c1.center, &c2.center, &c3.center, ratio, eps)
                    && number_collinear(c1.radius, c2.radius, c3.radius, ratio, eps)
            }
            _ => false,
        }
    }

    fn extent(&self, value: &Datum) -> Extent {
        match value {
            Datum::Cbuffer(c) => Extent::Space(point_extent(&c.center, c.radius)),
            _ => Extent::None,
        }
    }
}

fn orientation_cmp(a: &Orientation, b: &Orientation) -> Ordering {
    match (a, b) {
        (Orientation::Planar(x), Orientation::Planar(y)) => float_cmp(*x, *y),
        (Orientation::Spatial(p), Orientation::Spatial(q)) => float_cmp(p.w, q.w)
            .then_with(|| float_cmp(p.x, q.x))
            .then_with(|| float_cmp(p.y, q.y))
            .then_with(|| float_cmp(p.z, q.z)),
        (Orientation::Planar(_), Orientation::Spatial(_)) => Ordering::Less,
        (Orientation::Spatial(_), Orientation::Planar(_)) => Ordering::Greater,
    }
}

fn pose_cmp(a: &Pose, b: &Pose) -> Ordering {
    point_cmp(&a.position, &b.position).then_with(|| orientation_cmp(&a.orientation, &b.orientation))
}

pub struct PoseType;

impl BaseType for PoseType {
    fn tag(&self) -> TypeTag {
        TypeTag::Pose
    }

    fn name(&self) -> &'static str {
        "pose"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Variable
    }

    fn byte_size(&self, value: &Datum) -> usize {
        match value {
            Datum::Pose(p) => match p.orientation {
                Orientation::Planar(_) => 32,
                Orientation::Spatial(_) => 64,
            },
            _ => 0,
        }
    }

    fn continuous(&self) -> bool {
        true
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        matches!((a, b), (Datum::Pose(x), Datum::Pose(y))
            if x.position.same_frame(&y.position) && pose_cmp(x, y) == Ordering::Equal)
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::Pose(x), Datum::Pose(y)) => pose_cmp(x, y),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::Pose(p) => {
                let seed = point_hash(&p.position, seed);
                match p.orientation {
                    Orientation::Planar(theta) => seeded_hash(&canonical_bits(theta), seed),
                    Orientation::Spatial(q) => seeded_hash(
                        &[q.w, q.x, q.y, q.z].map(canonical_bits),
                        seed,
                    ),
                }
            }
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Pose(p) => match p.orientation {
                Orientation::Planar(theta) => format!("Pose({},{})", point_text(&p.position), theta),
                Orientation::Spatial(q) => format!(
                    "Pose({},{},{},{},{})",
                    point_text(&p.position),
                    q.w,
                    q.x,
                    q.y,
                    q.z
                ),
            },
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        let inner = strip_call(self.name(), "pose", text)?;
        let (point, rest) = split_point_prefix(self.name(), inner)?;
        let position = parse_point(self.name(), point, false)?;
        let values = rest
            .split(',')
            .skip(1)
            .map(|s| parse_f64(self.name(), s))
            .collect::<Result<Vec<f64>>>()?;
        match (position.has_z(), values.as_slice()) {
            (false, [theta]) => Ok(Datum::Pose(Pose::planar(position, *theta))),
            (true, [w, x, y, z]) => {
                let rotation = Quaternion::new(*w, *x, *y, *z);
                if (rotation.norm() - 1.0).abs() > 1e-6 {
                    return Err(TemporaError::InvalidArgument(format!(
                        "The orientation of a pose must be a unit quaternion: {}",
                        text
                    )));
                }
                Ok(Datum::Pose(Pose::spatial(position, rotation)))
            }
            _ => Err(parse_error(self.name(), text)),
        }
    }

    fn interpolate(&self, a: &Datum, b: &Datum, ratio: f64) -> Result<Datum> {
        match (a, b) {
            (Datum::Pose(x), Datum::Pose(y)) => x.lerp(y, ratio).map(Datum::Pose).ok_or_else(|| {
                TemporaError::TypeMismatch(
                    "Cannot interpolate a planar pose with a spatial pose".to_string(),
                )
            }),
            (Datum::Pose(_), other) | (other, _) => Err(mismatch(self.name(), other)),
        }
    }

    fn collinear(&self, a: &Datum, b: &Datum, c: &Datum, ratio: f64, eps: f64) -> bool {
        let (Datum::Pose(p1), Datum::Pose(p2), Datum::Pose(p3)) = (a, b, c) else {
            return false;
        };
        if !point_collinear(&p1.position, &p2.position, &p3.position, ratio, eps) {
            return false;
        }
        match (p1.orientation, p2.orientation, p3.orientation) {
            (Orientation::Planar(a1), Orientation::Planar(a2), Orientation::Planar(a3)) => {
                let expected = normalize_angle(a1 + normalize_angle(a3 - a1) * ratio);
                normalize_angle(a2 - expected).abs() <= eps
            }
            (Orientation::Spatial(q1), Orientation::Spatial(q2), Orientation::Spatial(q3)) => {
                let expected = q1.nlerp(&q3, ratio);
                (1.0 - expected.dot(&q2).abs()) <= eps
            }
            _ => false,
        }
    }

    fn extent(&self, value: &Datum) -> Extent {
        match value {
            Datum::Pose(p) => Extent::Space(point_extent(&p.position, 0.0)),
            _ => Extent::None,
        }
    }
}

pub struct NpointType;

impl NpointType {
    fn same_route<'a>(&self, a: &'a Datum, b: &'a Datum) -> Option<(&'a NetworkPoint, &'a NetworkPoint)> {
        match (a, b) {
            (Datum::Npoint(x), Datum::Npoint(y)) if x.same_route(y) => Some((x, y)),
            _ => None,
        }
    }
}

impl BaseType for NpointType {
    fn tag(&self) -> TypeTag {
        TypeTag::Npoint
    }

    fn name(&self) -> &'static str {
        "npoint"
    }

    fn length(&self) -> TypeLength {
        TypeLength::Fixed(16)
    }

    fn continuous(&self) -> bool {
        true
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool {
        self.same_route(a, b)
            .is_some_and(|(x, y)| float_eq(x.position, y.position))
    }

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering {
        match (a, b) {
            (Datum::Npoint(x), Datum::Npoint(y)) => x
                .route
                .cmp(&y.route)
                .then_with(|| float_cmp(x.position, y.position)),
            _ => a.type_tag().cmp(&b.type_tag()),
        }
    }

    fn hash64(&self, value: &Datum, seed: u64) -> u64 {
        match value {
            Datum::Npoint(n) => seeded_hash(&(n.route, canonical_bits(n.position)), seed),
            _ => seed,
        }
    }

    fn output(&self, value: &Datum) -> String {
        match value {
            Datum::Npoint(n) => format!("NPoint({},{})", n.route, n.position),
            other => format!("{:?}", other),
        }
    }

    fn input(&self, text: &str) -> Result<Datum> {
        let inner = strip_call(self.name(), "npoint", text)?;
        let (route, position) = inner
            .split_once(',')
            .ok_or_else(|| parse_error(self.name(), text))?;
        let route = route
            .trim()
            .parse::<i64>()
            .map_err(|_| parse_error(self.name(), text))?;
        let position = parse_f64(self.name(), position)?;
        if !(0.0..=1.0).contains(&position) {
            return Err(TemporaError::InvalidArgument(format!(
                "The relative position of a network point must be in [0, 1]: {}",
                position
            )));
        }
        Ok(Datum::Npoint(NetworkPoint::new(route, position)))
    }

    fn interpolate(&self, a: &Datum, b: &Datum, ratio: f64) -> Result<Datum> {
        match (a, b) {
            (Datum::Npoint(x), Datum::Npoint(y)) if x.same_route(y) => {
                Ok(Datum::Npoint(x.lerp(y, ratio)))
            }
            (Datum::Npoint(_), Datum::Npoint(_)) => Err(TemporaError::TypeMismatch(
                "Cannot interpolate network points on different routes".to_string(),
            )),
            (Datum::Npoint(_), other) | (other, _) => Err(mismatch(self.name(), other)),
        }
    }

    fn collinear(&self, a: &Datum, b: &Datum, c: &Datum, ratio: f64, eps: f64) -> bool {
        match (a, b, c) {
            (Datum::Npoint(n1), Datum::Npoint(n2), Datum::Npoint(n3))
                if n1.same_route(n2) && n2.same_route(n3) =>
            {
                number_collinear(n1.position, n2.position, n3.position, ratio, eps)
            }
            _ => false,
        }
    }

    fn locate(&self, start: &Datum, end: &Datum, value: &Datum, eps: f64) -> Option<f64> {
        let (n1, n2) = self.same_route(start, end)?;
        let (_, v) = self.same_route(start, value)?;
        locate_number(n1.position, n2.position, v.position, eps)
    }

    fn segment_crossing(
        &self,
        start1: &Datum,
        end1: &Datum,
        start2: &Datum,
        end2: &Datum,
        eps: f64,
    ) -> Option<f64> {
        let (a1, a2) = self.same_route(start1, end1)?;
        let (b1, b2) = self.same_route(start2, end2)?;
        if !a1.same_route(b1) {
            return None;
        }
        cross_numbers(a1.position, a2.position, b1.position, b2.position, eps)
    }
}
