use super::datum::{Datum, TypeTag};
use crate::error::{Result, TemporaError};
use geo::Rect;
use once_cell::sync::OnceCell;
use rustc_hash::{FxHashMap, FxHasher};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

static REGISTRY: OnceCell<Registry> = OnceCell::new();

/// Storage classification of a base type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeLength {
    /// Every value occupies this many bytes.
    Fixed(usize),
    Variable,
}

/// Spatial extent of a value, used to build spatiotemporal boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialExtent {
    pub rect: Rect<f64>,
    pub z: Option<(f64, f64)>,
    pub srid: i32,
    pub geodetic: bool,
}

/// What a value contributes to the bounding box of a temporal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extent {
    /// Only the time dimension is boxed.
    None,
    Value(f64),
    Space(SpatialExtent),
}

/// Primitive operations of one base type.
///
/// Implementations are looked up by [`TypeTag`] on every operation, so the
/// rest of the crate never matches on concrete base types. Only continuous
/// types override the interpolation hooks.
pub trait BaseType: Send + Sync {
    fn tag(&self) -> TypeTag;

    fn name(&self) -> &'static str;

    fn length(&self) -> TypeLength;

    /// Values fit in a machine word and are passed by value.
    fn by_value(&self) -> bool {
        matches!(self.length(), TypeLength::Fixed(n) if n <= 8)
    }

    /// Bytes taken by `value` inside a temporal record.
    fn byte_size(&self, _value: &Datum) -> usize {
        match self.length() {
            TypeLength::Fixed(n) => n,
            TypeLength::Variable => 0,
        }
    }

    /// The type admits linear interpolation.
    fn continuous(&self) -> bool {
        false
    }

    fn eq(&self, a: &Datum, b: &Datum) -> bool;

    fn cmp(&self, a: &Datum, b: &Datum) -> Ordering;

    fn hash64(&self, value: &Datum, seed: u64) -> u64;

    fn hash32(&self, value: &Datum) -> u32 {
        fold32(self.hash64(value, 0))
    }

    fn copy(&self, value: &Datum) -> Datum {
        value.clone()
    }

    fn output(&self, value: &Datum) -> String;

    fn input(&self, text: &str) -> Result<Datum>;

    /// Value at `ratio` in [0, 1] of the way from `a` to `b`.
    fn interpolate(&self, _a: &Datum, _b: &Datum, _ratio: f64) -> Result<Datum> {
        Err(TemporaError::InvalidInterpolation(format!(
            "Base type {} does not support linear interpolation",
            self.name()
        )))
    }

    /// `b` lies on the segment from `a` to `c` at `ratio`, up to `eps`.
    fn collinear(&self, _a: &Datum, _b: &Datum, _c: &Datum, _ratio: f64, _eps: f64) -> bool {
        false
    }

    /// Fraction of the linear segment `start -> end` at which it takes `value`.
    ///
    /// Returns `None` when the segment never takes the value or only at one
    /// of its endpoints.
    fn locate(&self, _start: &Datum, _end: &Datum, _value: &Datum, _eps: f64) -> Option<f64> {
        None
    }

    /// Fraction at which two synchronized linear segments take the same value.
    fn segment_crossing(
        &self,
        _start1: &Datum,
        _end1: &Datum,
        _start2: &Datum,
        _end2: &Datum,
        _eps: f64,
    ) -> Option<f64> {
        None
    }

    fn extent(&self, _value: &Datum) -> Extent {
        Extent::None
    }
}

/// Table of base types keyed by tag.
pub struct Registry {
    types: FxHashMap<TypeTag, Box<dyn BaseType>>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Registry holding every type shipped with the crate.
    pub fn with_builtin_types() -> Self {
        RegistryBuilder::new().with_builtin_types().build()
    }

    /// Operations of a base type, failing for unregistered tags.
    pub fn lookup(&self, tag: TypeTag) -> Result<&dyn BaseType> {
        self.types
            .get(&tag)
            .map(|t| t.as_ref())
            .ok_or_else(|| TemporaError::InternalType(format!("Unknown base type: {}", tag)))
    }

    pub fn contains(&self, tag: TypeTag) -> bool {
        self.types.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Registered tags in ascending order.
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.types.keys().copied().collect();
        tags.sort();
        tags
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry").field("types", &self.tags()).finish()
    }
}

/// Builder collecting base types before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    types: FxHashMap<TypeTag, Box<dyn BaseType>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self {
            types: FxHashMap::default(),
        }
    }

    pub fn with_builtin_types(mut self) -> Self {
        for base_type in super::builtin::builtin_types() {
            self.types.insert(base_type.tag(), base_type);
        }
        self
    }

    /// Add a base type, replacing any previous registration of its tag.
    pub fn register(mut self, base_type: Box<dyn BaseType>) -> Self {
        let tag = base_type.tag();
        if self.types.insert(tag, base_type).is_some() {
            log::debug!("Base type {} replaced by a custom registration", tag);
        }
        self
    }

    pub fn build(self) -> Registry {
        Registry { types: self.types }
    }
}

/// Install the process-wide registry.
///
/// Must run before the first temporal value is built; afterwards the
/// builtin registry is already in place and this call fails.
pub fn install_registry(registry: Registry) -> Result<()> {
    REGISTRY.set(registry).map_err(|_| {
        log::warn!("Base-type registry already installed, keeping the existing one");
        TemporaError::InvalidArgument("base-type registry is already installed".to_string())
    })
}

/// The process-wide registry, installing the builtin types on first use.
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        log::debug!("Installing builtin base-type registry");
        Registry::with_builtin_types()
    })
}

/// Shorthand for `registry().lookup(tag)`.
pub fn lookup(tag: TypeTag) -> Result<&'static dyn BaseType> {
    registry().lookup(tag)
}

/// Seeded 64-bit hash of any hashable value.
pub fn seeded_hash<T: Hash + ?Sized>(value: &T, seed: u64) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write_u64(seed);
    value.hash(&mut hasher);
    hasher.finish()
}

/// Fold a 64-bit hash into 32 bits.
pub fn fold32(hash: u64) -> u32 {
    (hash ^ (hash >> 32)) as u32
}

pub fn hash_u32(value: u32) -> u32 {
    fold32(seeded_hash(&value, 0))
}

pub fn hash_i64(value: i64) -> u32 {
    fold32(seeded_hash(&value, 0))
}
