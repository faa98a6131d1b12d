//! Temporal values with lifted operations, synchronization and index-grade ordering.
//!
//! ```rust
//! use tempora::prelude::*;
//!
//! let t = Timestamp::from_secs;
//! let rising = SequenceBuilder::new().instant(0.0, t(0)).instant(10.0, t(10)).build()?;
//! let falling = SequenceBuilder::new().instant(10.0, t(0)).instant(0.0, t(10)).build()?;
//!
//! // The two values meet once, at t = 5
//! let equal = teq(&rising.into(), &falling.into())?.unwrap();
//! assert_eq!(equal.value_at_timestamp(t(5), true)?, Some(Datum::Bool(true)));
//! assert_eq!(equal.value_at_timestamp(t(6), true)?, Some(Datum::Bool(false)));
//! # Ok::<(), tempora::TemporaError>(())
//! ```

pub mod base;
pub mod boxes;
pub mod builder;
pub mod config;
pub mod error;
pub mod lifting;
pub mod ops;
pub mod ordering;
pub mod period;
pub mod sync;
pub mod temporal;
pub mod validation;

pub use builder::SequenceBuilder;
pub use config::Config;
pub use error::{Result, TemporaError};

pub use base::{BaseType, Datum, Registry, RegistryBuilder, TypeTag, install_registry, lookup};

pub use boxes::BoundingBox;
pub use period::Period;

pub use temporal::{Interpolation, Subtype, TInstant, TSequence, TSequenceSet, Temporal};

pub use sync::{SyncMode, synchronize};

pub use lifting::LiftedFunction;

pub use ordering::{temporal_cmp, temporal_eq, temporal_hash, temporal_hash_extended};

pub use tempora_types::{CircularBuffer, NetworkPoint, Pose, SpatialPoint, Timestamp};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the process-wide configuration.
///
/// Must run before the first temporal value is built; later calls fail and
/// keep the configuration already in place.
pub fn init(config: Config) -> Result<()> {
    config::install(config)
}

/// Common imports
pub mod prelude {

    pub use crate::{Config, Result, SequenceBuilder, TemporaError, init};

    pub use crate::base::{Datum, TypeTag};

    pub use crate::temporal::{Interpolation, TInstant, TSequence, TSequenceSet, Temporal};

    pub use crate::sync::{SyncMode, synchronize};

    pub use crate::lifting::LiftedFunction;

    pub use crate::ops::*;

    pub use crate::ordering::{temporal_cmp, temporal_eq, temporal_hash};

    pub use tempora_types::{SpatialPoint, Timestamp};
}
