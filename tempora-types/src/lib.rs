//! # tempora-types
//!
//! Base value types sampled by Tempora temporal values.
//!
//! This crate provides the plain data carried at each instant of a temporal value:
//!
//! - **Time**: `Timestamp`, microseconds since the Unix epoch
//! - **Spatial types**: `SpatialPoint`, `CircularBuffer`, `Pose`
//! - **Network types**: `NetworkPoint`, a relative position on a route
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives. Validation and dispatch live in the `tempora` crate.
//!
//! ## Examples
//!
//! ```rust
//! use tempora_types::point::SpatialPoint;
//! use tempora_types::time::Timestamp;
//!
//! let point = SpatialPoint::new(-74.0060, 40.7128).with_srid(4326);
//! let t = Timestamp::from_secs(1_700_000_000);
//! assert_eq!(point.srid, 4326);
//! assert_eq!(t.micros(), 1_700_000_000_000_000);
//! ```

pub mod cbuffer;
pub mod npoint;
pub mod point;
pub mod pose;
pub mod time;

pub use cbuffer::CircularBuffer;
pub use npoint::NetworkPoint;
pub use point::SpatialPoint;
pub use pose::{Orientation, Pose, Quaternion};
pub use time::Timestamp;
