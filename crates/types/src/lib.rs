//! # kdtreed-types
//!
//! Core data types for the kdtreed spatial index.
//!
//! - **Point**: a two-dimensional point with non-negative integer coordinates
//! - **Record**: a point together with the payload stored alongside it
//!
//! All types are serializable with Serde and render in the wire form used by
//! the line protocol (`{x, y}` for points, `{x, y} payload` for records).
//!
//! ## Examples
//!
//! ```rust
//! use kdtreed_types::{Point, Record};
//!
//! let point = Point::new(3, 4);
//! assert_eq!(point.to_string(), "{3, 4}");
//!
//! let record = Record::new(point, 7);
//! assert_eq!(record.to_string(), "{3, 4} 7");
//! ```

pub mod point;
pub mod record;

pub use point::Point;
pub use record::{Payload, Record};
