//! In-memory 2D point index with a line-oriented command grammar.
//!
//! ## Features
//! - **Spatial store**: concurrent multiset of `(point, payload)` records on
//!   an R*-tree, with insert, exact-point delete and k-nearest queries
//! - **Command grammar**: backtracking parser for `ADD`, `DEL`, `KNN` and
//!   `END` lines
//!
//! ```rust
//! use kdtreed::{Command, Point, Store};
//!
//! let store = Store::new();
//! store.insert(Point::new(1, 1), 10);
//! store.insert(Point::new(2, 2), 20);
//! store.insert(Point::new(10, 10), 30);
//!
//! if let Command::Knn { point, k } = "KNN {0, 0} 2".parse::<Command>()? {
//!     let nearest = store.nearest(&point, k as usize);
//!     assert_eq!(nearest[0].record.payload, 10);
//!     assert_eq!(nearest[1].record.payload, 20);
//! }
//! # Ok::<(), kdtreed::KdtreedError>(())
//! ```

pub mod command;
pub mod compute;
pub mod db;
pub mod error;

pub use command::{Action, Command};
pub use compute::spatial::{Neighbor, PointIndex};
pub use db::{Store, StoreStats};
pub use error::{KdtreedError, Result};

pub use kdtreed_types::{Payload, Point, Record};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{Command, KdtreedError, Neighbor, Result, Store};
    pub use crate::{Payload, Point, Record};
}
