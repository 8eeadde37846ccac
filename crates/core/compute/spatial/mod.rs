pub mod rtree;
pub use rtree::{Neighbor, PointIndex};
