use crate::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer stored alongside a point.
pub type Payload = u64;

/// A stored `(point, payload)` pair.
///
/// Records carry no identity of their own; two records with the same point
/// and payload are indistinguishable and may both live in an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub point: Point,
    pub payload: Payload,
}

impl Record {
    pub const fn new(point: Point, payload: Payload) -> Self {
        Self { point, payload }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.point, self.payload)
    }
}
