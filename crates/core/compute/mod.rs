//! Spatial indexing and nearest-neighbour queries.

pub mod spatial;
