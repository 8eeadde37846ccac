//! Transport layer for kdtreed server
//!
//! Available transports:
//! - `tcp` - newline-delimited text protocol over TCP

pub mod tcp;
