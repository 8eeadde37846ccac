//! kdtreed server
//!
//! TCP front end for the [`kdtreed`] point index. Clients speak a
//! newline-delimited text protocol:
//!
//! | Request        | Response                  |
//! |----------------|---------------------------|
//! | `ADD {x, y} n` | `{x, y} added`            |
//! | `DEL {x, y}`   | `{x, y} deleted`          |
//! | `KNN {x, y} k` | `[{x, y} n, ...]`         |
//! | `END`          | `BYE!!!`, then close      |
//! | anything else  | `INVALID COMMAND`         |
//!
//! # Example
//!
//! ```ignore
//! use kdtreed_server::run_server;
//!
//! run_server(listener, store, shutdown).await?;
//! ```

pub mod config;
pub mod handler;
pub mod protocol;
pub mod session;
pub mod transport;

pub use config::{ConfigError, ServerConfig};
pub use handler::Handler;
pub use protocol::{ProtocolCodec, ProtocolError, Response};
pub use session::{Closed, Session};

// Re-export default transport for convenience
pub use transport::tcp::{Server, run_server};
