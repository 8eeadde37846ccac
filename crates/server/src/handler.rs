//! Maps parsed commands onto the shared store.

use kdtreed::{Command, Store, command};
use std::sync::Arc;
use tracing::debug;

use crate::protocol::Response;

/// Stateless request handler shared by every session.
#[derive(Debug, Clone)]
pub struct Handler {
    store: Arc<Store>,
}

impl Handler {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }

    /// Parse one request line and apply it.
    ///
    /// Lines outside the grammar yield [`Response::Invalid`] and leave the
    /// store untouched.
    pub fn handle_line(&self, line: &str) -> Response {
        match command::parse(line) {
            Ok(cmd) => self.execute(cmd),
            Err(e) => {
                debug!("rejected request: {}", e);
                Response::Invalid
            }
        }
    }

    pub fn execute(&self, cmd: Command) -> Response {
        match cmd {
            Command::Add { point, payload } => {
                self.store.insert(point, payload);
                Response::Added(point)
            }
            Command::Delete { point } => {
                self.store.delete(&point);
                Response::Deleted(point)
            }
            Command::Knn { point, k } => {
                let k = usize::try_from(k).unwrap_or(usize::MAX);
                let records = self
                    .store
                    .nearest(&point, k)
                    .into_iter()
                    .map(|neighbor| neighbor.record)
                    .collect();
                Response::Neighbors(records)
            }
            Command::End => Response::Bye,
        }
    }
}
