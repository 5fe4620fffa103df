//! Error types for the Vertex AI client.

mod blocked;
mod types;
mod categories;
mod mapper;

pub use blocked::BlockedError;
pub use types::*;
pub use categories::*;
pub use mapper::*;
