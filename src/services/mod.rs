//! Service implementations for the Vertex AI API.

pub mod content;

pub use content::*;
