//! Streaming support for generation responses.
//!
//! A streaming call is consumed through a [`ResponseIterator`]. The iterator
//! pulls [`RawChunk`]s from a [`ChunkReceiver`] (for REST, a
//! [`ChunkedJsonParser`] over the HTTP body), decodes each one, stops on a
//! policy block, and folds the rest into a running aggregate with the pure
//! functions in [`merge`].
//!
//! ```rust,no_run
//! use integrations_vertexai::streaming::{ChunkedJsonParser, ResponseIterator};
//! use integrations_vertexai::transport::ChunkedStream;
//!
//! async fn consume(body: ChunkedStream) -> integrations_vertexai::VertexResult<()> {
//!     let mut iterator = ResponseIterator::new(Box::new(ChunkedJsonParser::new(body)));
//!     while let Some(chunk) = iterator.next().await? {
//!         print!("{}", chunk.text().unwrap_or_default());
//!     }
//!     let full = iterator.into_merged();
//!     println!("\n{:?}", full.map(|r| r.usage_metadata));
//!     Ok(())
//! }
//! ```

mod accumulator;
mod chunked_json;
mod iterator;
pub mod merge;
mod receiver;

pub use accumulator::StreamAccumulator;
pub use chunked_json::ChunkedJsonParser;
pub use iterator::{check_blocked, IteratorState, ResponseIterator};
pub use receiver::{ChunkReceiver, RawChunk, StreamChunkReceiver};
