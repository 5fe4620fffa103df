//! Test fixtures for the Vertex AI client.
//!
//! Recorded response bodies live next to this file: `stream/` holds complete
//! `streamGenerateContent` bodies (a JSON array of chunks), `count_tokens/`
//! and `errors/` hold unary bodies.

use bytes::Bytes;
use std::path::PathBuf;

/// Get the path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("src")
        .join("fixtures")
        .join(relative_path)
}

/// Load a fixture file as a string.
pub fn load_fixture(relative_path: &str) -> String {
    std::fs::read_to_string(fixture_path(relative_path))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {}", relative_path, e))
}

/// Load a JSON fixture and parse it.
pub fn load_json_fixture<T: serde::de::DeserializeOwned>(relative_path: &str) -> T {
    let content = load_fixture(relative_path);
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse JSON fixture {}: {}", relative_path, e))
}

/// Load a streaming fixture cut into pieces of at most `piece_len` bytes.
///
/// Piece boundaries ignore JSON structure, the way network reads do.
pub fn load_stream_fixture(relative_path: &str, piece_len: usize) -> Vec<Bytes> {
    let body = Bytes::from(load_fixture(relative_path));
    (0..body.len())
        .step_by(piece_len.max(1))
        .map(|start| body.slice(start..(start + piece_len.max(1)).min(body.len())))
        .collect()
}
