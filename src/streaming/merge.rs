//! Folding of streamed chunks into a running aggregate.
//!
//! Every function here is pure: it takes ownership of the accumulated value
//! and the incoming chunk and returns the new accumulated value. Nothing in
//! this module performs I/O or keeps state between calls.

use std::collections::HashMap;

use crate::types::{Candidate, CitationMetadata, Content, GenerateContentResponse, Part};

/// Folds `src` into `dest`.
///
/// With no accumulated value the chunk becomes the seed. Otherwise candidates
/// are aligned by index, the accumulated `prompt_feedback` is kept as is and
/// `usage_metadata` follows the latest chunk that reports one.
pub fn join_responses(
    dest: Option<GenerateContentResponse>,
    src: GenerateContentResponse,
) -> GenerateContentResponse {
    let Some(mut dest) = dest else {
        return src;
    };

    dest.candidates = join_candidate_lists(dest.candidates, src.candidates);
    if src.usage_metadata.is_some() {
        dest.usage_metadata = src.usage_metadata;
    }
    dest
}

/// Merges each destination candidate with the source candidate of the same index.
///
/// Destination candidates missing from `src` are left untouched. Source
/// candidates whose index does not already exist in `dest` are dropped.
pub fn join_candidate_lists(dest: Vec<Candidate>, src: Vec<Candidate>) -> Vec<Candidate> {
    let mut by_index: HashMap<i32, Candidate> =
        src.into_iter().map(|c| (c.index, c)).collect();

    let merged: Vec<Candidate> = dest
        .into_iter()
        .map(|mut d| {
            if let Some(s) = by_index.remove(&d.index) {
                d.content = join_content(d.content, s.content);
                d.finish_reason = s.finish_reason;
                d.safety_ratings = s.safety_ratings;
                d.citation_metadata =
                    join_citation_metadata(d.citation_metadata, s.citation_metadata);
            }
            d
        })
        .collect();

    if !by_index.is_empty() {
        let mut dropped: Vec<i32> = by_index.into_keys().collect();
        dropped.sort_unstable();
        tracing::debug!(
            indices = ?dropped,
            "Ignoring candidates that first appeared after the initial chunk"
        );
    }

    merged
}

/// Appends the source parts to the destination content.
pub fn join_content(dest: Option<Content>, src: Option<Content>) -> Option<Content> {
    match (dest, src) {
        (None, src) => src,
        (Some(dest), None) => Some(dest),
        (Some(mut dest), Some(src)) => {
            dest.role = dest.role.or(src.role);
            dest.parts = join_parts(dest.parts, src.parts);
            Some(dest)
        }
    }
}

/// Concatenates two part lists and collapses the text runs of the result.
pub fn join_parts(mut dest: Vec<Part>, src: Vec<Part>) -> Vec<Part> {
    dest.extend(src);
    merge_texts(dest)
}

/// Collapses every maximal run of adjacent text parts into one.
///
/// Non-text parts break a run and are kept in place.
pub fn merge_texts(parts: Vec<Part>) -> Vec<Part> {
    let mut out: Vec<Part> = Vec::with_capacity(parts.len());
    for part in parts {
        if let Part::Text(text) = &part {
            if let Some(Part::Text(run)) = out.last_mut() {
                run.push_str(text);
                continue;
            }
        }
        out.push(part);
    }
    out
}

/// Appends the source citations after the destination's, keeping duplicates.
pub fn join_citation_metadata(
    dest: Option<CitationMetadata>,
    src: Option<CitationMetadata>,
) -> Option<CitationMetadata> {
    match (dest, src) {
        (None, src) => src,
        (Some(dest), None) => Some(dest),
        (Some(mut dest), Some(src)) => {
            dest.citations.extend(src.citations);
            Some(dest)
        }
    }
}
