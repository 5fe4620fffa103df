//! Content-related types for the Vertex AI generative API.
//!
//! This module contains types for representing content, messages, and their parts.

use serde::{Deserialize, Serialize};

/// A part of a content message: text, inline binary data, or a file reference.
///
/// On the wire a part is an object carrying exactly one of `text`,
/// `inlineData` or `fileData`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "WirePart", into = "WirePart")]
pub enum Part {
    /// A piece of text, like a question or phrase.
    Text(String),
    /// Inline binary data.
    Blob(Blob),
    /// Reference to data stored at a URI.
    FileData(FileData),
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text(text.into())
    }

    /// Create an image blob part.
    ///
    /// `format` is the second half of the MIME type, e.g. `"png"` for `image/png`.
    pub fn image_data(format: &str, data: impl Into<Vec<u8>>) -> Self {
        Part::Blob(Blob {
            mime_type: format!("image/{}", format),
            data: data.into(),
        })
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            Part::Blob(_) | Part::FileData(_) => None,
        }
    }
}

impl From<&str> for Part {
    fn from(text: &str) -> Self {
        Part::Text(text.to_string())
    }
}

impl From<String> for Part {
    fn from(text: String) -> Self {
        Part::Text(text)
    }
}

/// Binary data blob with MIME type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    /// The MIME type of the data.
    pub mime_type: String,
    /// Raw bytes. Base64-encoded on the wire.
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

/// Reference to file data stored at a URI (for example `gs://bucket/object`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    /// The MIME type of the file.
    pub mime_type: String,
    /// The URI of the file.
    pub file_uri: String,
}

/// A content message with a role and parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Content {
    /// The role of the content author.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts of the content, in rendering order.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a user turn from the given parts.
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some(Role::User),
            parts,
        }
    }

    /// Create a model turn from the given parts.
    pub fn model(parts: Vec<Part>) -> Self {
        Self {
            role: Some(Role::Model),
            parts,
        }
    }

    /// Concatenation of all text parts.
    pub fn text(&self) -> String {
        self.parts.iter().filter_map(Part::as_text).collect()
    }
}

/// The role of a message author.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User role.
    User,
    /// Model role.
    Model,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<Blob>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_data: Option<FileData>,
}

impl TryFrom<WirePart> for Part {
    type Error = String;

    fn try_from(wire: WirePart) -> Result<Self, Self::Error> {
        match (wire.text, wire.inline_data, wire.file_data) {
            (Some(text), None, None) => Ok(Part::Text(text)),
            (None, Some(blob), None) => Ok(Part::Blob(blob)),
            (None, None, Some(file)) => Ok(Part::FileData(file)),
            (None, None, None) => Err("part has no data".to_string()),
            _ => Err("part carries more than one kind of data".to_string()),
        }
    }
}

impl From<Part> for WirePart {
    fn from(part: Part) -> Self {
        match part {
            Part::Text(text) => WirePart {
                text: Some(text),
                ..Default::default()
            },
            Part::Blob(blob) => WirePart {
                inline_data: Some(blob),
                ..Default::default()
            },
            Part::FileData(file) => WirePart {
                file_data: Some(file),
                ..Default::default()
            },
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(data))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_part_wire_shape() {
        let value = serde_json::to_value(Part::text("hi")).unwrap();
        assert_eq!(value, json!({"text": "hi"}));
    }

    #[test]
    fn test_blob_part_is_base64_on_the_wire() {
        let part = Part::image_data("png", vec![1u8, 2, 3]);
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(
            value,
            json!({"inlineData": {"mimeType": "image/png", "data": "AQID"}})
        );

        let back: Part = serde_json::from_value(value).unwrap();
        assert_eq!(back, part);
    }

    #[test]
    fn test_file_data_part_decodes() {
        let part: Part = serde_json::from_value(json!({
            "fileData": {"mimeType": "video/mp4", "fileUri": "gs://bucket/clip.mp4"}
        }))
        .unwrap();

        assert_eq!(
            part,
            Part::FileData(FileData {
                mime_type: "video/mp4".to_string(),
                file_uri: "gs://bucket/clip.mp4".to_string(),
            })
        );
    }

    #[test]
    fn test_empty_part_is_rejected() {
        let result: Result<Part, _> = serde_json::from_value(json!({}));
        assert!(result.is_err());
    }

    #[test]
    fn test_content_text_skips_non_text_parts() {
        let content = Content::model(vec![
            Part::text("a"),
            Part::image_data("jpeg", vec![0u8]),
            Part::text("b"),
        ]);
        assert_eq!(content.text(), "ab");
    }
}
