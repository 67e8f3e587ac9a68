//! OCR provider responses.
//!
//! Text for image receipts comes from an external text-detection service.
//! Its response is a list of blocks (pages, lines, words); only LINE blocks
//! contribute to the document text, joined with single spaces in the order
//! the provider returned them.

use serde::{Deserialize, Serialize};

use crate::error::SourceError;

/// A text-detection response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrResponse {
    /// Detected blocks in provider order.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// One detected block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Block granularity.
    pub block_type: BlockType,

    /// Recognized text, absent for structural blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Recognition confidence (0 - 100).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

/// Block granularity reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Page,
    Line,
    Word,
    #[serde(other)]
    Other,
}

impl OcrResponse {
    /// Decode a provider response.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json).map_err(|e| SourceError::OcrPayload(e.to_string()))
    }

    /// Build a response from plain lines, e.g. from an in-process OCR engine.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            blocks: lines
                .into_iter()
                .map(|line| Block {
                    block_type: BlockType::Line,
                    text: Some(line.into()),
                    confidence: None,
                })
                .collect(),
        }
    }

    /// Text of the LINE blocks, in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .filter(|b| b.block_type == BlockType::Line)
            .filter_map(|b| b.text.as_deref())
    }

    /// Document text: LINE blocks joined with single spaces.
    pub fn text(&self) -> String {
        self.lines().collect::<Vec<_>>().join(" ")
    }
}
