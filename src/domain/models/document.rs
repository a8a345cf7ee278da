//! Rich-text document envelope used by the remote service for comment bodies
//! and issue descriptions.

use serde::{Deserialize, Serialize};

/// Top-level rich-text document (`{"type": "doc", "version": 1, ...}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "doc")]
pub struct Document {
    pub version: u8,
    pub content: Vec<Block>,
}

/// Block-level node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Block {
    Paragraph { content: Vec<Inline> },
}

/// Inline node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inline {
    Text { text: String },
}

impl Document {
    /// Wrap plain text into a document with exactly one paragraph holding
    /// exactly one text node. The text is carried unchanged.
    pub fn from_plain_text(text: impl Into<String>) -> Self {
        Self {
            version: 1,
            content: vec![Block::Paragraph {
                content: vec![Inline::Text { text: text.into() }],
            }],
        }
    }

    #[cfg(test)]
    fn plain_text(&self) -> String {
        self.content
            .iter()
            .flat_map(|Block::Paragraph { content }| content.iter())
            .map(|Inline::Text { text }| text.as_str())
            .collect()
    }
}
