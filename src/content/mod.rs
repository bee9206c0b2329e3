/*!
 * Document content model and loading.
 *
 * - `extract`: turns HTML into an ordered sequence of content nodes
 * - `source`: locates and loads the HTML of an EPUB page, a local file or a URL
 */

use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};

pub mod extract;
pub mod source;

// Re-export main types
pub use extract::extract_nodes;
pub use source::{DocumentSource, SourceKind};

/// Kind of element a content node was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    Paragraph,
}

impl TagKind {
    /// HTML element name for this kind
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
            Self::Heading4 => "h4",
            Self::Heading5 => "h5",
            Self::Heading6 => "h6",
            Self::Paragraph => "p",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag_name())
    }
}

impl FromStr for TagKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "h1" => Ok(Self::Heading1),
            "h2" => Ok(Self::Heading2),
            "h3" => Ok(Self::Heading3),
            "h4" => Ok(Self::Heading4),
            "h5" => Ok(Self::Heading5),
            "h6" => Ok(Self::Heading6),
            "p" => Ok(Self::Paragraph),
            _ => Err(anyhow!("Unsupported content tag: {}", s)),
        }
    }
}

/// One text-bearing element of a document, in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentNode {
    pub tag: TagKind,
    pub text: String,
}

impl ContentNode {
    pub fn new(tag: TagKind, text: impl Into<String>) -> Self {
        Self {
            tag,
            text: text.into(),
        }
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(TagKind::Paragraph, text)
    }
}
