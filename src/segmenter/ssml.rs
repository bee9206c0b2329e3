/*!
 * SSML rendering helpers used by the segmenter.
 */

use std::fmt;

use crate::content::TagKind;

const SSML_NAMESPACE: &str = "http://www.w3.org/2001/10/synthesis";
const MSTTS_NAMESPACE: &str = "https://www.w3.org/2001/mstts";

/// Emphasis level of a spoken element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisLevel {
    Strong,
    Moderate,
    None,
}

impl EmphasisLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Moderate => "moderate",
            Self::None => "none",
        }
    }
}

impl fmt::Display for EmphasisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a content node is voiced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStyle {
    /// Element wrapping the node: `s` for headings, `p` for prose
    pub doc_tag: &'static str,
    pub emphasis: EmphasisLevel,
    /// Whether the node must open its own segment
    pub starts_segment: bool,
}

impl NodeStyle {
    pub fn for_tag(tag: TagKind) -> Self {
        match tag {
            TagKind::Heading1 => Self {
                doc_tag: "s",
                emphasis: EmphasisLevel::Strong,
                starts_segment: true,
            },
            TagKind::Heading2 | TagKind::Heading3 => Self {
                doc_tag: "s",
                emphasis: EmphasisLevel::Moderate,
                starts_segment: true,
            },
            TagKind::Heading4 | TagKind::Heading5 | TagKind::Heading6 | TagKind::Paragraph => Self {
                doc_tag: "p",
                emphasis: EmphasisLevel::None,
                starts_segment: false,
            },
        }
    }
}

/// Collapse line breaks into single spaces and trim the result
pub fn normalize_text(text: &str) -> String {
    text.replace("\r\n", " ")
        .replace(['\n', '\r'], " ")
        .trim()
        .to_string()
}

/// Escape text for use in XML character data and attribute values
pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render one node. `escaped_text` must already be XML-escaped.
pub fn render_fragment(escaped_text: &str, style: NodeStyle, speaking_style: &str, prosody_rate: &str) -> String {
    format!(
        "<{tag}><mstts:express-as style=\"{style}\"><prosody rate=\"{rate}\"><emphasis level=\"{level}\">{text}</emphasis></prosody></mstts:express-as></{tag}>",
        tag = style.doc_tag,
        style = escape_xml(speaking_style),
        rate = escape_xml(prosody_rate),
        level = style.emphasis,
        text = escaped_text,
    )
}

/// The `<speak><voice>` envelope every segment is wrapped in
#[derive(Debug, Clone)]
pub struct DocumentShell {
    header: String,
}

impl DocumentShell {
    const FOOTER: &'static str = "</voice></speak>";

    pub fn new(voice_name: &str, language: &str) -> Self {
        let header = format!(
            "<speak version=\"1.0\" xmlns=\"{}\" xmlns:mstts=\"{}\" xml:lang=\"{}\"><voice name=\"{}\">",
            SSML_NAMESPACE,
            MSTTS_NAMESPACE,
            escape_xml(language),
            escape_xml(voice_name),
        );
        Self { header }
    }

    pub fn wrap(&self, body: &str) -> String {
        let mut document = String::with_capacity(self.header.len() + body.len() + Self::FOOTER.len());
        document.push_str(&self.header);
        document.push_str(body);
        document.push_str(Self::FOOTER);
        document
    }
}
