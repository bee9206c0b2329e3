/*!
 * Segmentation of document content into speech units.
 *
 * A segment is a complete SSML document covering a contiguous run of content
 * nodes. Segments are bounded by document structure (major headings always
 * open a new segment) and by a node budget, and carry absolute node offsets so
 * a later run can resume mid-document.
 */

use log::debug;

use crate::app_config::Config;
use crate::content::ContentNode;

pub mod ssml;

pub use ssml::{DocumentShell, EmphasisLevel, NodeStyle};

/// Settings that shape the produced markup and segment sizes
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Number of nodes after which a segment is closed
    pub token_budget: usize,
    pub voice_name: String,
    pub language: String,
    pub speaking_style: String,
    pub prosody_rate: String,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SegmenterConfig {
    fn from(config: &Config) -> Self {
        Self {
            token_budget: config.reading.token_budget.max(1),
            voice_name: config.speech.voice_name.clone(),
            language: config.speech.language.clone(),
            speaking_style: config.speech.speaking_style.clone(),
            prosody_rate: config.reading.prosody_rate.clone(),
        }
    }
}

/// One synthesizer-ready unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Standalone SSML document
    pub markup: String,
    /// Number of content nodes in this segment
    pub token_count: usize,
    /// Absolute index of the first node
    pub start_offset: usize,
    /// Absolute index one past the last node
    pub end_offset: usize,
    /// Plain text of the segment, one node per line
    pub text: String,
}

/// Accumulates rendered nodes until a boundary closes them into a segment
struct PendingSegment {
    body: String,
    lines: Vec<String>,
    start_offset: usize,
}

impl PendingSegment {
    fn new(start_offset: usize) -> Self {
        Self {
            body: String::new(),
            lines: Vec::new(),
            start_offset,
        }
    }

    fn token_count(&self) -> usize {
        self.lines.len()
    }

    fn push(&mut self, fragment: &str, line: String) {
        self.body.push_str(fragment);
        self.lines.push(line);
    }

    /// Close into `segments` if anything has been accumulated
    fn close_into(&mut self, segments: &mut Vec<Segment>, shell: &DocumentShell) {
        if self.lines.is_empty() {
            return;
        }

        let token_count = self.token_count();
        let end_offset = self.start_offset + token_count;
        let finished = std::mem::replace(self, Self::new(end_offset));
        segments.push(Segment {
            markup: shell.wrap(&finished.body),
            token_count,
            start_offset: finished.start_offset,
            end_offset,
            text: finished.lines.join("\n"),
        });
    }
}

/// Splits content nodes into segments
#[derive(Debug, Clone)]
pub struct Segmenter {
    config: SegmenterConfig,
    shell: DocumentShell,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        let shell = DocumentShell::new(&config.voice_name, &config.language);
        Self { config, shell }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Segment `nodes`, reporting offsets relative to `starting_offset`.
    ///
    /// Callers resuming mid-document slice `nodes` themselves (see
    /// [`skip_retained`]); the offset only shifts the reported ranges. A
    /// sequence with no speakable node yields no
    /// segments.
    pub fn segment(&self, nodes: &[ContentNode], starting_offset: usize) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut current = PendingSegment::new(starting_offset);

        for node in nodes {
            let style = NodeStyle::for_tag(node.tag);

            if style.starts_segment {
                current.close_into(&mut segments, &self.shell);
            }

            // Full segments are closed before the next node is appended
            if current.token_count() >= self.config.token_budget {
                current.close_into(&mut segments, &self.shell);
            }

            let text = ssml::normalize_text(&node.text);
            if text.is_empty() {
                current.close_into(&mut segments, &self.shell);
                continue;
            }

            let fragment = ssml::render_fragment(
                &ssml::escape_xml(&text),
                style,
                &self.config.speaking_style,
                &self.config.prosody_rate,
            );
            debug!(
                "Rendered {} node at offset {}: {}",
                node.tag,
                current.start_offset + current.token_count(),
                fragment
            );
            current.push(&fragment, text);
        }

        current.close_into(&mut segments, &self.shell);
        segments
    }
}

/// The nodes left after skipping `retained` speakable nodes, starting at the
/// next speakable node. Offsets reported by [`Segmenter::segment`] count only
/// speakable nodes, so a resume offset must be applied the same way. Returns
/// `None` when the document has `retained` speakable nodes or fewer.
pub fn skip_retained(nodes: &[ContentNode], retained: usize) -> Option<&[ContentNode]> {
    let start = nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| !ssml::normalize_text(&node.text).is_empty())
        .nth(retained)
        .map(|(index, _)| index)?;
    Some(&nodes[start..])
}
