/*!
 * Tests for source classification and content extraction
 */

use std::time::Duration;
use anyhow::Result;
use readaloud::content::{extract_nodes, DocumentSource, SourceKind, TagKind};
use readaloud::errors::SourceError;
use crate::common;

const TIMEOUT: Duration = Duration::from_secs(5);

#[test]
fn test_classify_withHtmlFile_shouldReturnHtmlSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;

    let source = DocumentSource::classify(path.to_str().unwrap())?;

    assert_eq!(source.kind(), SourceKind::HtmlFile);
    assert_eq!(source, DocumentSource::HtmlFile(path));
    Ok(())
}

#[test]
fn test_classify_withUrl_shouldNotTouchNetwork() {
    let source = DocumentSource::classify("https://example.com/story.html").unwrap();
    assert_eq!(source.kind(), SourceKind::Url);
}

#[test]
fn test_classify_withMissingFiles_shouldReturnInputNotFound() {
    let result = DocumentSource::classify("/nonexistent/book.epub");
    assert!(matches!(result, Err(SourceError::InputNotFound(_))));

    let result = DocumentSource::classify("/nonexistent/chapter.html");
    assert!(matches!(result, Err(SourceError::InputNotFound(_))));
}

#[test]
fn test_classify_withOtherExtension_shouldBeUnsupported() {
    let result = DocumentSource::classify("notes.txt");
    assert!(matches!(result, Err(SourceError::UnsupportedSource(_))));
}

#[tokio::test]
async fn test_load_nodes_withChapterFile_shouldKeepDocumentOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let source = DocumentSource::classify(path.to_str().unwrap())?;

    let nodes = source.load_nodes(0, TIMEOUT).await?;

    let tags: Vec<TagKind> = nodes.iter().map(|n| n.tag).collect();
    assert_eq!(
        tags,
        vec![
            TagKind::Heading1,
            TagKind::Paragraph,
            TagKind::Paragraph,
            TagKind::Heading2,
            TagKind::Paragraph,
            TagKind::Paragraph,
            TagKind::Paragraph
        ]
    );
    assert_eq!(nodes[0].text, "Chapter 1");
    assert!(nodes[2].text.contains('\n'));
    assert!(nodes[5].text.is_empty());
    Ok(())
}

#[test]
fn test_extract_nodes_withoutMainContentPreference_shouldReadWholePage() {
    let html = "<html><body><nav><p>Menu</p></nav><article><h2>Story</h2><p>Body</p></article></body></html>";

    let whole = extract_nodes(html, false);
    let main = extract_nodes(html, true);

    assert_eq!(whole.len(), 3);
    assert_eq!(whole[0].text, "Menu");
    assert_eq!(main.len(), 2);
    assert_eq!(main[0].tag, TagKind::Heading2);
}

#[test]
fn test_extract_nodes_withNoContentElements_shouldBeEmpty() {
    assert!(extract_nodes("<html><body><div>loose text</div></body></html>", true).is_empty());
}
