/*!
 * HTML to content node extraction.
 */

use log::debug;
use scraper::{ElementRef, Html, Selector};

use super::{ContentNode, TagKind};

const CONTENT_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p";

/// Extract headings and paragraphs from `html` in document order.
///
/// With `prefer_main_content`, only the first `<article>` is read, or the
/// first `<section>` when the page has no article. Web pages carry navigation
/// and footer paragraphs that should not be spoken. If neither element
/// exists the whole document is used.
pub fn extract_nodes(html: &str, prefer_main_content: bool) -> Vec<ContentNode> {
    let document = Html::parse_document(html);
    let Ok(content_selector) = Selector::parse(CONTENT_SELECTOR) else {
        return Vec::new();
    };

    let root = if prefer_main_content {
        main_content_root(&document)
    } else {
        None
    };

    let root = root.unwrap_or_else(|| document.root_element());
    let nodes: Vec<ContentNode> = root
        .select(&content_selector)
        .filter_map(|element| {
            let tag = element.value().name().parse::<TagKind>().ok()?;
            Some(ContentNode::new(tag, element.text().collect::<String>()))
        })
        .collect();

    debug!("Extracted {} content nodes", nodes.len());
    nodes
}

fn main_content_root(document: &Html) -> Option<ElementRef<'_>> {
    ["article", "section"].iter().find_map(|name| {
        let selector = Selector::parse(name).ok()?;
        document.select(&selector).next()
    })
}
