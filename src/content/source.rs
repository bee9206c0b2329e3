/*!
 * Source document classification and loading.
 *
 * A source is an EPUB book (one spine page is read), a local HTML file, or an
 * http(s) URL. Loading yields the raw HTML; `extract` turns it into nodes.
 */

use std::path::{Path, PathBuf};
use std::time::Duration;

use epub::doc::EpubDoc;
use log::{debug, info};
use reqwest::Client;
use url::Url;

use crate::errors::SourceError;
use crate::file_utils::FileManager;

use super::{extract_nodes, ContentNode};

/// Kind of input the user pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Epub,
    HtmlFile,
    Url,
}

/// A classified, not yet loaded, source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Epub(PathBuf),
    HtmlFile(PathBuf),
    Url(Url),
}

impl DocumentSource {
    /// Classify a user-supplied location.
    ///
    /// Files are checked for existence here so a typo fails before any
    /// network or audio resource is touched.
    pub fn classify(location: &str) -> Result<Self, SourceError> {
        if FileManager::has_extension(location, &["epub"]) {
            let path = PathBuf::from(location);
            ensure_file(&path)?;
            return Ok(Self::Epub(path));
        }

        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location)
                .map_err(|e| SourceError::UnsupportedSource(format!("{}: {}", location, e)))?;
            return Ok(Self::Url(url));
        }

        if FileManager::has_extension(location, &["html", "htm", "xhtml"]) {
            let path = PathBuf::from(location);
            ensure_file(&path)?;
            return Ok(Self::HtmlFile(path));
        }

        Err(SourceError::UnsupportedSource(location.to_string()))
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            Self::Epub(_) => SourceKind::Epub,
            Self::HtmlFile(_) => SourceKind::HtmlFile,
            Self::Url(_) => SourceKind::Url,
        }
    }

    /// Load the HTML of this source. `item_page` selects the EPUB spine page
    /// and is ignored for other kinds.
    pub async fn load_html(&self, item_page: usize, timeout: Duration) -> Result<String, SourceError> {
        match self {
            Self::Epub(path) => {
                let path = path.clone();
                tokio::task::spawn_blocking(move || read_epub_page(&path, item_page))
                    .await
                    .map_err(|e| SourceError::Epub(e.to_string()))?
            }
            Self::HtmlFile(path) => FileManager::read_to_string(path)
                .map_err(|e| SourceError::InputNotFound(format!("{:?}: {}", path, e))),
            Self::Url(url) => fetch_html(url, timeout).await,
        }
    }

    /// Load the source and extract its content nodes
    pub async fn load_nodes(&self, item_page: usize, timeout: Duration) -> Result<Vec<ContentNode>, SourceError> {
        let html = self.load_html(item_page, timeout).await?;
        Ok(extract_nodes(&html, self.kind() == SourceKind::Url))
    }
}

fn ensure_file(path: &Path) -> Result<(), SourceError> {
    if FileManager::file_exists(path) {
        Ok(())
    } else {
        Err(SourceError::InputNotFound(format!("{:?}", path)))
    }
}

fn read_epub_page(path: &Path, item_page: usize) -> Result<String, SourceError> {
    let mut doc = EpubDoc::new(path).map_err(|e| SourceError::Epub(format!("{:?}: {}", path, e)))?;

    let pages = doc.get_num_pages();
    if item_page >= pages || !doc.set_current_page(item_page) {
        return Err(SourceError::PageOutOfRange { page: item_page, pages });
    }

    let (content, mime) = doc
        .get_current_str()
        .ok_or_else(|| SourceError::Epub(format!("Page {} has no readable content", item_page)))?;
    debug!("Loaded EPUB page {} of {} ({})", item_page, pages, mime);

    Ok(content)
}

async fn fetch_html(url: &Url, timeout: Duration) -> Result<String, SourceError> {
    info!("Fetching {}", url);
    let client = Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SourceError::FetchFailed(e.to_string()))?;

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| SourceError::FetchFailed(format!("{}: {}", url, e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::FetchFailed(format!("{} returned {}", url, status)));
    }

    response
        .text()
        .await
        .map_err(|e| SourceError::FetchFailed(format!("{}: {}", url, e)))
}
