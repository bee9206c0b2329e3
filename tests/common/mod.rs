/*!
 * Common test utilities for the readaloud test suite
 */

use std::path::{Path, PathBuf};
use std::fs;
use anyhow::Result;
use tempfile::TempDir;
use tokio::sync::mpsc;

use readaloud::content::{ContentNode, TagKind};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample chapter page for testing
pub fn create_test_chapter(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"<!DOCTYPE html>
<html>
<head><title>Chapter 1</title></head>
<body>
<h1>Chapter 1</h1>
<p>It was a bright cold day in April.</p>
<p>The clocks were
striking thirteen.</p>
<h2>Part One</h2>
<p>Outside, even through the shut window, the world looked cold.</p>
<p></p>
<p>Down in the street little eddies of wind were whirling dust.</p>
</body>
</html>
"#;
    create_test_file(dir, filename, content)
}

/// Build content nodes from (tag, text) pairs
pub fn nodes(items: &[(TagKind, &str)]) -> Vec<ContentNode> {
    items
        .iter()
        .map(|(tag, text)| ContentNode::new(*tag, *text))
        .collect()
}

/// Command input pre-loaded with `keys`. The sender is returned so tests
/// decide whether the input stays open.
pub fn command_input(keys: &[u8]) -> (mpsc::Sender<u8>, mpsc::Receiver<u8>) {
    let (tx, rx) = mpsc::channel(keys.len() + 8);
    for key in keys {
        tx.try_send(*key).expect("command buffer should have room");
    }
    (tx, rx)
}

/// Enable test log capture
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
