/*!
 * Tests for the application controller lifecycle
 */

use anyhow::Result;
use readaloud::app_config::Config;
use readaloud::app_controller::Controller;
use crate::common;

#[test]
fn test_new_for_test_shouldUseDefaultConfig() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert_eq!(controller.config().reading.token_budget, 1);
    Ok(())
}

#[test]
fn test_with_config_withInvalidConfig_shouldFail() {
    let mut config = Config::default();
    config.reading.token_budget = 0;
    assert!(Controller::with_config(config).is_err());
}

#[tokio::test]
async fn test_run_withoutCredentials_shouldFailBeforeLoading() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let err = controller.run("/nonexistent/chapter.html").await.unwrap_err();
    assert!(err.to_string().contains("subscription key"));
    Ok(())
}

#[tokio::test]
async fn test_list_segments_withChapterFile_shouldReturnSegmentTable() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let mut config = Config::default();
    config.reading.token_budget = 2;
    let controller = Controller::with_config(config)?;

    let segments = controller.list_segments(path.to_str().unwrap()).await?;

    let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Chapter 1\nIt was a bright cold day in April.",
            "The clocks were striking thirteen.",
            "Part One\nOutside, even through the shut window, the world looked cold.",
            "Down in the street little eddies of wind were whirling dust."
        ]
    );
    assert_eq!(segments.last().map(|s| s.end_offset), Some(6));
    Ok(())
}

#[tokio::test]
async fn test_list_segments_withMissingFile_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    assert!(controller.list_segments("/nonexistent/chapter.html").await.is_err());
    Ok(())
}
