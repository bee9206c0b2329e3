/*!
 * End-to-end tests: document on disk, segmentation, interactive playback
 */

use anyhow::Result;
use readaloud::app_config::Config;
use readaloud::app_controller::Controller;
use readaloud::content::{ContentNode, TagKind};
use readaloud::errors::PlaybackError;
use readaloud::playback::Command;
use readaloud::synthesis::{MockSynthesizer, SynthesisOutcome};
use crate::common;

fn controller(token_budget: usize, start_index: usize, start_sub_offset: usize) -> Result<Controller> {
    let mut config = Config::default();
    config.reading.token_budget = token_budget;
    config.reading.start_index = start_index;
    config.reading.start_sub_offset = start_sub_offset;
    Controller::with_config(config)
}

#[tokio::test]
async fn test_reading_withChapterFile_shouldSpeakEverySegment() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let controller = controller(1, 0, 0)?;
    let mock = MockSynthesizer::completing();

    let segments = controller.load_segments(path.to_str().unwrap()).await?;
    let expected: Vec<String> = segments.iter().map(|s| s.markup.clone()).collect();
    let (tx, mut input) = common::command_input(&[]);
    drop(tx);
    let summary = controller.play_segments(mock.clone(), segments, &mut input).await?;

    assert_eq!(summary.cursor, 6);
    assert!(!summary.halted);
    let spoken: Vec<String> = mock.calls().into_iter().map(|c| c.markup).collect();
    assert_eq!(spoken, expected);
    Ok(())
}

#[tokio::test]
async fn test_reading_withSkipAndQuit_shouldReportResumeOffset() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let controller = controller(2, 0, 0)?;
    let mock = MockSynthesizer::until_canceled();

    let segments = controller.load_segments(path.to_str().unwrap()).await?;
    let (_tx, mut input) = common::command_input(b"  q");
    let summary = controller.play_segments(mock.clone(), segments, &mut input).await?;

    assert!(summary.halted);
    assert_eq!(summary.cursor, 2);
    // Third segment opens at the "Part One" heading, the fourth content node
    assert_eq!(summary.resume_offset, Some(3));
    assert_eq!(mock.call_count(), 3);
    assert!(mock.calls().iter().all(|c| c.outcome == SynthesisOutcome::Canceled));
    Ok(())
}

#[tokio::test]
async fn test_reading_withStartSubOffset_shouldSegmentFromThatNode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let controller = controller(2, 0, 3)?;

    let segments = controller.load_segments(path.to_str().unwrap()).await?;

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].start_offset, 3);
    assert!(segments[0].text.starts_with("Part One"));
    Ok(())
}

#[tokio::test]
async fn test_reading_withSubOffsetPastEnd_shouldYieldNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let controller = controller(2, 0, 50)?;

    let segments = controller.load_segments(path.to_str().unwrap()).await?;

    assert!(segments.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_reading_withStartIndex_shouldBeginAtThatSegment() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let controller = controller(1, 4, 0)?;
    let mock = MockSynthesizer::completing();

    let segments = controller.load_segments(path.to_str().unwrap()).await?;
    let fifth = segments[4].markup.clone();
    let (tx, mut input) = common::command_input(&[]);
    drop(tx);
    let summary = controller.play_segments(mock.clone(), segments, &mut input).await?;

    assert_eq!(summary.cursor, 6);
    assert_eq!(mock.call_count(), 2);
    assert_eq!(mock.calls()[0].markup, fifth);
    Ok(())
}

#[tokio::test]
async fn test_reading_withBackWhilePaused_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_chapter(temp_dir.path(), "chapter.html")?;
    let controller = controller(1, 0, 0)?;

    let segments = controller.load_segments(path.to_str().unwrap()).await?;
    let (_tx, mut input) = common::command_input(b"pb");
    let err = controller
        .play_segments(MockSynthesizer::until_canceled(), segments, &mut input)
        .await
        .unwrap_err();

    assert_eq!(
        err.downcast_ref::<PlaybackError>(),
        Some(&PlaybackError::IllegalCommandWhilePaused(Command::Back))
    );
    Ok(())
}

#[tokio::test]
async fn test_reading_withResumeOffsetAfterEmptyNode_shouldResumeAtStoppedSegment() -> Result<()> {
    let nodes = vec![
        ContentNode::paragraph("a"),
        ContentNode::paragraph(""),
        ContentNode::paragraph("b"),
        ContentNode::paragraph("c"),
    ];
    let first = controller(1, 0, 0)?;
    let segments = first.segment_nodes(&nodes);
    let (_tx, mut input) = common::command_input(b"  q");
    let summary = first
        .play_segments(MockSynthesizer::until_canceled(), segments.clone(), &mut input)
        .await?;

    assert_eq!(summary.cursor, 2);
    let stopped = &segments[summary.cursor];
    let offset = summary.resume_offset.expect("halted run should offer a resume offset");

    let resumed = controller(1, 0, offset)?.segment_nodes(&nodes);

    assert_eq!(resumed[0].text, stopped.text);
    assert_eq!(resumed[0].start_offset, stopped.start_offset);
    assert_eq!(resumed.last().map(|s| s.end_offset), segments.last().map(|s| s.end_offset));
    Ok(())
}

#[tokio::test]
async fn test_resume_hint_withEpubPage_shouldNamePageOffsetAndBudget() -> Result<()> {
    let mut config = Config::default();
    config.reading.token_budget = 2;
    config.reading.item_page = 3;
    let controller = Controller::with_config(config)?;
    let nodes = common::nodes(&[
        (TagKind::Heading1, "Ch1"),
        (TagKind::Paragraph, "a"),
        (TagKind::Paragraph, ""),
        (TagKind::Heading2, "S1"),
        (TagKind::Paragraph, "b"),
    ]);
    let segments = controller.segment_nodes(&nodes);
    let (_tx, mut input) = common::command_input(b" q");
    let summary = controller
        .play_segments(MockSynthesizer::until_canceled(), segments, &mut input)
        .await?;

    assert_eq!(
        controller.resume_hint(&summary).as_deref(),
        Some("--item-page 3 --start-sub-offset 2 --num-tokens 2")
    );
    Ok(())
}

#[tokio::test]
async fn test_resume_hint_withCompletedRun_shouldBeNone() -> Result<()> {
    let controller = controller(1, 0, 0)?;
    let segments = controller.segment_nodes(&common::nodes(&[(TagKind::Paragraph, "only")]));
    let (tx, mut input) = common::command_input(&[]);
    drop(tx);
    let summary = controller
        .play_segments(MockSynthesizer::completing(), segments, &mut input)
        .await?;

    assert_eq!(controller.resume_hint(&summary), None);
    Ok(())
}
