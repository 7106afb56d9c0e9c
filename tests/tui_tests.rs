// End-to-end runs of the interactive driver with scripted input

use std::fs;
use std::path::Path;

use series_rename::error::{AppError, InputError};
use series_rename::rename_engine::{CollisionPolicy, ConfigBuilder, RenameEngine, RenameSummary};
use series_rename::tui::{RunOutcome, run};
use tempfile::TempDir;

fn show_dir(names: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for name in names {
        fs::write(dir.path().join(name), b"video").unwrap();
    }
    dir
}

fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn engine_for(dir: &Path) -> RenameEngine {
    RenameEngine::new(ConfigBuilder::new().directory(dir).build().unwrap())
}

fn run_with(engine: &RenameEngine, input: &str) -> (Result<RunOutcome, AppError>, String) {
    let mut out = Vec::new();
    let result = run(engine, input.as_bytes(), &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn test_interactive_rename() {
    let dir = show_dir(&["show.s01e02.mkv", "show.s01e03.mp4", "notes.txt"]);
    let engine = engine_for(dir.path());

    let (result, output) = run_with(&engine, "2\nMy Show\ny\n");

    assert_eq!(
        result.unwrap(),
        RunOutcome::Renamed(RenameSummary { succeeded: 2, failed: 0 })
    );
    assert_eq!(
        listing(dir.path()),
        ["My Show S01E02.mkv", "My Show S01E03.mp4", "notes.txt"]
    );
    assert!(output.contains("PATTERN ANALYSIS"));
    assert!(output.contains("Case Insensitive"));
    assert!(output.contains("Best match: Pattern 2 (Case Insensitive)"));
    assert!(output.contains("Success: 2 files"));
}

#[test]
fn test_quit_leaves_files_alone() {
    let dir = show_dir(&["Show.S01E02.mkv"]);
    let engine = engine_for(dir.path());

    let (result, _) = run_with(&engine, "0\n");

    assert_eq!(result.unwrap(), RunOutcome::Quit);
    assert_eq!(listing(dir.path()), ["Show.S01E02.mkv"]);
}

#[test]
fn test_declined_confirmation_after_preview() {
    let dir = show_dir(&["Show.S01E02.mkv"]);
    let engine = engine_for(dir.path());

    let (result, output) = run_with(&engine, "1\nShow\nn\n");

    assert_eq!(result.unwrap(), RunOutcome::Cancelled);
    assert!(output.contains("RENAME PREVIEW"));
    assert!(output.contains("Show S01E02.mkv"));
    assert!(output.contains("Renaming cancelled."));
    assert_eq!(listing(dir.path()), ["Show.S01E02.mkv"]);
}

#[test]
fn test_invalid_selection_reprompts() {
    let dir = show_dir(&["Show Episode 7.mkv"]);
    let engine = engine_for(dir.path());

    let (result, output) = run_with(&engine, "twelve\n42\n6\nShow\ny\n");

    assert!(matches!(result.unwrap(), RunOutcome::Renamed(_)));
    assert_eq!(output.matches("Invalid selection!").count(), 2);
    assert_eq!(listing(dir.path()), ["Show E0007.mkv"]);
}

#[test]
fn test_empty_series_name_is_fatal() {
    let dir = show_dir(&["Show.S01E02.mkv"]);
    let engine = engine_for(dir.path());

    let (result, _) = run_with(&engine, "1\n\n");

    assert!(matches!(
        result,
        Err(AppError::Input(InputError::EmptySeriesName))
    ));
    assert_eq!(listing(dir.path()), ["Show.S01E02.mkv"]);
}

#[test]
fn test_closed_input_while_naming() {
    let dir = show_dir(&["Show.S01E02.mkv"]);
    let engine = engine_for(dir.path());

    let (result, _) = run_with(&engine, "1\n");
    assert!(matches!(result, Err(AppError::Input(InputError::Closed))));
}

#[test]
fn test_no_video_files() {
    let dir = show_dir(&["readme.txt"]);
    let engine = engine_for(dir.path());

    let (result, _) = run_with(&engine, "");
    assert!(matches!(result, Err(AppError::NoVideoFiles(_))));
}

#[test]
fn test_missing_directory() {
    let dir = TempDir::new().unwrap();
    let engine = engine_for(&dir.path().join("nope"));

    let (result, _) = run_with(&engine, "");
    assert!(matches!(result, Err(AppError::Directory(_))));
}

#[test]
fn test_unmatched_pattern_has_nothing_to_rename() {
    let dir = show_dir(&["Show.S01E02.mkv"]);
    let engine = engine_for(dir.path());

    let (result, output) = run_with(&engine, "4\nShow\n");

    assert_eq!(result.unwrap(), RunOutcome::NothingToRename);
    assert!(output.contains("No files to rename"));
}

#[test]
fn test_batch_options_skip_prompts() {
    let dir = show_dir(&["Show.S02E01.mkv", "Show.S02E02.mkv"]);
    let config = ConfigBuilder::new()
        .directory(dir.path())
        .pattern(Some(1))
        .series_name(Some("Show".to_string()))
        .assume_yes(true)
        .build()
        .unwrap();
    let engine = RenameEngine::new(config);

    let (result, _) = run_with(&engine, "");

    assert!(matches!(
        result.unwrap(),
        RunOutcome::Renamed(RenameSummary { succeeded: 2, failed: 0 })
    ));
    assert_eq!(listing(dir.path()), ["Show S02E01.mkv", "Show S02E02.mkv"]);
}

#[test]
fn test_dry_run_renames_nothing() {
    let dir = show_dir(&["Show.S02E01.mkv"]);
    let config = ConfigBuilder::new()
        .directory(dir.path())
        .pattern(Some(1))
        .series_name(Some("Show".to_string()))
        .dry_run(true)
        .build()
        .unwrap();

    let (result, output) = run_with(&RenameEngine::new(config), "");

    assert_eq!(result.unwrap(), RunOutcome::Previewed);
    assert!(output.contains("Show S02E01.mkv"));
    assert_eq!(listing(dir.path()), ["Show.S02E01.mkv"]);
}

#[test]
fn test_json_plan_output() {
    let dir = show_dir(&["Show.S02E01.mkv", "extras.mkv"]);
    let config = ConfigBuilder::new()
        .directory(dir.path())
        .pattern(Some(1))
        .series_name(Some("Show".to_string()))
        .json(true)
        .build()
        .unwrap();

    let (result, output) = run_with(&RenameEngine::new(config), "");

    assert_eq!(result.unwrap(), RunOutcome::Exported);
    let plan: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(plan["pattern"], "Standard");
    assert_eq!(plan["series_name"], "Show");
    let renames = plan["renames"].as_array().unwrap();
    assert_eq!(renames.len(), 1);
    assert_eq!(renames[0]["original_name"], "Show.S02E01.mkv");
    assert_eq!(renames[0]["new_name"], "Show S02E01.mkv");
    assert_eq!(renames[0]["season"], 2);
    assert_eq!(renames[0]["episode"], 1);
    assert_eq!(listing(dir.path()), ["Show.S02E01.mkv", "extras.mkv"]);
}

#[test]
fn test_refused_collisions_abort_before_renaming() {
    let dir = show_dir(&["Show.S01E01.mkv", "Show.S01E01.v2.mkv"]);
    let config = ConfigBuilder::new()
        .directory(dir.path())
        .collisions(CollisionPolicy::Refuse)
        .build()
        .unwrap();

    let (result, _) = run_with(&RenameEngine::new(config), "1\nShow\ny\n");

    assert!(matches!(result, Err(AppError::Plan(_))));
    assert_eq!(listing(dir.path()), ["Show.S01E01.mkv", "Show.S01E01.v2.mkv"]);
}
