use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ConfigError, DirectoryError, PlanError, RenameError};
use crate::patterns::{EpisodeId, Evaluation, catalog};

pub const VIDEO_EXTENSIONS: [&str; 12] = [
    "mkv", "mp4", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ts", "m2ts",
];

pub const DEFAULT_MAX_FILES: usize = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Rename anyway; a later file may overwrite or fail on an earlier one.
    #[default]
    Allow,
    /// Reject the whole batch when two files share a destination name.
    Refuse,
}

#[derive(Debug, Clone)]
pub struct RenameConfig {
    pub directory: PathBuf,
    /// Zero-based catalog index chosen up front.
    pub pattern: Option<usize>,
    pub series_name: Option<String>,
    pub assume_yes: bool,
    pub dry_run: bool,
    pub json: bool,
    pub collisions: CollisionPolicy,
    pub max_files: usize,
}

/// A video file found by the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub original_path: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedRename {
    pub original_path: PathBuf,
    pub original_name: String,
    #[serde(flatten)]
    pub id: EpisodeId,
    pub new_name: String,
    pub new_path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenamePlan {
    pub pattern: String,
    pub series_name: String,
    pub renames: Vec<PlannedRename>,
}

impl RenamePlan {
    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    /// New names that more than one entry would be renamed to.
    pub fn duplicate_destinations(&self) -> Vec<String> {
        let mut counts: BTreeMap<&Path, usize> = BTreeMap::new();
        for rename in &self.renames {
            *counts.entry(rename.new_path.as_path()).or_default() += 1;
        }

        counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(path, _)| {
                path.file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default()
            })
            .collect()
    }

    pub fn check_collisions(&self, policy: CollisionPolicy) -> Result<(), PlanError> {
        if policy == CollisionPolicy::Allow {
            return Ok(());
        }

        let duplicates = self.duplicate_destinations();
        if duplicates.is_empty() {
            Ok(())
        } else {
            Err(PlanError::DuplicateDestinations(duplicates))
        }
    }
}

#[derive(Debug)]
pub struct RenameResult {
    pub rename: PlannedRename,
    pub error: Option<RenameError>,
}

impl RenameResult {
    pub fn success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub succeeded: usize,
    pub failed: usize,
}

impl RenameSummary {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

#[derive(Debug)]
pub struct RenameEngine {
    config: RenameConfig,
}

impl RenameEngine {
    pub fn new(config: RenameConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    pub fn scan_directory(&self) -> Result<Vec<Candidate>, DirectoryError> {
        scan_directory(&self.config.directory, self.config.max_files)
    }

    /// Builds the plan for `evaluation` and applies the configured collision
    /// policy to it.
    pub fn plan(
        &self,
        candidates: &[Candidate],
        evaluation: &Evaluation,
        series_name: &str,
    ) -> Result<RenamePlan, PlanError> {
        let plan = build_plan(candidates, evaluation, series_name);
        let duplicates = plan.duplicate_destinations();
        if !duplicates.is_empty() {
            debug!(?duplicates, "several files share a destination name");
        }
        plan.check_collisions(self.config.collisions)?;
        Ok(plan)
    }

    pub fn rename_files<F>(&self, plan: &RenamePlan, on_result: F) -> RenameSummary
    where
        F: FnMut(&RenameResult),
    {
        rename_files(plan, on_result)
    }
}

fn is_video_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            VIDEO_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Lists video files directly inside `directory`, in enumeration order.
/// Hidden files and anything that is not a regular file are skipped; at
/// most `max_files` candidates are returned.
pub fn scan_directory(
    directory: &Path,
    max_files: usize,
) -> Result<Vec<Candidate>, DirectoryError> {
    let metadata = fs::metadata(directory).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DirectoryError::NotFound(directory.to_path_buf())
        } else {
            DirectoryError::Unreadable {
                path: directory.to_path_buf(),
                source,
            }
        }
    })?;
    if !metadata.is_dir() {
        return Err(DirectoryError::NotADirectory(directory.to_path_buf()));
    }

    let entries = fs::read_dir(directory).map_err(|source| DirectoryError::Unreadable {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        if candidates.len() >= max_files {
            info!(max_files, "file limit reached, ignoring remaining entries");
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("skipping unreadable entry: {}", e);
                continue;
            }
        };

        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') {
            continue;
        }

        // Follows symlinks, so a link to a regular file counts.
        let path = entry.path();
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if !is_file || !is_video_file(&file_name) {
            debug!(file = %file_name, "skipped");
            continue;
        }

        candidates.push(Candidate {
            original_path: path,
            file_name,
        });
    }

    info!(directory = %directory.display(), count = candidates.len(), "scan finished");
    Ok(candidates)
}

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("sanitize pattern must compile"));

pub fn sanitize_series_name(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

/// Everything from the last `.` on, or an empty string.
pub fn file_extension(file_name: &str) -> &str {
    file_name.rfind('.').map_or("", |pos| &file_name[pos..])
}

pub fn generate_name(id: EpisodeId, file_name: &str, series_name: &str) -> String {
    let series = sanitize_series_name(series_name);
    let extension = file_extension(file_name);

    if id.season > 0 {
        format!("{} S{:02}E{:02}{}", series, id.season, id.episode, extension)
    } else {
        format!("{} E{:04}{}", series, id.episode, extension)
    }
}

/// Pairs every candidate matched by `evaluation` with its new name.
/// `evaluation` must have been computed over `candidates`.
pub fn build_plan(
    candidates: &[Candidate],
    evaluation: &Evaluation,
    series_name: &str,
) -> RenamePlan {
    let renames = candidates
        .iter()
        .zip(&evaluation.ids)
        .filter_map(|(candidate, id)| {
            let id = (*id)?;
            let new_name = generate_name(id, &candidate.file_name, series_name);
            let new_path = candidate
                .original_path
                .parent()
                .map(|dir| dir.join(&new_name))
                .unwrap_or_else(|| PathBuf::from(&new_name));

            Some(PlannedRename {
                original_path: candidate.original_path.clone(),
                original_name: candidate.file_name.clone(),
                id,
                new_name,
                new_path,
            })
        })
        .collect();

    RenamePlan {
        pattern: evaluation.pattern.name.to_string(),
        series_name: series_name.to_string(),
        renames,
    }
}

pub fn rename_file(rename: &PlannedRename) -> RenameResult {
    match fs::rename(&rename.original_path, &rename.new_path) {
        Ok(()) => RenameResult {
            rename: rename.clone(),
            error: None,
        },
        Err(e) => RenameResult {
            rename: rename.clone(),
            error: Some(RenameError::new(
                rename.original_path.clone(),
                rename.new_path.clone(),
                e,
            )),
        },
    }
}

/// Attempts every rename in order. A failure is reported through
/// `on_result` and counted, and the batch carries on.
pub fn rename_files<F>(plan: &RenamePlan, mut on_result: F) -> RenameSummary
where
    F: FnMut(&RenameResult),
{
    let mut summary = RenameSummary::default();

    for rename in &plan.renames {
        let result = rename_file(rename);
        match &result.error {
            None => {
                debug!(from = %rename.original_name, to = %rename.new_name, "renamed");
                summary.succeeded += 1;
            }
            Some(e) => {
                debug!("{}", e);
                summary.failed += 1;
            }
        }
        on_result(&result);
    }

    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "rename batch finished"
    );
    summary
}

pub struct ConfigBuilder {
    directory: Option<PathBuf>,
    pattern: Option<usize>,
    series_name: Option<String>,
    assume_yes: bool,
    dry_run: bool,
    json: bool,
    collisions: CollisionPolicy,
    max_files: usize,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            directory: None,
            pattern: None,
            series_name: None,
            assume_yes: false,
            dry_run: false,
            json: false,
            collisions: CollisionPolicy::Allow,
            max_files: DEFAULT_MAX_FILES,
        }
    }

    pub fn directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    /// One-based pattern number, as shown in the analysis table.
    pub fn pattern(mut self, number: Option<usize>) -> Self {
        self.pattern = number;
        self
    }

    pub fn series_name(mut self, name: Option<String>) -> Self {
        self.series_name = name;
        self
    }

    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    pub fn collisions(mut self, policy: CollisionPolicy) -> Self {
        self.collisions = policy;
        self
    }

    pub fn max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn build(self) -> Result<RenameConfig, ConfigError> {
        let max = catalog().len();
        let pattern = match self.pattern {
            Some(number) if (1..=max).contains(&number) => Some(number - 1),
            Some(number) => return Err(ConfigError::InvalidPattern { got: number, max }),
            None => None,
        };

        if matches!(&self.series_name, Some(name) if name.is_empty()) {
            return Err(ConfigError::EmptySeriesName);
        }

        if self.max_files == 0 {
            return Err(ConfigError::InvalidMaxFiles);
        }

        if self.json && (pattern.is_none() || self.series_name.is_none()) {
            return Err(ConfigError::JsonNeedsSelection);
        }

        Ok(RenameConfig {
            directory: self.directory.unwrap_or_else(|| PathBuf::from(".")),
            pattern,
            series_name: self.series_name,
            assume_yes: self.assume_yes,
            dry_run: self.dry_run,
            json: self.json,
            collisions: self.collisions,
            max_files: self.max_files,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
