use std::io::{self, BufRead, Write};
use std::time::Instant;

use tracing::info;

use crate::error::AppError;
use crate::patterns::{analyze, catalog, evaluate};
use crate::rename_engine::{RenameEngine, RenamePlan, RenameSummary};

mod prompts;
mod rendering;

pub use prompts::Prompter;

/// How a run ended without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The operator picked pattern 0.
    Quit,
    /// The operator declined the confirmation.
    Cancelled,
    /// `--dry-run`: preview shown, nothing renamed.
    Previewed,
    /// `--json`: plan written, nothing renamed.
    Exported,
    /// The chosen pattern matched no file.
    NothingToRename,
    Renamed(RenameSummary),
}

enum Prepared {
    Plan(RenamePlan),
    Done(RunOutcome),
}

/// Drives scan, analysis, selection, preview and rename for one directory.
/// Prompts read from `input`; everything else is written to `out`.
pub fn run<R, W>(engine: &RenameEngine, input: R, out: &mut W) -> Result<RunOutcome, AppError>
where
    R: BufRead,
    W: Write,
{
    let config = engine.config();
    let mut prompter = Prompter::new(input);

    // In JSON mode only the plan goes to `out`.
    if config.json {
        let plan = match prepare(engine, &mut prompter, &mut io::sink())? {
            Prepared::Plan(plan) => plan,
            Prepared::Done(outcome) => return Ok(outcome),
        };
        serde_json::to_writer_pretty(&mut *out, &plan)?;
        writeln!(out)?;
        return Ok(RunOutcome::Exported);
    }

    let plan = match prepare(engine, &mut prompter, out)? {
        Prepared::Plan(plan) => plan,
        Prepared::Done(outcome) => return Ok(outcome),
    };

    rendering::render_preview(out, &plan)?;

    if plan.is_empty() {
        return Ok(RunOutcome::NothingToRename);
    }

    if config.dry_run {
        rendering::render_notice(out, "Dry run, no files were renamed.")?;
        return Ok(RunOutcome::Previewed);
    }

    if !config.assume_yes && !prompter.confirm(out)? {
        rendering::render_notice(out, "Renaming cancelled.")?;
        return Ok(RunOutcome::Cancelled);
    }

    rendering::render_rename_start(out)?;
    let mut write_result = Ok(());
    let summary = engine.rename_files(&plan, |result| {
        if write_result.is_ok() {
            write_result = rendering::render_rename_result(out, result);
        }
    });
    write_result?;
    rendering::render_summary(out, &summary)?;

    Ok(RunOutcome::Renamed(summary))
}

/// Everything up to and including the rename plan. Nothing here touches the
/// filesystem beyond reading the directory.
fn prepare<R: BufRead>(
    engine: &RenameEngine,
    prompter: &mut Prompter<R>,
    ui: &mut dyn Write,
) -> Result<Prepared, AppError> {
    let config = engine.config();
    rendering::render_header(ui, &config.directory)?;

    let started = Instant::now();
    let candidates = engine.scan_directory()?;
    if candidates.is_empty() {
        return Err(AppError::NoVideoFiles(config.directory.clone()));
    }
    rendering::render_scan(ui, candidates.len(), started.elapsed())?;

    let analysis = analyze(&candidates);
    rendering::render_analysis(ui, &analysis, candidates.len())?;

    let index = match config.pattern {
        Some(index) => index,
        None => match prompter.select_pattern(ui, catalog().len())? {
            Some(index) => index,
            None => {
                rendering::render_notice(ui, "Exiting...")?;
                return Ok(Prepared::Done(RunOutcome::Quit));
            }
        },
    };

    let series_name = match &config.series_name {
        Some(name) => name.clone(),
        None => prompter.series_name(ui)?,
    };

    // Re-run the chosen pattern so the plan never depends on the analysis loop.
    let pattern = &catalog()[index];
    info!(pattern = pattern.name, series = %series_name, "building rename plan");
    let evaluation = evaluate(pattern, &candidates);
    let plan = engine.plan(&candidates, &evaluation, &series_name)?;

    Ok(Prepared::Plan(plan))
}
