use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crossterm::style::{Color, Stylize};

use crate::patterns::{Evaluation, PatternResult, best_pattern};
use crate::rename_engine::{RenamePlan, RenameResult, RenameSummary};

const PREVIEW_LIMIT: usize = 10;
const TABLE_WIDTH: usize = 86;
const PREVIEW_WIDTH: usize = 100;

fn rate_color(percentage: f64) -> Color {
    if percentage >= 80.0 {
        Color::Green
    } else if percentage >= 50.0 {
        Color::Yellow
    } else if percentage > 0.0 {
        Color::Red
    } else {
        Color::DarkGrey
    }
}

fn box_top(out: &mut dyn Write, title: &str, width: usize) -> io::Result<()> {
    let inner = width.saturating_sub(2);
    let label = format!(" {title} ");
    let left = inner.saturating_sub(label.chars().count()) / 2;
    let right = inner.saturating_sub(left + label.chars().count());
    let line = format!("┏{}{}{}┓", "━".repeat(left), label, "━".repeat(right));
    writeln!(out, "{}", line.cyan())
}

fn box_bottom(out: &mut dyn Write, width: usize) -> io::Result<()> {
    let line = format!("┗{}┛", "━".repeat(width.saturating_sub(2)));
    writeln!(out, "{}", line.cyan())
}

fn rule(out: &mut dyn Write, width: usize) -> io::Result<()> {
    writeln!(out, "{}", "━".repeat(width).cyan())
}

pub fn render_header(out: &mut dyn Write, directory: &Path) -> io::Result<()> {
    writeln!(out, "{}", "\n🎬 TV SERIES FILE RENAMER".magenta().bold())?;
    writeln!(out, "{}", "Batch renaming with pattern recognition\n".dim())?;
    writeln!(
        out,
        "{}",
        format!("📁 Target directory: {}", directory.display()).cyan()
    )
}

pub fn render_scan(out: &mut dyn Write, count: usize, elapsed: Duration) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "✓ Found {} video files in {:.3} seconds",
            count,
            elapsed.as_secs_f64()
        )
        .green()
    )?;
    writeln!(out, "{}", "🔍 Analyzing file patterns...".yellow())
}

pub fn render_analysis(
    out: &mut dyn Write,
    analysis: &[Evaluation],
    file_count: usize,
) -> io::Result<()> {
    writeln!(out)?;
    box_top(out, "PATTERN ANALYSIS", TABLE_WIDTH)?;
    writeln!(
        out,
        "┃ {:<3} ┃ {:<18} ┃ {:<28} ┃ {:>8} ┃ {:>8} ┃",
        "No", "Pattern", "Example", "Matches", "Rate"
    )?;
    writeln!(
        out,
        "{}",
        format!(
            "┣{}╋{}╋{}╋{}╋{}┫",
            "━".repeat(5),
            "━".repeat(20),
            "━".repeat(30),
            "━".repeat(10),
            "━".repeat(10)
        )
        .cyan()
    )?;

    for (index, evaluation) in analysis.iter().enumerate() {
        let percentage = evaluation.result.match_percentage().unwrap_or(0.0);
        let color = rate_color(percentage);
        let rate = format!("{percentage:.1}%");

        writeln!(
            out,
            "┃ {} ┃ {:<18} ┃ {} ┃ {} ┃ {} ┃",
            format!("{:<3}", index + 1).with(color),
            evaluation.pattern.name,
            format!("{:<28}", evaluation.pattern.example).dim(),
            format!("{:>8}", evaluation.result.total_matches).with(color),
            format!("{rate:>8}").with(color),
        )?;
    }
    box_bottom(out, TABLE_WIDTH)?;

    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("📊 Total files scanned: {file_count}").green().bold()
    )?;

    let results: Vec<PatternResult> = analysis.iter().map(|e| e.result).collect();
    if let Some(best) = best_pattern(&results) {
        let percentage = results[best].match_percentage().unwrap_or(0.0);
        writeln!(
            out,
            "{}",
            format!(
                "✨ Best match: Pattern {} ({}) with {:.1}% coverage",
                best + 1,
                analysis[best].pattern.name,
                percentage
            )
            .cyan()
            .bold()
        )?;
    }
    Ok(())
}

pub fn render_preview(out: &mut dyn Write, plan: &RenamePlan) -> io::Result<()> {
    writeln!(out)?;
    box_top(out, "RENAME PREVIEW", PREVIEW_WIDTH)?;

    for rename in plan.renames.iter().take(PREVIEW_LIMIT) {
        writeln!(
            out,
            "┃ {} {} {} ┃",
            format!("{:<45}", rename.original_name).yellow(),
            "→".cyan(),
            format!("{:<46}", rename.new_name).green()
        )?;
    }
    if plan.is_empty() {
        writeln!(out, "┃ {:<96} ┃", "No files to rename")?;
    }
    box_bottom(out, PREVIEW_WIDTH)?;

    if plan.len() > PREVIEW_LIMIT {
        writeln!(
            out,
            "{}",
            format!("\n... and {} more files", plan.len() - PREVIEW_LIMIT).yellow()
        )?;
    }

    let duplicates = plan.duplicate_destinations();
    if !duplicates.is_empty() {
        writeln!(
            out,
            "{}",
            format!(
                "\n⚠️  Several files would be renamed to: {}",
                duplicates.join(", ")
            )
            .red()
        )?;
    }
    Ok(())
}

pub fn render_notice(out: &mut dyn Write, message: &str) -> io::Result<()> {
    writeln!(out, "{}", message.yellow())
}

pub fn render_rename_start(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    rule(out, 80)?;
    writeln!(out, "{}", "Renaming files...".cyan().bold())?;
    rule(out, 80)
}

pub fn render_rename_result(out: &mut dyn Write, result: &RenameResult) -> io::Result<()> {
    match &result.error {
        None => writeln!(out, "{} Renamed: {}", "✓".green(), result.rename.new_name),
        Some(e) => writeln!(
            out,
            "{} Failed: {} ({})",
            "✗".red(),
            result.rename.original_name,
            e.kind.describe()
        ),
    }
}

pub fn render_summary(out: &mut dyn Write, summary: &RenameSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("✓ Success: {} files", summary.succeeded).green().bold()
    )?;
    if summary.failed > 0 {
        writeln!(
            out,
            "{}",
            format!("✗ Failed: {} files", summary.failed).red().bold()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::EpisodeId;
    use crate::rename_engine::PlannedRename;
    use std::path::PathBuf;

    fn plan_of(count: usize) -> RenamePlan {
        let renames = (1..=count as u32)
            .map(|episode| PlannedRename {
                original_path: PathBuf::from(format!("show.e{episode}.mkv")),
                original_name: format!("show.e{episode}.mkv"),
                id: EpisodeId { season: 0, episode },
                new_name: format!("Show E{episode:04}.mkv"),
                new_path: PathBuf::from(format!("Show E{episode:04}.mkv")),
            })
            .collect();
        RenamePlan {
            pattern: "Minimal Episode".to_string(),
            series_name: "Show".to_string(),
            renames,
        }
    }

    #[test]
    fn test_rate_color() {
        assert_eq!(rate_color(100.0), Color::Green);
        assert_eq!(rate_color(80.0), Color::Green);
        assert_eq!(rate_color(50.0), Color::Yellow);
        assert_eq!(rate_color(0.5), Color::Red);
        assert_eq!(rate_color(0.0), Color::DarkGrey);
    }

    #[test]
    fn test_preview_is_capped() {
        let mut out = Vec::new();
        render_preview(&mut out, &plan_of(13)).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Show E0010.mkv"));
        assert!(!text.contains("Show E0011.mkv"));
        assert!(text.contains("... and 3 more files"));
    }

    #[test]
    fn test_preview_of_empty_plan() {
        let mut out = Vec::new();
        render_preview(&mut out, &plan_of(0)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("No files to rename"));
    }
}
