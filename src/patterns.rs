use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::rename_engine::Candidate;

/// Season/episode pair pulled out of a filename. Season is 0 for patterns
/// without a season group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EpisodeId {
    pub season: u32,
    pub episode: u32,
}

#[derive(Debug)]
pub struct Pattern {
    pub name: &'static str,
    pub example: &'static str,
    pub has_season: bool,
    regex: Regex,
}

impl Pattern {
    fn new(name: &'static str, source: &str, example: &'static str, has_season: bool) -> Self {
        Self {
            name,
            example,
            has_season,
            regex: Regex::new(source).expect("catalog pattern must compile"),
        }
    }

    /// Applies the pattern to the first match location in `file_name`.
    pub fn extract(&self, file_name: &str) -> Option<EpisodeId> {
        let captures = self.regex.captures(file_name)?;
        let group = |i: usize| captures.get(i).map_or(0, |m| parse_leading_int(m.as_str()));

        let id = if self.has_season {
            EpisodeId {
                season: group(1),
                episode: group(2),
            }
        } else {
            EpisodeId {
                season: 0,
                episode: group(1),
            }
        };
        Some(id)
    }
}

static CATALOG: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        Pattern::new("Standard", r"S([0-9]+)E([0-9]+)", "S01E05, S1E12", true),
        Pattern::new("Case Insensitive", r"[Ss]([0-9]+)[Ee]([0-9]+)", "s01e05, S01E05", true),
        Pattern::new("Alternative", r"([0-9]+)x([0-9]+)", "1x05, 01x12", true),
        Pattern::new("Verbose", r"Season\.([0-9]+)\.Episode\.([0-9]+)", "Season.1.Episode.5", true),
        Pattern::new(
            "Flexible",
            r"(?i)season[.\s]*([0-9]+)[.\s]*episode[.\s]*([0-9]+)",
            "Season 1 Episode 5",
            true,
        ),
        Pattern::new("Episode Only", r"Episode[.\s]*([0-9]+)", "Episode.5, Episode 12", false),
        Pattern::new("Short Episode", r"(?i)ep[.\s]*([0-9]+)", "Ep.5, ep 12", false),
        Pattern::new("Minimal Episode", r"[Ee]([0-9]+)", "E05, e12", false),
        Pattern::new("Dot Notation", r"\.([0-9]+)\.", ".1204.", false),
        Pattern::new("Combined", r"([0-9]{1,2})([0-9]{2})", "105 (S1E05), 1205 (S12E05)", true),
    ]
});

/// The fixed pattern table, in display order.
pub fn catalog() -> &'static [Pattern] {
    &CATALOG
}

/// Converts the leading ASCII digits of `text` to a number. Anything that
/// does not produce a `u32` (no digits, overflow) becomes 0.
pub fn parse_leading_int(text: &str) -> u32 {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().unwrap_or(0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternResult {
    pub total_matches: usize,
    pub candidate_count: usize,
}

impl PatternResult {
    pub fn match_percentage(&self) -> Option<f64> {
        if self.candidate_count == 0 {
            return None;
        }
        Some(100.0 * self.total_matches as f64 / self.candidate_count as f64)
    }
}

/// One pattern applied to a candidate list. `ids` lines up with the
/// candidates it was computed from.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub pattern: &'static Pattern,
    pub ids: Vec<Option<EpisodeId>>,
    pub result: PatternResult,
}

pub fn evaluate(pattern: &'static Pattern, candidates: &[Candidate]) -> Evaluation {
    let ids: Vec<Option<EpisodeId>> = candidates
        .iter()
        .map(|candidate| {
            let id = pattern.extract(&candidate.file_name);
            debug!(pattern = pattern.name, file = %candidate.file_name, ?id, "evaluated");
            id
        })
        .collect();

    let total_matches = ids.iter().filter(|id| id.is_some()).count();
    Evaluation {
        pattern,
        ids,
        result: PatternResult {
            total_matches,
            candidate_count: candidates.len(),
        },
    }
}

/// Evaluates every catalog pattern independently.
pub fn analyze(candidates: &[Candidate]) -> Vec<Evaluation> {
    catalog()
        .iter()
        .map(|pattern| evaluate(pattern, candidates))
        .collect()
}

/// Index of the pattern with the highest match rate. Ties go to the earlier
/// pattern; nothing is recommended when no pattern matched anything.
pub fn best_pattern(results: &[PatternResult]) -> Option<usize> {
    let mut best = None;
    let mut best_percentage = 0.0;

    for (index, result) in results.iter().enumerate() {
        if let Some(percentage) = result.match_percentage() {
            if percentage > best_percentage {
                best_percentage = percentage;
                best = Some(index);
            }
        }
    }

    best
}
