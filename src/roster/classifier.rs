//! Heuristic employee-roster detection over CSV sources. Pure scoring,
//! deterministic for identical content and filename.

use std::path::{Path, PathBuf};

use crate::roster::table::RosterTable;
use crate::roster::ActiveRoster;

/// Keywords that flag an employee-related question or filename.
pub const EMPLOYEE_KEYWORDS: &[&str] = &[
    "人事",
    "従業員",
    "社員",
    "部署",
    "スキル",
    "名簿",
    "所属",
    "hr",
    "employee",
    "department",
    "skill",
    "roster",
    "affiliation",
];

/// Column headers expected in a roster, worth one point each.
pub const EXPECTED_HEADER_KEYWORDS: &[&str] = &[
    "氏名",
    "名前",
    "name",
    "部署",
    "所属",
    "department",
    "スキル",
    "skill",
    "役職",
    "position",
    "社員番号",
];

pub const NAME_COLUMN_KEYWORDS: &[&str] = &["氏名", "名前", "name"];

pub const DEPARTMENT_COLUMN_KEYWORDS: &[&str] = &["部署", "所属", "department"];

/// Minimum total score for a candidate to become the active roster.
pub const ROSTER_SCORE_THRESHOLD: f32 = 5.0;

/// Per-rule contributions, kept separate so each rule is testable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub filename_points: f32,
    pub row_count_points: f32,
    pub header_points: f32,
    pub structure_bonus: f32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f32 {
        self.filename_points + self.row_count_points + self.header_points + self.structure_bonus
    }
}

#[derive(Debug, Clone)]
pub struct RosterCandidate {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub breakdown: ScoreBreakdown,
}

impl RosterCandidate {
    pub fn score(&self) -> f32 {
        self.breakdown.total()
    }
}

fn contains_keyword(haystack: &str, keywords: &[&str]) -> bool {
    let lower = haystack.to_lowercase();
    keywords.iter().any(|kw| lower.contains(&kw.to_lowercase()))
}

/// Score one table: +2 per employee keyword in the filename, up to 5
/// points scaled by row count, +1 per header matching an expected
/// keyword, +5 when both a name-like and a department-like column exist.
pub fn score_table(path: &Path, headers: &[String], row_count: usize) -> ScoreBreakdown {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let filename_points = EMPLOYEE_KEYWORDS
        .iter()
        .filter(|kw| filename.contains(&kw.to_lowercase()))
        .count() as f32
        * 2.0;

    let row_count_points = (row_count as f32 / 10.0).min(5.0);

    let header_points = headers
        .iter()
        .filter(|h| contains_keyword(h, EXPECTED_HEADER_KEYWORDS))
        .count() as f32;

    let has_name = headers.iter().any(|h| contains_keyword(h, NAME_COLUMN_KEYWORDS));
    let has_department = headers
        .iter()
        .any(|h| contains_keyword(h, DEPARTMENT_COLUMN_KEYWORDS));
    let structure_bonus = if has_name && has_department { 5.0 } else { 0.0 };

    ScoreBreakdown {
        filename_points,
        row_count_points,
        header_points,
        structure_bonus,
    }
}

/// Evaluate every CSV path and pick the highest-scoring candidate at or
/// above the threshold. Unreadable files are logged and skipped; ties
/// keep the earlier candidate.
pub fn classify(csv_paths: &[PathBuf]) -> Option<ActiveRoster> {
    let mut best: Option<RosterCandidate> = None;

    for path in csv_paths {
        let table = match RosterTable::load(path) {
            Ok(table) => table,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "excluding candidate");
                continue;
            }
        };

        let breakdown = score_table(path, &table.headers, table.row_count());
        let candidate = RosterCandidate {
            path: path.clone(),
            columns: table.headers.clone(),
            row_count: table.row_count(),
            breakdown,
        };
        tracing::debug!(
            path = %candidate.path.display(),
            score = candidate.score(),
            "roster candidate scored"
        );

        let better = match &best {
            Some(current) => candidate.score() > current.score(),
            None => true,
        };
        if better {
            best = Some(candidate);
        }
    }

    let top = best?;
    if top.score() < ROSTER_SCORE_THRESHOLD {
        tracing::info!(
            path = %top.path.display(),
            score = top.score(),
            "top candidate below threshold, no roster designated"
        );
        return None;
    }

    tracing::info!(
        path = %top.path.display(),
        score = top.score(),
        rows = top.row_count,
        "active roster designated"
    );
    let department_column = top
        .columns
        .iter()
        .find(|h| contains_keyword(h, DEPARTMENT_COLUMN_KEYWORDS))
        .cloned();
    Some(ActiveRoster {
        path: top.path,
        columns: top.columns,
        row_count: top.row_count,
        department_column,
    })
}
