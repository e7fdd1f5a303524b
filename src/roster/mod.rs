//! Employee-roster handling: heuristic CSV classification and roster
//! table serialization.

pub mod classifier;
pub mod table;

use std::path::PathBuf;

pub use classifier::{
    classify, score_table, RosterCandidate, ScoreBreakdown, EMPLOYEE_KEYWORDS,
    ROSTER_SCORE_THRESHOLD,
};
pub use table::RosterTable;

/// The designated roster: path plus cached structure. Created at
/// ingestion, read at every query, replaced when ingestion reruns.
#[derive(Debug, Clone)]
pub struct ActiveRoster {
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub row_count: usize,
    pub department_column: Option<String>,
}
