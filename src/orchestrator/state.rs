//! Analysis lifecycle states.

use std::fmt;

/// Stages one request moves through, strictly in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AnalysisState {
    Fetching,
    Prompting,
    Dispatching,
    Collecting,
    Done,
}

impl fmt::Display for AnalysisState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AnalysisState::Fetching => "fetching",
            AnalysisState::Prompting => "prompting",
            AnalysisState::Dispatching => "dispatching",
            AnalysisState::Collecting => "collecting",
            AnalysisState::Done => "done",
        })
    }
}
