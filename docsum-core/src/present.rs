//! Rendering helpers. Pure functions of controller state; nothing here
//! mutates the workflow.

use std::fmt;

use crate::contract::{SummaryResult, SummaryStats};
use crate::workflow::WorkflowState;

pub const RESULT_HEADING: &str = "Summary Result";
pub const SUMMARY_HEADING: &str = "Summary";
pub const SUBMIT_LABEL: &str = "Generate Summary";
pub const SUBMITTING_LABEL: &str = "Summarizing...";
pub const RESET_LABEL: &str = "New Summary";
pub const DOWNLOAD_LABEL: &str = "Download as Word Document";

/// The three numeric displays, already formatted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsView {
    pub original_words: String,
    pub summary_words: String,
    /// `None` when the service did not report a reduction.
    pub reduction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub text: String,
    pub stats: Option<StatsView>,
}

pub fn present(result: &SummaryResult) -> Presentation {
    Presentation {
        text: result.text.clone(),
        stats: result.stats.as_ref().map(stats_view),
    }
}

fn stats_view(stats: &SummaryStats) -> StatsView {
    StatsView {
        original_words: stats.original_words.to_string(),
        summary_words: stats.summary_words.to_string(),
        reduction: stats.reduction_percentage.map(format_percentage),
    }
}

/// Shortest rendering of the reported value: `92.0` → `92%`, `92.5` → `92.5%`.
pub fn format_percentage(value: f64) -> String {
    format!("{value}%")
}

impl fmt::Display for Presentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RESULT_HEADING}")?;
        writeln!(f)?;
        if let Some(stats) = &self.stats {
            writeln!(f, "Original Words: {}", stats.original_words)?;
            writeln!(f, "Summary Words:  {}", stats.summary_words)?;
            if let Some(reduction) = &stats.reduction {
                writeln!(f, "Reduced:        {reduction}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "{SUMMARY_HEADING}")?;
        write!(f, "{}", self.text)
    }
}

/// Enabled/label state of every control, derived from the workflow state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub submit_label: &'static str,
    pub spinner: bool,
    pub submit_enabled: bool,
    pub remove_enabled: bool,
    pub length_enabled: bool,
    pub reset_enabled: bool,
    pub download_enabled: bool,
}

pub fn controls(state: &WorkflowState) -> Controls {
    let requesting = matches!(state, WorkflowState::Requesting { .. });
    Controls {
        submit_label: if requesting { SUBMITTING_LABEL } else { SUBMIT_LABEL },
        spinner: requesting,
        submit_enabled: matches!(state, WorkflowState::FileReady { .. }),
        remove_enabled: matches!(state, WorkflowState::FileReady { .. }),
        length_enabled: matches!(state, WorkflowState::Idle | WorkflowState::FileReady { .. }),
        reset_enabled: matches!(state, WorkflowState::Ready { .. }),
        download_enabled: matches!(state, WorkflowState::Ready { .. }),
    }
}
