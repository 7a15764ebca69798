//! Stage generation: the fixed sequence of pools and knockout rounds for an event.

use crate::logic::format::format_for;
use crate::models::{Event, Stage, StageKind, TournamentError};

/// Label of the single round-robin stage.
pub const ROUND_ROBIN_LABEL: &str = "RR";

const POOL_LABELS: [&str; 8] = ["A", "B", "C", "D", "E", "F", "G", "H"];

/// Knockout rounds, largest bracket first.
const KNOCKOUT_ROUNDS: [&str; 5] = ["R32", "R16", "Q", "S", "Final"];

/// A stage that is yet to be created: label and kind, ordinal is its position in the plan.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StagePlan {
    pub label: String,
    pub kind: StageKind,
}

impl StagePlan {
    pub fn new(label: impl Into<String>, kind: StageKind) -> Self {
        Self {
            label: label.into(),
            kind,
        }
    }
}

/// Knockout rounds for a bracket of `team_count` teams (2, 4, 8, 16 or 32).
pub fn knockout_labels(team_count: usize) -> Result<&'static [&'static str], TournamentError> {
    let skip = match team_count {
        32 => 0,
        16 => 1,
        8 => 2,
        4 => 3,
        2 => 4,
        n => return Err(TournamentError::UnsupportedBracketSize(n)),
    };
    Ok(&KNOCKOUT_ROUNDS[skip..])
}

/// Pool labels for a group count of 2, 4 or 8.
pub fn pool_labels(group_count: Option<u8>) -> Result<&'static [&'static str], TournamentError> {
    match group_count {
        Some(n @ (2 | 4 | 8)) => Ok(&POOL_LABELS[..usize::from(n)]),
        other => Err(TournamentError::UnsupportedGroupCount(other)),
    }
}

/// Build the stages for `event`. Ordinals follow the plan order starting at 0.
pub fn build_stages(event: &Event, team_count: usize) -> Result<Vec<Stage>, TournamentError> {
    let plan = format_for(event.format).stage_plan(event, team_count)?;
    Ok(plan
        .into_iter()
        .zip(0u32..)
        .map(|(p, ordinal)| Stage::new(event.id, p.label, ordinal, p.kind))
        .collect())
}
