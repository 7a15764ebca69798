//! Progression: where an event stands, and what happens once a stage is complete.
//!
//! Per event the flow is Preparation -> StageInProgress -> StageComplete -> (next stage
//! scheduled) -> ... -> Final. A round-robin event has a single stage and goes straight from
//! StageComplete to Final. Knockout rounds pass their winners on; a single winner ends the event.

use crate::logic::completion::{is_stage_complete, pools_progress, stage_progress};
use crate::logic::standings;
use crate::models::{GameMatch, Outcome, Stage, StageId, TeamId, TeamRef, TournamentError};
use crate::store::EventSnapshot;
use serde::{Deserialize, Serialize};

/// Phase of the event, judged on its current stage.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No matches scheduled yet.
    Preparation,
    /// Some results are still missing.
    StageInProgress,
    /// Every result is in; ready to advance.
    StageComplete,
    /// Winner decided, event ended.
    Final,
}

/// Phase plus the stage it refers to (the latest stage that has matches).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub phase: Phase,
    pub stage: Option<Stage>,
}

/// Result of asking a stage to advance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AdvanceOutcome {
    /// Stage still has matches without a result (or none scheduled).
    Pending {
        stage_id: StageId,
        decided: usize,
        total: usize,
    },
    /// This pool is done but others are not.
    WaitingForPools { complete: usize, total: usize },
    /// The next stage's matches were created now.
    Advanced { stage: Stage, matches: Vec<GameMatch> },
    /// The next stage already had its matches; nothing changed.
    AlreadyAdvanced { stage: Stage },
    /// The event is decided.
    Finished {
        winner: TeamRef,
        runner_up: Option<TeamRef>,
    },
}

/// What a complete (or incomplete) stage leads to. Computed without side effects.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Step {
    Pending { decided: usize, total: usize },
    WaitingForPools { complete: usize, total: usize },
    Schedule(StageId),
    Finish {
        winner: TeamId,
        runner_up: Option<TeamId>,
    },
}

pub fn progress(snapshot: &EventSnapshot) -> Progress {
    let current = snapshot
        .stages
        .iter()
        .rev()
        .find(|s| snapshot.has_matches(s.id))
        .cloned();
    let phase = match &current {
        _ if snapshot.event.ended => Phase::Final,
        None => Phase::Preparation,
        Some(stage) => {
            let complete = if stage.is_pool() {
                let (complete, total) = pools_progress(snapshot);
                complete == total
            } else {
                is_stage_complete(snapshot, stage.id)
            };
            if complete {
                Phase::StageComplete
            } else {
                Phase::StageInProgress
            }
        }
    };
    Progress {
        phase,
        stage: current.or_else(|| snapshot.stages.first().cloned()),
    }
}

/// Winners of a complete knockout round, in match order.
pub fn winners_of(snapshot: &EventSnapshot, stage: &Stage) -> Result<Vec<TeamId>, TournamentError> {
    if !snapshot.has_matches(stage.id) {
        return Err(TournamentError::StageIncomplete(stage.id));
    }
    snapshot
        .matches_of(stage.id)
        .map(|m| match m.outcome() {
            None => Err(TournamentError::StageIncomplete(stage.id)),
            Some(Outcome::Draw) => Err(TournamentError::InconsistentKnockoutResult(stage.id)),
            Some(Outcome::Won(side)) => Ok(m.team(side)),
        })
        .collect()
}

/// Decide what follows `stage_id`.
pub fn next_step(snapshot: &EventSnapshot, stage_id: StageId) -> Result<Step, TournamentError> {
    let stage = snapshot.stage(stage_id)?;
    let (decided, total) = stage_progress(snapshot, stage.id);
    if total == 0 || decided < total {
        return Ok(Step::Pending { decided, total });
    }

    if stage.is_pool() {
        return match snapshot.knockout_stages().next() {
            None => {
                let table = standings::compute(snapshot, &[stage.id])?;
                let rows = table.first().map(|t| t.rows.as_slice()).unwrap_or_default();
                let winner = rows.first().ok_or(TournamentError::NotEnoughTeams {
                    required: 2,
                    actual: rows.len(),
                })?;
                Ok(Step::Finish {
                    winner: winner.team_id,
                    runner_up: rows.get(1).map(|r| r.team_id),
                })
            }
            Some(first_round) => {
                let (complete, total) = pools_progress(snapshot);
                if complete < total {
                    Ok(Step::WaitingForPools { complete, total })
                } else {
                    Ok(Step::Schedule(first_round.id))
                }
            }
        };
    }

    let winners = winners_of(snapshot, stage)?;
    match winners.as_slice() {
        [winner] => Ok(Step::Finish {
            winner: *winner,
            runner_up: snapshot.matches_of(stage.id).last().and_then(GameMatch::loser),
        }),
        w if w.len() % 2 != 0 => Err(TournamentError::InconsistentKnockoutResult(stage.id)),
        _ => snapshot
            .next_stage(stage)
            .filter(|s| s.is_knockout())
            .map(|s| Step::Schedule(s.id))
            .ok_or(TournamentError::InconsistentKnockoutResult(stage.id)),
    }
}
