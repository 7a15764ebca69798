//! Tournament formats: stage sequence, pairing rule and final result for each kind of event.
//!
//! The format is picked once from [`EventFormat`] and every operation goes through it, so the
//! per-format differences live here and nowhere else.

use crate::logic::results::{self, FinalResult};
use crate::logic::scheduler::{self, Pairing};
use crate::logic::stages::{self, StagePlan};
use crate::models::{Event, EventFormat, Stage, StageKind, TournamentError};
use crate::store::EventSnapshot;

pub trait TournamentFormat: Sync {
    /// Ordered stages for an event with `team_count` teams.
    fn stage_plan(&self, event: &Event, team_count: usize)
        -> Result<Vec<StagePlan>, TournamentError>;

    /// Who plays whom in `stage`, in creation order.
    fn pairings(&self, snapshot: &EventSnapshot, stage: &Stage)
        -> Result<Vec<Pairing>, TournamentError>;

    /// Winner, runner-up and the rest of the ranking once the event is decided.
    fn final_result(&self, snapshot: &EventSnapshot) -> Result<FinalResult, TournamentError>;
}

pub struct RoundRobin;
pub struct Knockout;
pub struct GroupThenKnockout;

static ROUND_ROBIN: RoundRobin = RoundRobin;
static KNOCKOUT: Knockout = Knockout;
static GROUP_THEN_KNOCKOUT: GroupThenKnockout = GroupThenKnockout;

/// Strategy for an event format.
pub fn format_for(format: EventFormat) -> &'static dyn TournamentFormat {
    match format {
        EventFormat::RoundRobin => &ROUND_ROBIN,
        EventFormat::Knockout => &KNOCKOUT,
        EventFormat::GroupKnockout => &GROUP_THEN_KNOCKOUT,
    }
}

fn require_teams(team_count: usize) -> Result<(), TournamentError> {
    if team_count < 2 {
        return Err(TournamentError::NotEnoughTeams {
            required: 2,
            actual: team_count,
        });
    }
    Ok(())
}

impl TournamentFormat for RoundRobin {
    fn stage_plan(
        &self,
        _event: &Event,
        team_count: usize,
    ) -> Result<Vec<StagePlan>, TournamentError> {
        require_teams(team_count)?;
        Ok(vec![StagePlan::new(stages::ROUND_ROBIN_LABEL, StageKind::Pool)])
    }

    fn pairings(
        &self,
        snapshot: &EventSnapshot,
        stage: &Stage,
    ) -> Result<Vec<Pairing>, TournamentError> {
        scheduler::pool_pairings(snapshot, stage)
    }

    fn final_result(&self, snapshot: &EventSnapshot) -> Result<FinalResult, TournamentError> {
        results::round_robin_result(snapshot)
    }
}

impl TournamentFormat for Knockout {
    fn stage_plan(
        &self,
        _event: &Event,
        team_count: usize,
    ) -> Result<Vec<StagePlan>, TournamentError> {
        let rounds = stages::knockout_labels(team_count)?;
        Ok(rounds
            .iter()
            .map(|label| StagePlan::new(*label, StageKind::Knockout))
            .collect())
    }

    fn pairings(
        &self,
        snapshot: &EventSnapshot,
        stage: &Stage,
    ) -> Result<Vec<Pairing>, TournamentError> {
        match snapshot.previous_stage(stage) {
            None => {
                let entrants: Vec<_> = snapshot.teams.iter().map(|t| t.id).collect();
                scheduler::sequential_pairs(&entrants)
            }
            Some(previous) => scheduler::next_round_pairings(snapshot, previous),
        }
    }

    fn final_result(&self, snapshot: &EventSnapshot) -> Result<FinalResult, TournamentError> {
        results::bracket_result(snapshot)
    }
}

impl TournamentFormat for GroupThenKnockout {
    fn stage_plan(
        &self,
        event: &Event,
        team_count: usize,
    ) -> Result<Vec<StagePlan>, TournamentError> {
        let pools = stages::pool_labels(event.group_count)?;
        // Two teams per pool go through, so each pool needs at least two.
        if team_count < pools.len() * 2 {
            return Err(TournamentError::NotEnoughTeams {
                required: pools.len() * 2,
                actual: team_count,
            });
        }
        let rounds = stages::knockout_labels(pools.len() * 2)?;
        Ok(pools
            .iter()
            .map(|label| StagePlan::new(*label, StageKind::Pool))
            .chain(
                rounds
                    .iter()
                    .map(|label| StagePlan::new(*label, StageKind::Knockout)),
            )
            .collect())
    }

    fn pairings(
        &self,
        snapshot: &EventSnapshot,
        stage: &Stage,
    ) -> Result<Vec<Pairing>, TournamentError> {
        if stage.is_pool() {
            return scheduler::pool_pairings(snapshot, stage);
        }
        match snapshot.previous_stage(stage) {
            Some(previous) if previous.is_knockout() => {
                scheduler::next_round_pairings(snapshot, previous)
            }
            _ => scheduler::pool_to_knockout_pairings(snapshot),
        }
    }

    fn final_result(&self, snapshot: &EventSnapshot) -> Result<FinalResult, TournamentError> {
        results::bracket_result(snapshot)
    }
}
