//! Final results: ranking for round-robin, champion / runner-up / eliminations for brackets.

use crate::logic::completion::is_stage_complete;
use crate::logic::standings;
use crate::models::{StageId, TeamId, TeamRef, TournamentError};
use crate::store::EventSnapshot;
use serde::{Deserialize, Serialize};

/// One place in a round-robin ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankedTeam {
    /// 1-based; no shared ranks.
    pub rank: u32,
    pub team: TeamRef,
    pub points: u32,
    pub goal_difference: i64,
}

/// Teams knocked out in one round.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundEliminations {
    pub stage_id: StageId,
    pub label: String,
    pub teams: Vec<TeamRef>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FinalResult {
    Ranking {
        ranking: Vec<RankedTeam>,
    },
    Bracket {
        champion: TeamRef,
        runner_up: TeamRef,
        /// Losers per round, starting from the round before the final and going backwards.
        eliminated_by_round: Vec<RoundEliminations>,
        /// Teams that finished third or lower in their pool.
        eliminated_in_pools: Vec<TeamRef>,
    },
}

fn team_ref(snapshot: &EventSnapshot, id: TeamId) -> TeamRef {
    match snapshot.team(id) {
        Some(team) => TeamRef::from(team),
        None => TeamRef {
            id,
            name: String::new(),
        },
    }
}

/// Standings order of the single stage, as ranks 1..N.
pub fn round_robin_result(snapshot: &EventSnapshot) -> Result<FinalResult, TournamentError> {
    let stage = snapshot.stages.first().ok_or(TournamentError::NoStages)?;
    if !is_stage_complete(snapshot, stage.id) {
        return Err(TournamentError::StageIncomplete(stage.id));
    }
    let table = standings::compute(snapshot, &[stage.id])?;
    let ranking = table
        .into_iter()
        .flat_map(|t| t.rows)
        .zip(1u32..)
        .map(|(row, rank)| RankedTeam {
            rank,
            team: TeamRef {
                id: row.team_id,
                name: row.team_name,
            },
            points: row.points,
            goal_difference: row.goal_difference,
        })
        .collect();
    Ok(FinalResult::Ranking { ranking })
}

/// Champion and runner-up from the final, then losers of each earlier round going backwards.
pub fn bracket_result(snapshot: &EventSnapshot) -> Result<FinalResult, TournamentError> {
    let rounds: Vec<_> = snapshot.knockout_stages().collect();
    let (final_round, earlier) = rounds.split_last().ok_or(TournamentError::NoStages)?;
    if !is_stage_complete(snapshot, final_round.id) {
        return Err(TournamentError::StageIncomplete(final_round.id));
    }
    let final_match = snapshot
        .matches_of(final_round.id)
        .next()
        .ok_or(TournamentError::StageIncomplete(final_round.id))?;
    let (champion, runner_up) = final_match
        .winner()
        .zip(final_match.loser())
        .ok_or(TournamentError::InconsistentKnockoutResult(final_round.id))?;

    let mut eliminated_by_round = Vec::with_capacity(earlier.len());
    for round in earlier.iter().rev() {
        let mut teams = Vec::new();
        for m in snapshot.matches_of(round.id) {
            let loser = m
                .loser()
                .ok_or(TournamentError::InconsistentKnockoutResult(round.id))?;
            teams.push(team_ref(snapshot, loser));
        }
        eliminated_by_round.push(RoundEliminations {
            stage_id: round.id,
            label: round.label.clone(),
            teams,
        });
    }

    let pool_ids: Vec<_> = snapshot.pool_stages().map(|s| s.id).collect();
    let eliminated_in_pools = standings::compute(snapshot, &pool_ids)?
        .into_iter()
        .flat_map(|t| t.rows.into_iter().skip(2))
        .map(|row| TeamRef {
            id: row.team_id,
            name: row.team_name,
        })
        .collect();

    Ok(FinalResult::Bracket {
        champion: team_ref(snapshot, champion),
        runner_up: team_ref(snapshot, runner_up),
        eliminated_by_round,
        eliminated_in_pools,
    })
}
