//! Standings: per-team statistics over a set of stages, ranked by points then goal difference.

use crate::models::{StageId, TeamId, TournamentError};
use crate::store::EventSnapshot;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const POINTS_FOR_WIN: u32 = 3;
pub const POINTS_FOR_DRAW: u32 = 1;

/// Statistics of one team over the stages in scope.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    /// Summed over many matches, so wider than a single score.
    pub scored: u64,
    pub conceded: u64,
    pub goal_difference: i64,
    pub points: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl TeamStanding {
    fn new(team_id: TeamId, team_name: String) -> Self {
        Self {
            team_id,
            team_name,
            ..Self::default()
        }
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.scored += u64::from(scored);
        self.conceded += u64::from(conceded);
        self.goal_difference += i64::from(scored) - i64::from(conceded);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.wins += 1;
                self.points += POINTS_FOR_WIN;
            }
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => {
                self.draws += 1;
                self.points += POINTS_FOR_DRAW;
            }
        }
    }
}

/// Ranked table of one stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StageStandings {
    pub stage_id: StageId,
    pub label: String,
    pub rows: Vec<TeamStanding>,
}

/// Rank the teams of each stage in `stage_ids` using every match of those stages.
///
/// A stage lists its drawn-in teams (creation order) followed by any other team found in its
/// matches (match order); teams without a single match in scope are left out. Ties on points
/// and goal difference keep that order.
///
/// A team's row holds its totals over every stage in `stage_ids`, so with several knockout
/// rounds in scope the same totals appear in each round's table.
pub fn compute(
    snapshot: &EventSnapshot,
    stage_ids: &[StageId],
) -> Result<Vec<StageStandings>, TournamentError> {
    let stages = stage_ids
        .iter()
        .map(|&id| snapshot.stage(id))
        .collect::<Result<Vec<_>, _>>()?;

    let mut stats: HashMap<TeamId, TeamStanding> = HashMap::new();
    for m in snapshot
        .matches
        .iter()
        .filter(|m| stage_ids.contains(&m.stage_id))
    {
        for team in [m.team_1, m.team_2] {
            stats
                .entry(team)
                .or_insert_with(|| TeamStanding::new(team, snapshot.team_name(team)));
        }
        if let (Some(s1), Some(s2)) = (m.team_1_score, m.team_2_score) {
            if let Some(row) = stats.get_mut(&m.team_1) {
                row.record(s1, s2);
            }
            if let Some(row) = stats.get_mut(&m.team_2) {
                row.record(s2, s1);
            }
        }
    }

    Ok(stages
        .into_iter()
        .map(|stage| {
            let mut members: Vec<TeamId> = snapshot
                .teams_in_pool(stage.id)
                .iter()
                .map(|t| t.id)
                .collect();
            for m in snapshot.matches_of(stage.id) {
                for team in [m.team_1, m.team_2] {
                    if !members.contains(&team) {
                        members.push(team);
                    }
                }
            }
            let mut rows: Vec<TeamStanding> = members
                .iter()
                .filter_map(|id| stats.get(id).cloned())
                .collect();
            rows.sort_by(|a, b| {
                b.points
                    .cmp(&a.points)
                    .then_with(|| b.goal_difference.cmp(&a.goal_difference))
            });
            StageStandings {
                stage_id: stage.id,
                label: stage.label.clone(),
                rows,
            }
        })
        .collect())
}

/// Stages used when the caller names none: all pools, or every stage if there are no pools.
pub fn default_scope(snapshot: &EventSnapshot) -> Vec<StageId> {
    let pools: Vec<StageId> = snapshot.pool_stages().map(|s| s.id).collect();
    if pools.is_empty() {
        snapshot.stages.iter().map(|s| s.id).collect()
    } else {
        pools
    }
}
