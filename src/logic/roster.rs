//! Team roster: names, bulk import from CSV, and drawing teams into pools.

use crate::models::{StageId, Team, TeamId, TournamentError};
use crate::store::EventSnapshot;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;

#[derive(Deserialize)]
struct TeamRecord {
    name: String,
}

/// Trimmed team name, checked against the names already in the event (case-insensitive).
pub fn validate_team_name(existing: &[Team], name: &str) -> Result<String, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::EmptyName);
    }
    if existing.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
        return Err(TournamentError::DuplicateTeamName(name.to_string()));
    }
    Ok(name.to_string())
}

/// Team names from CSV text with a `name` header column. Other columns are ignored.
pub fn parse_team_csv(data: &str) -> Result<Vec<String>, TournamentError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(data.as_bytes());
    reader
        .deserialize::<TeamRecord>()
        .map(|record| {
            record
                .map(|r| r.name)
                .map_err(|e| TournamentError::Import(e.to_string()))
        })
        .collect()
}

/// Shuffle the teams and deal them one by one into the pools, in pool order.
pub fn deal_into_pools<R: Rng + ?Sized>(
    teams: &[Team],
    pools: &[StageId],
    rng: &mut R,
) -> Vec<(TeamId, StageId)> {
    if pools.is_empty() {
        return Vec::new();
    }
    let mut ids: Vec<TeamId> = teams.iter().map(|t| t.id).collect();
    ids.shuffle(rng);
    ids.into_iter()
        .enumerate()
        .map(|(i, id)| (id, pools[i % pools.len()]))
        .collect()
}

/// A team can be (re)assigned to `stage_id` only while that pool and its current pool are
/// still unscheduled.
pub fn check_assignable(
    snapshot: &EventSnapshot,
    team: &Team,
    stage_id: StageId,
) -> Result<(), TournamentError> {
    let stage = snapshot.stage(stage_id)?;
    if !stage.is_pool() {
        return Err(TournamentError::NotAPoolStage(stage_id));
    }
    for pool in std::iter::once(stage_id).chain(team.stage_id) {
        if snapshot.has_matches(pool) {
            return Err(TournamentError::StageLocked(pool));
        }
    }
    Ok(())
}
