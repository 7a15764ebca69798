//! Match generation for a stage: all pairs in pools, sequential pairs in knockout rounds.

use crate::logic::completion;
use crate::logic::format::format_for;
use crate::logic::progression::winners_of;
use crate::logic::standings;
use crate::models::{GameMatch, Stage, TeamId, TournamentError};
use crate::store::EventSnapshot;
use serde::{Deserialize, Serialize};

/// Two teams meeting in one match (team 1, team 2).
pub type Pairing = (TeamId, TeamId);

/// Result of scheduling a stage. Both variants carry the stage's matches in creation order.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScheduleOutcome {
    Scheduled { matches: Vec<GameMatch> },
    AlreadyScheduled { matches: Vec<GameMatch> },
}

impl ScheduleOutcome {
    pub fn matches(&self) -> &[GameMatch] {
        match self {
            ScheduleOutcome::Scheduled { matches } | ScheduleOutcome::AlreadyScheduled { matches } => {
                matches
            }
        }
    }
}

/// Every unordered pair once: each team against every later team.
pub fn all_pairs(teams: &[TeamId]) -> Vec<Pairing> {
    teams
        .iter()
        .enumerate()
        .flat_map(|(i, &a)| teams[i + 1..].iter().map(move |&b| (a, b)))
        .collect()
}

/// team[0] vs team[1], team[2] vs team[3], ...
pub fn sequential_pairs(teams: &[TeamId]) -> Result<Vec<Pairing>, TournamentError> {
    if teams.len() % 2 != 0 {
        return Err(TournamentError::OddParticipantCount(teams.len()));
    }
    Ok(teams.chunks_exact(2).map(|c| (c[0], c[1])).collect())
}

/// Pool winners and runners-up into the first knockout round.
///
/// `entries` holds (1st, 2nd) of every pool in pool order. Each block of four
/// `[a1, a2, b1, b2]` gives `a1 vs b2` and `a2 vs b1`. Only defined for an even number of pools.
pub fn cross_pairs(entries: &[TeamId]) -> Result<Vec<Pairing>, TournamentError> {
    if entries.len() % 4 != 0 {
        let pools = u8::try_from(entries.len() / 2).ok();
        return Err(TournamentError::UnsupportedGroupCount(pools));
    }
    Ok(entries
        .chunks_exact(4)
        .flat_map(|b| [(b[0], b[3]), (b[1], b[2])])
        .collect())
}

/// All pairs among the teams drawn into a pool.
pub fn pool_pairings(
    snapshot: &EventSnapshot,
    stage: &Stage,
) -> Result<Vec<Pairing>, TournamentError> {
    let teams: Vec<TeamId> = snapshot
        .teams_in_pool(stage.id)
        .iter()
        .map(|t| t.id)
        .collect();
    if teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams {
            required: 2,
            actual: teams.len(),
        });
    }
    Ok(all_pairs(&teams))
}

/// Winners of `previous`, in match order, paired sequentially.
pub fn next_round_pairings(
    snapshot: &EventSnapshot,
    previous: &Stage,
) -> Result<Vec<Pairing>, TournamentError> {
    let winners = winners_of(snapshot, previous)?;
    if winners.len() % 2 != 0 {
        return Err(TournamentError::InconsistentKnockoutResult(previous.id));
    }
    sequential_pairs(&winners)
}

/// Top two of every pool into the first knockout round. Every pool must be complete.
pub fn pool_to_knockout_pairings(snapshot: &EventSnapshot) -> Result<Vec<Pairing>, TournamentError> {
    if let Some(open) = snapshot
        .pool_stages()
        .find(|s| !completion::is_stage_complete(snapshot, s.id))
    {
        return Err(TournamentError::StageIncomplete(open.id));
    }
    let pool_ids: Vec<_> = snapshot.pool_stages().map(|s| s.id).collect();
    let table = standings::compute(snapshot, &pool_ids)?;

    let mut entries = Vec::with_capacity(table.len() * 2);
    for pool in &table {
        match pool.rows.as_slice() {
            [first, second, ..] => {
                entries.push(first.team_id);
                entries.push(second.team_id);
            }
            rows => {
                return Err(TournamentError::NotEnoughTeams {
                    required: 2,
                    actual: rows.len(),
                })
            }
        }
    }
    cross_pairs(&entries)
}

/// Matches for `stage`, numbered in creation order. Nothing is stored here.
pub fn build_matches(
    snapshot: &EventSnapshot,
    stage: &Stage,
) -> Result<Vec<GameMatch>, TournamentError> {
    let pairings = format_for(snapshot.event.format).pairings(snapshot, stage)?;
    Ok(pairings
        .into_iter()
        .zip(0u32..)
        .map(|((a, b), sequence)| GameMatch::new(snapshot.event.id, stage.id, sequence, a, b))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn ids(n: usize) -> Vec<TeamId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn all_pairs_count_is_n_choose_2() {
        for n in 0..10 {
            assert_eq!(all_pairs(&ids(n)).len(), n * n.saturating_sub(1) / 2);
        }
    }

    #[test]
    fn all_pairs_outer_loop_first() {
        let t = ids(4);
        assert_eq!(
            all_pairs(&t),
            vec![
                (t[0], t[1]),
                (t[0], t[2]),
                (t[0], t[3]),
                (t[1], t[2]),
                (t[1], t[3]),
                (t[2], t[3]),
            ]
        );
    }

    #[test]
    fn sequential_pairs_halves_entrants() {
        let t = ids(8);
        let pairs = sequential_pairs(&t).unwrap();
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], (t[0], t[1]));
        assert_eq!(pairs[3], (t[6], t[7]));
    }

    #[test]
    fn sequential_pairs_rejects_odd_count() {
        assert_eq!(
            sequential_pairs(&ids(5)),
            Err(TournamentError::OddParticipantCount(5))
        );
    }

    #[test]
    fn cross_pairs_block_of_four() {
        // A1, A2, B1, B2, C1, C2, D1, D2
        let e = ids(8);
        assert_eq!(
            cross_pairs(&e).unwrap(),
            vec![(e[0], e[3]), (e[1], e[2]), (e[4], e[7]), (e[5], e[6])]
        );
    }

    #[test]
    fn cross_pairs_needs_even_pool_count() {
        assert_eq!(
            cross_pairs(&ids(6)),
            Err(TournamentError::UnsupportedGroupCount(Some(3)))
        );
    }
}
