//! Persistence interface the tournament core talks to, and the snapshot it computes on.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    Event, EventId, GameMatch, MatchId, Stage, StageId, Team, TeamId, TournamentError,
};
use serde::Serialize;

/// Result type for store and core operations.
pub type StoreResult<T> = Result<T, TournamentError>;

/// Storage of events and everything they own.
///
/// The two batch inserts are create-if-absent: they insert the whole batch or nothing, and
/// return `false` without touching anything when the target already has rows.
pub trait Store: Send + Sync {
    fn insert_event(&self, event: Event) -> StoreResult<()>;
    fn event(&self, id: EventId) -> StoreResult<Option<Event>>;
    fn update_event(&self, event: &Event) -> StoreResult<()>;
    /// Deletes the event together with its teams, stages and matches.
    fn delete_event(&self, id: EventId) -> StoreResult<bool>;
    fn list_events(&self) -> StoreResult<Vec<Event>>;

    fn insert_team(&self, team: Team) -> StoreResult<()>;
    fn team(&self, id: TeamId) -> StoreResult<Option<Team>>;
    fn update_team(&self, team: &Team) -> StoreResult<()>;
    fn delete_team(&self, id: TeamId) -> StoreResult<bool>;
    /// Ordered by creation sequence.
    fn teams_of_event(&self, event_id: EventId) -> StoreResult<Vec<Team>>;

    fn stage(&self, id: StageId) -> StoreResult<Option<Stage>>;
    /// Ordered by ordinal.
    fn stages_of_event(&self, event_id: EventId) -> StoreResult<Vec<Stage>>;
    fn insert_stages_if_absent(&self, event_id: EventId, stages: Vec<Stage>) -> StoreResult<bool>;

    fn game_match(&self, id: MatchId) -> StoreResult<Option<GameMatch>>;
    fn update_match(&self, game: &GameMatch) -> StoreResult<()>;
    /// Ordered by stage ordinal, then match sequence.
    fn matches_of_event(&self, event_id: EventId) -> StoreResult<Vec<GameMatch>>;
    /// Ordered by match sequence.
    fn matches_of_stage(&self, stage_id: StageId) -> StoreResult<Vec<GameMatch>>;
    fn insert_matches_if_absent(
        &self,
        stage_id: StageId,
        matches: Vec<GameMatch>,
    ) -> StoreResult<bool>;

    /// Everything belonging to one event, read at once.
    fn snapshot(&self, event_id: EventId) -> StoreResult<EventSnapshot> {
        let event = self
            .event(event_id)?
            .ok_or(TournamentError::EventNotFound(event_id))?;
        Ok(EventSnapshot {
            teams: self.teams_of_event(event_id)?,
            stages: self.stages_of_event(event_id)?,
            matches: self.matches_of_event(event_id)?,
            event,
        })
    }
}

/// Read-only view of one event; all core logic is computed on this.
#[derive(Clone, Debug, Serialize)]
pub struct EventSnapshot {
    pub event: Event,
    /// Ordered by creation sequence.
    pub teams: Vec<Team>,
    /// Ordered by ordinal.
    pub stages: Vec<Stage>,
    /// Ordered by stage ordinal, then match sequence.
    pub matches: Vec<GameMatch>,
}

impl EventSnapshot {
    pub fn stage(&self, id: StageId) -> StoreResult<&Stage> {
        self.stages
            .iter()
            .find(|s| s.id == id)
            .ok_or(TournamentError::StageNotFound(id))
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    /// Matches of one stage in creation order.
    pub fn matches_of(&self, stage_id: StageId) -> impl Iterator<Item = &GameMatch> + '_ {
        self.matches.iter().filter(move |m| m.stage_id == stage_id)
    }

    pub fn has_matches(&self, stage_id: StageId) -> bool {
        self.matches_of(stage_id).next().is_some()
    }

    pub fn pool_stages(&self) -> impl Iterator<Item = &Stage> + '_ {
        self.stages.iter().filter(|s| s.is_pool())
    }

    pub fn knockout_stages(&self) -> impl Iterator<Item = &Stage> + '_ {
        self.stages.iter().filter(|s| s.is_knockout())
    }

    /// Stage that directly follows `stage` in the sequence.
    pub fn next_stage(&self, stage: &Stage) -> Option<&Stage> {
        self.stages.iter().find(|s| s.ordinal == stage.ordinal + 1)
    }

    /// Stage that directly precedes `stage` in the sequence.
    pub fn previous_stage(&self, stage: &Stage) -> Option<&Stage> {
        let ordinal = stage.ordinal.checked_sub(1)?;
        self.stages.iter().find(|s| s.ordinal == ordinal)
    }

    /// Teams drawn into a pool, in creation order.
    pub fn teams_in_pool(&self, stage_id: StageId) -> Vec<&Team> {
        self.teams
            .iter()
            .filter(|t| t.stage_id == Some(stage_id))
            .collect()
    }

    pub fn team_name(&self, id: TeamId) -> String {
        self.team(id).map(|t| t.name.clone()).unwrap_or_default()
    }
}
