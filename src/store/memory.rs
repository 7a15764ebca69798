//! In-memory store: all tables behind one lock.

use crate::models::{
    Event, EventId, GameMatch, MatchId, Stage, StageId, Team, TeamId, TournamentError,
};
use crate::store::{Store, StoreResult};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    events: HashMap<EventId, Event>,
    teams: HashMap<TeamId, Team>,
    stages: HashMap<StageId, Stage>,
    matches: HashMap<MatchId, GameMatch>,
}

/// Keeps everything in process memory. Batch inserts check and insert under one write lock.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| TournamentError::Storage("lock error".to_string()))
    }
}

impl Tables {
    fn stage_ordinal(&self, stage_id: StageId) -> u32 {
        self.stages.get(&stage_id).map_or(u32::MAX, |s| s.ordinal)
    }
}

impl Store for MemoryStore {
    fn insert_event(&self, event: Event) -> StoreResult<()> {
        self.write()?.events.insert(event.id, event);
        Ok(())
    }

    fn event(&self, id: EventId) -> StoreResult<Option<Event>> {
        Ok(self.read()?.events.get(&id).cloned())
    }

    fn update_event(&self, event: &Event) -> StoreResult<()> {
        let mut g = self.write()?;
        let slot = g
            .events
            .get_mut(&event.id)
            .ok_or(TournamentError::EventNotFound(event.id))?;
        *slot = event.clone();
        Ok(())
    }

    fn delete_event(&self, id: EventId) -> StoreResult<bool> {
        let mut g = self.write()?;
        if g.events.remove(&id).is_none() {
            return Ok(false);
        }
        g.teams.retain(|_, t| t.event_id != id);
        g.stages.retain(|_, s| s.event_id != id);
        g.matches.retain(|_, m| m.event_id != id);
        Ok(true)
    }

    fn list_events(&self) -> StoreResult<Vec<Event>> {
        let mut events: Vec<Event> = self.read()?.events.values().cloned().collect();
        events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.name.cmp(&b.name)));
        Ok(events)
    }

    fn insert_team(&self, team: Team) -> StoreResult<()> {
        let mut g = self.write()?;
        if !g.events.contains_key(&team.event_id) {
            return Err(TournamentError::EventNotFound(team.event_id));
        }
        g.teams.insert(team.id, team);
        Ok(())
    }

    fn team(&self, id: TeamId) -> StoreResult<Option<Team>> {
        Ok(self.read()?.teams.get(&id).cloned())
    }

    fn update_team(&self, team: &Team) -> StoreResult<()> {
        let mut g = self.write()?;
        let slot = g
            .teams
            .get_mut(&team.id)
            .ok_or(TournamentError::TeamNotFound(team.id))?;
        *slot = team.clone();
        Ok(())
    }

    fn delete_team(&self, id: TeamId) -> StoreResult<bool> {
        Ok(self.write()?.teams.remove(&id).is_some())
    }

    fn teams_of_event(&self, event_id: EventId) -> StoreResult<Vec<Team>> {
        let mut teams: Vec<Team> = self
            .read()?
            .teams
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect();
        teams.sort_by_key(|t| t.sequence);
        Ok(teams)
    }

    fn stage(&self, id: StageId) -> StoreResult<Option<Stage>> {
        Ok(self.read()?.stages.get(&id).cloned())
    }

    fn stages_of_event(&self, event_id: EventId) -> StoreResult<Vec<Stage>> {
        let mut stages: Vec<Stage> = self
            .read()?
            .stages
            .values()
            .filter(|s| s.event_id == event_id)
            .cloned()
            .collect();
        stages.sort_by_key(|s| s.ordinal);
        Ok(stages)
    }

    fn insert_stages_if_absent(&self, event_id: EventId, stages: Vec<Stage>) -> StoreResult<bool> {
        let mut g = self.write()?;
        if !g.events.contains_key(&event_id) {
            return Err(TournamentError::EventNotFound(event_id));
        }
        if g.stages.values().any(|s| s.event_id == event_id) {
            return Ok(false);
        }
        for stage in stages {
            g.stages.insert(stage.id, stage);
        }
        Ok(true)
    }

    fn game_match(&self, id: MatchId) -> StoreResult<Option<GameMatch>> {
        Ok(self.read()?.matches.get(&id).cloned())
    }

    fn update_match(&self, game: &GameMatch) -> StoreResult<()> {
        let mut g = self.write()?;
        let slot = g
            .matches
            .get_mut(&game.id)
            .ok_or(TournamentError::MatchNotFound(game.id))?;
        *slot = game.clone();
        Ok(())
    }

    fn matches_of_event(&self, event_id: EventId) -> StoreResult<Vec<GameMatch>> {
        let g = self.read()?;
        let mut matches: Vec<GameMatch> = g
            .matches
            .values()
            .filter(|m| m.event_id == event_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| (g.stage_ordinal(m.stage_id), m.sequence));
        Ok(matches)
    }

    fn matches_of_stage(&self, stage_id: StageId) -> StoreResult<Vec<GameMatch>> {
        let mut matches: Vec<GameMatch> = self
            .read()?
            .matches
            .values()
            .filter(|m| m.stage_id == stage_id)
            .cloned()
            .collect();
        matches.sort_by_key(|m| m.sequence);
        Ok(matches)
    }

    fn insert_matches_if_absent(
        &self,
        stage_id: StageId,
        matches: Vec<GameMatch>,
    ) -> StoreResult<bool> {
        let mut g = self.write()?;
        if !g.stages.contains_key(&stage_id) {
            return Err(TournamentError::StageNotFound(stage_id));
        }
        if g.matches.values().any(|m| m.stage_id == stage_id) {
            return Ok(false);
        }
        for game in matches {
            g.matches.insert(game.id, game);
        }
        Ok(true)
    }
}
