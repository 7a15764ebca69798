//! Tournament service: the operations offered to the request layer.
//!
//! Every operation that writes takes the event's lock for its whole duration, so stage
//! generation, scheduling and advancement for one event never interleave. Reads do not lock.

use crate::logic::progression::{self, AdvanceOutcome, Progress, Step};
use crate::logic::results::FinalResult;
use crate::logic::scheduler::{self, ScheduleOutcome};
use crate::logic::standings::{self, StageStandings};
use crate::logic::{completion, format_for, roster, stages};
use crate::models::{
    Event, EventFormat, EventId, GameMatch, MatchId, NewEvent, Stage, StageId, Team, TeamId,
    TeamRef, TournamentError,
};
use crate::store::{EventSnapshot, Store};
use rand::Rng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

pub type ServiceResult<T> = Result<T, TournamentError>;

pub struct TournamentService<S> {
    store: S,
    locks: Mutex<HashMap<EventId, Arc<Mutex<()>>>>,
}

fn ensure_not_ended(snapshot: &EventSnapshot) -> ServiceResult<()> {
    if snapshot.event.ended {
        return Err(TournamentError::EventEnded);
    }
    Ok(())
}

fn ensure_roster_open(snapshot: &EventSnapshot) -> ServiceResult<()> {
    ensure_not_ended(snapshot)?;
    if !snapshot.stages.is_empty() {
        return Err(TournamentError::RosterLocked);
    }
    Ok(())
}

fn team_ref(snapshot: &EventSnapshot, id: TeamId) -> TeamRef {
    snapshot.team(id).map(TeamRef::from).unwrap_or(TeamRef {
        id,
        name: String::new(),
    })
}

impl<S: Store> TournamentService<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The writer lock of one event. The guard protects no data, so a poisoned lock is reused.
    ///
    /// Locks exist only for stored events; unknown ids fail here without leaving an entry.
    fn event_lock(&self, id: EventId) -> ServiceResult<Arc<Mutex<()>>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(lock) = locks.get(&id) {
            return Ok(Arc::clone(lock));
        }
        if self.store.event(id)?.is_none() {
            return Err(TournamentError::EventNotFound(id));
        }
        Ok(Arc::clone(locks.entry(id).or_default()))
    }

    fn snapshot(&self, id: EventId) -> ServiceResult<EventSnapshot> {
        self.store.snapshot(id)
    }

    // ---- events ----

    pub fn create_event(&self, new: NewEvent) -> ServiceResult<Event> {
        let event = Event::new(new)?;
        self.store.insert_event(event.clone())?;
        log::info!("Created event '{}' ({:?}) with id {}", event.name, event.format, event.id);
        Ok(event)
    }

    pub fn event(&self, id: EventId) -> ServiceResult<Event> {
        self.store.event(id)?.ok_or(TournamentError::EventNotFound(id))
    }

    pub fn list_events(&self) -> ServiceResult<Vec<Event>> {
        self.store.list_events()
    }

    /// Event with its teams, stages and matches.
    pub fn event_detail(&self, id: EventId) -> ServiceResult<EventSnapshot> {
        self.snapshot(id)
    }

    /// Delete the event and everything it owns.
    pub fn delete_event(&self, id: EventId) -> ServiceResult<()> {
        let lock = self.event_lock(id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.store.delete_event(id)? {
            return Err(TournamentError::EventNotFound(id));
        }
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        log::info!("Deleted event {}", id);
        Ok(())
    }

    // ---- teams ----

    /// Add a team (only before stages are generated). Names are unique per event, case-insensitive.
    pub fn add_team(&self, event_id: EventId, name: &str) -> ServiceResult<Team> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        ensure_roster_open(&snapshot)?;
        let name = roster::validate_team_name(&snapshot.teams, name)?;
        let sequence = snapshot.teams.iter().map(|t| t.sequence).max().unwrap_or(0) + 1;
        let team = Team::new(event_id, name, sequence);
        self.store.insert_team(team.clone())?;
        Ok(team)
    }

    /// Add every team named in a CSV document (`name` column). Nothing is added if any row is bad.
    pub fn import_teams_csv(&self, event_id: EventId, data: &str) -> ServiceResult<Vec<Team>> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        ensure_roster_open(&snapshot)?;

        let mut all = snapshot.teams.clone();
        let mut added = Vec::new();
        for name in roster::parse_team_csv(data)? {
            let name = roster::validate_team_name(&all, &name)?;
            let sequence = all.iter().map(|t| t.sequence).max().unwrap_or(0) + 1;
            let team = Team::new(event_id, name, sequence);
            all.push(team.clone());
            added.push(team);
        }
        for team in &added {
            self.store.insert_team(team.clone())?;
        }
        log::info!("Imported {} team(s) into event {}", added.len(), event_id);
        Ok(added)
    }

    /// Remove a team (only before stages are generated).
    pub fn remove_team(&self, event_id: EventId, team_id: TeamId) -> ServiceResult<()> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        if snapshot.team(team_id).is_none() {
            return Err(TournamentError::TeamNotFound(team_id));
        }
        ensure_roster_open(&snapshot)?;
        self.store.delete_team(team_id)?;
        Ok(())
    }

    /// Put a team into a pool. Allowed until that pool (or the team's current pool) is scheduled.
    pub fn assign_team(
        &self,
        event_id: EventId,
        team_id: TeamId,
        stage_id: StageId,
    ) -> ServiceResult<Team> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        ensure_not_ended(&snapshot)?;
        let mut team = snapshot
            .team(team_id)
            .cloned()
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        roster::check_assignable(&snapshot, &team, stage_id)?;
        team.stage_id = Some(stage_id);
        self.store.update_team(&team)?;
        Ok(team)
    }

    /// Randomly draw all teams into the pools. Only before any pool is scheduled.
    pub fn draw_pools<R: Rng + ?Sized>(
        &self,
        event_id: EventId,
        rng: &mut R,
    ) -> ServiceResult<Vec<Team>> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        ensure_not_ended(&snapshot)?;
        let first = snapshot.stages.first().ok_or(TournamentError::NoStages)?;
        let pools: Vec<StageId> = snapshot.pool_stages().map(|s| s.id).collect();
        if pools.is_empty() {
            return Err(TournamentError::NotAPoolStage(first.id));
        }
        if let Some(&scheduled) = pools.iter().find(|&&p| snapshot.has_matches(p)) {
            return Err(TournamentError::StageLocked(scheduled));
        }
        let assignment: HashMap<TeamId, StageId> =
            roster::deal_into_pools(&snapshot.teams, &pools, rng)
                .into_iter()
                .collect();
        let mut teams = snapshot.teams;
        for team in &mut teams {
            team.stage_id = assignment.get(&team.id).copied();
            self.store.update_team(team)?;
        }
        log::info!(
            "Drew {} team(s) into {} pool(s) for event {}",
            teams.len(),
            pools.len(),
            event_id
        );
        Ok(teams)
    }

    // ---- tournament core ----

    /// Create the event's stage sequence. If stages already exist they are returned unchanged.
    pub fn generate_stages(&self, event_id: EventId) -> ServiceResult<Vec<Stage>> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        if !snapshot.stages.is_empty() {
            log::debug!("Stages of event {} already generated", event_id);
            return Ok(snapshot.stages);
        }

        let new_stages = stages::build_stages(&snapshot.event, snapshot.teams.len())?;
        if !self
            .store
            .insert_stages_if_absent(event_id, new_stages.clone())?
        {
            return self.store.stages_of_event(event_id);
        }
        if snapshot.event.format == EventFormat::RoundRobin {
            if let Some(stage) = new_stages.first() {
                for mut team in snapshot.teams {
                    team.stage_id = Some(stage.id);
                    self.store.update_team(&team)?;
                }
            }
        }
        let labels: Vec<&str> = new_stages.iter().map(|s| s.label.as_str()).collect();
        log::info!("Generated stages {:?} for event {}", labels, event_id);
        Ok(new_stages)
    }

    /// Create the matches of one stage. A stage that already has matches is left as it is.
    pub fn schedule_stage(
        &self,
        event_id: EventId,
        stage_id: StageId,
    ) -> ServiceResult<ScheduleOutcome> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        let stage = snapshot.stage(stage_id)?;
        if snapshot.has_matches(stage_id) {
            return Ok(ScheduleOutcome::AlreadyScheduled {
                matches: snapshot.matches_of(stage_id).cloned().collect(),
            });
        }
        ensure_not_ended(&snapshot)?;

        let matches = scheduler::build_matches(&snapshot, stage)?;
        if !self
            .store
            .insert_matches_if_absent(stage_id, matches.clone())?
        {
            return Ok(ScheduleOutcome::AlreadyScheduled {
                matches: self.store.matches_of_stage(stage_id)?,
            });
        }
        log::info!(
            "Scheduled {} match(es) for stage {} of event {}",
            matches.len(),
            stage.label,
            event_id
        );
        Ok(ScheduleOutcome::Scheduled { matches })
    }

    /// Record (or correct) the score of a match.
    ///
    /// Refused once the event has ended or once a later knockout round has been scheduled.
    pub fn record_result(
        &self,
        match_id: MatchId,
        team_1_score: u32,
        team_2_score: u32,
    ) -> ServiceResult<GameMatch> {
        let event_id = self
            .store
            .game_match(match_id)?
            .ok_or(TournamentError::MatchNotFound(match_id))?
            .event_id;
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        ensure_not_ended(&snapshot)?;
        let mut game = snapshot
            .matches
            .iter()
            .find(|m| m.id == match_id)
            .cloned()
            .ok_or(TournamentError::MatchNotFound(match_id))?;
        let stage = snapshot.stage(game.stage_id)?;
        let later_round_scheduled = snapshot
            .knockout_stages()
            .any(|s| s.ordinal > stage.ordinal && snapshot.has_matches(s.id));
        if later_round_scheduled {
            return Err(TournamentError::StageLocked(stage.id));
        }

        game.team_1_score = Some(team_1_score);
        game.team_2_score = Some(team_2_score);
        self.store.update_match(&game)?;
        log::debug!(
            "Recorded {}-{} for match {} in stage {}",
            team_1_score,
            team_2_score,
            match_id,
            stage.label
        );
        Ok(game)
    }

    /// Move the event on from `stage_id`: schedule the next stage, or end the event.
    /// Safe to call repeatedly; later calls report what already happened.
    pub fn check_advance(
        &self,
        event_id: EventId,
        stage_id: StageId,
    ) -> ServiceResult<AdvanceOutcome> {
        let lock = self.event_lock(event_id)?;
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.snapshot(event_id)?;
        let step = progression::next_step(&snapshot, stage_id).map_err(|e| {
            log::warn!("Cannot advance stage {} of event {}: {}", stage_id, event_id, e);
            e
        })?;

        match step {
            Step::Pending { decided, total } => Ok(AdvanceOutcome::Pending {
                stage_id,
                decided,
                total,
            }),
            Step::WaitingForPools { complete, total } => {
                Ok(AdvanceOutcome::WaitingForPools { complete, total })
            }
            Step::Schedule(next_id) => {
                let next = snapshot.stage(next_id)?.clone();
                if snapshot.has_matches(next_id) {
                    return Ok(AdvanceOutcome::AlreadyAdvanced { stage: next });
                }
                let matches = scheduler::build_matches(&snapshot, &next)?;
                if !self
                    .store
                    .insert_matches_if_absent(next_id, matches.clone())?
                {
                    return Ok(AdvanceOutcome::AlreadyAdvanced { stage: next });
                }
                log::info!(
                    "Advanced event {} into stage {} ({} match(es))",
                    event_id,
                    next.label,
                    matches.len()
                );
                Ok(AdvanceOutcome::Advanced {
                    stage: next,
                    matches,
                })
            }
            Step::Finish { winner, runner_up } => {
                if !snapshot.event.ended {
                    let mut event = snapshot.event.clone();
                    event.ended = true;
                    self.store.update_event(&event)?;
                    log::info!(
                        "Event '{}' ended, winner: {}",
                        event.name,
                        snapshot.team_name(winner)
                    );
                }
                Ok(AdvanceOutcome::Finished {
                    winner: team_ref(&snapshot, winner),
                    runner_up: runner_up.map(|id| team_ref(&snapshot, id)),
                })
            }
        }
    }

    /// Standings of the given stages; an empty list means all pools (or all stages if none).
    pub fn get_standings(
        &self,
        event_id: EventId,
        stage_ids: &[StageId],
    ) -> ServiceResult<Vec<StageStandings>> {
        let snapshot = self.snapshot(event_id)?;
        if stage_ids.is_empty() {
            let scope = standings::default_scope(&snapshot);
            return standings::compute(&snapshot, &scope);
        }
        standings::compute(&snapshot, stage_ids)
    }

    pub fn is_stage_complete(&self, event_id: EventId, stage_id: StageId) -> ServiceResult<bool> {
        let snapshot = self.snapshot(event_id)?;
        snapshot.stage(stage_id)?;
        Ok(completion::is_stage_complete(&snapshot, stage_id))
    }

    pub fn progress(&self, event_id: EventId) -> ServiceResult<Progress> {
        Ok(progression::progress(&self.snapshot(event_id)?))
    }

    pub fn get_final_result(&self, event_id: EventId) -> ServiceResult<FinalResult> {
        let snapshot = self.snapshot(event_id)?;
        format_for(snapshot.event.format).final_result(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use uuid::Uuid;

    fn lock_count(svc: &TournamentService<MemoryStore>) -> usize {
        svc.locks.lock().unwrap().len()
    }

    #[test]
    fn unknown_event_leaves_no_lock_behind() {
        let svc = TournamentService::new(MemoryStore::new());
        let missing = Uuid::new_v4();
        assert_eq!(
            svc.add_team(missing, "Ghosts"),
            Err(TournamentError::EventNotFound(missing))
        );
        assert_eq!(
            svc.generate_stages(missing),
            Err(TournamentError::EventNotFound(missing))
        );
        assert_eq!(
            svc.delete_event(missing),
            Err(TournamentError::EventNotFound(missing))
        );
        assert_eq!(lock_count(&svc), 0);
    }

    #[test]
    fn deleting_an_event_drops_its_lock() {
        let svc = TournamentService::new(MemoryStore::new());
        let event = svc
            .create_event(NewEvent {
                name: "Friendly".to_string(),
                date: chrono::NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
                sport_type: String::new(),
                format: EventFormat::Knockout,
                group_count: None,
            })
            .unwrap();
        svc.add_team(event.id, "Reds").unwrap();
        assert_eq!(lock_count(&svc), 1);
        svc.delete_event(event.id).unwrap();
        assert_eq!(lock_count(&svc), 0);
        assert!(svc.add_team(event.id, "Blues").is_err());
        assert_eq!(lock_count(&svc), 0);
    }
}
