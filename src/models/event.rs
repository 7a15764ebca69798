//! Event (one tournament instance), its format, and the error type shared by all operations.

use crate::models::game::MatchId;
use crate::models::stage::StageId;
use crate::models::team::TeamId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    EventNotFound(EventId),
    TeamNotFound(TeamId),
    StageNotFound(StageId),
    MatchNotFound(MatchId),
    /// Knockout team count is not one of 2, 4, 8, 16, 32.
    UnsupportedBracketSize(usize),
    /// Group+knockout event without a group count of 2, 4 or 8.
    UnsupportedGroupCount(Option<u8>),
    /// Odd number of teams entering sequential pairing.
    OddParticipantCount(usize),
    /// A knockout match ended in a draw, or a round produced an odd number of winners.
    InconsistentKnockoutResult(StageId),
    /// Not every match of the stage (or of every pool) has a result yet.
    StageIncomplete(StageId),
    /// Stages have not been generated for the event yet.
    NoStages,
    NotEnoughTeams { required: usize, actual: usize },
    /// Teams can only be added or removed before stages are generated.
    RosterLocked,
    /// The stage already has matches, or a later stage has been scheduled.
    StageLocked(StageId),
    /// Teams can only be assigned to pool stages.
    NotAPoolStage(StageId),
    /// The event has ended; nothing can be changed any more.
    EventEnded,
    /// A team with this name already exists in the event (case-insensitive).
    DuplicateTeamName(String),
    EmptyName,
    /// Bulk team import failed (malformed CSV).
    Import(String),
    /// The persistence layer failed.
    Storage(String),
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::EventNotFound(_) => write!(f, "Event not found"),
            TournamentError::TeamNotFound(_) => write!(f, "Team not found"),
            TournamentError::StageNotFound(_) => write!(f, "Stage not found"),
            TournamentError::MatchNotFound(_) => write!(f, "Match not found"),
            TournamentError::UnsupportedBracketSize(n) => {
                write!(f, "Knockout needs 2, 4, 8, 16 or 32 teams (got {})", n)
            }
            TournamentError::UnsupportedGroupCount(Some(n)) => {
                write!(f, "Group count must be 2, 4 or 8 (got {})", n)
            }
            TournamentError::UnsupportedGroupCount(None) => {
                write!(f, "Group count must be 2, 4 or 8")
            }
            TournamentError::OddParticipantCount(n) => {
                write!(f, "Cannot pair an odd number of teams ({})", n)
            }
            TournamentError::InconsistentKnockoutResult(_) => {
                write!(f, "Knockout matches cannot end in a draw")
            }
            TournamentError::StageIncomplete(_) => write!(f, "Not all matches have a result"),
            TournamentError::NoStages => write!(f, "Stages have not been generated yet"),
            TournamentError::NotEnoughTeams { required, actual } => {
                write!(f, "Need at least {} teams (got {})", required, actual)
            }
            TournamentError::RosterLocked => {
                write!(f, "Teams cannot be changed after stages are generated")
            }
            TournamentError::StageLocked(_) => write!(f, "Stage can no longer be changed"),
            TournamentError::NotAPoolStage(_) => write!(f, "Teams can only be assigned to groups"),
            TournamentError::EventEnded => write!(f, "Event has already ended"),
            TournamentError::DuplicateTeamName(name) => {
                write!(f, "A team named '{}' already exists", name)
            }
            TournamentError::EmptyName => write!(f, "Name must not be empty"),
            TournamentError::Import(msg) => write!(f, "Team import failed: {}", msg),
            TournamentError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for an event.
pub type EventId = Uuid;

/// How the event is played out.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventFormat {
    /// Every team plays every other team once; one stage.
    RoundRobin,
    /// Single-elimination bracket from the first round.
    Knockout,
    /// Pools (groups) first, top two of each pool go into a knockout bracket.
    GroupKnockout,
}

/// Input for creating an event.
#[derive(Clone, Debug, Deserialize)]
pub struct NewEvent {
    pub name: String,
    pub date: NaiveDate,
    /// Informational only.
    #[serde(default)]
    pub sport_type: String,
    pub format: EventFormat,
    /// Number of pools; only used by `GroupKnockout`.
    #[serde(default)]
    pub group_count: Option<u8>,
}

/// One tournament instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub date: NaiveDate,
    pub sport_type: String,
    pub format: EventFormat,
    pub group_count: Option<u8>,
    /// Set once, when the final result is decided.
    pub ended: bool,
}

impl Event {
    /// Create a new (not ended) event. The name is trimmed and must not be empty.
    pub fn new(new: NewEvent) -> Result<Self, TournamentError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(TournamentError::EmptyName);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            date: new.date,
            sport_type: new.sport_type.trim().to_string(),
            format: new.format,
            group_count: new.group_count,
            ended: false,
        })
    }
}
