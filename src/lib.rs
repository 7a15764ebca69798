//! Sports tournament engine: round robin, knockout and group + knockout events,
//! with a REST API on top.

pub mod config;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;
pub mod web;

pub use config::ServerConfig;
pub use logic::{
    AdvanceOutcome, FinalResult, Phase, Progress, RankedTeam, RoundEliminations, ScheduleOutcome,
    StageStandings, TeamStanding,
};
pub use models::{
    Event, EventFormat, EventId, GameMatch, MatchId, NewEvent, Outcome, Side, Stage, StageId,
    StageKind, Team, TeamId, TeamRef, TournamentError,
};
pub use service::{ServiceResult, TournamentService};
pub use store::{EventSnapshot, MemoryStore, Store};
pub use web::{configure, new_state, AppState};
