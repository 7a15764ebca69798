//! Data structures for sports events: events, teams, stages, matches.

mod event;
mod game;
mod stage;
mod team;

pub use event::{Event, EventFormat, EventId, NewEvent, TournamentError};
pub use game::{GameMatch, MatchId, Outcome, Side};
pub use stage::{Stage, StageId, StageKind};
pub use team::{Team, TeamId, TeamRef};
