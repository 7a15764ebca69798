//! Tournament business logic: stage generation, scheduling, standings, progression, results.
//!
//! Everything here works on an [`EventSnapshot`](crate::store::EventSnapshot) and stores nothing;
//! the service layer persists what these functions produce.

pub mod completion;
pub mod format;
pub mod progression;
pub mod results;
pub mod roster;
pub mod scheduler;
pub mod stages;
pub mod standings;

pub use format::{format_for, GroupThenKnockout, Knockout, RoundRobin, TournamentFormat};
pub use progression::{AdvanceOutcome, Phase, Progress};
pub use results::{FinalResult, RankedTeam, RoundEliminations};
pub use scheduler::{Pairing, ScheduleOutcome};
pub use standings::{StageStandings, TeamStanding};
