//! Team data structure.

use crate::models::event::EventId;
use crate::models::stage::StageId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches and lookups).
pub type TeamId = Uuid;

/// A team taking part in exactly one event.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub event_id: EventId,
    pub name: String,
    /// Creation order within the event (1-based).
    pub sequence: u32,
    /// Pool the team was drawn into. Knockout participation is read from matches instead.
    pub stage_id: Option<StageId>,
}

impl Team {
    /// Create a new, unassigned team.
    pub fn new(event_id: EventId, name: impl Into<String>, sequence: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            name: name.into(),
            sequence,
            stage_id: None,
        }
    }
}

/// Team id + display name, used in results and standings.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRef {
    pub id: TeamId,
    pub name: String,
}

impl From<&Team> for TeamRef {
    fn from(team: &Team) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
        }
    }
}
