//! Stage: one pool or one knockout round of an event.

use crate::models::event::EventId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a stage.
pub type StageId = Uuid;

/// Whether every pair plays (pool) or teams are paired once and losers drop out (knockout).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    Pool,
    Knockout,
}

/// A stage is created once by the stage generator and never changed afterwards.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub id: StageId,
    pub event_id: EventId,
    /// Display label, e.g. "A", "RR", "Q", "Final".
    pub label: String,
    /// Position in the event's stage sequence (0-based).
    pub ordinal: u32,
    pub kind: StageKind,
}

impl Stage {
    pub fn new(event_id: EventId, label: impl Into<String>, ordinal: u32, kind: StageKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            label: label.into(),
            ordinal,
            kind,
        }
    }

    pub fn is_pool(&self) -> bool {
        self.kind == StageKind::Pool
    }

    pub fn is_knockout(&self) -> bool {
        self.kind == StageKind::Knockout
    }
}
