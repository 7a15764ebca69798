//! Match (game) between two teams, and which side won it.

use crate::models::event::EventId;
use crate::models::stage::StageId;
use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Which side of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

/// How a decided match ended.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Won(Side),
    Draw,
}

/// A single fixture within a stage.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub event_id: EventId,
    pub stage_id: StageId,
    /// Creation order within the stage (0-based). Winners advance in this order.
    pub sequence: u32,
    pub team_1: TeamId,
    pub team_2: TeamId,
    /// None if not yet played.
    pub team_1_score: Option<u32>,
    pub team_2_score: Option<u32>,
}

impl GameMatch {
    pub fn new(
        event_id: EventId,
        stage_id: StageId,
        sequence: u32,
        team_1: TeamId,
        team_2: TeamId,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_id,
            stage_id,
            sequence,
            team_1,
            team_2,
            team_1_score: None,
            team_2_score: None,
        }
    }

    /// Both scores are recorded.
    pub fn is_decided(&self) -> bool {
        self.team_1_score.is_some() && self.team_2_score.is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        let (s1, s2) = (self.team_1_score?, self.team_2_score?);
        Some(match s1.cmp(&s2) {
            std::cmp::Ordering::Greater => Outcome::Won(Side::One),
            std::cmp::Ordering::Less => Outcome::Won(Side::Two),
            std::cmp::Ordering::Equal => Outcome::Draw,
        })
    }

    pub fn team(&self, side: Side) -> TeamId {
        match side {
            Side::One => self.team_1,
            Side::Two => self.team_2,
        }
    }

    /// Winner of a decided, non-drawn match.
    pub fn winner(&self) -> Option<TeamId> {
        match self.outcome()? {
            Outcome::Won(side) => Some(self.team(side)),
            Outcome::Draw => None,
        }
    }

    /// Loser of a decided, non-drawn match.
    pub fn loser(&self) -> Option<TeamId> {
        match self.outcome()? {
            Outcome::Won(Side::One) => Some(self.team_2),
            Outcome::Won(Side::Two) => Some(self.team_1),
            Outcome::Draw => None,
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_1 == team || self.team_2 == team
    }
}
