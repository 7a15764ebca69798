//! Stage completion: has every match of a stage been played?

use crate::models::StageId;
use crate::store::EventSnapshot;

/// (decided, total) matches of a stage.
pub fn stage_progress(snapshot: &EventSnapshot, stage_id: StageId) -> (usize, usize) {
    snapshot
        .matches_of(stage_id)
        .fold((0, 0), |(decided, total), m| {
            (decided + usize::from(m.is_decided()), total + 1)
        })
}

/// A stage is complete when it has matches and all of them are decided.
pub fn is_stage_complete(snapshot: &EventSnapshot, stage_id: StageId) -> bool {
    let (decided, total) = stage_progress(snapshot, stage_id);
    total > 0 && decided == total
}

/// (complete, total) pool stages.
pub fn pools_progress(snapshot: &EventSnapshot) -> (usize, usize) {
    snapshot.pool_stages().fold((0, 0), |(complete, total), s| {
        (
            complete + usize::from(is_stage_complete(snapshot, s.id)),
            total + 1,
        )
    })
}
