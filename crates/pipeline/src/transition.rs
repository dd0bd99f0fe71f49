//! Optimistic stage moves for board-style consumers.
//!
//! Transitions are unrestricted (any stage to any other stage); the board
//! is a Kanban surface, not a workflow engine. A move is an explicit
//! two-state saga: the view goes pending with the target stage, then either
//! commits (store confirmed) or rolls back to the prior stage. The visible
//! stage is always fully old or fully new.

use std::collections::HashMap;

use entity::{Deal, DealPatch, Stage};
use store::{DealRepository, StoreError, StoreResult};
use tracing::{debug, warn};

/// Local optimistic view of deal stages, seeded from a store snapshot.
#[derive(Clone, Debug, Default)]
pub struct BoardView {
    stages: HashMap<i64, Stage>,
}

impl BoardView {
    pub fn from_deals(deals: &[Deal]) -> Self {
        Self {
            stages: deals.iter().map(|d| (d.id, d.stage)).collect(),
        }
    }

    pub fn stage_of(&self, id: i64) -> Option<Stage> {
        self.stages.get(&id).copied()
    }

    /// Register a card the view did not see at snapshot time.
    pub fn insert(&mut self, id: i64, stage: Stage) {
        self.stages.insert(id, stage);
    }

    pub fn remove(&mut self, id: i64) {
        self.stages.remove(&id);
    }

    pub fn deal_ids_in(&self, stage: Stage) -> Vec<i64> {
        let mut ids: Vec<i64> = self
            .stages
            .iter()
            .filter(|(_, s)| **s == stage)
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn set(&mut self, id: i64, stage: Stage) {
        self.stages.insert(id, stage);
    }
}

/// Outcome of a stage-move request. Rollback is reported through the `Err`
/// arm of [`move_deal`] after the view has been restored.
#[derive(Clone, Debug, PartialEq)]
pub enum Transition {
    /// The deal already sat in the requested stage; the store was not
    /// touched, so `stage_changed_at` and `updated_at` are unaffected.
    NoOp,
    /// The store confirmed the move; the optimistic value stays in place.
    Committed(Deal),
}

pub async fn move_deal<R: DealRepository>(
    view: &mut BoardView,
    repo: &R,
    id: i64,
    to: Stage,
) -> StoreResult<Transition> {
    let Some(prior) = view.stage_of(id) else {
        return Err(StoreError::not_found("deal", id));
    };
    if prior == to {
        return Ok(Transition::NoOp);
    }

    // Pending: the board shows the target stage before the store confirms.
    view.set(id, to);
    debug!(deal_id = id, from = %prior, to = %to, "stage move pending");
    match repo.update(id, DealPatch::stage(to)).await {
        Ok(deal) => {
            debug!(deal_id = id, to = %to, "stage move committed");
            Ok(Transition::Committed(deal))
        }
        Err(err) => {
            view.set(id, prior);
            warn!(deal_id = id, from = %prior, to = %to, %err, "stage move rolled back");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn view_tracks_snapshot_stages() {
        let data = store::demo_data(Utc::now());
        let view = BoardView::from_deals(&data.deals);
        let pilot = data.deal_titled("Northwind Pilot").unwrap();
        assert_eq!(view.stage_of(pilot.id), Some(Stage::Lead));
        assert_eq!(view.deal_ids_in(Stage::Lead).len(), 2);
        assert_eq!(view.stage_of(999), None);
    }
}
