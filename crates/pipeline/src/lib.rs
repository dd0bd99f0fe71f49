//! Derived pipeline metrics and the optimistic stage-transition saga.

pub mod analytics;
pub mod transition;

pub use analytics::{PipelineAnalytics, StageAnalytics, compute_analytics};
pub use transition::{BoardView, Transition, move_deal};
