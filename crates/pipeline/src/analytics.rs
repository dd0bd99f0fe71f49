//! Read-only metrics over the deal set. Pure function of the data and the
//! supplied `now`; never mutates and never divides by zero.

use chrono::{DateTime, Utc};
use entity::{Deal, Stage};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StageAnalytics {
    pub stage: Stage,
    pub deal_count: usize,
    pub total_value: i64,
    /// Mean of per-deal `ceil(days since stage_changed_at)`. Deals without
    /// a stage marker are excluded from both sum and divisor; an empty
    /// bucket reports 0.
    pub avg_days_in_stage: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineAnalytics {
    /// Count of active deals (any stage but closed-won).
    pub total_deals: usize,
    pub total_pipeline_value: i64,
    pub avg_days_in_pipeline: f64,
    pub bottleneck_stage: Stage,
    pub bottleneck_days: f64,
    /// One entry per stage, enumeration order.
    pub stages: Vec<StageAnalytics>,
}

impl PipelineAnalytics {
    pub fn stage(&self, stage: Stage) -> &StageAnalytics {
        &self.stages[Stage::ALL
            .iter()
            .position(|s| *s == stage)
            .expect("stage present in enumeration")]
    }
}

pub fn compute_analytics(deals: &[Deal], now: DateTime<Utc>) -> PipelineAnalytics {
    let active: Vec<&Deal> = deals.iter().filter(|d| !d.stage.is_won()).collect();
    let total_pipeline_value: i64 = active.iter().map(|d| d.value).sum();

    let stages: Vec<StageAnalytics> = Stage::ALL
        .into_iter()
        .map(|stage| stage_analytics(deals, stage, now))
        .collect();

    // Any populated bucket qualifies, zero-day averages included. Ties
    // resolve to the earliest stage in enumeration order; only an empty
    // board falls back to the first stage.
    let mut bottleneck: Option<&StageAnalytics> = None;
    for bucket in &stages {
        if bucket.deal_count == 0 {
            continue;
        }
        let replace = match bottleneck {
            Some(current) => bucket.avg_days_in_stage > current.avg_days_in_stage,
            None => true,
        };
        if replace {
            bottleneck = Some(bucket);
        }
    }
    let (bottleneck_stage, bottleneck_days) = bottleneck
        .map(|bucket| (bucket.stage, bucket.avg_days_in_stage))
        .unwrap_or((Stage::Lead, 0.0));

    let pipeline_ages: Vec<i64> = active
        .iter()
        .map(|d| days_elapsed(now, d.created_at))
        .collect();
    let avg_days_in_pipeline = mean(&pipeline_ages);

    PipelineAnalytics {
        total_deals: active.len(),
        total_pipeline_value,
        avg_days_in_pipeline,
        bottleneck_stage,
        bottleneck_days,
        stages,
    }
}

fn stage_analytics(deals: &[Deal], stage: Stage, now: DateTime<Utc>) -> StageAnalytics {
    let in_stage: Vec<&Deal> = deals.iter().filter(|d| d.stage == stage).collect();
    let total_value: i64 = in_stage.iter().map(|d| d.value).sum();
    let ages: Vec<i64> = in_stage
        .iter()
        .filter_map(|d| d.stage_changed_at)
        .map(|at| days_elapsed(now, at))
        .collect();
    StageAnalytics {
        stage,
        deal_count: in_stage.len(),
        total_value,
        avg_days_in_stage: mean(&ages),
    }
}

/// Whole days between `then` and `now`, rounded up; clamped at zero for
/// timestamps that are not in the past.
fn days_elapsed(now: DateTime<Utc>, then: DateTime<Utc>) -> i64 {
    let secs = (now - then).num_seconds();
    if secs <= 0 {
        0
    } else {
        secs / 86_400 + (secs % 86_400 != 0) as i64
    }
}

fn mean(values: &[i64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<i64>() as f64 / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).single().unwrap()
    }

    fn deal(id: i64, stage: Stage, value: i64, stage_age_days: Option<i64>) -> Deal {
        let base = now() - Duration::days(stage_age_days.unwrap_or(0).max(1) + 10);
        Deal {
            id,
            title: format!("Deal {id}"),
            company: "Northwind Systems".into(),
            contact_id: None,
            contact_name: None,
            value,
            stage,
            probability: 50,
            expected_close_date: None,
            description: None,
            notes: None,
            created_at: base,
            updated_at: base,
            stage_changed_at: stage_age_days.map(|d| now() - Duration::days(d)),
        }
    }

    #[test]
    fn empty_deal_set_reports_zeroes_and_lead_fallback() {
        let report = compute_analytics(&[], now());
        assert_eq!(report.total_deals, 0);
        assert_eq!(report.total_pipeline_value, 0);
        assert_eq!(report.avg_days_in_pipeline, 0.0);
        assert_eq!(report.bottleneck_stage, Stage::Lead);
        assert_eq!(report.bottleneck_days, 0.0);
        for bucket in &report.stages {
            assert_eq!(bucket.deal_count, 0);
            assert_eq!(bucket.total_value, 0);
            assert_eq!(bucket.avg_days_in_stage, 0.0);
        }
    }

    #[test]
    fn pipeline_value_excludes_closed_won() {
        let deals = vec![
            deal(1, Stage::Lead, 1_000, Some(2)),
            deal(2, Stage::Proposal, 2_500, Some(4)),
            deal(3, Stage::ClosedWon, 9_000, Some(1)),
        ];
        let report = compute_analytics(&deals, now());
        assert_eq!(report.total_deals, 2);
        assert_eq!(report.total_pipeline_value, 3_500);
        // Won value still shows up in its own bucket.
        assert_eq!(report.stage(Stage::ClosedWon).total_value, 9_000);
    }

    #[test]
    fn lead_bucket_matches_fixture_scenario() {
        let deals = vec![
            deal(1, Stage::Lead, 1_000, Some(5)),
            deal(2, Stage::Lead, 2_000, Some(15)),
        ];
        let report = compute_analytics(&deals, now());
        let lead = report.stage(Stage::Lead);
        assert_eq!(lead.deal_count, 2);
        assert_eq!(lead.total_value, 3_000);
        assert_eq!(lead.avg_days_in_stage, 10.0);
        assert_eq!(report.bottleneck_stage, Stage::Lead);
        assert_eq!(report.bottleneck_days, 10.0);
    }

    #[test]
    fn deals_without_stage_marker_are_excluded_from_the_average() {
        let deals = vec![
            deal(1, Stage::Qualified, 1_000, Some(8)),
            deal(2, Stage::Qualified, 2_000, None),
        ];
        let report = compute_analytics(&deals, now());
        let qualified = report.stage(Stage::Qualified);
        assert_eq!(qualified.deal_count, 2);
        // Not treated as zero days: the average covers only the marked deal.
        assert_eq!(qualified.avg_days_in_stage, 8.0);
    }

    #[test]
    fn partial_days_round_up() {
        let mut d = deal(1, Stage::Lead, 1_000, None);
        d.stage_changed_at = Some(now() - Duration::hours(36));
        let report = compute_analytics(&[d], now());
        assert_eq!(report.stage(Stage::Lead).avg_days_in_stage, 2.0);
    }

    #[test]
    fn bottleneck_ties_resolve_to_enumeration_order() {
        let deals = vec![
            deal(1, Stage::Qualified, 1_000, Some(7)),
            deal(2, Stage::Negotiation, 2_000, Some(7)),
        ];
        let report = compute_analytics(&deals, now());
        assert_eq!(report.bottleneck_stage, Stage::Qualified);
        assert_eq!(report.bottleneck_days, 7.0);
    }

    #[test]
    fn zero_day_bucket_still_beats_the_lead_fallback() {
        // A deal whose stage marker was set just now averages zero days,
        // but its stage is populated and must win over an empty Lead.
        let deals = vec![deal(1, Stage::Proposal, 1_000, Some(0))];
        let report = compute_analytics(&deals, now());
        assert_eq!(report.bottleneck_stage, Stage::Proposal);
        assert_eq!(report.bottleneck_days, 0.0);
    }

    #[test]
    fn unmarked_deals_still_qualify_their_stage_for_the_bottleneck() {
        let deals = vec![deal(1, Stage::Negotiation, 1_000, None)];
        let report = compute_analytics(&deals, now());
        assert_eq!(report.bottleneck_stage, Stage::Negotiation);
        assert_eq!(report.bottleneck_days, 0.0);
    }

    #[test]
    fn won_only_board_has_no_active_deals_but_a_bottleneck_bucket() {
        let deals = vec![deal(1, Stage::ClosedWon, 5_000, Some(30))];
        let report = compute_analytics(&deals, now());
        assert_eq!(report.total_deals, 0);
        assert_eq!(report.avg_days_in_pipeline, 0.0);
        // Stage buckets cover all deals, so a populated won bucket still
        // qualifies for the bottleneck.
        assert_eq!(report.bottleneck_stage, Stage::ClosedWon);
    }

    #[test]
    fn avg_days_in_pipeline_covers_active_deals_only() {
        let mut active = deal(1, Stage::Lead, 1_000, Some(2));
        active.created_at = now() - Duration::days(10);
        let mut won = deal(2, Stage::ClosedWon, 2_000, Some(1));
        won.created_at = now() - Duration::days(100);
        let report = compute_analytics(&[active, won], now());
        assert_eq!(report.avg_days_in_pipeline, 10.0);
    }
}
