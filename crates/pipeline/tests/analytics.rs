//! Analytics over a live store snapshot, wired the way the app consumes it.

use chrono::Utc;
use pipeline::compute_analytics;
use store::{DealRepository, InMemoryDeals, demo_data};

#[tokio::test]
async fn demo_snapshot_produces_expected_board_metrics() {
    let now = Utc::now();
    let data = demo_data(now);
    let repo = InMemoryDeals::with_records(data.deals);

    let snapshot = repo.get_all().await;
    let report = compute_analytics(&snapshot, now);

    // One closed-won demo deal; everything else is active pipeline.
    assert_eq!(report.total_deals, 5);
    assert_eq!(report.total_pipeline_value, 45_000 + 80_000 + 120_000 + 210_000 + 95_000);

    let lead = report.stage(entity::Stage::Lead);
    assert_eq!(lead.deal_count, 2);
    assert_eq!(lead.total_value, 125_000);
    assert_eq!(lead.avg_days_in_stage, 10.0);

    // Negotiation has the oldest stage marker (20 days) among demo buckets.
    assert_eq!(report.bottleneck_stage, entity::Stage::Negotiation);
    assert_eq!(report.bottleneck_days, 20.0);
}

#[tokio::test]
async fn analytics_reflects_store_mutations() {
    let now = Utc::now();
    let repo = InMemoryDeals::with_records(demo_data(now).deals);

    let before = compute_analytics(&repo.get_all().await, now);
    repo.delete(1).await.unwrap();
    let after = compute_analytics(&repo.get_all().await, now);

    assert_eq!(after.total_deals, before.total_deals - 1);
    assert_eq!(
        after.total_pipeline_value,
        before.total_pipeline_value - 45_000
    );
}
