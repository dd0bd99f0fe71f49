mod config;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use entity::{Deal, Stage};
use pipeline::{BoardView, Transition, compute_analytics, move_deal};
use platform_obs::{ObsConfig, init_tracing};
use store::{DealRepository, InMemoryDeals, demo_data};
use tracing::info;

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "dealdesk", version, about = "In-memory CRM pipeline demo")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the demo dataset and summarize it.
    Seed,
    /// Render the pipeline board with per-stage totals.
    Board,
    /// Print the pipeline analytics report.
    Analytics {
        /// Emit the report as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Move a deal to another stage through the optimistic transition flow.
    MoveDeal {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        stage: Stage,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing(ObsConfig::default())?;
    let cli = Cli::parse();
    let config = AppConfig::load()?;

    match cli.command {
        Command::Seed => run_seed(&config).await,
        Command::Board => run_board(&config).await,
        Command::Analytics { json } => run_analytics(&config, json).await,
        Command::MoveDeal { id, stage } => run_move_deal(&config, id, stage).await,
    }
}

fn demo_deals(config: &AppConfig) -> InMemoryDeals {
    let data = demo_data(Utc::now());
    InMemoryDeals::with_records(data.deals).latency(config.latency)
}

async fn run_seed(config: &AppConfig) -> Result<()> {
    let data = demo_data(Utc::now());
    info!(
        companies = data.companies.len(),
        contacts = data.contacts.len(),
        deals = data.deals.len(),
        "demo dataset loaded"
    );
    let repo = InMemoryDeals::with_records(data.deals).latency(config.latency);
    for deal in repo.get_all().await {
        println!(
            "#{} {} [{}] ${} - {}",
            deal.id,
            deal.title,
            deal.stage.display_name(),
            deal.value,
            deal.company
        );
    }
    Ok(())
}

async fn run_board(config: &AppConfig) -> Result<()> {
    let repo = demo_deals(config);
    let deals = repo.get_all().await;
    let report = compute_analytics(&deals, Utc::now());

    for bucket in &report.stages {
        println!(
            "{} ({}) - ${} - {:.0} days avg",
            bucket.stage.display_name(),
            bucket.deal_count,
            bucket.total_value,
            bucket.avg_days_in_stage
        );
        for deal in deals.iter().filter(|d| d.stage == bucket.stage) {
            println!("  #{} {} - ${}", deal.id, deal.title, deal.value);
        }
    }
    println!(
        "Pipeline: ${} across {} active deals",
        report.total_pipeline_value, report.total_deals
    );
    Ok(())
}

async fn run_analytics(config: &AppConfig, json: bool) -> Result<()> {
    let repo = demo_deals(config);
    let deals = repo.get_all().await;
    let report = compute_analytics(&deals, Utc::now());

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Active deals:         {}", report.total_deals);
    println!("Pipeline value:       ${}", report.total_pipeline_value);
    println!("Avg days in pipeline: {:.1}", report.avg_days_in_pipeline);
    println!(
        "Bottleneck stage:     {} ({:.1} days avg)",
        report.bottleneck_stage.display_name(),
        report.bottleneck_days
    );
    for bucket in &report.stages {
        println!(
            "  {:<12} deals={} value=${} avg_days={:.1}",
            bucket.stage.key(),
            bucket.deal_count,
            bucket.total_value,
            bucket.avg_days_in_stage
        );
    }
    Ok(())
}

async fn run_move_deal(config: &AppConfig, id: i64, stage: Stage) -> Result<()> {
    let repo = demo_deals(config);
    let mut view = BoardView::from_deals(&repo.get_all().await);

    match move_deal(&mut view, &repo, id, stage).await {
        Ok(Transition::NoOp) => {
            println!("deal #{id} is already in {}", stage.display_name());
        }
        Ok(Transition::Committed(deal)) => {
            print_deal(&deal);
            info!(deal_id = id, stage = %stage, "stage move committed");
        }
        Err(err) => {
            // The view has already been rolled back; report and propagate.
            eprintln!("move failed, board reverted: {err}");
            return Err(err.into());
        }
    }
    Ok(())
}

fn print_deal(deal: &Deal) {
    println!(
        "#{} {} [{}] ${} - updated {}",
        deal.id,
        deal.title,
        deal.stage.display_name(),
        deal.value,
        deal.updated_at.format("%Y-%m-%d %H:%M:%S")
    );
}
