use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use sqlx::sqlite::SqliteConnection;
use sqlx::Connection;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod chart;
mod config;
mod db;
mod models;
mod report;
mod stats;

use config::{AnalysisConfig, ImageFormat};
use report::AnalysisReport;

#[derive(Parser)]
#[command(name = "shiptivity-analytics")]
#[command(about = "Before/after release charts from Shiptivity event history", long_about = None)]
struct Cli {
    /// SQLite database holding login_history and card_change_history
    #[arg(long, env = "DATABASE_URL", default_value = config::DEFAULT_DATABASE_URL, global = true)]
    database_url: String,

    #[command(flatten)]
    analysis: AnalysisArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct AnalysisArgs {
    /// Directory the chart images are written to
    #[arg(long, env = "SHIPTIVITY_OUTPUT_DIR", default_value = ".", global = true)]
    output_dir: PathBuf,
    /// Release day of the feature; the cutoff is midnight UTC of this day
    #[arg(long, default_value = config::DEFAULT_RELEASE_DATE, global = true)]
    release_date: NaiveDate,
    #[arg(long, default_value = config::DEFAULT_FEATURE_NAME, global = true)]
    feature_name: String,
    /// Number of cards shown in the ranking panel
    #[arg(
        long = "top",
        default_value_t = config::DEFAULT_TOP_ITEMS,
        value_parser = clap::value_parser!(u16).range(1..),
        global = true
    )]
    top_items: u16,
    /// Chart image format
    #[arg(long, value_enum, default_value_t = ImageFormat::Png, global = true)]
    format: ImageFormat,
    /// Print the summary as JSON after both charts are written
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render both charts and print the summary (default)
    Analyze,
    /// Create the event tables if they are missing
    InitDb,
    /// Load a small demo data set into an empty database
    Seed,
}

impl From<&AnalysisArgs> for AnalysisConfig {
    fn from(args: &AnalysisArgs) -> Self {
        AnalysisConfig {
            output_dir: args.output_dir.clone(),
            release_date: args.release_date,
            feature_name: args.feature_name.clone(),
            top_items: usize::from(args.top_items),
            format: args.format,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AnalysisConfig::from(&cli.analysis);

    match cli.command.unwrap_or(Commands::Analyze) {
        Commands::Analyze => {
            let json = cli.analysis.json;
            let mut conn = db::open_read_only(&cli.database_url).await?;
            let outcome = if json {
                analyze(&mut conn, &config, &mut std::io::sink()).await
            } else {
                analyze(&mut conn, &config, &mut std::io::stdout()).await
            };
            let closed = conn.close().await;
            let report = outcome?;
            closed.context("failed to close the event store")?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", report::build_footer(&report.files));
            }
        }
        Commands::InitDb => {
            let mut conn = db::open_for_setup(&cli.database_url).await?;
            let outcome = db::init_db(&mut conn).await;
            conn.close().await?;
            outcome?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            let mut conn = db::open_for_setup(&cli.database_url).await?;
            let outcome = seed(&mut conn, config.release_date).await;
            conn.close().await?;
            let inserted = outcome?;
            if inserted == 0 {
                println!("Event tables already hold data; nothing inserted.");
            } else {
                println!("Inserted {inserted} demo events.");
            }
        }
    }

    Ok(())
}

async fn seed(conn: &mut SqliteConnection, release_date: NaiveDate) -> anyhow::Result<usize> {
    db::init_db(conn).await?;
    db::seed(conn, release_date).await
}

/// Runs both query/plot steps on an open connection. The caller owns closing it.
///
/// Each step's summary goes to `out` as soon as its chart is on disk, so a later
/// failure still leaves the earlier results on the console.
async fn analyze(
    conn: &mut SqliteConnection,
    config: &AnalysisConfig,
    out: &mut impl Write,
) -> anyhow::Result<AnalysisReport> {
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("failed to create {}", config.output_dir.display()))?;

    writeln!(out, "{}", report::banner(&config.feature_name))?;
    writeln!(out)?;
    writeln!(out, "[1] Generating Daily Active Users Graph...")?;
    out.flush()?;
    info!("generating daily active users graph");
    let days = db::fetch_daily_active_users(conn).await?;
    if days.is_empty() {
        warn!("no login events found; daily active user averages default to zero");
    }
    let partition = stats::partition_by_cutoff(&days, config.cutoff_timestamp());
    let dau_summary = stats::summarize_dau(&partition);
    let dau_path = config.dau_chart_path();
    chart::render_dau_chart(
        &dau_path,
        config,
        &chart::DauChart {
            days: &days,
            partition: &partition,
            summary: &dau_summary,
        },
    )
    .with_context(|| format!("failed to render {}", dau_path.display()))?;
    write!(
        out,
        "{}",
        report::build_dau_summary(&config.feature_name, &dau_path, &dau_summary)
    )?;
    writeln!(out)?;
    writeln!(out, "[2] Generating Status Changes Graph...")?;
    out.flush()?;

    info!("generating status changes graph");
    let totals = db::fetch_changes_by_item(conn).await?;
    let distribution = db::fetch_change_distribution(conn).await?;
    if totals.is_empty() {
        warn!("no status changes found; most active card is undefined");
    }
    let status_summary = stats::summarize_status_changes(&totals);
    let status_path = config.status_chart_path();
    chart::render_status_chart(
        &status_path,
        config,
        &chart::StatusChart {
            totals: &totals,
            distribution: &distribution,
        },
    )
    .with_context(|| format!("failed to render {}", status_path.display()))?;
    write!(
        out,
        "{}",
        report::build_status_summary(&status_path, &status_summary)
    )?;
    writeln!(out)?;
    out.flush()?;

    Ok(AnalysisReport {
        feature_name: config.feature_name.clone(),
        cutoff_timestamp: config.cutoff_timestamp(),
        daily_active_users: dau_summary,
        status_changes: status_summary,
        files: vec![dau_path, status_path],
    })
}
