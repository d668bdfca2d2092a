//! CLI entry point for the SIS grade watcher.
//!
//! Provides subcommands for logging in to the university portal, showing the
//! aggregated grade history, querying cohort distributions, and watching for
//! newly published grades.

mod infra;
mod services;

use std::ffi::OsStr;
use std::path::Path;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::infra::portal::PortalClient;
use crate::services::student_api::StudentApi;
use sis_grade_watch::{
    aggregate::{AggregateOptions, AggregateResult, GradeRecord, aggregate},
    diff::{GradeChange, diff},
    normalize::{distribution_from_value, records_from_value},
    output::{print_json, render_aggregate, render_distribution},
    settings::{MIN_REFRESH_MINUTES, Settings, data_dir},
    stats::DistributionStats,
};

#[derive(Parser)]
#[command(name = "sis_grade_watch")]
#[command(about = "A client for tracking university grades from the SIS portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the portal through CAS and save the session
    Login {
        /// University account username
        username: String,

        /// Password; falls back to the SIS_PASSWORD environment variable
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Fetch the grade history and show the aggregated view
    Grades {
        /// Print the aggregate as JSON instead of the text dashboard
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Cohort grade distribution for one course syllabus and exam period
    Stats {
        /// Course syllabus identifier, as found in the grade records
        course_syllabus_id: String,

        /// Exam period identifier
        exam_period_id: String,

        /// Print the distribution stats as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Poll the portal periodically and report newly published grades
    Watch {
        /// Minutes between polls (floored at 5); defaults to the saved setting
        #[arg(short, long)]
        interval_minutes: Option<u64>,

        /// Number of polls to run (0 = infinite)
        #[arg(short = 'n', long, default_value_t = 0)]
        samples: usize,
    },
    /// Forget the saved session
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/sis_grade_watch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("sis_grade_watch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let dir = data_dir();
    let settings = Settings::load(&dir);

    match cli.command {
        Commands::Login { username, password } => {
            let password = password
                .or_else(|| std::env::var("SIS_PASSWORD").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!("no password given; pass --password or set SIS_PASSWORD")
                })?;

            let client = PortalClient::login(&username, &password, &dir).await?;
            let info = client.student_info().await?;
            info!(
                username = %username,
                student = %info.get("name").and_then(|v| v.as_str()).unwrap_or("unknown"),
                "Logged in, session saved"
            );
        }
        Commands::Grades { json } => {
            let client = PortalClient::restore(&dir).await?;
            let result = fetch_aggregate(&client, &settings).await?;

            if json {
                print_json(&result)?;
            } else {
                print!("{}", render_aggregate(&result));
            }
        }
        Commands::Stats {
            course_syllabus_id,
            exam_period_id,
            json,
        } => {
            let client = PortalClient::restore(&dir).await?;
            let payload = client
                .grade_distribution(&course_syllabus_id, &exam_period_id)
                .await?;
            let samples = distribution_from_value(&payload);
            let stats = DistributionStats::from_samples(&samples);

            if json {
                print_json(&stats)?;
            } else {
                print!("{}", render_distribution(&stats));
            }
        }
        Commands::Watch {
            interval_minutes,
            samples,
        } => {
            let interval = interval_minutes
                .unwrap_or_else(|| settings.refresh_minutes())
                .max(MIN_REFRESH_MINUTES);
            watch(&dir, &settings, interval, samples).await?;
        }
        Commands::Logout => {
            PortalClient::logout(&dir);
            info!("Session forgotten");
        }
    }

    Ok(())
}

fn aggregate_options(settings: &Settings) -> AggregateOptions {
    AggregateOptions {
        failure_keywords: settings.failure_keywords.clone(),
    }
}

/// One full refresh: fetch, normalize, aggregate.
async fn fetch_aggregate(client: &impl StudentApi, settings: &Settings) -> Result<AggregateResult> {
    let payload = client.grades().await?;
    let records = records_from_value(&payload);
    Ok(aggregate(&records, &aggregate_options(settings)))
}

/// Polls the portal at a fixed interval, diffing each fetch against the
/// previous one and reporting newly published grades. A failed fetch keeps
/// the last successfully aggregated view.
#[tracing::instrument(skip(dir, settings), fields(interval_minutes = interval, samples))]
async fn watch(dir: &Path, settings: &Settings, interval: u64, samples: usize) -> Result<()> {
    let client = PortalClient::restore(dir).await?;
    let options = aggregate_options(settings);

    if samples == 0 {
        info!(interval_minutes = interval, "Watching indefinitely. Press Ctrl+C to stop.");
    } else {
        info!(interval_minutes = interval, samples, "Starting watch rounds");
    }

    let mut previous: Option<Vec<GradeRecord>> = None;
    let mut sample_count = 0;

    loop {
        if samples > 0 && sample_count >= samples {
            break;
        }
        sample_count += 1;

        match client.grades().await {
            Ok(payload) => {
                let records = records_from_value(&payload);

                if let Some(ref baseline) = previous {
                    for change in diff(baseline, &records) {
                        announce(&change);
                    }
                } else {
                    info!(record_count = records.len(), "Baseline fetch complete");
                }

                // Aggregates are re-derived from scratch on every round
                let result = aggregate(&records, &options);
                info!(
                    round = sample_count,
                    passed = result.summary.passed_count,
                    ects = result.summary.passed_ects,
                    average = result.summary.average,
                    "Grade view refreshed"
                );

                previous = Some(records);
            }
            Err(e) => {
                // Keep the previous view; a later round supersedes this one
                error!(error = %e, "Grade fetch failed, keeping last good view");
            }
        }

        if samples == 0 || sample_count < samples {
            tokio::time::sleep(tokio::time::Duration::from_secs(interval * 60)).await;
        }
    }

    info!("Finished watching");
    Ok(())
}

fn announce(change: &GradeChange) {
    let record = change.record();
    let grade = record
        .grade
        .map(|g| format!("{g:.1}"))
        .unwrap_or_else(|| "--".to_string());

    match change {
        GradeChange::NewCourse { .. } => info!(
            course = %record.course_name,
            code = record.course_code.as_deref().unwrap_or("-"),
            grade = %grade,
            "New course graded"
        ),
        GradeChange::NewAttempt { .. } => warn!(
            course = %record.course_name,
            code = record.course_code.as_deref().unwrap_or("-"),
            grade = %grade,
            period = %record.exam_period,
            "New attempt recorded"
        ),
    }
}
