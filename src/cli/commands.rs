//! Command implementations

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::app::container::{AppContainer, DefaultAppContainer};
use crate::app::split_interactor::SplitRequest;
use crate::cli::args::ValidatedArgs;
use crate::cli::Cli;
use crate::config_initialization::{resolve_settings, SplitterSettings};
use crate::domain::model::{RunResult, RunStatus};
use crate::error::{SplitterError, SplitterResult};
use crate::utils::logging::{LogFormat, LoggingConfig, LoggingSystem};
use crate::utils::Utils;

const BANNER: &str = r"
       _     _                       _ _ _   _
__   _(_) __| | ___  ___        ___ _ __ | (_) |_| |_ ___ _ __
\ \ / / |/ _` |/ _ \/ _ \_____ / __| '_ \| | | __| __/ _ \ '__|
 \ V /| | (_| |  __/ (_) |_____|\__ \ |_) | | | |_| ||  __/ |
  \_/ |_|\__,_|\___|\___/       |___/ .__/|_|_|\__|\__\___|_|
                                    |_|
";

/// Execute the split command
pub async fn split(cli: Cli) -> Result<()> {
    // Validate input before touching configuration or the media engine
    let cwd = std::env::current_dir().map_err(SplitterError::from)?;
    let validated = cli.validate(&cwd).map_err(SplitterError::from)?;
    let overrides = cli.settings_overrides(&validated).map_err(SplitterError::from)?;
    let log_format = cli.log_format().map_err(SplitterError::from)?;

    let settings = resolve_settings(&overrides).await?;

    let logging = LoggingSystem::new(LoggingConfig {
        level: settings.log_level,
        format: log_format,
        timestamps: log_format != LogFormat::Pretty,
        target: false,
    });
    logging.initialize().map_err(SplitterError::from)?;
    logging.log_system_info();
    settings.log_sources();

    if !cli.json {
        println!("{}", BANNER);
    }

    info!("Input: {}", validated.source.display());
    info!("Output: {}", validated.destination_root.display());

    let request = build_request(&cli, &settings, validated);
    let container = build_container(&settings, !cli.json)?;
    let result = container
        .split_interactor()
        .run(request)
        .await
        .map_err(SplitterError::from)?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialize run report to JSON")?;
        println!("{}", json);
    } else {
        display_run_result(&result);
    }

    match result.status {
        RunStatus::Succeeded => {
            info!("Split operation completed successfully");
            Ok(())
        }
        RunStatus::Partial | RunStatus::Aborted => {
            warn!("{} segments failed", result.failures.len());
            Err(SplitterError::SegmentsFailed {
                failed: result.failures.len(),
                attempted: result.segments_attempted,
            }
            .into())
        }
    }
}

fn build_request(cli: &Cli, settings: &SplitterSettings, validated: ValidatedArgs) -> SplitRequest {
    SplitRequest::new(validated.source, validated.destination_root)
        .with_chunk_size(settings.chunk_duration)
        .with_concurrency(settings.concurrency)
        .with_grouping(!cli.no_folder)
        .with_folder_name(settings.folder_name.clone())
        .with_failure_policy(settings.failure_policy())
        .with_dry_run(cli.dry_run)
}

#[cfg(not(feature = "libav"))]
fn build_container(settings: &SplitterSettings, verbose_progress: bool) -> SplitterResult<DefaultAppContainer> {
    Ok(DefaultAppContainer::new(settings.engine_config(), verbose_progress))
}

#[cfg(feature = "libav")]
fn build_container(settings: &SplitterSettings, verbose_progress: bool) -> SplitterResult<DefaultAppContainer> {
    let container = DefaultAppContainer::with_libav_probe(settings.engine_config(), verbose_progress)?;
    Ok(container)
}

/// Display a human-readable run report
fn display_run_result(result: &RunResult) {
    println!("Split Summary");
    println!("=============");
    println!("Source: {}", result.source.display());
    println!("Output: {}", result.output_dir.display());
    println!("Duration: {}", result.total_duration);
    println!("Chunk: {}", result.chunk_size);
    println!();

    if result.dry_run {
        println!("Planned Segments ({}):", result.planned.len());
        for job in &result.planned {
            println!(
                "  [{}] {} +{:.3}s -> {}",
                job.index(),
                job.segment.start_time(),
                job.segment.effective_length(result.total_duration),
                job.destination_path.display()
            );
        }
        println!();
        println!("Dry run: no files were written");
        return;
    }

    println!(
        "Segments: {} planned, {} attempted, {} written",
        result.segments_planned,
        result.segments_attempted,
        result.outputs.len()
    );
    println!("Max concurrent: {}", result.max_in_flight);
    println!("Elapsed: {}", Utils::format_duration(result.elapsed()));

    if !result.failures.is_empty() {
        println!();
        println!("Failures:");
        for failure in &result.failures {
            println!("  ✗ {}", failure);
        }
    }

    println!();
    let status = match result.status {
        RunStatus::Succeeded => "✓ succeeded",
        RunStatus::Partial => "✗ partial",
        RunStatus::Aborted => "✗ aborted",
    };
    println!("Status: {}", status);
}
