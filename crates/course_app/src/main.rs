//! CLI entry point for the course harvester.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use course_core::{Course, CourseSelection};
use course_engine::{Ingestor, ReqwestTransport};
use engine_logging::{engine_debug, engine_info};
use tokio_util::sync::CancellationToken;

mod auth;
mod cli;
mod interrupt;
mod progress;
mod report;
mod selection;
mod settings;

use cli::Args;
use progress::TerminalProgress;
use settings::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse first so --help works without logger setup.
    let args = Args::parse();
    engine_logging::initialize(
        engine_logging::level_from_verbosity(args.verbose, args.quiet),
        args.log_file.as_deref(),
    );
    engine_debug!("CLI arguments parsed: list={} all={}", args.list, args.all);

    let settings = Settings::load(&args.config);
    let cookie_file = args
        .cookie_file
        .clone()
        .unwrap_or_else(|| settings.cookie_file.clone());
    let token = auth::resolve_token(args.token.as_deref(), &cookie_file)?;

    let transport = ReqwestTransport::new(settings.transport_settings(token))
        .context("cannot build the HTTP client")?;
    let config = settings.engine_config(
        args.output.clone().unwrap_or_else(|| settings.output_dir.clone()),
        args.progress_file
            .clone()
            .unwrap_or_else(|| settings.progress_file.clone()),
    )?;

    let cancel = CancellationToken::new();
    interrupt::spawn_handler(cancel.clone());

    let mut ingestor = Ingestor::new(config, Arc::new(transport))
        .with_progress_sink(Arc::new(TerminalProgress::new(!args.quiet)))
        .with_cancellation(cancel);

    engine_info!("Fetching course list...");
    let catalog = ingestor.list_courses().await;
    if catalog.is_empty() {
        bail!("no courses found; check that the session token is valid");
    }

    if args.list {
        print_catalog(&catalog);
        return Ok(());
    }

    let selections = selection::select_courses(
        &catalog,
        args.courses.as_deref(),
        args.all,
        args.modules.as_deref(),
    )?;
    engine_info!("Selected {} of {} courses", selections.len(), catalog.len());

    let report = ingestor
        .run(&selections)
        .await
        .context("download aborted")?;

    if !args.quiet {
        let typed = if args.all {
            "all"
        } else {
            args.courses.as_deref().unwrap_or_default()
        };
        print!(
            "{}",
            report::render_summary(typed, &report, &catalog_numbers(&catalog, &selections))
        );
    }
    Ok(())
}

fn print_catalog(catalog: &[Course]) {
    println!("Found {} courses.\n", catalog.len());
    for (index, course) in catalog.iter().enumerate() {
        println!("{:>4}. {}", index + 1, course.title);
    }
}

/// 1-based catalog position of each selected course.
fn catalog_numbers(catalog: &[Course], selections: &[CourseSelection]) -> Vec<usize> {
    selections
        .iter()
        .filter_map(|selection| {
            catalog
                .iter()
                .position(|course| course.slug == selection.course.slug)
                .map(|index| index + 1)
        })
        .collect()
}
