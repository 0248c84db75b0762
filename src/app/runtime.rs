use std::io::{self, IsTerminal};
use std::sync::Arc;

use akakce_search_core::batch::{BatchStats, QueryBatchOrchestrator};
use akakce_search_core::clock::{Sleeper, TokioSleeper};
use akakce_search_core::events::{EventSink, TracingEventSink};
use akakce_search_core::resolver::SearchResolver;
use akakce_search_core::search::{DuckDuckGoProvider, SearchProvider};
use akakce_search_core::table::{load_queries, write_records};
use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use crate::app::config_manager::{self, RunSettings, Verbosity};
use crate::app::{progress_manager, terminal};
use crate::cli::Args;

pub(crate) async fn run() -> Result<()> {
    // Parse before tracing so --help and --version print without log noise.
    let args = Args::parse();
    let settings = config_manager::resolve_config(args)?;

    let no_color = terminal::is_no_color_requested(settings.no_color);
    let _log_guard = terminal::init_tracing(
        settings.verbosity.level(),
        no_color,
        &settings.log_file,
    )?;

    debug!(?settings, "Settings resolved");
    if let Some(path) = &settings.config_path {
        info!(path = %path.display(), "Loaded config file");
    }
    info!(path = %settings.input.display(), "Selected input file");

    run_batch(&settings).await
}

async fn run_batch(settings: &RunSettings) -> Result<()> {
    let sheet = load_queries(&settings.input)
        .with_context(|| format!("Failed to load queries from '{}'", settings.input.display()))?;
    info!(column = %sheet.column, "Reading queries from {}", sheet.column);

    let provider: Arc<dyn SearchProvider> = Arc::new(
        DuckDuckGoProvider::new(&settings.proxy).context("Failed to build search client")?,
    );
    if !settings.proxy.is_empty() {
        info!(
            http = settings.proxy.http.as_deref().unwrap_or("-"),
            https = settings.proxy.https.as_deref().unwrap_or("-"),
            "Using proxy"
        );
    }

    let use_progress = terminal::should_use_progress(
        io::stderr().is_terminal(),
        settings.verbosity == Verbosity::Quiet,
        settings.no_progress,
        terminal::is_dumb_terminal(),
    );
    let events = progress_manager::wrap_with_progress(Arc::new(TracingEventSink), use_progress);
    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);

    let resolver = SearchResolver::new(provider, Arc::clone(&sleeper), Arc::clone(&events))
        .with_policy(settings.policy)
        .with_result_cap(settings.result_cap);
    let orchestrator =
        QueryBatchOrchestrator::new(resolver, sleeper, events).with_throttle(settings.throttle);

    let records = orchestrator.run(&sheet.queries).await;

    write_records(&settings.output, &records)
        .with_context(|| format!("Failed to save results to '{}'", settings.output.display()))?;
    info!(path = %settings.output.display(), "Results saved to {}", settings.output.display());

    let stats = BatchStats::from_records(&records);
    info!(
        total = stats.total(),
        matched = stats.matched(),
        unmatched = stats.unmatched(),
        "Summary: {} matched, {} without a link",
        stats.matched(),
        stats.unmatched()
    );
    Ok(())
}
