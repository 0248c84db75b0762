//! Progress bar for batch runs.

use std::sync::Arc;
use std::time::Duration;

use akakce_search_core::events::{EventSink, RunEvent};
use indicatif::{ProgressBar, ProgressStyle};

/// Forwards events to `inner` and mirrors batch progress on a progress bar.
pub(crate) struct ProgressEventSink {
    inner: Arc<dyn EventSink>,
    bar: ProgressBar,
}

impl ProgressEventSink {
    pub(crate) fn new(inner: Arc<dyn EventSink>) -> Self {
        Self::with_bar(inner, ProgressBar::new(0))
    }

    fn with_bar(inner: Arc<dyn EventSink>, bar: ProgressBar) -> Self {
        bar.set_style(
            ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { inner, bar }
    }

    fn update(&self, event: &RunEvent) {
        match event {
            RunEvent::BatchStarted { total } => {
                self.bar.set_length(*total as u64);
                self.bar.set_position(0);
                self.bar.enable_steady_tick(Duration::from_millis(120));
            }
            RunEvent::QueryStarted { query, .. } => {
                self.bar.set_message(format!("Searching {query}"));
            }
            RunEvent::RateLimited { wait, .. } => {
                self.bar
                    .set_message(format!("Rate limited, waiting {}s", wait.as_secs()));
            }
            RunEvent::RetriesExhausted { cooldown, .. } => {
                self.bar.set_message(format!(
                    "Rate limited, cooling down {}s before next query",
                    cooldown.as_secs()
                ));
            }
            RunEvent::Matched { .. } | RunEvent::NoMatch { .. } => self.bar.inc(1),
            RunEvent::BatchFinished { .. } => self.bar.finish_and_clear(),
            RunEvent::CandidateSeen { .. } | RunEvent::ProviderFailed { .. } => {}
        }
    }
}

impl EventSink for ProgressEventSink {
    fn emit(&self, event: &RunEvent) {
        self.bar.suspend(|| self.inner.emit(event));
        self.update(event);
    }
}

/// Wraps `inner` with a progress bar when `use_progress` is set.
pub(crate) fn wrap_with_progress(
    inner: Arc<dyn EventSink>,
    use_progress: bool,
) -> Arc<dyn EventSink> {
    if use_progress {
        Arc::new(ProgressEventSink::new(inner))
    } else {
        inner
    }
}
