// Tracing log adapter - Run notifications rendered as structured tracing events

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::domain::model::*;
use crate::ports::*;
use crate::utils::Utils;

/// Notifier that forwards run events to the `tracing` subscriber
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier {
    /// Log a line per finished segment instead of only failures and phases
    verbose_progress: bool,
}

impl TracingNotifier {
    /// Create new tracing notifier
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.verbose_progress = enabled;
        self
    }
}

#[async_trait]
impl NotifierPort for TracingNotifier {
    async fn notify(&self, event: &RunEvent) {
        match event {
            RunEvent::PhaseChanged { from, to } => match to {
                RunPhase::Completed => info!(%from, "Split completed"),
                RunPhase::Aborted => error!(%from, "Split aborted"),
                _ => debug!(%from, %to, "Phase changed"),
            },
            RunEvent::Planned {
                segments,
                chunk_size,
                total_duration,
            } => {
                info!(
                    segments,
                    chunk = chunk_size.seconds(),
                    duration = total_duration.seconds(),
                    "Splitting video into {} pieces of {} videos",
                    segments,
                    chunk_size
                );
            }
            RunEvent::SegmentCompleted {
                index,
                output,
                completed,
                total,
            } => {
                if self.verbose_progress {
                    info!(
                        index,
                        output = %output.display(),
                        "[{}/{}] {:.0}% segment written",
                        completed,
                        total,
                        Utils::calculate_progress(*completed, *total)
                    );
                } else {
                    debug!(index, output = %output.display(), completed, total, "Segment written");
                }
            }
            RunEvent::SegmentFailed { index, message } => {
                warn!(index, "An error occurred on trim {}: {}", index, message);
            }
        }
    }
}
