//! Terminal progress for resource downloads.

use std::sync::Mutex;

use course_core::LessonOutcome;
use course_engine::{IngestEvent, ProgressSink};
use engine_logging::{engine_debug, engine_info};
use indicatif::{ProgressBar, ProgressStyle};

const BYTES_TEMPLATE: &str = "  {msg} [{bar:30}] {bytes}/{total_bytes} ({bytes_per_sec})";
const SPINNER_TEMPLATE: &str = "  {spinner} {msg} {bytes}";

/// Shows one byte-progress bar per resource download and logs lesson
/// outcomes. Hidden bars are used when output is quiet.
pub struct TerminalProgress {
    enabled: bool,
    current: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            current: Mutex::new(None),
        }
    }

    fn start_bar(&self, file_name: String, total_bytes: Option<u64>) -> ProgressBar {
        if !self.enabled {
            return ProgressBar::hidden();
        }
        let bar = match total_bytes {
            Some(total) => ProgressBar::new(total).with_style(
                ProgressStyle::with_template(BYTES_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            ),
            None => ProgressBar::new_spinner().with_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            ),
        };
        bar.set_message(file_name);
        bar
    }
}

impl ProgressSink for TerminalProgress {
    fn emit(&self, event: IngestEvent) {
        let Ok(mut current) = self.current.lock() else {
            return;
        };
        match event {
            IngestEvent::CourseStarted { title, .. } => {
                engine_info!("Processing course: {}", title);
            }
            IngestEvent::ResourceStarted {
                file_name,
                total_bytes,
            } => {
                if let Some(previous) = current.take() {
                    previous.finish_and_clear();
                }
                *current = Some(self.start_bar(file_name, total_bytes));
            }
            IngestEvent::ResourceProgress { bytes, .. } => {
                if let Some(bar) = current.as_ref() {
                    bar.set_position(bytes);
                }
            }
            IngestEvent::ResourceFinished { .. } => {
                if let Some(bar) = current.take() {
                    bar.finish_and_clear();
                }
            }
            IngestEvent::LessonFinished { title, outcome, .. } => match outcome {
                LessonOutcome::Downloaded { resources } | LessonOutcome::Refetched { resources } => {
                    engine_debug!("Lesson {} done with {} new resource(s)", title, resources);
                }
                LessonOutcome::Failed { reason } => {
                    engine_debug!("Lesson {} failed: {}", title, reason);
                }
                _ => {}
            },
        }
    }
}
