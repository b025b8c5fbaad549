use std::path::Path;
use std::sync::Arc;

use course_core::{
    lesson_file_name, reconcile, Course, CourseLayout, CourseSelection, Lesson, LessonAction,
    LessonOutcome, Module, ProgressLedger, RunReport, UnitId,
};
use engine_logging::{engine_debug, engine_error, engine_info, engine_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::EngineConfig;
use crate::crawler::Crawler;
use crate::ledger_store::LedgerStore;
use crate::materialize::{Materialized, Materializer};
use crate::normalize::Normalizer;
use crate::persist::{ensure_dir, write_atomic, PersistError};
use crate::transport::Transport;
use crate::types::{IngestEvent, NoopProgressSink, ProgressSink};

/// Failures that abort a run. Everything else is scoped to a course, lesson
/// or resource and ends up in the report.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot persist output: {0}")]
    Persist(#[from] PersistError),
}

/// Drives a full ingestion run: crawl, reconcile, normalize, materialize,
/// write, record.
pub struct Ingestor {
    config: EngineConfig,
    crawler: Crawler,
    normalizer: Normalizer,
    materializer: Materializer,
    ledger: LedgerStore,
    sink: Arc<dyn ProgressSink>,
    cancel: CancellationToken,
}

/// The course a lesson belongs to, as seen while walking it.
struct CourseContext<'a> {
    slug: &'a str,
    title: &'a str,
    id: &'a UnitId,
}

impl Ingestor {
    pub fn new(config: EngineConfig, transport: Arc<dyn Transport>) -> Self {
        let crawler = Crawler::new(transport.clone(), config.api_base.clone(), config.page_size);
        let normalizer = Normalizer::new(config.site_base.clone());
        let materializer = Materializer::new(transport);
        let ledger = LedgerStore::load(config.progress_file.clone(), config.clock.clone());
        Self {
            config,
            crawler,
            normalizer,
            materializer,
            ledger,
            sink: Arc::new(NoopProgressSink),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Cancelling the token stops the run after the lesson in flight.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn ledger(&self) -> &ProgressLedger {
        self.ledger.ledger()
    }

    pub async fn list_courses(&self) -> Vec<Course> {
        self.crawler.list_courses().await
    }

    pub async fn run(&mut self, selections: &[CourseSelection]) -> Result<RunReport, IngestError> {
        ensure_dir(&self.config.output_dir)?;

        let mut report = RunReport {
            selected_courses: selections
                .iter()
                .map(|selection| selection.course.title.clone())
                .collect(),
            ..RunReport::default()
        };

        for selection in selections {
            if self.stop_requested(&mut report) {
                break;
            }
            self.ingest_course(selection, &mut report).await?;
            if report.interrupted {
                break;
            }
        }

        engine_info!(
            "Run finished: {} downloaded, {} refetched, {} skipped, {} repaired, {} without content, {} failed",
            report.downloaded,
            report.refetched,
            report.skipped,
            report.repaired,
            report.no_content,
            report.failed
        );
        Ok(report)
    }

    async fn ingest_course(
        &mut self,
        selection: &CourseSelection,
        report: &mut RunReport,
    ) -> Result<(), IngestError> {
        let course = &selection.course;
        self.sink.emit(IngestEvent::CourseStarted {
            slug: course.slug.clone(),
            title: course.title.clone(),
        });

        let Some(details) = self.crawler.course_details(&course.slug).await else {
            engine_warn!("Skipping course {}: details unavailable", course.slug);
            report.unavailable_courses.push(course.title.clone());
            return Ok(());
        };

        let layout = CourseLayout::new(&self.config.output_dir, &course.title, &details.modules);
        ensure_dir(layout.course_dir())?;
        for dir in layout.module_dirs() {
            ensure_dir(dir)?;
        }

        let context = CourseContext {
            slug: &course.slug,
            title: &course.title,
            id: &details.id,
        };

        for (index, module) in details.modules.iter().enumerate() {
            let ordinal = index + 1;
            if !selection.modules.includes(ordinal) {
                continue;
            }
            let Some(module_dir) = layout.module_dir_at(ordinal) else {
                continue;
            };
            if self.stop_requested(report) {
                return Ok(());
            }
            engine_info!(
                "Processing module {}: {} ({} lessons)",
                ordinal,
                module.title,
                module.lessons_count.map_or(module.lessons.len(), |count| count as usize)
            );

            for lesson in &module.lessons {
                if self.stop_requested(report) {
                    return Ok(());
                }
                let outcome = self
                    .ingest_lesson(&context, module, module_dir, lesson)
                    .await?;
                report.record(&outcome);
                self.sink.emit(IngestEvent::LessonFinished {
                    lesson_id: lesson.id.clone(),
                    title: lesson.title.clone(),
                    outcome,
                });
            }

            self.record_module_completion(&context, module)?;
        }
        Ok(())
    }

    async fn ingest_lesson(
        &mut self,
        course: &CourseContext<'_>,
        module: &Module,
        module_dir: &Path,
        lesson: &Lesson,
    ) -> Result<LessonOutcome, IngestError> {
        let artifact = module_dir.join(lesson_file_name(&lesson.title));
        let completed = self.ledger.is_completed(course.slug, &module.id, &lesson.id);

        let action = reconcile(artifact.exists(), completed);
        match action {
            LessonAction::Skip {
                repair_ledger: false,
            } => {
                engine_debug!("Skipping existing lesson: {}", lesson.title);
                return Ok(LessonOutcome::Skipped);
            }
            LessonAction::Skip {
                repair_ledger: true,
            } => {
                self.ledger
                    .mark_completed(course.slug, course.title, &module.id, &lesson.id)?;
                engine_info!("Recorded existing lesson in progress: {}", lesson.title);
                return Ok(LessonOutcome::Repaired);
            }
            LessonAction::Refetch => {
                engine_info!("Re-downloading missing lesson: {}", lesson.title);
            }
            LessonAction::Fetch => {
                engine_info!("Downloading lesson: {} ({})", lesson.title, lesson.kind_or_unknown());
            }
        }

        let content = match self.crawler.lesson_content(&lesson.id, course.id).await {
            Ok(content) => content,
            Err(err) => {
                engine_error!("Failed to fetch lesson {}: {}", lesson.title, err);
                return Ok(LessonOutcome::Failed {
                    reason: err.to_string(),
                });
            }
        };
        let Some(body) = content.body() else {
            match content.video_url.as_deref() {
                Some(video) => engine_info!("Lesson {} is video only ({})", lesson.title, video),
                None => engine_info!("Lesson {} has no content", lesson.title),
            }
            return Ok(LessonOutcome::NoContent);
        };

        let normalized = self.normalizer.normalize(&lesson.title, body);
        let mut downloaded = 0;
        for request in &normalized.resources {
            let destination = module_dir.join(&request.file_name);
            match self
                .materializer
                .fetch(&request.url, &destination, self.sink.as_ref())
                .await
            {
                Ok(Materialized::Downloaded { .. }) => downloaded += 1,
                Ok(Materialized::AlreadyPresent) => {}
                Err(err) => engine_warn!("Resource {} not saved: {}", request.file_name, err),
            }
        }

        write_atomic(&artifact, &normalized.markdown)?;
        self.ledger
            .mark_completed(course.slug, course.title, &module.id, &lesson.id)?;
        engine_info!("Saved {}", artifact.display());

        Ok(match action {
            LessonAction::Refetch => LessonOutcome::Refetched {
                resources: downloaded,
            },
            _ => LessonOutcome::Downloaded {
                resources: downloaded,
            },
        })
    }

    fn record_module_completion(
        &mut self,
        course: &CourseContext<'_>,
        module: &Module,
    ) -> Result<(), IngestError> {
        let all_done = !module.lessons.is_empty()
            && module
                .lessons
                .iter()
                .all(|lesson| self.ledger.is_completed(course.slug, &module.id, &lesson.id));
        if all_done
            && self
                .ledger
                .mark_module_completed(course.slug, course.title, &module.id)?
        {
            engine_info!("Module completed: {}", module.title);
        }
        Ok(())
    }

    fn stop_requested(&self, report: &mut RunReport) -> bool {
        if self.cancel.is_cancelled() {
            if !report.interrupted {
                engine_warn!("Cancellation requested, stopping");
            }
            report.interrupted = true;
        }
        report.interrupted
    }
}
