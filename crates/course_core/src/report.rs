/// Result of processing one lesson unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LessonOutcome {
    /// Artifact written and ledger marked.
    Downloaded { resources: usize },
    /// Artifact was missing despite a ledger entry and has been rebuilt.
    Refetched { resources: usize },
    /// Artifact already on disk.
    Skipped,
    /// Artifact already on disk; the ledger entry was missing and got added.
    Repaired,
    /// No content to write (e.g. video-only lesson). Not marked.
    NoContent,
    /// Fetch or parse failure. Not marked.
    Failed { reason: String },
}

/// Summary of a run.
///
/// `selected_courses` lists what was asked for, the counters what actually
/// happened.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunReport {
    pub selected_courses: Vec<String>,
    pub unavailable_courses: Vec<String>,
    pub downloaded: usize,
    pub refetched: usize,
    pub skipped: usize,
    pub repaired: usize,
    pub no_content: usize,
    pub failed: usize,
    pub resources: usize,
    pub interrupted: bool,
}

impl RunReport {
    pub fn record(&mut self, outcome: &LessonOutcome) {
        match outcome {
            LessonOutcome::Downloaded { resources } => {
                self.downloaded += 1;
                self.resources += resources;
            }
            LessonOutcome::Refetched { resources } => {
                self.refetched += 1;
                self.resources += resources;
            }
            LessonOutcome::Skipped => self.skipped += 1,
            LessonOutcome::Repaired => self.repaired += 1,
            LessonOutcome::NoContent => self.no_content += 1,
            LessonOutcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn lessons_seen(&self) -> usize {
        self.downloaded + self.refetched + self.skipped + self.repaired + self.no_content + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::{LessonOutcome, RunReport};

    #[test]
    fn outcomes_land_in_their_counters() {
        let mut report = RunReport::default();
        report.record(&LessonOutcome::Downloaded { resources: 2 });
        report.record(&LessonOutcome::Refetched { resources: 1 });
        report.record(&LessonOutcome::Skipped);
        report.record(&LessonOutcome::Repaired);
        report.record(&LessonOutcome::NoContent);
        report.record(&LessonOutcome::Failed {
            reason: "http status 500".into(),
        });

        assert_eq!(report.downloaded, 1);
        assert_eq!(report.refetched, 1);
        assert_eq!(report.resources, 3);
        assert_eq!(report.failed, 1);
        assert_eq!(report.lessons_seen(), 6);
    }
}
