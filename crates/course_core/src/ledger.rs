use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::UnitId;

/// Per-course section of the progress file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CourseProgress {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub completed_modules: Vec<String>,
    /// Module id -> completed lesson ids, in completion order.
    #[serde(default)]
    pub completed_lessons: BTreeMap<String, Vec<String>>,
}

/// In-memory progress ledger, serialized verbatim as the progress file.
///
/// Markers are only ever added. Persistence lives in the engine; this type is
/// the pure state it reads and rewrites.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressLedger {
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub courses: BTreeMap<String, CourseProgress>,
}

impl ProgressLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_completed(&self, course_slug: &str, module_id: &UnitId, lesson_id: &UnitId) -> bool {
        self.courses
            .get(course_slug)
            .and_then(|course| course.completed_lessons.get(module_id.as_str()))
            .is_some_and(|lessons| lessons.iter().any(|id| id == lesson_id.as_str()))
    }

    pub fn is_module_completed(&self, course_slug: &str, module_id: &UnitId) -> bool {
        self.courses
            .get(course_slug)
            .is_some_and(|course| course.completed_modules.iter().any(|id| id == module_id.as_str()))
    }

    /// Records a completed lesson. Returns `true` when the ledger changed.
    pub fn mark_completed(
        &mut self,
        course_slug: &str,
        course_title: &str,
        module_id: &UnitId,
        lesson_id: &UnitId,
    ) -> bool {
        let course = self.course_entry(course_slug, course_title);
        let lessons = course
            .completed_lessons
            .entry(module_id.to_string())
            .or_default();
        if lessons.iter().any(|id| id == lesson_id.as_str()) {
            return false;
        }
        lessons.push(lesson_id.to_string());
        true
    }

    /// Records a module whose lessons are all completed. Returns `true` when
    /// the ledger changed.
    pub fn mark_module_completed(
        &mut self,
        course_slug: &str,
        course_title: &str,
        module_id: &UnitId,
    ) -> bool {
        let course = self.course_entry(course_slug, course_title);
        if course.completed_modules.iter().any(|id| id == module_id.as_str()) {
            return false;
        }
        course.completed_modules.push(module_id.to_string());
        true
    }

    pub fn stamp(&mut self, timestamp: impl Into<String>) {
        self.last_updated = Some(timestamp.into());
    }

    pub fn completed_lesson_count(&self) -> usize {
        self.courses
            .values()
            .flat_map(|course| course.completed_lessons.values())
            .map(Vec::len)
            .sum()
    }

    fn course_entry(&mut self, course_slug: &str, course_title: &str) -> &mut CourseProgress {
        self.courses
            .entry(course_slug.to_string())
            .or_insert_with(|| CourseProgress {
                title: course_title.to_string(),
                ..CourseProgress::default()
            })
    }
}
