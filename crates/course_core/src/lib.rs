//! Course core: data model, progress ledger state and pure pipeline decisions.
mod layout;
mod ledger;
mod model;
mod reconcile;
mod report;
mod selection;

pub use layout::{course_dir_name, lesson_file_name, module_dir_name, sanitize_filename, CourseLayout};
pub use ledger::{CourseProgress, ProgressLedger};
pub use model::{
    Course, CourseDetails, CoursePage, Lesson, LessonContent, Module, PageMetadata, UnitId,
};
pub use reconcile::{reconcile, LessonAction};
pub use report::{LessonOutcome, RunReport};
pub use selection::{CourseSelection, ModuleFilter};
