use std::collections::BTreeSet;

use crate::Course;

/// Which modules of a selected course to process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModuleFilter {
    #[default]
    All,
    /// 1-based ordinals within the full module list.
    Ordinals(BTreeSet<usize>),
}

impl ModuleFilter {
    pub fn includes(&self, ordinal: usize) -> bool {
        match self {
            ModuleFilter::All => true,
            ModuleFilter::Ordinals(ordinals) => ordinals.contains(&ordinal),
        }
    }
}

/// A course plus its module filter, already resolved by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseSelection {
    pub course: Course,
    pub modules: ModuleFilter,
}

impl CourseSelection {
    pub fn all_modules(course: Course) -> Self {
        Self {
            course,
            modules: ModuleFilter::All,
        }
    }
}
