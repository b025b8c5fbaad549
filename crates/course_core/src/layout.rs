use std::path::{Path, PathBuf};

use crate::Module;

const FALLBACK_NAME: &str = "untitled";

/// Removes characters that are illegal in file names on common platforms and
/// trims surrounding whitespace.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !is_forbidden(*c))
        .collect::<String>()
        .trim()
        .to_string()
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn non_empty(name: String) -> String {
    if name.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        name
    }
}

pub fn course_dir_name(course_title: &str) -> String {
    non_empty(sanitize_filename(course_title))
}

/// `"<ordinal>. <title>"`, ordinal being the 1-based position in the full
/// module list of the course.
pub fn module_dir_name(ordinal: usize, module_title: &str) -> String {
    format!("{ordinal}. {}", sanitize_filename(module_title))
}

pub fn lesson_file_name(lesson_title: &str) -> String {
    format!("{}.md", non_empty(sanitize_filename(lesson_title)))
}

/// Directory layout of one course, derived from its full module list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseLayout {
    course_dir: PathBuf,
    module_dirs: Vec<PathBuf>,
}

impl CourseLayout {
    pub fn new(output_root: &Path, course_title: &str, modules: &[Module]) -> Self {
        let course_dir = output_root.join(course_dir_name(course_title));
        let module_dirs = modules
            .iter()
            .enumerate()
            .map(|(index, module)| course_dir.join(module_dir_name(index + 1, &module.title)))
            .collect();
        Self {
            course_dir,
            module_dirs,
        }
    }

    pub fn course_dir(&self) -> &Path {
        &self.course_dir
    }

    /// All module directories in ordinal order.
    pub fn module_dirs(&self) -> impl Iterator<Item = &Path> {
        self.module_dirs.iter().map(PathBuf::as_path)
    }

    /// Directory of the module at the 1-based `ordinal`.
    pub fn module_dir_at(&self, ordinal: usize) -> Option<&Path> {
        ordinal
            .checked_sub(1)
            .and_then(|index| self.module_dirs.get(index))
            .map(PathBuf::as_path)
    }
}
