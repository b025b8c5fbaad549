use std::collections::BTreeSet;

use course_core::{Course, CourseSelection, ModuleFilter};
use engine_logging::engine_warn;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("empty selection")]
    Empty,
    #[error("`{0}` is not a number or range (use numbers, ranges like 1-10, and commas)")]
    Malformed(String),
    #[error("`{0}` is out of range (numbers start at 1)")]
    BelowOne(String),
    #[error("`{part}` is out of range (valid: 1-{max})")]
    OutOfRange { part: String, max: usize },
    #[error("`{0}` is not a valid range")]
    Backwards(String),
    #[error("nothing to download: pass --courses <RANGES> or --all")]
    NothingSelected,
}

/// Upper bound for module ordinals, which are parsed before the module list
/// is known.
pub const MAX_MODULE_ORDINAL: usize = 1000;

/// Parses `"1-10, 15, 16-19"` into 1-based numbers, each within `1..=max`.
pub fn parse_ranges(input: &str, max: usize) -> Result<BTreeSet<usize>, SelectionError> {
    if input.trim().is_empty() {
        return Err(SelectionError::Empty);
    }

    let mut selected = BTreeSet::new();
    for part in input.split(',').map(str::trim) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (number(start, part)?, number(end, part)?),
            None => {
                let single = number(part, part)?;
                (single, single)
            }
        };
        if start > end {
            return Err(SelectionError::Backwards(part.to_string()));
        }
        if start < 1 {
            return Err(SelectionError::BelowOne(part.to_string()));
        }
        if end > max {
            return Err(SelectionError::OutOfRange {
                part: part.to_string(),
                max,
            });
        }
        selected.extend(start..=end);
    }
    Ok(selected)
}

/// Like [`parse_ranges`], bounded by [`MAX_MODULE_ORDINAL`]. Ordinals past
/// the end of a course simply match nothing.
pub fn parse_ordinals(input: &str) -> Result<BTreeSet<usize>, SelectionError> {
    parse_ranges(input, MAX_MODULE_ORDINAL)
}

fn number(text: &str, part: &str) -> Result<usize, SelectionError> {
    text.trim()
        .parse()
        .map_err(|_| SelectionError::Malformed(part.to_string()))
}

/// Turns the selection flags into the course list handed to the engine.
///
/// `"0"` or `--all` takes the whole catalog. Module ranges only apply when
/// exactly one course is selected; bulk selections always take every module.
pub fn select_courses(
    catalog: &[Course],
    courses: Option<&str>,
    all: bool,
    modules: Option<&str>,
) -> Result<Vec<CourseSelection>, SelectionError> {
    let chosen: Vec<Course> = match courses.map(str::trim) {
        _ if all => catalog.to_vec(),
        Some("0") => catalog.to_vec(),
        Some(ranges) => parse_ranges(ranges, catalog.len())?
            .into_iter()
            .map(|number| catalog[number - 1].clone())
            .collect(),
        None => return Err(SelectionError::NothingSelected),
    };

    let filter = match modules {
        Some(ranges) if chosen.len() == 1 => ModuleFilter::Ordinals(parse_ordinals(ranges)?),
        Some(_) => {
            engine_warn!(
                "--modules ignored: {} courses selected, downloading all their modules",
                chosen.len()
            );
            ModuleFilter::All
        }
        None => ModuleFilter::All,
    };

    Ok(chosen
        .into_iter()
        .map(|course| CourseSelection {
            course,
            modules: filter.clone(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use course_core::{Course, ModuleFilter};

    use super::{
        parse_ordinals, parse_ranges, select_courses, SelectionError, MAX_MODULE_ORDINAL,
    };

    fn catalog(size: usize) -> Vec<Course> {
        (1..=size)
            .map(|n| Course {
                slug: format!("course-{n}"),
                title: format!("Course {n}"),
                id: None,
            })
            .collect()
    }

    #[test]
    fn ranges_and_numbers_combine() {
        let parsed = parse_ranges("1-3, 7, 2 - 4", 10).unwrap();
        assert_eq!(parsed, BTreeSet::from([1, 2, 3, 4, 7]));
    }

    #[test]
    fn bounds_are_enforced() {
        assert_eq!(parse_ranges("0", 5), Err(SelectionError::BelowOne("0".into())));
        assert_eq!(parse_ordinals("0-2"), Err(SelectionError::BelowOne("0-2".into())));
        assert!(matches!(
            parse_ranges("4-6", 5),
            Err(SelectionError::OutOfRange { .. })
        ));
        assert_eq!(
            parse_ranges("5-2", 9),
            Err(SelectionError::Backwards("5-2".into()))
        );
    }

    #[test]
    fn garbage_is_rejected() {
        assert_eq!(parse_ranges("  ", 3), Err(SelectionError::Empty));
        assert_eq!(
            parse_ranges("1,,2", 3),
            Err(SelectionError::Malformed("".into()))
        );
        assert_eq!(
            parse_ranges("one", 3),
            Err(SelectionError::Malformed("one".into()))
        );
    }

    #[test]
    fn ordinals_are_capped() {
        assert_eq!(parse_ordinals("12, 40").unwrap(), BTreeSet::from([12, 40]));
        assert_eq!(
            parse_ordinals("1-99999999999"),
            Err(SelectionError::OutOfRange {
                part: "1-99999999999".into(),
                max: MAX_MODULE_ORDINAL,
            })
        );
    }

    #[test]
    fn courses_are_picked_in_catalog_order() {
        let selections = select_courses(&catalog(5), Some("4, 2"), false, None).unwrap();
        let slugs: Vec<_> = selections.iter().map(|s| s.course.slug.as_str()).collect();
        assert_eq!(slugs, vec!["course-2", "course-4"]);
    }

    #[test]
    fn zero_or_all_takes_everything() {
        assert_eq!(select_courses(&catalog(3), Some("0"), false, None).unwrap().len(), 3);
        assert_eq!(select_courses(&catalog(3), None, true, None).unwrap().len(), 3);
        assert_eq!(
            select_courses(&catalog(3), None, false, None),
            Err(SelectionError::NothingSelected)
        );
    }

    #[test]
    fn module_filter_applies_to_single_course_only() {
        let single = select_courses(&catalog(3), Some("2"), false, Some("1,3")).unwrap();
        assert_eq!(single[0].modules, ModuleFilter::Ordinals(BTreeSet::from([1, 3])));

        let bulk = select_courses(&catalog(3), Some("1-2"), false, Some("1")).unwrap();
        assert!(bulk.iter().all(|s| s.modules == ModuleFilter::All));
    }
}
