use std::fmt::Write;

use course_core::RunReport;

const RULE_WIDTH: usize = 60;

/// Human-readable end-of-run summary.
///
/// `selection` is echoed back as typed. Selected courses are listed with
/// their catalog numbers, followed by what actually happened.
pub fn render_summary(selection: &str, report: &RunReport, catalog_numbers: &[usize]) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "\n{rule}");
    let _ = writeln!(out, "Download Summary");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Selection: {selection}");
    let _ = writeln!(out, "Courses selected: {}", report.selected_courses.len());
    for (title, number) in report.selected_courses.iter().zip(catalog_numbers) {
        let _ = writeln!(out, "  {number}. {title}");
    }

    let _ = writeln!(out, "\nLessons:");
    let _ = writeln!(out, "  downloaded:  {}", report.downloaded);
    let _ = writeln!(out, "  re-fetched:  {}", report.refetched);
    let _ = writeln!(out, "  up to date:  {}", report.skipped);
    let _ = writeln!(out, "  recorded:    {}", report.repaired);
    let _ = writeln!(out, "  no content:  {}", report.no_content);
    let _ = writeln!(out, "  failed:      {}", report.failed);
    let _ = writeln!(out, "Resources downloaded: {}", report.resources);

    if !report.unavailable_courses.is_empty() {
        let _ = writeln!(out, "\nUnavailable courses:");
        for title in &report.unavailable_courses {
            let _ = writeln!(out, "  {title}");
        }
    }

    let _ = writeln!(out, "{rule}");
    if report.interrupted {
        let _ = writeln!(out, "Interrupted; run again to resume.");
    } else if report.failed > 0 {
        let _ = writeln!(out, "Finished with {} failed lesson(s).", report.failed);
    } else {
        let _ = writeln!(out, "All downloads completed!");
    }
    out
}

#[cfg(test)]
mod tests {
    use course_core::RunReport;

    use super::render_summary;

    #[test]
    fn summary_lists_selection_and_counts() {
        let report = RunReport {
            selected_courses: vec!["Docker".into(), "Helm".into()],
            unavailable_courses: vec!["Helm".into()],
            downloaded: 4,
            skipped: 2,
            resources: 7,
            ..RunReport::default()
        };
        let text = render_summary("3, 9", &report, &[3, 9]);

        assert!(text.contains("Selection: 3, 9"));
        assert!(text.contains("  3. Docker\n"));
        assert!(text.contains("  9. Helm\n"));
        assert!(text.contains("downloaded:  4"));
        assert!(text.contains("up to date:  2"));
        assert!(text.contains("Resources downloaded: 7"));
        assert!(text.contains("Unavailable courses:\n  Helm\n"));
        assert!(text.ends_with("All downloads completed!\n"));
    }

    #[test]
    fn interrupted_runs_say_so() {
        let report = RunReport {
            interrupted: true,
            failed: 1,
            ..RunReport::default()
        };
        assert!(render_summary("1", &report, &[1]).contains("Interrupted"));
    }
}
