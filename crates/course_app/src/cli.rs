//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use crate::settings::DEFAULT_SETTINGS_FILE;

/// Mirror KodeKloud courses into a local Markdown library.
///
/// Lessons are written as Markdown files next to their images and PDFs,
/// one directory per module. Progress is recorded so that re-runs only
/// fetch what is missing.
#[derive(Parser, Debug)]
#[command(name = "course-harvester")]
#[command(author, version, about)]
pub struct Args {
    /// Session token (the value of the `session-cookie` cookie)
    #[arg(long, env = "COURSE_HARVESTER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Netscape cookie file holding the session token [default: cookie.txt]
    #[arg(long, value_name = "PATH")]
    pub cookie_file: Option<PathBuf>,

    /// Print the numbered course catalog and exit
    #[arg(long)]
    pub list: bool,

    /// Courses to download by catalog number, e.g. "1-10, 15"
    #[arg(long, value_name = "RANGES", conflicts_with = "all")]
    pub courses: Option<String>,

    /// Download every course in the catalog
    #[arg(long)]
    pub all: bool,

    /// Module numbers to download when a single course is selected
    #[arg(long, value_name = "RANGES")]
    pub modules: Option<String>,

    /// Root directory for downloaded courses
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Progress file recording completed lessons
    #[arg(long, value_name = "PATH")]
    pub progress_file: Option<PathBuf>,

    /// Settings file (RON)
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SETTINGS_FILE)]
    pub config: PathBuf,

    /// Also write log output to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::Args;

    #[test]
    fn defaults_parse() {
        let args = Args::try_parse_from(["course-harvester"]).unwrap();
        assert!(!args.list);
        assert!(!args.all);
        assert_eq!(args.courses, None);
        assert_eq!(args.config, PathBuf::from("harvester.ron"));
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn selection_flags_parse() {
        let args = Args::try_parse_from([
            "course-harvester",
            "--courses",
            "1-3, 7",
            "--modules",
            "2",
            "-o",
            "library",
        ])
        .unwrap();
        assert_eq!(args.courses.as_deref(), Some("1-3, 7"));
        assert_eq!(args.modules.as_deref(), Some("2"));
        assert_eq!(args.output, Some(PathBuf::from("library")));
    }

    #[test]
    fn courses_and_all_conflict() {
        let err = Args::try_parse_from(["course-harvester", "--all", "--courses", "1"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn verbosity_counts() {
        let args = Args::try_parse_from(["course-harvester", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        let args = Args::try_parse_from(["course-harvester", "--quiet"]).unwrap();
        assert!(args.quiet);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        let err = Args::try_parse_from(["course-harvester", "--search", "k8s"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
