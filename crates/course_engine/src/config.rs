use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://learn-api.kodekloud.com/api";
pub const DEFAULT_SITE_BASE: &str = "https://kodekloud.com";
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const PROGRESS_FILENAME: &str = "progress.json";

/// Produces the timestamp stamped into the progress file on every save.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

#[derive(Clone)]
pub struct EngineConfig {
    /// Root of the JSON API (`/courses`, `/lessons`).
    pub api_base: Url,
    /// Base for relative resource references found in lesson content.
    pub site_base: Url,
    pub output_dir: PathBuf,
    pub progress_file: PathBuf,
    pub page_size: u32,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn new(api_base: Url, site_base: Url, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        Self {
            api_base,
            site_base,
            progress_file: output_dir.join(PROGRESS_FILENAME),
            output_dir,
            page_size: DEFAULT_PAGE_SIZE,
            clock: Arc::new(utc_timestamp),
        }
    }

    #[allow(clippy::expect_used)]
    pub fn default_with_output(output_dir: impl Into<PathBuf>) -> Self {
        // Static URLs, always valid.
        let api_base = Url::parse(DEFAULT_API_BASE).expect("default api base is valid");
        let site_base = Url::parse(DEFAULT_SITE_BASE).expect("default site base is valid");
        Self::new(api_base, site_base, output_dir)
    }
}

impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("api_base", &self.api_base.as_str())
            .field("site_base", &self.site_base.as_str())
            .field("output_dir", &self.output_dir)
            .field("progress_file", &self.progress_file)
            .field("page_size", &self.page_size)
            .finish_non_exhaustive()
    }
}

/// ISO-8601 UTC with microseconds and a `Z` suffix.
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
