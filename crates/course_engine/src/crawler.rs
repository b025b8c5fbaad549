use std::collections::HashSet;
use std::sync::Arc;

use course_core::{Course, CourseDetails, CoursePage, LessonContent, UnitId};
use engine_logging::{engine_debug, engine_info, engine_warn};
use serde::de::DeserializeOwned;
use url::Url;

use crate::transport::Transport;
use crate::{FailureKind, FetchError};

/// Walks the course/module/lesson hierarchy exposed by the API.
pub struct Crawler {
    transport: Arc<dyn Transport>,
    api_base: Url,
    page_size: u32,
}

impl Crawler {
    pub fn new(transport: Arc<dyn Transport>, api_base: Url, page_size: u32) -> Self {
        Self {
            transport,
            api_base,
            page_size,
        }
    }

    /// Fetches the whole catalog page by page.
    ///
    /// Any failure ends the walk early and returns what was collected so far.
    pub async fn list_courses(&self) -> Vec<Course> {
        let mut courses = Vec::new();
        let mut requested = HashSet::new();
        let mut page: u32 = 1;

        loop {
            requested.insert(page);
            let mut url = match self.endpoint(&["courses"]) {
                Ok(url) => url,
                Err(err) => {
                    engine_warn!("Cannot build course list url: {}", err);
                    break;
                }
            };
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("limit", &self.page_size.to_string());

            let batch: CoursePage = match self.get_json(url).await {
                Ok(batch) => batch,
                Err(err) => {
                    engine_warn!("Failed to fetch courses page {}: {}", page, err);
                    break;
                }
            };
            if batch.courses.is_empty() {
                engine_debug!("Courses page {} is empty, catalog complete", page);
                break;
            }
            courses.extend(batch.courses);

            match batch.metadata.next_page {
                Some(next) if next > 0 && !requested.contains(&next) => page = next,
                Some(next) if next > 0 => {
                    engine_warn!("Courses page {} points back to page {}, stopping", page, next);
                    break;
                }
                _ => break,
            }
        }

        engine_info!("Fetched {} courses", courses.len());
        courses
    }

    /// Module/lesson tree of one course, `None` if it could not be fetched.
    pub async fn course_details(&self, slug: &str) -> Option<CourseDetails> {
        engine_info!("Fetching details for: {}", slug);
        let url = match self.endpoint(&["courses", slug]) {
            Ok(url) => url,
            Err(err) => {
                engine_warn!("Cannot build details url for {}: {}", slug, err);
                return None;
            }
        };
        match self.get_json(url).await {
            Ok(details) => Some(details),
            Err(err) => {
                engine_warn!("Failed to fetch course details for {}: {}", slug, err);
                None
            }
        }
    }

    pub async fn lesson_content(
        &self,
        lesson_id: &UnitId,
        course_id: &UnitId,
    ) -> Result<LessonContent, FetchError> {
        let mut url = self.endpoint(&["lessons", lesson_id.as_str()])?;
        url.query_pairs_mut()
            .append_pair("course_id", course_id.as_str());
        self.get_json(url).await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::new(
                    FailureKind::InvalidUrl,
                    format!("{} cannot be a base url", self.api_base),
                )
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        let response = self.transport.get(url.as_str()).await?;
        if !response.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(response.status),
                format!("GET {url}"),
            ));
        }
        serde_json::from_str(&response.body)
            .map_err(|err| FetchError::new(FailureKind::Decode, format!("GET {url}: {err}")))
    }
}
