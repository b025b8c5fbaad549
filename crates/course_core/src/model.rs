use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const UNKNOWN_MODULE: &str = "Unknown Module";
const UNKNOWN_LESSON: &str = "Unknown Lesson";

/// Identifier of a course, module or lesson.
///
/// The API is not consistent about numeric versus string ids, so both are
/// accepted and the id is always handled in its string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<u64> for UnitId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl Serialize for UnitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UnitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => Self(n.to_string()),
            RawId::Float(n) => Self(n.to_string()),
            RawId::Text(s) => Self(s),
        })
    }
}

/// Catalog entry as listed by the paginated course endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub id: Option<UnitId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct PageMetadata {
    #[serde(default)]
    pub next_page: Option<u32>,
}

/// One page of the course catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct CoursePage {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub metadata: PageMetadata,
}

/// Module/lesson tree of a single course.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CourseDetails {
    pub id: UnitId,
    #[serde(default)]
    pub modules: Vec<Module>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Module {
    pub id: UnitId,
    #[serde(default = "unknown_module")]
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
    #[serde(default)]
    pub lessons_count: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Lesson {
    pub id: UnitId,
    #[serde(default = "unknown_lesson")]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl Lesson {
    pub fn kind_or_unknown(&self) -> &str {
        self.kind.as_deref().unwrap_or("unknown")
    }
}

/// Lazily fetched lesson payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct LessonContent {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub video_url: Option<String>,
}

impl LessonContent {
    /// Returns the raw content when it is present and non-empty.
    pub fn body(&self) -> Option<&str> {
        self.content.as_deref().filter(|c| !c.is_empty())
    }
}

fn unknown_module() -> String {
    UNKNOWN_MODULE.to_string()
}

fn unknown_lesson() -> String {
    UNKNOWN_LESSON.to_string()
}
