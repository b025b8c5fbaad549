use std::fmt;

use course_core::{LessonOutcome, UnitId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestEvent {
    CourseStarted {
        slug: String,
        title: String,
    },
    LessonFinished {
        lesson_id: UnitId,
        title: String,
        outcome: LessonOutcome,
    },
    ResourceStarted {
        file_name: String,
        total_bytes: Option<u64>,
    },
    ResourceProgress {
        file_name: String,
        bytes: u64,
    },
    ResourceFinished {
        file_name: String,
        bytes: u64,
    },
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: IngestEvent);
}

/// Sink that drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopProgressSink;

impl ProgressSink for NoopProgressSink {
    fn emit(&self, _event: IngestEvent) {}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidHeader,
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    Decode,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidHeader => write!(f, "invalid header value"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::Decode => write!(f, "malformed response body"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
