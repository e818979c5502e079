use std::collections::HashSet;
use std::fmt;

use regex::Regex;

pub type JobId = u64;

/// Outlinks of one successfully extracted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResult {
    source_url: String,
    outlinks: HashSet<String>,
}

impl FetchResult {
    pub fn new(source_url: impl Into<String>, outlinks: HashSet<String>) -> Self {
        Self {
            source_url: source_url.into(),
            outlinks,
        }
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn outlinks(&self) -> &HashSet<String> {
        &self.outlinks
    }

    pub fn into_outlinks(self) -> HashSet<String> {
        self.outlinks
    }

    /// Keeps only the outlinks matched by `scope`. Anchor the pattern to
    /// restrict on the whole link.
    pub fn retain_matching(mut self, scope: &Regex) -> Self {
        self.outlinks.retain(|link| scope.is_match(link));
        self
    }
}

/// Raw, unresolved href value of one hyperlink node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub href: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoResultReason {
    InputRejected,
    NoBaseUrl,
    MalformedMarkup,
}

impl fmt::Display for NoResultReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoResultReason::InputRejected => write!(f, "source url rejected"),
            NoResultReason::NoBaseUrl => write!(f, "no base url in source url"),
            NoResultReason::MalformedMarkup => write!(f, "malformed markup"),
        }
    }
}

/// An unexpected failure, already formatted as a single diagnostic line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub source_url: String,
    pub message: String,
}

/// Result of one extraction attempt. Every variant other than `Extracted`
/// means the page yielded nothing usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    Extracted(FetchResult),
    NoResult(NoResultReason),
    Fault(Fault),
}

impl ExtractOutcome {
    pub fn is_extracted(&self) -> bool {
        matches!(self, ExtractOutcome::Extracted(_))
    }

    pub fn into_result(self) -> Option<FetchResult> {
        match self {
            ExtractOutcome::Extracted(result) => Some(result),
            ExtractOutcome::NoResult(_) | ExtractOutcome::Fault(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    JobCompleted {
        job_id: JobId,
        source_url: String,
        outcome: ExtractOutcome,
    },
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
    HttpStatus(u16),
    Timeout,
    RedirectLimitExceeded,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    UnsupportedContentType { content_type: String },
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::RedirectLimitExceeded => write!(f, "redirect limit exceeded"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
