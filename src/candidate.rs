//! Candidate results and selection outcomes.

use serde::{Deserialize, Serialize};

use crate::Pool;

/// Annotation a listing exposes about a particular release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateTag {
    /// Ships with Chinese subtitles.
    ChineseSubtitles,
    /// Mosaic-reduced / leaked release.
    Decensored,
}

impl CandidateTag {
    /// Short label prefixed to the title when displayed.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChineseSubtitles => "[中字]",
            Self::Decensored => "[破解]",
        }
    }
}

/// One search hit produced by one source for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Raw title text.
    pub title: String,
    /// Absolute URL of the detail page.
    pub link: String,
    /// Name of the source that produced it.
    pub source: String,
    /// Pool the source belongs to.
    pub pool: Pool,
    /// Listing annotations, in the order they were detected.
    pub tags: Vec<CandidateTag>,
}

impl Candidate {
    /// Creates a new candidate without tags.
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        source: impl Into<String>,
        pool: Pool,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            source: source.into(),
            pool,
            tags: Vec::new(),
        }
    }

    /// Adds a tag, ignoring duplicates.
    pub fn with_tag(mut self, tag: CandidateTag) -> Self {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
        self
    }

    /// Returns whether the candidate carries the tag.
    pub fn has_tag(&self, tag: CandidateTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Title with tag labels prefixed, most recent tag first.
    pub fn display_title(&self) -> String {
        let mut title = self.title.clone();
        for tag in &self.tags {
            title = format!("{} {}", tag.label(), title);
        }
        title
    }
}

/// Result of picking one candidate across both pools.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionOutcome {
    /// Every queried source answered and one candidate won.
    Found(Candidate),
    /// Some sources failed, but a candidate still won.
    Partial {
        candidate: Candidate,
        failed_sources: Vec<String>,
    },
    /// Nothing survived.
    NoResult,
}

impl SelectionOutcome {
    /// Returns the winning candidate, if any.
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            Self::Found(candidate) | Self::Partial { candidate, .. } => Some(candidate),
            Self::NoResult => None,
        }
    }

    /// Consumes the outcome, returning the winning candidate.
    pub fn into_candidate(self) -> Option<Candidate> {
        match self {
            Self::Found(candidate) | Self::Partial { candidate, .. } => Some(candidate),
            Self::NoResult => None,
        }
    }

    /// Records failed sources; a `Found` outcome becomes `Partial`.
    pub fn with_failures(self, failed: Vec<String>) -> Self {
        match self {
            Self::Found(candidate) if !failed.is_empty() => Self::Partial {
                candidate,
                failed_sources: failed,
            },
            Self::Partial {
                candidate,
                mut failed_sources,
            } => {
                failed_sources.extend(failed);
                Self::Partial {
                    candidate,
                    failed_sources,
                }
            }
            other => other,
        }
    }

    /// Returns whether a candidate was selected.
    pub fn is_found(&self) -> bool {
        self.candidate().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Candidate {
        Candidate::new("ABC-123 cover", "https://a.example/abc-123", "a.example", Pool::A)
    }

    #[test]
    fn test_candidate_new() {
        let c = sample();
        assert_eq!(c.title, "ABC-123 cover");
        assert_eq!(c.link, "https://a.example/abc-123");
        assert_eq!(c.source, "a.example");
        assert_eq!(c.pool, Pool::A);
        assert!(c.tags.is_empty());
    }

    #[test]
    fn test_with_tag_dedups() {
        let c = sample()
            .with_tag(CandidateTag::Decensored)
            .with_tag(CandidateTag::Decensored);
        assert_eq!(c.tags, vec![CandidateTag::Decensored]);
        assert!(c.has_tag(CandidateTag::Decensored));
        assert!(!c.has_tag(CandidateTag::ChineseSubtitles));
    }

    #[test]
    fn test_display_title_without_tags() {
        assert_eq!(sample().display_title(), "ABC-123 cover");
    }

    #[test]
    fn test_display_title_prefixes_tags() {
        let c = sample()
            .with_tag(CandidateTag::ChineseSubtitles)
            .with_tag(CandidateTag::Decensored);
        assert_eq!(c.display_title(), "[破解] [中字] ABC-123 cover");
    }

    #[test]
    fn test_outcome_with_failures_marks_partial() {
        let outcome = SelectionOutcome::Found(sample()).with_failures(vec!["b.example".into()]);
        match &outcome {
            SelectionOutcome::Partial { failed_sources, .. } => {
                assert_eq!(failed_sources, &vec!["b.example".to_string()]);
            }
            other => panic!("Expected Partial, got {:?}", other),
        }
        assert_eq!(outcome.candidate(), Some(&sample()));
    }

    #[test]
    fn test_outcome_without_failures_stays_found() {
        let outcome = SelectionOutcome::Found(sample()).with_failures(vec![]);
        assert!(matches!(outcome, SelectionOutcome::Found(_)));
    }

    #[test]
    fn test_no_result_ignores_failures() {
        let outcome = SelectionOutcome::NoResult.with_failures(vec!["x".into()]);
        assert_eq!(outcome, SelectionOutcome::NoResult);
        assert!(!outcome.is_found());
        assert!(outcome.into_candidate().is_none());
    }

    #[test]
    fn test_candidate_serialization() {
        let c = sample().with_tag(CandidateTag::ChineseSubtitles);
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"pool\":\"a\""));
        assert!(json.contains("\"chinese_subtitles\""));
    }
}
