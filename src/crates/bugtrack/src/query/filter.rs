//! Filter criteria for bug listings
//!
//! Every populated criterion must hold for a bug to be kept (AND across
//! criteria). Within the label criterion a single shared label is enough.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::db::models::Bug;

/// Upper bound on compiled text-pattern size
const PATTERN_SIZE_LIMIT: usize = 1 << 20;

/// Filter criteria for listing bugs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Case-insensitive pattern tested against title and description
    pub txt: Option<String>,
    /// Inclusive lower severity bound
    pub min_severity: Option<u8>,
    /// Inclusive upper severity bound
    pub max_severity: Option<u8>,
    /// Keep bugs carrying at least one of these labels
    #[serde(default)]
    pub labels: Vec<String>,
    /// Inclusive lower bound on `createdAt` (epoch millis)
    pub date_from: Option<i64>,
    /// Inclusive upper bound on `createdAt` (epoch millis)
    pub date_to: Option<i64>,
    /// `true` keeps labelled bugs only, `false` unlabelled ones only
    pub has_labels: Option<bool>,
    /// Keep bugs filed by this user
    pub creator_id: Option<String>,
}

impl FilterSpec {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_txt(mut self, txt: impl Into<String>) -> Self {
        self.txt = Some(txt.into());
        self
    }

    pub fn with_min_severity(mut self, severity: u8) -> Self {
        self.min_severity = Some(severity);
        self
    }

    pub fn with_max_severity(mut self, severity: u8) -> Self {
        self.max_severity = Some(severity);
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_date_range(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.date_from = from;
        self.date_to = to;
        self
    }

    pub fn with_has_labels(mut self, has_labels: bool) -> Self {
        self.has_labels = Some(has_labels);
        self
    }

    pub fn with_creator_id(mut self, creator_id: impl Into<String>) -> Self {
        self.creator_id = Some(creator_id.into());
        self
    }

    /// True when no criterion is active
    pub fn is_empty(&self) -> bool {
        active_text(self.txt.as_deref()).is_none()
            && self.min_severity.is_none()
            && self.max_severity.is_none()
            && self.labels.is_empty()
            && self.date_from.is_none()
            && self.date_to.is_none()
            && self.has_labels.is_none()
            && self.creator_id.is_none()
    }

    /// Test a single bug. Compiles the text pattern on every call; use
    /// [`BugMatcher`] when testing many bugs.
    pub fn matches(&self, bug: &Bug) -> bool {
        BugMatcher::new(self).matches(bug)
    }
}

fn active_text(txt: Option<&str>) -> Option<&str> {
    txt.map(str::trim).filter(|t| !t.is_empty())
}

/// Case-insensitive text search. The text is tried as a regex first and
/// matched literally when it is not a valid pattern.
pub enum TextMatcher {
    Pattern(Regex),
    /// Lowercased needle, used when the text is not a valid pattern
    Literal(String),
}

impl TextMatcher {
    /// Matcher for a search box value; blank text means no text criterion
    pub fn for_query(txt: Option<&str>) -> Option<Self> {
        active_text(txt).map(Self::new)
    }

    pub fn new(txt: &str) -> Self {
        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .size_limit(PATTERN_SIZE_LIMIT)
                .build()
        };

        match build(txt).or_else(|_| build(&regex::escape(txt))) {
            Ok(re) => TextMatcher::Pattern(re),
            Err(_) => TextMatcher::Literal(txt.to_lowercase()),
        }
    }

    pub fn is_match(&self, haystack: &str) -> bool {
        match self {
            TextMatcher::Pattern(re) => re.is_match(haystack),
            TextMatcher::Literal(needle) => haystack.to_lowercase().contains(needle),
        }
    }
}

/// A [`FilterSpec`] with its text pattern compiled once
pub struct BugMatcher<'a> {
    spec: &'a FilterSpec,
    text: Option<TextMatcher>,
}

impl<'a> BugMatcher<'a> {
    pub fn new(spec: &'a FilterSpec) -> Self {
        Self {
            spec,
            text: TextMatcher::for_query(spec.txt.as_deref()),
        }
    }

    pub fn matches(&self, bug: &Bug) -> bool {
        let spec = self.spec;

        if let Some(text) = &self.text {
            let in_description = bug
                .description
                .as_deref()
                .map_or(false, |d| text.is_match(d));
            if !text.is_match(&bug.title) && !in_description {
                return false;
            }
        }

        if spec.min_severity.map_or(false, |min| bug.severity < min) {
            return false;
        }
        if spec.max_severity.map_or(false, |max| bug.severity > max) {
            return false;
        }

        if !spec.labels.is_empty() && !spec.labels.iter().any(|l| bug.labels.contains(l)) {
            return false;
        }

        if spec.date_from.map_or(false, |from| bug.created_at < from) {
            return false;
        }
        if spec.date_to.map_or(false, |to| bug.created_at > to) {
            return false;
        }

        if let Some(has_labels) = spec.has_labels {
            if bug.labels.is_empty() == has_labels {
                return false;
            }
        }

        if let Some(creator_id) = &spec.creator_id {
            if bug.creator_id() != Some(creator_id.as_str()) {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::CreatorRef;

    fn bug(title: &str, severity: u8) -> Bug {
        Bug::new(title, severity)
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let spec = FilterSpec::new();
        assert!(spec.is_empty());
        assert!(spec.matches(&bug("anything", 1)));
    }

    #[test]
    fn test_blank_text_is_inactive() {
        let spec = FilterSpec::new().with_txt("   ");
        assert!(spec.is_empty());
        assert!(spec.matches(&bug("anything", 1)));
    }

    #[test]
    fn test_text_is_case_insensitive_on_title() {
        let spec = FilterSpec::new().with_txt("coffee");
        assert!(spec.matches(&bug("404 Coffee Not Found", 2)));
        assert!(!spec.matches(&bug("Keyboard Not Found", 3)));
    }

    #[test]
    fn test_text_matches_description() {
        let spec = FilterSpec::new().with_txt("freez");
        let b = bug("Infinite Loop", 4).with_description("The browser FREEZES");
        assert!(spec.matches(&b));
    }

    #[test]
    fn test_text_supports_patterns() {
        let spec = FilterSpec::new().with_txt("^key.*found$");
        assert!(spec.matches(&bug("Keyboard Not Found", 3)));
        assert!(!spec.matches(&bug("The Keyboard Not Found", 3)));
    }

    #[test]
    fn test_invalid_pattern_falls_back_to_literal() {
        let spec = FilterSpec::new().with_txt("(unclosed");
        assert!(spec.matches(&bug("Crash in (Unclosed paren handling", 2)));
        assert!(!spec.matches(&bug("Crash elsewhere", 2)));
    }

    #[test]
    fn test_severity_bounds_are_inclusive() {
        let spec = FilterSpec::new().with_min_severity(2).with_max_severity(4);
        assert!(!spec.matches(&bug("a", 1)));
        assert!(spec.matches(&bug("a", 2)));
        assert!(spec.matches(&bug("a", 4)));
        assert!(!spec.matches(&bug("a", 5)));
    }

    #[test]
    fn test_labels_need_one_shared_label() {
        let spec = FilterSpec::new().with_labels(["ui", "critical"]);
        assert!(spec.matches(&bug("a", 1).with_labels(["backend", "ui"])));
        assert!(!spec.matches(&bug("a", 1).with_labels(["backend"])));
        assert!(!spec.matches(&bug("a", 1)));
    }

    #[test]
    fn test_date_bounds_are_inclusive() {
        let spec = FilterSpec::new().with_date_range(Some(100), Some(200));
        assert!(!spec.matches(&bug("a", 1).with_created_at(99)));
        assert!(spec.matches(&bug("a", 1).with_created_at(100)));
        assert!(spec.matches(&bug("a", 1).with_created_at(200)));
        assert!(!spec.matches(&bug("a", 1).with_created_at(201)));
    }

    #[test]
    fn test_has_labels() {
        let labelled = bug("a", 1).with_labels(["ui"]);
        let bare = bug("b", 1);

        let want_labels = FilterSpec::new().with_has_labels(true);
        assert!(want_labels.matches(&labelled));
        assert!(!want_labels.matches(&bare));

        let want_bare = FilterSpec::new().with_has_labels(false);
        assert!(!want_bare.matches(&labelled));
        assert!(want_bare.matches(&bare));
    }

    #[test]
    fn test_creator_id() {
        let mine = bug("a", 1).with_creator(CreatorRef {
            id: "u1".to_string(),
            fullname: "Muki".to_string(),
        });
        let spec = FilterSpec::new().with_creator_id("u1");
        assert!(spec.matches(&mine));
        assert!(!spec.matches(&bug("b", 1)));
        assert!(!FilterSpec::new().with_creator_id("u2").matches(&mine));
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let spec = FilterSpec::new().with_txt("loop").with_min_severity(4);
        assert!(spec.matches(&bug("Infinite Loop", 4)));
        assert!(!spec.matches(&bug("Infinite Loop", 3)));
        assert!(!spec.matches(&bug("Crash", 5)));
    }
}
