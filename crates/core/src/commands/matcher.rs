use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    NoMatch,
    /// One entry per capture group, in group order.
    Matched(Vec<String>),
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }
}

/// A compiled message pattern with a fixed number of capture groups.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    capture_count: usize,
}

impl PatternMatcher {
    pub fn new(regex: Regex) -> Self {
        // Group 0 is the whole match
        let capture_count = regex.captures_len() - 1;
        Self {
            regex,
            capture_count,
        }
    }

    pub fn parse(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self::new)
    }

    pub fn capture_count(&self) -> usize {
        self.capture_count
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// Groups that did not take part in the match are reported as empty strings,
    /// so a successful match always carries exactly `capture_count` entries.
    pub fn try_match(&self, text: &str) -> MatchResult {
        let Some(captures) = self.regex.captures(text) else {
            return MatchResult::NoMatch;
        };

        let captures = captures
            .iter()
            .skip(1)
            .map(|group| group.map_or_else(String::new, |m| m.as_str().to_string()))
            .collect();
        MatchResult::Matched(captures)
    }
}

impl From<Regex> for PatternMatcher {
    fn from(regex: Regex) -> Self {
        Self::new(regex)
    }
}
