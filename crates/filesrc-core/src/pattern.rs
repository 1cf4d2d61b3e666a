use crate::{Error, Result};
use glob::{MatchOptions, Pattern};

/// Separator between alternative patterns, e.g. `**/*.csv|**/*.jsonl`
pub const ALTERNATION: char = '|';

const GLOBSTAR: &str = "**";

// `*` stays inside one path segment, `**` spans directories. Neither matches
// a leading dot.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled path pattern.
///
/// Supports `**` recursive matching and `|` separated alternatives. A path
/// matches when any alternative matches.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    alternatives: Vec<Pattern>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Result<Self> {
        let alternatives = raw
            .split(ALTERNATION)
            .map(|alternative| {
                Pattern::new(&collapse_partial_globstars(alternative)).map_err(|e| {
                    Error::Pattern {
                        pattern: raw.to_string(),
                        message: e.to_string(),
                    }
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            raw: raw.to_string(),
            alternatives,
        })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.alternatives
            .iter()
            .any(|pattern| pattern.matches_with(path, MATCH_OPTIONS))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

/// `**` only recurses when it is a whole path segment. Anywhere else it is a
/// plain `*`, e.g. `data/**.jsonl` is `data/*.jsonl`.
fn collapse_partial_globstars(alternative: &str) -> String {
    alternative
        .split('/')
        .map(|segment| {
            if segment == GLOBSTAR || !segment.contains(GLOBSTAR) {
                return segment.to_string();
            }
            let mut collapsed = String::with_capacity(segment.len());
            for c in segment.chars() {
                if c == '*' && collapsed.ends_with('*') {
                    continue;
                }
                collapsed.push(c);
            }
            collapsed
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Evaluate `pattern` against `path` in one go
pub fn globmatch(path: &str, pattern: &str) -> Result<bool> {
    Ok(PathPattern::parse(pattern)?.matches(path))
}
