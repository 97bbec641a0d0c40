//! Section-marker parsing of free-text summaries.
//!
//! One pass over the lines. A line containing `[SYMPTOMS]` or
//! `[RECOMMENDATIONS]` (any case) switches the active section and is not
//! itself content. Lines before the first marker are ignored.

use std::sync::LazyLock;

use carebridge_core::summary::SummaryResult;
use regex_lite::Regex;
use tracing::warn;

pub const SYMPTOMS_MARKER: &str = "[SYMPTOMS]";
pub const RECOMMENDATIONS_MARKER: &str = "[RECOMMENDATIONS]";

// regex-lite's `\s` is ASCII-only; models often emit a no-break space after the bullet.
static BULLET_PREFIX: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[\-\*•\d\.]+[\s\x{A0}\x{202F}]+")
        .inspect_err(|e| warn!(error = %e, "Bullet pattern failed to compile, bullets kept"))
        .ok()
});

#[derive(Clone, Copy)]
enum Section {
    Symptoms,
    Recommendations,
}

/// Parse marker-delimited text. Never fails; unmarked text yields an empty result.
pub fn parse_tagged(raw: &str) -> SummaryResult {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut result = SummaryResult::empty();
    let mut section = None;

    for line in normalized.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        let upper = line.to_uppercase();
        if upper.contains(SYMPTOMS_MARKER) {
            section = Some(Section::Symptoms);
            continue;
        }
        if upper.contains(RECOMMENDATIONS_MARKER) {
            section = Some(Section::Recommendations);
            continue;
        }

        let Some(active) = section else {
            continue;
        };

        let item = strip_bullet(line).trim();
        if item.is_empty() {
            continue;
        }
        match active {
            Section::Symptoms => result.symptoms.push(item.to_string()),
            Section::Recommendations => result.recommendations.push(item.to_string()),
        }
    }

    result
}

/// Remove a leading bullet or list number (`- `, `* `, `• `, `1. `).
pub fn strip_bullet(line: &str) -> &str {
    match BULLET_PREFIX.as_ref().and_then(|re| re.find(line)) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}
