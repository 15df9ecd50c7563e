//! combat log parser - raw EVE combat log text into structured combat events

pub mod line;
pub mod rules;

pub use line::{parse_timestamp, CombatLine, LineFilter, LineMatch};
pub use rules::{parse_amount, ClassifierRule, EventClassifier};

use crate::CombatEvent;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::warn;

// rule table is fixed, compile it once for the whole process
static PARSER: LazyLock<CombatLogParser> = LazyLock::new(CombatLogParser::new);

/// Parse a full combat log with the shared parser
pub fn parse_combat_log(text: &str) -> Vec<CombatEvent> {
    PARSER.parse(text)
}

/// Same as [`parse_combat_log`] but keeps the line counters
pub fn parse_combat_log_report(text: &str) -> ParseReport {
    PARSER.parse_report(text)
}

// line counters for one parse call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseStats {
    pub total_lines: usize,        // non-empty input lines
    pub combat_lines: usize,       // lines on the combat channel with a valid timestamp
    pub invalid_timestamps: usize, // combat shape but impossible clock value
    pub unclassified: usize,       // combat lines no rule accepted
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseReport {
    pub events: Vec<CombatEvent>,
    pub stats: ParseStats,
}

pub struct CombatLogParser {
    lines: LineFilter,
    classifier: EventClassifier,
}

impl CombatLogParser {
    pub fn new() -> Self {
        Self {
            lines: LineFilter::new(),
            classifier: EventClassifier::new(),
        }
    }

    pub fn parse(&self, text: &str) -> Vec<CombatEvent> {
        self.parse_report(text).events
    }

    pub fn parse_report(&self, text: &str) -> ParseReport {
        let mut events = Vec::new();
        let mut stats = ParseStats::default();

        for (index, raw) in text.lines().enumerate() {
            if raw.trim().is_empty() {
                continue;
            }
            stats.total_lines += 1;

            match self.lines.match_line(raw) {
                LineMatch::NotCombat => {}
                LineMatch::InvalidTimestamp(ts) => {
                    stats.invalid_timestamps += 1;
                    warn!(line = index + 1, timestamp = ts, "Skipping combat line with invalid timestamp");
                }
                LineMatch::Combat(line) => {
                    stats.combat_lines += 1;
                    match self.classify_line(line) {
                        Some(event) => events.push(event),
                        None => stats.unclassified += 1,
                    }
                }
            }
        }

        // stable: equal timestamps keep their line order
        events.sort_by_key(|event| event.timestamp);

        ParseReport { events, stats }
    }

    pub fn classify_line(&self, line: CombatLine) -> Option<CombatEvent> {
        self.classifier
            .classify(&line.content)
            .map(|detail| CombatEvent {
                timestamp: line.timestamp,
                detail,
            })
    }
}

impl Default for CombatLogParser {
    fn default() -> Self {
        Self::new()
    }
}
