// Combat channel line filter
// [ 2024.05.01 20:15:03 ] (combat) <color=0xff00ffff><b>500</b> to ...

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use regex::Regex;

/// A combat channel line, markup removed, ready for classification
#[derive(Debug, Clone, PartialEq)]
pub struct CombatLine {
    pub timestamp: DateTime<Utc>,
    pub content: String,
}

/// Outcome of looking at one raw line
#[derive(Debug, PartialEq)]
pub enum LineMatch<'a> {
    /// blank line, header, chat or any other channel
    NotCombat,
    /// matched the combat shape but the clock value is not a real instant
    InvalidTimestamp(&'a str),
    Combat(CombatLine),
}

pub struct LineFilter {
    line_pattern: Regex,
    markup_pattern: Regex,
    space_pattern: Regex,
}

impl LineFilter {
    pub fn new() -> Self {
        Self {
            line_pattern: Regex::new(
                r"^\[\s*(\d{4}\.\d{2}\.\d{2} \d{2}:\d{2}:\d{2})\s*\]\s*\((?i:combat)\)\s*(.*)$"
            ).expect("combat line pattern is valid"),
            markup_pattern: Regex::new(r"<[^>]*>").expect("markup pattern is valid"),
            space_pattern: Regex::new(r"\s+").expect("whitespace pattern is valid"),
        }
    }

    pub fn match_line<'a>(&self, raw: &'a str) -> LineMatch<'a> {
        let Some(caps) = self.line_pattern.captures(raw.trim()) else {
            return LineMatch::NotCombat;
        };
        let timestamp_str = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let rest = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        match parse_timestamp(timestamp_str) {
            Some(timestamp) => LineMatch::Combat(CombatLine {
                timestamp,
                content: self.strip_markup(rest),
            }),
            None => LineMatch::InvalidTimestamp(timestamp_str),
        }
    }

    /// drop <...> tags and squeeze the whitespace they leave behind
    pub fn strip_markup(&self, rest: &str) -> String {
        let stripped = self.markup_pattern.replace_all(rest, "");
        self.space_pattern.replace_all(stripped.trim(), " ").into_owned()
    }
}

impl Default for LineFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// In-game clock is UTC: 2024.05.01 20:15:03 -> 2024-05-01T20:15:03Z
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(ts.trim(), "%Y.%m.%d %H:%M:%S")
        .ok()
        // chrono reads :60 as a leap second, which is not a real instant
        .filter(|naive| naive.nanosecond() < 1_000_000_000)
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn content(m: LineMatch<'_>) -> String {
        match m {
            LineMatch::Combat(line) => line.content,
            other => panic!("expected a combat line, got {:?}", other),
        }
    }

    #[test]
    fn test_combat_line() {
        let filter = LineFilter::new();
        let m = filter.match_line("[ 2024.05.01 20:15:03 ] (combat) 500 to Rogue Drone - Hits");
        match m {
            LineMatch::Combat(line) => {
                assert_eq!(line.timestamp, Utc.with_ymd_and_hms(2024, 5, 1, 20, 15, 3).unwrap());
                assert_eq!(line.content, "500 to Rogue Drone - Hits");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_bracket_spacing_and_tag_case() {
        let filter = LineFilter::new();
        let m = filter.match_line("[2024.05.01 20:15:03] (COMBAT) 1 to X - Hits");
        assert_eq!(content(m), "1 to X - Hits");
    }

    #[test]
    fn test_other_channels_skipped() {
        let filter = LineFilter::new();
        assert_eq!(
            filter.match_line("[ 2024.05.01 20:15:03 ] (notify) Your cargo hold is full"),
            LineMatch::NotCombat
        );
        assert_eq!(filter.match_line("  Listener: Some Pilot"), LineMatch::NotCombat);
        assert_eq!(filter.match_line(""), LineMatch::NotCombat);
        // dashes in the date are not the game's format
        assert_eq!(
            filter.match_line("[ 2024-05-01 20:15:03 ] (combat) 500 to X - Hits"),
            LineMatch::NotCombat
        );
    }

    #[test]
    fn test_invalid_timestamp() {
        let filter = LineFilter::new();
        assert_eq!(
            filter.match_line("[ 2024.13.41 20:15:03 ] (combat) 500 to X - Hits"),
            LineMatch::InvalidTimestamp("2024.13.41 20:15:03")
        );
        assert_eq!(
            filter.match_line("[ 2024.05.01 20:15:60 ] (combat) 500 to X - Hits"),
            LineMatch::InvalidTimestamp("2024.05.01 20:15:60")
        );
        assert!(parse_timestamp("2024.05.01 20:15:60").is_none());
        assert!(parse_timestamp("2024.05.01 20:15:59").is_some());
    }

    #[test]
    fn test_markup_stripped() {
        let filter = LineFilter::new();
        let raw = "[ 2024.05.01 20:15:03 ] (combat) <color=0xff00ffff><b>34</b> <color=0x77ffffff><font size=10>to</font> <b><color=0xffffffff>Guristas Despoiler</b><font size=10><color=0x77ffffff> - Hobgoblin II - Hits";
        assert_eq!(
            content(filter.match_line(raw)),
            "34 to Guristas Despoiler - Hobgoblin II - Hits"
        );
    }

    #[test]
    fn test_inner_whitespace_collapsed() {
        let filter = LineFilter::new();
        let raw = "[ 2024.05.01 20:15:03 ] (combat) 34  to <b>Guristas   Despoiler</b>\t- Hits";
        assert_eq!(content(filter.match_line(raw)), "34 to Guristas Despoiler - Hits");
    }
}
