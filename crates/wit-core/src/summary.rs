//! Aggregation of parsed combat events into totals and timelines

use crate::{CombatEvent, CombatEventKind, HitQuality, YOU, YOU_PET};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Running totals for one event kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KindSummary {
    pub total: f64,
    pub count: usize,
    pub by_counterpart: BTreeMap<String, f64>, // target for dealt kinds, attacker/source for received
    pub by_weapon: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub by_quality: BTreeMap<HitQuality, usize>, // hit counts, damage kinds only
    pub timeline: Vec<TimelinePoint>,            // encounter order
}

impl KindSummary {
    fn add(&mut self, event: &CombatEvent) {
        let value = event.value();
        self.total += value;
        self.count += 1;
        *self.by_counterpart.entry(event.counterpart().to_string()).or_insert(0.0) += value;
        *self.by_weapon.entry(event.weapon().to_string()).or_insert(0.0) += value;
        if let Some(quality) = event.quality() {
            *self.by_quality.entry(quality).or_insert(0) += 1;
        }
        self.timeline.push(TimelinePoint {
            timestamp: event.timestamp,
            value,
        });
    }

    /// seconds between the first and last event of this kind
    pub fn duration_secs(&self) -> i64 {
        match (self.timeline.first(), self.timeline.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).num_seconds(),
            _ => 0,
        }
    }

    /// total per second; a single-second burst counts as one second
    pub fn per_second(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total / self.duration_secs().max(1) as f64
    }

    /// counterparts sorted by total, largest first
    pub fn top_counterparts(&self, limit: usize) -> Vec<(&str, f64)> {
        top(&self.by_counterpart, limit)
    }

    pub fn top_weapons(&self, limit: usize) -> Vec<(&str, f64)> {
        top(&self.by_weapon, limit)
    }
}

fn top(map: &BTreeMap<String, f64>, limit: usize) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = map.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries.truncate(limit);
    entries
}

/// Everything the presentation side needs from one parsed log
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatSummary {
    pub damage_dealt: KindSummary,
    pub damage_received: KindSummary,
    pub repair_dealt: KindSummary,
    pub repair_received: KindSummary,
    pub participants: BTreeSet<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl CombatSummary {
    pub fn from_events(events: &[CombatEvent]) -> Self {
        let mut summary = Self::default();
        for event in events {
            summary.add(event);
        }
        summary
    }

    pub fn add(&mut self, event: &CombatEvent) {
        self.kind_mut(event.kind()).add(event);

        let counterpart = event.counterpart();
        if counterpart != YOU && counterpart != YOU_PET {
            self.participants.insert(counterpart.to_string());
        }

        self.started_at = Some(match self.started_at {
            Some(start) => start.min(event.timestamp),
            None => event.timestamp,
        });
        self.ended_at = Some(match self.ended_at {
            Some(end) => end.max(event.timestamp),
            None => event.timestamp,
        });
    }

    pub fn kind(&self, kind: CombatEventKind) -> &KindSummary {
        match kind {
            CombatEventKind::DamageDealt => &self.damage_dealt,
            CombatEventKind::DamageReceived => &self.damage_received,
            CombatEventKind::RemoteRepairDealt => &self.repair_dealt,
            CombatEventKind::RemoteRepairReceived => &self.repair_received,
        }
    }

    fn kind_mut(&mut self, kind: CombatEventKind) -> &mut KindSummary {
        match kind {
            CombatEventKind::DamageDealt => &mut self.damage_dealt,
            CombatEventKind::DamageReceived => &mut self.damage_received,
            CombatEventKind::RemoteRepairDealt => &mut self.repair_dealt,
            CombatEventKind::RemoteRepairReceived => &mut self.repair_received,
        }
    }

    pub fn event_count(&self) -> usize {
        CombatEventKind::ALL.iter().map(|k| self.kind(*k).count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::CombatLogParser;

    const LOG: &str = "\
[ 2024.05.01 20:15:00 ] (combat) 500 to Rogue Drone - Light Neutron Blaster II - Hits
[ 2024.05.01 20:15:04 ] (combat) 250 to Rogue Drone - Light Neutron Blaster II - Grazes
[ 2024.05.01 20:15:10 ] (combat) 100 to Rogue Frigate - Hits
[ 2024.05.01 20:15:05 ] (combat) 300 from Hostile Frigate - Penetrates
[ 2024.05.01 20:15:20 ] (combat) 150 remote armor repaired to Ally Cruiser - Large Armor Repairer
";

    #[test]
    fn test_totals_by_counterpart_and_weapon() {
        let events = CombatLogParser::new().parse(LOG);
        let summary = CombatSummary::from_events(&events);

        assert_eq!(summary.event_count(), 5);
        assert_eq!(summary.damage_dealt.total, 850.0);
        assert_eq!(summary.damage_dealt.by_counterpart["Rogue Drone"], 750.0);
        assert_eq!(summary.damage_dealt.by_weapon["Light Neutron Blaster II"], 750.0);
        assert_eq!(summary.damage_dealt.by_weapon["Unknown"], 100.0);
        assert_eq!(summary.damage_dealt.by_quality[&HitQuality::Hits], 2);
        assert_eq!(summary.damage_received.by_counterpart["Hostile Frigate"], 300.0);
        assert_eq!(summary.repair_dealt.by_counterpart["Ally Cruiser"], 150.0);
        assert!(summary.repair_dealt.by_quality.is_empty());
        assert_eq!(summary.repair_received.count, 0);
    }

    #[test]
    fn test_timeline_and_rate() {
        let events = CombatLogParser::new().parse(LOG);
        let summary = CombatSummary::from_events(&events);

        let values: Vec<f64> = summary.damage_dealt.timeline.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![500.0, 250.0, 100.0]);
        assert_eq!(summary.damage_dealt.duration_secs(), 10);
        assert_eq!(summary.damage_dealt.per_second(), 85.0);
        // single event: one second window
        assert_eq!(summary.damage_received.per_second(), 300.0);
        assert_eq!(summary.repair_received.per_second(), 0.0);

        assert_eq!(
            summary.damage_dealt.top_counterparts(1),
            vec![("Rogue Drone", 750.0)]
        );
    }

    #[test]
    fn test_participants_and_span() {
        let events = CombatLogParser::new().parse(LOG);
        let summary = CombatSummary::from_events(&events);

        let participants: Vec<&str> = summary.participants.iter().map(String::as_str).collect();
        assert_eq!(
            participants,
            vec!["Ally Cruiser", "Hostile Frigate", "Rogue Drone", "Rogue Frigate"]
        );
        assert_eq!(summary.started_at, events.first().map(|e| e.timestamp));
        assert_eq!(summary.ended_at, events.last().map(|e| e.timestamp));
    }

    #[test]
    fn test_empty() {
        let summary = CombatSummary::from_events(&[]);
        assert_eq!(summary.event_count(), 0);
        assert!(summary.started_at.is_none());
        assert!(summary.participants.is_empty());
    }
}
