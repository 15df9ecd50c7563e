//! Core types for WIT combat log analysis
//! this crate contains the combat event model, the log parser and the aggregator
//! shared by the api, worker and cli.
pub mod parser;
pub mod summary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

pub use parser::{parse_combat_log, parse_combat_log_report, CombatLogParser, ParseReport, ParseStats};
pub use summary::{CombatSummary, KindSummary, TimelinePoint};

/// Name used for the log owner in every event they take part in
pub const YOU: &str = "You";

/// Attacker name for damage done by the log owner's drones/fighters
pub const YOU_PET: &str = "You (Pet)";

/// Placeholder for a weapon the log line does not name
pub const UNKNOWN_WEAPON: &str = "Unknown";

// HIT QUALITY //

/// Hit quality as reported by the game (ordered from best to worst roll)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HitQuality {
    Wrecks,
    Smashes,
    Penetrates,
    Hits,
    Grazes,
    #[serde(rename = "Glances Off")]
    GlancesOff,
    Unknown,
}

impl HitQuality {
    /// Match a quality token exactly (case-insensitive, surrounding whitespace ignored)
    /// `Unknown` is never returned here, it only marks an absent quality.
    pub fn from_token(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wrecks" => Some(Self::Wrecks),
            "smashes" => Some(Self::Smashes),
            "penetrates" => Some(Self::Penetrates),
            "hits" => Some(Self::Hits),
            "grazes" => Some(Self::Grazes),
            "glances off" => Some(Self::GlancesOff),
            _ => None,
        }
    }

    /// true when the text is one of the quality words, used to keep them out of weapon names
    pub fn is_token(s: &str) -> bool {
        Self::from_token(s).is_some()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Wrecks => "Wrecks",
            Self::Smashes => "Smashes",
            Self::Penetrates => "Penetrates",
            Self::Hits => "Hits",
            Self::Grazes => "Grazes",
            Self::GlancesOff => "Glances Off",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for HitQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown hit quality: {0}")]
pub struct ParseQualityError(pub String);

impl FromStr for HitQuality {
    type Err = ParseQualityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("unknown") {
            return Ok(Self::Unknown);
        }
        Self::from_token(s).ok_or_else(|| ParseQualityError(s.to_string()))
    }
}

// REPAIR LAYER //

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepairLayer {
    Armor,
    Shield,
}

impl RepairLayer {
    pub fn from_word(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "armor" => Some(Self::Armor),
            "shield" => Some(Self::Shield),
            _ => None,
        }
    }
}

// EVENT KIND //

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CombatEventKind {
    DamageDealt,
    DamageReceived,
    RemoteRepairDealt,
    RemoteRepairReceived,
}

impl CombatEventKind {
    pub const ALL: [CombatEventKind; 4] = [
        Self::DamageDealt,
        Self::DamageReceived,
        Self::RemoteRepairDealt,
        Self::RemoteRepairReceived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DamageDealt => "DamageDealt",
            Self::DamageReceived => "DamageReceived",
            Self::RemoteRepairDealt => "RemoteRepairDealt",
            Self::RemoteRepairReceived => "RemoteRepairReceived",
        }
    }
}

impl fmt::Display for CombatEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown combat event kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for CombatEventKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

// COMBAT EVENT //

/// Damage applied by one party to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Damage {
    pub attacker: String,
    pub target: String,
    pub weapon: String,
    pub quality: HitQuality,
    pub damage: f64,

    // only the pet "inflicts" form carries a damage type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
}

/// Remote shield or armor repair between two ships
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repair {
    pub source: String,
    pub target: String,
    pub amount: f64,
    pub weapon: String,
    pub layer: RepairLayer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum EventDetail {
    DamageDealt(Damage),
    DamageReceived(Damage),
    RemoteRepairDealt(Repair),
    RemoteRepairReceived(Repair),
}

/// One classified line of a combat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEvent {
    pub timestamp: DateTime<Utc>,

    #[serde(flatten)]
    pub detail: EventDetail,
}

impl CombatEvent {
    pub fn kind(&self) -> CombatEventKind {
        match self.detail {
            EventDetail::DamageDealt(_) => CombatEventKind::DamageDealt,
            EventDetail::DamageReceived(_) => CombatEventKind::DamageReceived,
            EventDetail::RemoteRepairDealt(_) => CombatEventKind::RemoteRepairDealt,
            EventDetail::RemoteRepairReceived(_) => CombatEventKind::RemoteRepairReceived,
        }
    }

    /// damage for damage events, amount for repairs
    pub fn value(&self) -> f64 {
        match &self.detail {
            EventDetail::DamageDealt(d) | EventDetail::DamageReceived(d) => d.damage,
            EventDetail::RemoteRepairDealt(r) | EventDetail::RemoteRepairReceived(r) => r.amount,
        }
    }

    /// attacker for damage, source for repairs
    pub fn actor(&self) -> &str {
        match &self.detail {
            EventDetail::DamageDealt(d) | EventDetail::DamageReceived(d) => &d.attacker,
            EventDetail::RemoteRepairDealt(r) | EventDetail::RemoteRepairReceived(r) => &r.source,
        }
    }

    pub fn target(&self) -> &str {
        match &self.detail {
            EventDetail::DamageDealt(d) | EventDetail::DamageReceived(d) => &d.target,
            EventDetail::RemoteRepairDealt(r) | EventDetail::RemoteRepairReceived(r) => &r.target,
        }
    }

    /// The other party from the log owner's point of view
    pub fn counterpart(&self) -> &str {
        match self.kind() {
            CombatEventKind::DamageDealt | CombatEventKind::RemoteRepairDealt => self.target(),
            CombatEventKind::DamageReceived | CombatEventKind::RemoteRepairReceived => self.actor(),
        }
    }

    pub fn weapon(&self) -> &str {
        match &self.detail {
            EventDetail::DamageDealt(d) | EventDetail::DamageReceived(d) => &d.weapon,
            EventDetail::RemoteRepairDealt(r) | EventDetail::RemoteRepairReceived(r) => &r.weapon,
        }
    }

    pub fn quality(&self) -> Option<HitQuality> {
        match &self.detail {
            EventDetail::DamageDealt(d) | EventDetail::DamageReceived(d) => Some(d.quality),
            _ => None,
        }
    }

    pub fn damage_type(&self) -> Option<&str> {
        match &self.detail {
            EventDetail::DamageDealt(d) | EventDetail::DamageReceived(d) => d.damage_type.as_deref(),
            _ => None,
        }
    }
}

// PERSISTENCE //

// A whole parsed upload as published from the api to the worker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatLogUpload {
    pub session_id: Uuid,            // one session per uploaded log
    pub uploader_id: String,         // discord id of the uploader
    pub uploaded_at: DateTime<Utc>,
    pub events: Vec<CombatEvent>,
}

impl CombatLogUpload {
    pub fn new(uploader_id: impl Into<String>, events: Vec<CombatEvent>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            uploader_id: uploader_id.into(),
            uploaded_at: Utc::now(),
            events,
        }
    }

    /// flatten into one storage row per event, keeping event order
    pub fn rows(&self) -> Vec<CombatEventRow> {
        self.events
            .iter()
            .map(|event| CombatEventRow::from_event(self.session_id, &self.uploader_id, event))
            .collect()
    }
}

// one stored row per combat event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatEventRow {
    pub session_id: Uuid,
    pub uploader_id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: CombatEventKind,
    pub attacker: String, // attacker or repair source
    pub target: String,
    pub weapon: String,
    pub amount: f64, // damage or repaired amount
    #[serde(default)]
    pub damage_type: Option<String>,
}

impl CombatEventRow {
    pub fn from_event(session_id: Uuid, uploader_id: &str, event: &CombatEvent) -> Self {
        Self {
            session_id,
            uploader_id: uploader_id.to_string(),
            timestamp: event.timestamp,
            kind: event.kind(),
            attacker: event.actor().to_string(),
            target: event.target().to_string(),
            weapon: event.weapon().to_string(),
            amount: event.value(),
            damage_type: event.damage_type().map(str::to_string),
        }
    }
}
