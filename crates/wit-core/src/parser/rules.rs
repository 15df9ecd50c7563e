// Event classifier - ordered rule table, first accepted match wins

use crate::{Damage, EventDetail, HitQuality, Repair, RepairLayer, UNKNOWN_WEAPON, YOU, YOU_PET};
use regex::{Captures, Regex};

const AMOUNT: &str = r"(?P<amount>\d[\d,]*(?:\.\d+)?)";
const QUALITY: &str = r"(?P<quality>wrecks|smashes|penetrates|hits|grazes|glances off)";

type Builder = fn(&Captures<'_>) -> Option<EventDetail>;

/// One grammar rule: a pattern and the event it builds
/// The builder may still reject a match (quality guard, bad number).
pub struct ClassifierRule {
    name: &'static str,
    pattern: Regex,
    build: Builder,
}

impl ClassifierRule {
    fn new(name: &'static str, pattern: &str, build: Builder) -> Self {
        let pattern = format!("(?i)^{}", pattern)
            .replace("{AMOUNT}", AMOUNT)
            .replace("{QUALITY}", QUALITY);
        Self {
            name,
            pattern: Regex::new(&pattern).expect("classifier rule pattern is valid"),
            build,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn apply(&self, content: &str) -> Option<EventDetail> {
        let caps = self.pattern.captures(content)?;
        (self.build)(&caps)
    }
}

pub struct EventClassifier {
    rules: Vec<ClassifierRule>,
}

impl EventClassifier {
    pub fn new() -> Self {
        let rules = vec![
            ClassifierRule::new(
                "dealt_weapon_quality",
                r"{AMOUNT}\s+to\s+(?P<who>.+?)\s+-\s+(?P<weapon>.+?)\s+-\s+{QUALITY}$",
                dealt,
            ),
            ClassifierRule::new(
                "dealt_quality",
                r"{AMOUNT}\s+to\s+(?P<who>.+?)\s+-\s+{QUALITY}$",
                dealt,
            ),
            ClassifierRule::new(
                "dealt_weapon",
                r"{AMOUNT}\s+to\s+(?P<who>.+?)\s+-\s+(?P<weapon>.+)$",
                dealt,
            ),
            ClassifierRule::new(
                "pet_hits",
                r"Your\s+(?P<pet>.+?)\s+hits\s+(?P<who>.+?)\s+-\s+.*?\bfor\s+{AMOUNT}",
                pet_hits,
            ),
            ClassifierRule::new(
                "pet_inflicts",
                r"Your\s+(?P<pet>.+?)\s+inflicts\s+{AMOUNT}\s+(?P<damage_type>\w+)\s+damage\s+to\s+(?P<who>.+?)\.?$",
                pet_inflicts,
            ),
            ClassifierRule::new(
                "received_weapon_quality",
                r"{AMOUNT}\s+from\s+(?P<who>.+?)\s+-\s+(?P<weapon>.+?)\s+-\s+{QUALITY}$",
                received,
            ),
            ClassifierRule::new(
                "received_quality",
                r"{AMOUNT}\s+from\s+(?P<who>.+?)\s+-\s+{QUALITY}$",
                received,
            ),
            ClassifierRule::new(
                "received_weapon",
                r"{AMOUNT}\s+from\s+(?P<who>.+?)\s+-\s+(?P<weapon>.+)$",
                received,
            ),
            ClassifierRule::new(
                "repair_dealt",
                r"{AMOUNT}\s+remote\s+(?P<layer>armor|shield)\s+(?:repaired|boosted)\s+to\s+(?P<who>.+?)(?:\s+by\s+you)?\s+-\s+(?P<weapon>.+)$",
                repair_dealt,
            ),
            ClassifierRule::new(
                "repair_received",
                r"{AMOUNT}\s+remote\s+(?P<layer>armor|shield)\s+(?:repaired|boosted)\s+by\s+(?P<who>.+?)\s+-\s+(?P<weapon>.+)$",
                repair_received,
            ),
        ];
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Try each rule in order; None when no rule accepts the content
    pub fn classify(&self, content: &str) -> Option<EventDetail> {
        self.rules.iter().find_map(|rule| rule.apply(content))
    }
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// "1,234" -> 1234.0, anything not finite and non-negative is rejected
pub fn parse_amount(s: &str) -> Option<f64> {
    s.replace(',', "")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}

fn text<'a>(caps: &'a Captures<'_>, name: &str) -> Option<&'a str> {
    caps.name(name).map(|m| m.as_str().trim()).filter(|s| !s.is_empty())
}

fn amount(caps: &Captures<'_>) -> Option<f64> {
    caps.name("amount").and_then(|m| parse_amount(m.as_str()))
}

// weapon + quality from a damage line; a weapon that is really a quality word is refused
fn weapon_and_quality(caps: &Captures<'_>) -> Option<(String, HitQuality)> {
    let quality = match text(caps, "quality") {
        Some(q) => HitQuality::from_token(q)?,
        None => HitQuality::Unknown,
    };
    let weapon = match text(caps, "weapon") {
        Some(w) if HitQuality::is_token(w) => return None,
        Some(w) => w.to_string(),
        None => UNKNOWN_WEAPON.to_string(),
    };
    Some((weapon, quality))
}

fn dealt(caps: &Captures<'_>) -> Option<EventDetail> {
    let (weapon, quality) = weapon_and_quality(caps)?;
    Some(EventDetail::DamageDealt(Damage {
        attacker: YOU.to_string(),
        target: text(caps, "who")?.to_string(),
        weapon,
        quality,
        damage: amount(caps)?,
        damage_type: None,
    }))
}

fn received(caps: &Captures<'_>) -> Option<EventDetail> {
    let (weapon, quality) = weapon_and_quality(caps)?;
    Some(EventDetail::DamageReceived(Damage {
        attacker: text(caps, "who")?.to_string(),
        target: YOU.to_string(),
        weapon,
        quality,
        damage: amount(caps)?,
        damage_type: None,
    }))
}

fn pet_hits(caps: &Captures<'_>) -> Option<EventDetail> {
    Some(EventDetail::DamageDealt(Damage {
        attacker: YOU_PET.to_string(),
        target: text(caps, "who")?.to_string(),
        weapon: text(caps, "pet")?.to_string(),
        quality: HitQuality::Hits,
        damage: amount(caps)?,
        damage_type: None,
    }))
}

fn pet_inflicts(caps: &Captures<'_>) -> Option<EventDetail> {
    Some(EventDetail::DamageDealt(Damage {
        attacker: YOU_PET.to_string(),
        target: text(caps, "who")?.to_string(),
        weapon: text(caps, "pet")?.to_string(),
        quality: HitQuality::Hits,
        damage: amount(caps)?,
        damage_type: text(caps, "damage_type").map(str::to_string),
    }))
}

fn repair(caps: &Captures<'_>) -> Option<(RepairLayer, String, f64)> {
    let layer = RepairLayer::from_word(text(caps, "layer")?)?;
    Some((layer, text(caps, "weapon")?.to_string(), amount(caps)?))
}

fn repair_dealt(caps: &Captures<'_>) -> Option<EventDetail> {
    let (layer, weapon, amount) = repair(caps)?;
    Some(EventDetail::RemoteRepairDealt(Repair {
        source: YOU.to_string(),
        target: text(caps, "who")?.to_string(),
        amount,
        weapon,
        layer,
    }))
}

fn repair_received(caps: &Captures<'_>) -> Option<EventDetail> {
    let (layer, weapon, amount) = repair(caps)?;
    Some(EventDetail::RemoteRepairReceived(Repair {
        source: text(caps, "who")?.to_string(),
        target: YOU.to_string(),
        amount,
        weapon,
        layer,
    }))
}
