// Terminal rendering of a combat summary

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use wit_core::{CombatEventKind, CombatSummary, KindSummary, ParseStats};

/// 1234567.0 -> "1,234,567"
pub fn format_amount(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if rounded < 0 {
        format!("-{}", out)
    } else {
        out
    }
}

fn kind_label(kind: CombatEventKind) -> &'static str {
    match kind {
        CombatEventKind::DamageDealt => "Damage dealt",
        CombatEventKind::DamageReceived => "Damage received",
        CombatEventKind::RemoteRepairDealt => "Repair given",
        CombatEventKind::RemoteRepairReceived => "Repair received",
    }
}

fn counterpart_header(kind: CombatEventKind) -> &'static str {
    match kind {
        CombatEventKind::DamageDealt | CombatEventKind::RemoteRepairDealt => "Target",
        CombatEventKind::DamageReceived => "Attacker",
        CombatEventKind::RemoteRepairReceived => "Source",
    }
}

pub fn overview_table(summary: &CombatSummary) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Kind", "Events", "Total", "Per second", "Duration"]);

    for kind in CombatEventKind::ALL {
        let k = summary.kind(kind);
        table.add_row(vec![
            kind_label(kind).to_string(),
            k.count.to_string(),
            format_amount(k.total),
            format!("{:.1}", k.per_second()),
            format!("{}s", k.duration_secs()),
        ]);
    }
    table
}

pub fn breakdown_table(kind: CombatEventKind, k: &KindSummary, limit: usize) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![counterpart_header(kind), "Total", "Weapon", "Total"]);

    let counterparts = k.top_counterparts(limit);
    let weapons = k.top_weapons(limit);
    for i in 0..counterparts.len().max(weapons.len()) {
        let (who, who_total) = counterparts
            .get(i)
            .map(|(n, v)| (n.to_string(), format_amount(*v)))
            .unwrap_or_default();
        let (weapon, weapon_total) = weapons
            .get(i)
            .map(|(n, v)| (n.to_string(), format_amount(*v)))
            .unwrap_or_default();
        table.add_row(vec![who, who_total, weapon, weapon_total]);
    }
    table
}

pub fn print_summary(summary: &CombatSummary, stats: Option<&ParseStats>, limit: usize) {
    if let Some(stats) = stats {
        println!(
            "{} {} | {} {} | {} {} | {} {}",
            "Lines:".dimmed(),
            stats.total_lines.to_string().yellow(),
            "Combat:".dimmed(),
            stats.combat_lines.to_string().green(),
            "Unclassified:".dimmed(),
            stats.unclassified.to_string().yellow(),
            "Bad timestamps:".dimmed(),
            stats.invalid_timestamps.to_string().red()
        );
    }

    if let (Some(start), Some(end)) = (summary.started_at, summary.ended_at) {
        println!(
            "{} {} → {}",
            "Span:".dimmed(),
            start.format("%Y-%m-%d %H:%M:%S"),
            end.format("%H:%M:%S")
        );
    }

    println!("\n{table}", table = overview_table(summary));

    for kind in CombatEventKind::ALL {
        let k = summary.kind(kind);
        if k.count == 0 {
            continue;
        }
        println!("\n{}", kind_label(kind).cyan().bold());
        println!("{}", breakdown_table(kind, k, limit));

        if !k.by_quality.is_empty() {
            let hits: Vec<String> = k
                .by_quality
                .iter()
                .map(|(q, n)| format!("{} {}", q, n))
                .collect();
            println!("  {} {}", "Hit quality:".dimmed(), hits.join(", "));
        }
    }

    if !summary.participants.is_empty() {
        let names: Vec<&str> = summary.participants.iter().map(String::as_str).collect();
        println!("\n{} {}", "Participants:".dimmed(), names.join(", ").magenta());
    }
}
