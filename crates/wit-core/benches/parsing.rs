//! Benchmark for combat log parsing operations
//! Run: cargo bench -p wit-core --bench parsing

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use wit_core::parser::{CombatLogParser, EventClassifier, LineFilter};
use wit_core::{parse_combat_log, CombatSummary};

// Sample log lines for benchmarking
const DEALT_LINE: &str = r#"[ 2024.05.01 20:15:03 ] (combat) <color=0xff00ffff><b>500</b> <color=0x77ffffff><font size=10>to</font> <b><color=0xffffffff>Rogue Drone</b><font size=10><color=0x77ffffff> - Light Neutron Blaster II - Hits"#;
const RECEIVED_CONTENT: &str = "300 from Hostile Frigate - Penetrates";
const REPAIR_CONTENT: &str = "150 remote armor repaired by Logi Pilot - Large Armor Repairer";
const UNMATCHED_CONTENT: &str = "You are now able to activate your cloak";

fn bench_line_filter(c: &mut Criterion) {
    let filter = LineFilter::new();

    c.bench_function("line_filter_markup", |b| {
        b.iter(|| filter.match_line(black_box(DEALT_LINE)))
    });
}

fn bench_classifier(c: &mut Criterion) {
    let classifier = EventClassifier::new();

    let mut group = c.benchmark_group("classifier");

    group.bench_function("received_quality", |b| {
        b.iter(|| classifier.classify(black_box(RECEIVED_CONTENT)))
    });

    // last rule in the table
    group.bench_function("repair_received", |b| {
        b.iter(|| classifier.classify(black_box(REPAIR_CONTENT)))
    });

    // falls through every rule
    group.bench_function("unmatched", |b| {
        b.iter(|| classifier.classify(black_box(UNMATCHED_CONTENT)))
    });

    group.finish();
}

fn session_log(lines: usize) -> String {
    (0..lines)
        .map(|i| match i % 4 {
            0 => format!(
                "[ 2024.05.01 20:{:02}:{:02} ] (combat) {} to Rogue Drone {} - Light Neutron Blaster II - Hits",
                (i / 60) % 60, i % 60, 100 + i, i % 7
            ),
            1 => format!(
                "[ 2024.05.01 20:{:02}:{:02} ] (combat) {} from Hostile Frigate - Penetrates",
                (i / 60) % 60, i % 60, 50 + i
            ),
            2 => format!(
                "[ 2024.05.01 20:{:02}:{:02} ] (notify) Your Hobgoblin II is returning to your drone bay.",
                (i / 60) % 60, i % 60
            ),
            _ => format!(
                "[ 2024.05.01 20:{:02}:{:02} ] (combat) 1,{:03} remote shield boosted to Ally Cruiser - Large Remote Shield Booster II",
                (i / 60) % 60, i % 60, i % 1000
            ),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_full_log(c: &mut Criterion) {
    let parser = CombatLogParser::new();

    // Generate logs of increasing session length
    let sizes = [100, 1000, 10000];

    let mut group = c.benchmark_group("full_log");

    for size in sizes {
        let text = session_log(size);

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("owned_parser", size), &text, |b, text| {
            b.iter(|| parser.parse(black_box(text)))
        });
        group.bench_with_input(BenchmarkId::new("shared_parser", size), &text, |b, text| {
            b.iter(|| parse_combat_log(black_box(text)))
        });
    }

    group.finish();
}

fn bench_summary(c: &mut Criterion) {
    let events = parse_combat_log(&session_log(10000));

    let mut group = c.benchmark_group("summary");

    group.bench_function("from_events_10000", |b| {
        b.iter(|| CombatSummary::from_events(black_box(&events)))
    });

    let summary = CombatSummary::from_events(&events);
    group.bench_function("summary_to_json", |b| {
        b.iter(|| serde_json::to_string(black_box(&summary)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_line_filter,
    bench_classifier,
    bench_full_log,
    bench_summary,
);

criterion_main!(benches);
