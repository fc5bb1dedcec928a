use chrono::{Days, NaiveDate};
use covid_dash::states::StateNames;
use covid_dash::stats::{aggregate, rank_and_select, DailyRecord, Metric, PopulationRecord};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const CODES: [&str; 12] = [
    "CA", "TX", "FL", "NY", "PA", "IL", "OH", "GA", "NC", "MI", "VT", "WY",
];

fn synth_data(days: u64) -> (Vec<DailyRecord>, Vec<PopulationRecord>) {
    let start = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
    let names = StateNames::new();

    let mut records = Vec::with_capacity(CODES.len() * days as usize);
    for day in 0..days {
        let date = start.checked_add_days(Days::new(day)).unwrap();
        for (i, code) in CODES.iter().enumerate() {
            records.push(DailyRecord {
                state: code.to_string(),
                submission_date: date,
                new_cases: (day as i64 * 31 + i as i64 * 7) % 5000,
                new_deaths: (day as i64 * 13 + i as i64 * 3) % 100,
            });
        }
    }

    let populations = CODES
        .iter()
        .enumerate()
        .map(|(i, code)| PopulationRecord {
            state: names.full_name(code).unwrap().to_string(),
            population: 500_000 + i as u64 * 3_000_000,
        })
        .collect();

    (records, populations)
}

fn bench_aggregate(c: &mut Criterion) {
    let (records, populations) = synth_data(730);
    let names = StateNames::new();

    c.bench_function("aggregate_unfiltered", |b| {
        b.iter(|| {
            aggregate(
                black_box(&records),
                black_box(&populations),
                None,
                |code| names.full_name(code),
            )
        })
    });

    let range = Some((
        NaiveDate::from_ymd_opt(2020, 9, 1).unwrap(),
        NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
    ));
    c.bench_function("aggregate_filtered", |b| {
        b.iter(|| {
            aggregate(
                black_box(&records),
                black_box(&populations),
                black_box(range),
                |code| names.full_name(code),
            )
        })
    });

    let aggregates = aggregate(&records, &populations, None, |code| names.full_name(code));
    c.bench_function("rank_top_ten", |b| {
        b.iter(|| {
            rank_and_select(
                black_box(aggregates.clone()),
                Metric::RelCases,
                true,
                10,
            )
        })
    });
}

criterion_group!(benches, bench_aggregate);
criterion_main!(benches);
