use activity_recap::models::{ActivityRecord, RecapProfile};
use activity_recap::services::compute_stats;
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const SPORTS: [&str; 5] = ["Run", "Ride", "Walk", "TrailRun", "Hike"];

/// A busy synthetic year: two activities a day for 365 days.
fn synthetic_year() -> Vec<ActivityRecord> {
    let jan1 = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");
    (0..730u64)
        .map(|i| {
            let day = jan1 + Duration::days((i / 2) as i64);
            let local = day
                .and_hms_opt(if i % 2 == 0 { 6 } else { 18 }, (i % 60) as u32, 0)
                .expect("valid time");
            let sport = SPORTS[(i % SPORTS.len() as u64) as usize];
            let distance = 2000.0 + (i % 17) as f64 * 850.0;
            let moving_time = 900 + (i % 23) * 120;
            ActivityRecord {
                id: i,
                name: format!("{} {}", sport, i),
                activity_type: sport.to_string(),
                sport_type: sport.to_string(),
                start_date: Utc.from_utc_datetime(&local),
                start_date_local: local,
                distance,
                moving_time,
                elapsed_time: moving_time + 60,
                total_elevation_gain: (i % 11) as f64 * 12.5,
                average_speed: distance / moving_time as f64,
                max_speed: distance / moving_time as f64 * 1.4,
            }
        })
        .collect()
}

fn benchmark_compute_stats(c: &mut Criterion) {
    let records = synthetic_year();
    let runs: Vec<ActivityRecord> = records
        .iter()
        .filter(|r| RecapProfile::RunningOnly.includes(r))
        .cloned()
        .collect();

    let mut group = c.benchmark_group("compute_stats");

    group.bench_function("all_activities_full_year", |b| {
        b.iter(|| compute_stats(black_box(&records), 2024, RecapProfile::AllActivities))
    });

    group.bench_function("running_only_full_year", |b| {
        b.iter(|| compute_stats(black_box(&runs), 2024, RecapProfile::RunningOnly))
    });

    group.finish();
}

criterion_group!(benches, benchmark_compute_stats);
criterion_main!(benches);
