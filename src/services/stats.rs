// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Aggregation engine.
//!
//! `compute_stats` is pure and total: an empty record set yields zero
//! totals and absent highlights. Each highlight is a separate fold over the
//! records with a first-wins tie break, so ties always resolve to the
//! earliest record (or the earliest-seen key) in input order.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate, Timelike};

use crate::models::{
    ActivityHighlight, ActivityRecord, AggregatedStats, BusiestDay, CategoryBreakdown,
    CategoryCount, ConsistencyStats, HabitCount, Highlights, PaceHighlight, RecapProfile, Streak,
    Totals,
};
use crate::units::{
    meters_to_feet, meters_to_miles, round_to, seconds_to_minutes, DisplayMode, METERS_PER_5K,
    METERS_PER_MILE,
};

/// Minimum distance for the fastest-pace highlight.
const FASTEST_PACE_MIN_METERS: f64 = 3.0 * METERS_PER_MILE;

/// Compute the year's statistics for `profile`.
pub fn compute_stats(
    records: &[ActivityRecord],
    year: i32,
    profile: RecapProfile,
) -> AggregatedStats {
    let categories = category_breakdown(records);

    let highlights = Highlights {
        longest_by_distance: longest_by_distance(records).map(highlight),
        longest_by_time: longest_by_time(records).map(highlight),
        busiest_day: busiest_day(records),
        most_frequent_category: categories.first().map(|c| CategoryCount {
            category: c.category.clone(),
            count: c.totals.count,
        }),
    };

    let consistency = profile
        .has_consistency_stats()
        .then(|| consistency_stats(records));

    AggregatedStats {
        year,
        profile,
        totals: totals(records),
        categories,
        highlights,
        consistency,
    }
}

/// Raw sums, converted and rounded only once at the end.
#[derive(Debug, Default)]
struct RawTotals {
    count: u32,
    distance_meters: f64,
    moving_seconds: f64,
    elevation_meters: f64,
}

impl RawTotals {
    fn add(&mut self, record: &ActivityRecord) {
        self.count += 1;
        self.distance_meters += record.distance;
        self.moving_seconds += record.moving_seconds();
        self.elevation_meters += record.total_elevation_gain;
    }

    fn finish(&self) -> Totals {
        Totals {
            count: self.count,
            distance_miles: round_to(meters_to_miles(self.distance_meters), 1),
            moving_minutes: seconds_to_minutes(self.moving_seconds).round() as u64,
            elevation_feet: meters_to_feet(self.elevation_meters).round() as u64,
        }
    }
}

pub(crate) fn totals(records: &[ActivityRecord]) -> Totals {
    records
        .iter()
        .fold(RawTotals::default(), |mut acc, r| {
            acc.add(r);
            acc
        })
        .finish()
}

/// Per-category totals ordered by descending count.
pub(crate) fn category_breakdown(records: &[ActivityRecord]) -> Vec<CategoryBreakdown> {
    let mut order: Vec<(String, RawTotals, Option<&ActivityRecord>)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let slot = *index.entry(record.category()).or_insert_with(|| {
            order.push((record.category().to_string(), RawTotals::default(), None));
            order.len() - 1
        });
        let (_, raw, longest) = &mut order[slot];
        raw.add(record);
        if longest.map_or(true, |l| record.distance > l.distance) {
            *longest = Some(record);
        }
    }

    // sort_by is stable, so equal counts keep discovery order
    order.sort_by(|a, b| b.1.count.cmp(&a.1.count));

    order
        .into_iter()
        .map(|(category, raw, longest)| CategoryBreakdown {
            average_effort: DisplayMode::for_category(&category)
                .format_effort(raw.distance_meters, raw.moving_seconds),
            totals: raw.finish(),
            longest: longest.map(highlight),
            category,
        })
        .collect()
}

/// First record achieving the strictly greatest key.
fn first_max_by<F>(records: &[ActivityRecord], key: F) -> Option<&ActivityRecord>
where
    F: Fn(&ActivityRecord) -> f64,
{
    records
        .iter()
        .fold(None, |best: Option<(&ActivityRecord, f64)>, record| {
            let value = key(record);
            match best {
                Some((_, best_value)) if value <= best_value => best,
                _ => Some((record, value)),
            }
        })
        .map(|(record, _)| record)
}

/// First record achieving the strictly smallest key among those with one.
fn first_min_by<F>(records: &[ActivityRecord], key: F) -> Option<(&ActivityRecord, f64)>
where
    F: Fn(&ActivityRecord) -> Option<f64>,
{
    records
        .iter()
        .filter_map(|record| key(record).map(|value| (record, value)))
        .fold(None, |best: Option<(&ActivityRecord, f64)>, (record, value)| {
            match best {
                Some((_, best_value)) if value >= best_value => best,
                _ => Some((record, value)),
            }
        })
}

pub(crate) fn longest_by_distance(records: &[ActivityRecord]) -> Option<&ActivityRecord> {
    first_max_by(records, |r| r.distance)
}

pub(crate) fn longest_by_time(records: &[ActivityRecord]) -> Option<&ActivityRecord> {
    first_max_by(records, |r| r.moving_seconds())
}

/// Local calendar date with the most activities.
pub(crate) fn busiest_day(records: &[ActivityRecord]) -> Option<BusiestDay> {
    let mut order: Vec<(NaiveDate, u32)> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for record in records {
        let date = record.local_date();
        let slot = *index.entry(date).or_insert_with(|| {
            order.push((date, 0));
            order.len() - 1
        });
        order[slot].1 += 1;
    }

    order
        .into_iter()
        .fold(None, |best: Option<BusiestDay>, (date, count)| match best {
            Some(ref b) if count <= b.count => best,
            _ => Some(BusiestDay { date, count }),
        })
}

fn consistency_stats(records: &[ActivityRecord]) -> ConsistencyStats {
    ConsistencyStats {
        fastest_5k: fastest_5k(records),
        fastest_pace: fastest_pace(records),
        longest_streak: longest_streak(records),
        most_common_weekday: most_common(records, 7, |r| {
            r.start_date_local.weekday().num_days_from_sunday()
        }),
        most_common_hour: most_common(records, 24, |r| r.start_date_local.hour()),
    }
}

/// Fastest 5K, scaled linearly from each qualifying activity's average pace.
///
/// This is an estimate from the whole activity, not a best 5K split.
pub(crate) fn fastest_5k(records: &[ActivityRecord]) -> Option<PaceHighlight> {
    first_min_by(records, |r| {
        (r.distance >= METERS_PER_5K && r.moving_time > 0)
            .then(|| r.moving_seconds() / r.distance * METERS_PER_5K)
    })
    .map(|(record, seconds)| PaceHighlight {
        activity: highlight(record),
        seconds,
    })
}

/// Fastest average pace (seconds per mile) over runs of three miles or more.
pub(crate) fn fastest_pace(records: &[ActivityRecord]) -> Option<PaceHighlight> {
    first_min_by(records, |r| {
        (r.distance >= FASTEST_PACE_MIN_METERS && r.moving_time > 0)
            .then(|| r.moving_seconds() / meters_to_miles(r.distance))
    })
    .map(|(record, seconds)| PaceHighlight {
        activity: highlight(record),
        seconds,
    })
}

/// Longest run of consecutive local dates; any larger gap restarts at 1.
pub(crate) fn longest_streak(records: &[ActivityRecord]) -> Option<Streak> {
    let dates: BTreeSet<NaiveDate> = records.iter().map(ActivityRecord::local_date).collect();

    let mut best: Option<Streak> = None;
    let mut current: Option<Streak> = None;

    for date in dates {
        current = match current {
            Some(s) if (date - s.end).num_days() == 1 => Some(Streak {
                days: s.days + 1,
                end: date,
                ..s
            }),
            _ => Some(Streak {
                days: 1,
                start: date,
                end: date,
            }),
        };

        if let Some(ref c) = current {
            if best.as_ref().map_or(true, |b| c.days > b.days) {
                best = Some(c.clone());
            }
        }
    }

    best
}

/// Frequency mode over `0..buckets`, ties going to the lower value.
pub(crate) fn most_common<F>(records: &[ActivityRecord], buckets: usize, key: F) -> Option<HabitCount>
where
    F: Fn(&ActivityRecord) -> u32,
{
    if records.is_empty() {
        return None;
    }

    let mut counts = vec![0u32; buckets];
    for record in records {
        if let Some(slot) = counts.get_mut(key(record) as usize) {
            *slot += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .fold(None, |best: Option<HabitCount>, (value, count)| match best {
            Some(ref b) if count <= b.count => best,
            _ => Some(HabitCount {
                value: value as u32,
                count,
            }),
        })
}

fn highlight(record: &ActivityRecord) -> ActivityHighlight {
    let category = record.category().to_string();
    ActivityHighlight {
        id: record.id,
        name: record.name.clone(),
        effort: DisplayMode::for_category(&category)
            .format_effort(record.distance, record.moving_seconds()),
        category,
        date: record.local_date(),
        distance_miles: round_to(meters_to_miles(record.distance), 1),
        moving_seconds: record.moving_time,
    }
}
