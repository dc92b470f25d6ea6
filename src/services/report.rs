// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Markdown report rendering.
//!
//! Section order is fixed: title and summary, totals, one subsection per
//! category, highlights, consistency (running profile only), footer.

use std::fmt::Write;

use chrono::{NaiveDate, Utc};

use crate::models::{
    ActivityHighlight, AggregatedStats, CategoryBreakdown, ConsistencyStats, Highlights, Totals,
};
use crate::units::{format_date, format_duration, format_pace, format_thousands};

const DEFAULT_GLYPH: &str = "🏅";

/// Display glyph for a category label.
pub fn category_glyph(category: &str) -> &'static str {
    match category {
        "Run" | "TrailRun" | "VirtualRun" => "🏃",
        "Ride" | "VirtualRide" | "EBikeRide" => "🚴",
        "MountainBikeRide" | "GravelRide" | "EMountainBikeRide" => "🚵",
        "Walk" => "🚶",
        "Hike" => "🥾",
        "Swim" => "🏊",
        "Rowing" | "VirtualRow" | "Canoeing" | "Kayaking" => "🚣",
        "AlpineSki" | "BackcountrySki" | "NordicSki" => "⛷️",
        "Snowboard" => "🏂",
        "Snowshoe" => "❄️",
        "IceSkate" => "⛸️",
        "RockClimbing" => "🧗",
        "WeightTraining" | "Workout" | "Crossfit" => "🏋️",
        "Yoga" | "Pilates" => "🧘",
        "Golf" => "⛳",
        "Surfing" | "Windsurf" | "Kitesurf" => "🏄",
        _ => DEFAULT_GLYPH,
    }
}

/// Render the report, stamped with today's UTC date.
pub fn render(stats: &AggregatedStats) -> String {
    render_at(stats, Utc::now().date_naive())
}

/// Render the report with an explicit "generated on" date.
pub fn render_at(stats: &AggregatedStats, generated_on: NaiveDate) -> String {
    let mut out = String::new();

    write_header(&mut out, stats);
    write_totals(&mut out, &stats.totals);
    write_categories(&mut out, &stats.categories);
    write_highlights(&mut out, &stats.highlights);
    if let Some(ref consistency) = stats.consistency {
        write_consistency(&mut out, consistency);
    }

    let _ = write!(
        out,
        "---\n\n_Generated on {} from Strava data._\n",
        format_date(generated_on)
    );
    out
}

fn write_header(out: &mut String, stats: &AggregatedStats) {
    let glyph = if stats.profile.has_consistency_stats() {
        "🏃"
    } else {
        "📊"
    };
    let _ = writeln!(out, "# {} {}\n", glyph, stats.profile.title(stats.year));

    if stats.is_empty() {
        let _ = writeln!(out, "No activities recorded in {}.\n", stats.year);
        return;
    }

    let t = &stats.totals;
    let _ = writeln!(
        out,
        "**{}** {} covering **{:.1} mi** in **{}** with **{} ft** of climbing.\n",
        t.count,
        if t.count == 1 { "activity" } else { "activities" },
        t.distance_miles,
        format_duration(t.moving_minutes as f64 * 60.0),
        format_thousands(t.elevation_feet as i64),
    );
}

fn write_totals(out: &mut String, totals: &Totals) {
    out.push_str("## Totals\n\n");
    out.push_str("| Metric | Value |\n|---|---|\n");
    write_totals_rows(out, totals, false);
    out.push('\n');
}

/// Table rows for a set of totals; zero distance/elevation rows are
/// optionally skipped.
fn write_totals_rows(out: &mut String, totals: &Totals, skip_zero: bool) {
    let _ = writeln!(out, "| Activities | {} |", totals.count);
    if !(skip_zero && totals.distance_miles == 0.0) {
        let _ = writeln!(out, "| Distance | {:.1} mi |", totals.distance_miles);
    }
    let _ = writeln!(
        out,
        "| Moving time | {} |",
        format_duration(totals.moving_minutes as f64 * 60.0)
    );
    if !(skip_zero && totals.elevation_feet == 0) {
        let _ = writeln!(
            out,
            "| Elevation gain | {} ft |",
            format_thousands(totals.elevation_feet as i64)
        );
    }
}

fn write_categories(out: &mut String, categories: &[CategoryBreakdown]) {
    if categories.is_empty() {
        return;
    }

    out.push_str("## By Activity Type\n\n");
    for category in categories {
        let _ = writeln!(
            out,
            "### {} {}\n",
            category_glyph(&category.category),
            category.category
        );
        out.push_str("| Metric | Value |\n|---|---|\n");
        write_totals_rows(out, &category.totals, true);
        if let Some(ref effort) = category.average_effort {
            let _ = writeln!(out, "| Average | {} |", effort);
        }
        if let Some(ref longest) = category.longest {
            if longest.distance_miles > 0.0 {
                let _ = writeln!(
                    out,
                    "| Longest | {} ({:.1} mi) |",
                    longest.name, longest.distance_miles
                );
            }
        }
        out.push('\n');
    }
}

fn write_highlights(out: &mut String, highlights: &Highlights) {
    if *highlights == Highlights::default() {
        return;
    }

    out.push_str("## Highlights\n\n");
    if let Some(ref a) = highlights.longest_by_distance {
        let _ = writeln!(out, "- **Longest distance:** {}", describe(a));
    }
    if let Some(ref a) = highlights.longest_by_time {
        let _ = writeln!(out, "- **Longest moving time:** {}", describe(a));
    }
    if let Some(ref day) = highlights.busiest_day {
        let _ = writeln!(
            out,
            "- **Busiest day:** {} with {} {}",
            format_date(day.date),
            day.count,
            if day.count == 1 { "activity" } else { "activities" }
        );
    }
    if let Some(ref c) = highlights.most_frequent_category {
        let _ = writeln!(
            out,
            "- **Favorite activity:** {} {} ({} times)",
            category_glyph(&c.category),
            c.category,
            c.count
        );
    }
    out.push('\n');
}

fn write_consistency(out: &mut String, consistency: &ConsistencyStats) {
    if *consistency == ConsistencyStats::default() {
        return;
    }

    out.push_str("## Consistency\n\n");
    if let Some(ref best) = consistency.fastest_5k {
        let _ = writeln!(
            out,
            "- **Fastest 5K (estimated):** {} from {}",
            format_duration(best.seconds),
            describe(&best.activity)
        );
    }
    if let Some(ref best) = consistency.fastest_pace {
        let _ = writeln!(
            out,
            "- **Fastest pace (3+ mi):** {} from {}",
            format_pace(best.seconds),
            describe(&best.activity)
        );
    }
    if let Some(ref streak) = consistency.longest_streak {
        let _ = writeln!(
            out,
            "- **Longest streak:** {} {} ({} to {})",
            streak.days,
            if streak.days == 1 { "day" } else { "days" },
            format_date(streak.start),
            format_date(streak.end)
        );
    }
    if let Some(ref day) = consistency.most_common_weekday {
        let _ = writeln!(
            out,
            "- **Favorite day:** {} ({} runs)",
            day.weekday_name(),
            day.count
        );
    }
    if let Some(ref hour) = consistency.most_common_hour {
        let _ = writeln!(
            out,
            "- **Favorite start time:** {:02}:00 ({} runs)",
            hour.value, hour.count
        );
    }
    out.push('\n');
}

/// One-line description of a highlighted activity.
fn describe(a: &ActivityHighlight) -> String {
    let mut line = format!(
        "{} {} on {}: {:.1} mi in {}",
        category_glyph(&a.category),
        a.name,
        format_date(a.date),
        a.distance_miles,
        format_duration(a.moving_seconds as f64)
    );
    if let Some(ref effort) = a.effort {
        let _ = write!(line, " ({})", effort);
    }
    line
}
