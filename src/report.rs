//! Range filtering and aggregation of timers for reports, plus the daily
//! goal thresholds drawn against them.
use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use log::warn;

use crate::dates;
use crate::types::{Category, Goals, Timer};

/// Default y-axis ceiling of the weekly chart, in hours.
pub const DEFAULT_CHART_MAX_HOURS: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DayTotal {
    pub weekday: Weekday,
    pub hours: f64,
}

/// Hours per weekday, ordered Monday to Sunday. Days without timers are absent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WeeklyReport {
    pub days: Vec<DayTotal>,
}

impl WeeklyReport {
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_hours(&self) -> f64 {
        self.days.iter().map(|day| day.hours).sum()
    }
}

/// The seven-day window starting at `start`, both ends inclusive.
pub fn week_range(start: NaiveDate) -> (NaiveDate, NaiveDate) {
    (start, start + Duration::days(6))
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Timers dated within `[start, end]`. Timers whose date does not parse are
/// skipped.
pub fn timers_in_range<'a>(
    timers: &'a [Timer],
    start: NaiveDate,
    end: NaiveDate,
) -> impl Iterator<Item = (NaiveDate, &'a Timer)> + 'a {
    timers.iter().filter_map(move |timer| match dates::parse_date(&timer.date) {
        Ok(date) if date >= start && date <= end => Some((date, timer)),
        Ok(_) => None,
        Err(_) => {
            warn!(
                "event=skip_timer module=report reason=bad_date date={:?}",
                timer.date
            );
            None
        }
    })
}

/// Sums timer hours per weekday for timers dated within `[start, end]`.
pub fn weekday_totals(timers: &[Timer], start: NaiveDate, end: NaiveDate) -> WeeklyReport {
    let mut buckets: BTreeMap<u32, (Weekday, f64)> = BTreeMap::new();
    for (date, timer) in timers_in_range(timers, start, end) {
        let weekday = date.weekday();
        let entry = buckets
            .entry(weekday.num_days_from_monday())
            .or_insert((weekday, 0.0));
        entry.1 += timer.hours;
    }
    WeeklyReport {
        days: buckets
            .into_values()
            .map(|(weekday, hours)| DayTotal { weekday, hours })
            .collect(),
    }
}

/// Copies of `categories` with `total_hours` recomputed from the timers dated
/// within `[start, end]` whose category matches by name.
pub fn category_totals(
    categories: &[Category],
    timers: &[Timer],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Category> {
    let in_range: Vec<&Timer> = timers_in_range(timers, start, end)
        .map(|(_, timer)| timer)
        .collect();
    categories
        .iter()
        .map(|category| Category {
            total_hours: in_range
                .iter()
                .filter(|timer| timer.category == category.name)
                .map(|timer| timer.hours)
                .sum(),
            ..category.clone()
        })
        .collect()
}

/// Parses a goal threshold. Blank or non-numeric input means "no goal".
pub fn parse_goal(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|hours| hours.is_finite())
}

impl Goals {
    /// `(min, max)` thresholds, each `None` when unset or unparsable.
    pub fn thresholds(&self) -> (Option<f64>, Option<f64>) {
        (parse_goal(&self.min_goal), parse_goal(&self.max_goal))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GoalStatus {
    Unset,
    Below,
    Within,
    Above,
}

impl GoalStatus {
    pub fn classify(hours: f64, min: Option<f64>, max: Option<f64>) -> Self {
        match (min, max) {
            (None, None) => GoalStatus::Unset,
            (Some(min), _) if hours < min => GoalStatus::Below,
            (_, Some(max)) if hours > max => GoalStatus::Above,
            _ => GoalStatus::Within,
        }
    }
}

/// Rounds to the nearest half hour, the resolution of the report bars.
pub fn round_to_half_hour(hours: f64) -> f64 {
    (hours * 2.0).round() / 2.0
}

/// Number of cells a bar of `width` fills for `hours` on a `max_hours` axis.
pub fn bar_cells(hours: f64, max_hours: f64, width: usize) -> usize {
    if max_hours <= 0.0 {
        return 0;
    }
    let ratio = (round_to_half_hour(hours) / max_hours).clamp(0.0, 1.0);
    (ratio * width as f64).round() as usize
}
