//! Rule lookup for tag and date styling.

use std::cmp::Ordering;

use chrono::{Duration, Months, NaiveDateTime, Timelike};
use indexmap::IndexMap;

use crate::model::settings::{DateColor, Direction, TagColor, TimeUnit};

/// Tag styling keyed by tag string. The first rule for a tag wins.
#[derive(Debug, Clone, Default)]
pub struct TagColorResolver {
    rules: IndexMap<String, TagColor>,
}

impl TagColorResolver {
    pub fn new(rules: &[TagColor]) -> Self {
        let mut map = IndexMap::new();
        for rule in rules.iter().filter(|r| !r.tag_key.is_empty()) {
            map.entry(rule.tag_key.clone()).or_insert_with(|| rule.clone());
        }
        TagColorResolver { rules: map }
    }

    pub fn resolve(&self, tag: &str) -> Option<&TagColor> {
        self.rules.get(tag)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// What a date rule compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DateKey {
    Today,
    Before,
    After,
    /// `now` shifted by the rule's distance
    Offset(NaiveDateTime),
}

/// Date styling rules ordered by specificity, evaluated against a fixed `now`.
#[derive(Debug, Clone)]
pub struct DateColorResolver {
    now: NaiveDateTime,
    rules: Vec<(DateKey, DateColor)>,
}

impl DateColorResolver {
    pub fn new(rules: &[DateColor], now: NaiveDateTime) -> Self {
        let mut keyed: Vec<(DateKey, DateColor)> = rules
            .iter()
            .filter_map(|rule| match date_key(rule, now) {
                Some(key) => Some((key, rule.clone())),
                None => {
                    tracing::warn!(distance = rule.distance, unit = ?rule.unit, "date rule out of range; skipping");
                    None
                }
            })
            .collect();

        // Stable sort keeps configured order among equal keys
        keyed.sort_by(|(a, _), (b, _)| compare_keys(a, b, now));
        DateColorResolver { now, rules: keyed }
    }

    /// The first rule matching `date`, if any.
    pub fn resolve(&self, date: NaiveDateTime) -> Option<&DateColor> {
        self.rules
            .iter()
            .find(|(key, rule)| self.matches(key, rule, date))
            .map(|(_, rule)| rule)
    }

    fn matches(&self, key: &DateKey, rule: &DateColor, date: NaiveDateTime) -> bool {
        match key {
            DateKey::Today => date.date() == self.now.date(),
            DateKey::After => date > self.now,
            DateKey::Before => date < self.now,
            DateKey::Offset(target) => {
                let (lo, hi) = match rule.direction {
                    Direction::Before => (*target, self.now),
                    Direction::After => (self.now, *target),
                };
                if rule.unit == TimeUnit::Hours {
                    let (lo, hi, date) = (to_hour(lo), to_hour(hi), to_hour(date));
                    lo <= date && date <= hi
                } else {
                    lo.date() <= date.date() && date.date() <= hi.date()
                }
            }
        }
    }
}

fn date_key(rule: &DateColor, now: NaiveDateTime) -> Option<DateKey> {
    if rule.is_today {
        return Some(DateKey::Today);
    }
    if rule.is_before {
        return Some(DateKey::Before);
    }
    if rule.is_after {
        return Some(DateKey::After);
    }

    let distance = rule.distance;
    let target = match (rule.unit, rule.direction) {
        (TimeUnit::Months, Direction::Before) => now.checked_sub_months(Months::new(distance)),
        (TimeUnit::Months, Direction::After) => now.checked_add_months(Months::new(distance)),
        (unit, direction) => {
            let span = match unit {
                TimeUnit::Hours => Duration::try_hours(i64::from(distance))?,
                TimeUnit::Weeks => Duration::try_weeks(i64::from(distance))?,
                _ => Duration::try_days(i64::from(distance))?,
            };
            match direction {
                Direction::Before => now.checked_sub_signed(span),
                Direction::After => now.checked_add_signed(span),
            }
        }
    }?;
    Some(DateKey::Offset(target))
}

/// Same-day offsets first, then `today`, then other offsets ascending, then
/// the open-ended before/after rules.
fn compare_keys(a: &DateKey, b: &DateKey, now: NaiveDateTime) -> Ordering {
    fn rank(key: &DateKey, now: NaiveDateTime) -> u8 {
        match key {
            DateKey::Offset(d) if d.date() == now.date() => 0,
            DateKey::Today => 1,
            DateKey::Offset(_) => 2,
            DateKey::Before | DateKey::After => 3,
        }
    }

    match rank(a, now).cmp(&rank(b, now)) {
        Ordering::Equal => match (a, b) {
            (DateKey::Offset(x), DateKey::Offset(y)) => x.cmp(y),
            _ => Ordering::Equal,
        },
        other => other,
    }
}

fn to_hour(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_minute(0)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}
