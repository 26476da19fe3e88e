// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! 5-field crontab parsing and evaluation (§4.8a): `minute hour
//! day-of-month month day-of-week`, standard Unix semantics. `*`, comma
//! lists, `a-b` ranges, and `*/n` steps are supported per field;
//! day-of-month and day-of-week are OR'd together when both are
//! restricted, matching cron convention.

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    #[error("expected 5 fields (minute hour dom month dow), got {0}")]
    WrongFieldCount(usize),
    #[error("malformed field '{field}': {reason}")]
    MalformedField { field: String, reason: String },
}

/// The set of values a single field accepts, plus whether it was written as
/// `*` — needed to implement the dom/dow OR-vs-AND rule, which depends on
/// whether each field was restricted at all, not just which values it
/// contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet {
    values: BTreeSet<u32>,
    is_wildcard: bool,
}

impl FieldSet {
    fn contains(&self, value: u32) -> bool {
        self.values.contains(&value)
    }
}

fn parse_field(raw: &str, min: u32, max: u32) -> Result<FieldSet, CronError> {
    if raw == "*" {
        return Ok(FieldSet {
            values: (min..=max).collect(),
            is_wildcard: true,
        });
    }

    let mut values = BTreeSet::new();
    for part in raw.split(',') {
        let malformed = |reason: &str| CronError::MalformedField {
            field: raw.to_string(),
            reason: reason.to_string(),
        };

        let (range_part, step) = match part.split_once('/') {
            Some((r, s)) => (
                r,
                s.parse::<u32>().map_err(|_| malformed("invalid step"))?,
            ),
            None => (part, 1),
        };
        if step == 0 {
            return Err(malformed("step cannot be zero"));
        }

        let (lo, hi) = if range_part == "*" {
            (min, max)
        } else if let Some((a, b)) = range_part.split_once('-') {
            let a: u32 = a.parse().map_err(|_| malformed("invalid range start"))?;
            let b: u32 = b.parse().map_err(|_| malformed("invalid range end"))?;
            if a > b || a < min || b > max {
                return Err(malformed("range out of bounds"));
            }
            (a, b)
        } else {
            let v: u32 = range_part.parse().map_err(|_| malformed("invalid value"))?;
            if v < min || v > max {
                return Err(malformed("value out of bounds"));
            }
            (v, v)
        };

        let mut v = lo;
        while v <= hi {
            values.insert(v);
            v += step;
        }
    }

    if values.is_empty() {
        return Err(CronError::MalformedField {
            field: raw.to_string(),
            reason: "no values produced".to_string(),
        });
    }

    Ok(FieldSet {
        values,
        is_wildcard: false,
    })
}

/// A parsed crontab expression, ready to evaluate against a timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronSchedule {
    minute: FieldSet,
    hour: FieldSet,
    dom: FieldSet,
    month: FieldSet,
    dow: FieldSet,
}

pub fn parse_cron(expr: &str) -> Result<CronSchedule, CronError> {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(CronError::WrongFieldCount(fields.len()));
    }
    Ok(CronSchedule {
        minute: parse_field(fields[0], 0, 59)?,
        hour: parse_field(fields[1], 0, 23)?,
        dom: parse_field(fields[2], 1, 31)?,
        month: parse_field(fields[3], 1, 12)?,
        dow: parse_field(fields[4], 0, 6)?,
    })
}

impl CronSchedule {
    /// Whether `dt` (truncated to the minute) satisfies this schedule.
    pub fn is_due(&self, dt: &DateTime<Utc>) -> bool {
        if !self.minute.contains(dt.minute()) || !self.hour.contains(dt.hour()) {
            return false;
        }
        if !self.month.contains(dt.month()) {
            return false;
        }

        let dom_matches = self.dom.contains(dt.day());
        // chrono's Weekday::num_days_from_sunday matches cron's 0=Sunday.
        let dow_matches = self.dow.contains(dt.weekday().num_days_from_sunday());

        match (self.dom.is_wildcard, self.dow.is_wildcard) {
            (true, true) => true,
            (true, false) => dow_matches,
            (false, true) => dom_matches,
            (false, false) => dom_matches || dow_matches,
        }
    }

    /// The next minute strictly after `after` that satisfies this
    /// schedule, searched minute-by-minute up to one year out.
    pub fn next_run_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        let start = after
            .with_second(0)
            .and_then(|d| d.with_nanosecond(0))?
            + Duration::minutes(1);
        let mut candidate = start;
        let limit = start + Duration::days(366);
        while candidate < limit {
            if self.is_due(&candidate) {
                return Some(candidate);
            }
            candidate += Duration::minutes(1);
        }
        None
    }
}

#[cfg(test)]
#[path = "cron_tests.rs"]
mod tests;
