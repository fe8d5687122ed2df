//! Calendar arithmetic on UTC instants interpreted in a local timezone.

use chrono::offset::LocalResult;
use chrono::offset::Offset;
use chrono::{DateTime, Datelike, Months, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use wattdf_types::{Frequency, FrequencyUnit, WattError};

const DAY: i64 = 86_400;

/// Exact length of a time delta in seconds.
#[must_use]
pub fn seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) * 1e-9
}

/// Convert a (validated, positive) duration in seconds to a time delta.
///
/// # Errors
/// Returns `WattError::InvalidTimestepDuration` if the duration is negative,
/// non-finite, or too large to be represented.
pub fn delta_from_seconds(secs: f64) -> Result<TimeDelta, WattError> {
    let invalid = || {
        WattError::InvalidTimestepDuration(format!("{secs} s is not a representable duration"))
    };
    let std = std::time::Duration::try_from_secs_f64(secs).map_err(|_| invalid())?;
    TimeDelta::from_std(std).map_err(|_| invalid())
}

// Resolve a local wall-clock time. Ambiguous times keep the offset of
// `reference`; times inside a DST gap keep the offset of `reference` too,
// which lands just after the gap.
fn resolve_local(naive: NaiveDateTime, tz: Tz, reference: DateTime<Utc>) -> DateTime<Utc> {
    let ref_offset = reference.with_timezone(&tz).offset().fix();
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(dt1, dt2) => {
            if dt1.offset().fix() == ref_offset {
                dt1.with_timezone(&Utc)
            } else {
                dt2.with_timezone(&Utc)
            }
        }
        LocalResult::None => Utc.from_utc_datetime(&(naive - ref_offset)),
    }
}

fn local_midnight(ts: DateTime<Utc>, tz: Tz, days_back: i64) -> Option<DateTime<Utc>> {
    let date = ts
        .with_timezone(&tz)
        .date_naive()
        .checked_sub_signed(TimeDelta::days(days_back))?;
    Some(resolve_local(date.and_hms_opt(0, 0, 0)?, tz, ts))
}

/// Start of the period containing `ts`.
///
/// - Sub-daily steps dividing a day are floored from local midnight; other
///   fixed steps are floored from the Unix epoch.
/// - Day, week (Monday) and month (first day) periods start at local midnight;
///   the repetition count is ignored for these units.
#[must_use]
pub fn floor(ts: DateTime<Utc>, freq: Frequency, tz: Tz) -> Option<DateTime<Utc>> {
    match freq.unit() {
        FrequencyUnit::Day => local_midnight(ts, tz, 0),
        FrequencyUnit::Week => {
            let local = ts.with_timezone(&tz);
            let days_from_monday = i64::from(local.weekday().num_days_from_monday());
            local_midnight(ts, tz, days_from_monday)
        }
        FrequencyUnit::Month => {
            let local = ts.with_timezone(&tz);
            local_midnight(ts, tz, i64::from(local.day0()))
        }
        FrequencyUnit::Second | FrequencyUnit::Minute | FrequencyUnit::Hour => {
            let step = freq.fixed_seconds()?;
            if DAY % step == 0 {
                let local = ts.with_timezone(&tz);
                let since_midnight = i64::from(local.num_seconds_from_midnight());
                let bucket = since_midnight - since_midnight.rem_euclid(step);
                let naive = local.date_naive().and_hms_opt(0, 0, 0)? + TimeDelta::seconds(bucket);
                Some(resolve_local(naive, tz, ts))
            } else {
                let bucket = ts.timestamp() - ts.timestamp().rem_euclid(step);
                DateTime::from_timestamp(bucket, 0)
            }
        }
    }
}

/// Start of the first period at or after `ts`.
#[must_use]
pub fn ceil(ts: DateTime<Utc>, freq: Frequency, tz: Tz) -> Option<DateTime<Utc>> {
    let floored = floor(ts, freq, tz)?;
    if floored == ts {
        return Some(ts);
    }
    let unit_step = match freq.unit() {
        FrequencyUnit::Day => Frequency::days(1),
        FrequencyUnit::Week => Frequency::weeks(1),
        FrequencyUnit::Month => Frequency::months(1),
        _ => freq,
    };
    advance(floored, unit_step, 1, tz)
}

/// The `k`-th instant of the grid starting at `start` and stepping by `freq`.
///
/// Calendar units step in local wall-clock time from `start` (not from the
/// previous instant), so month steps never drift after a short month.
#[must_use]
pub fn advance(start: DateTime<Utc>, freq: Frequency, k: u32, tz: Tz) -> Option<DateTime<Utc>> {
    // `fixed_seconds` already spans `count` units.
    if let Some(step) = freq.fixed_seconds() {
        let offset = step.checked_mul(i64::from(k))?;
        return start.checked_add_signed(TimeDelta::try_seconds(offset)?);
    }
    let n = i64::from(freq.count()).checked_mul(i64::from(k))?;
    let local = start.with_timezone(&tz).naive_local();
    let shifted = match freq.unit() {
        FrequencyUnit::Day => local.checked_add_signed(TimeDelta::try_days(n)?)?,
        FrequencyUnit::Week => local.checked_add_signed(TimeDelta::try_weeks(n)?)?,
        FrequencyUnit::Month => local.checked_add_months(Months::new(u32::try_from(n).ok()?))?,
        FrequencyUnit::Second | FrequencyUnit::Minute | FrequencyUnit::Hour => return None,
    };
    Some(resolve_local(shifted, tz, start))
}
