//! Date/time phrase classification and resolution.
//!
//! A spoken phrase is first classified by two independent pattern
//! families (time tokens, date keywords), then resolved to a concrete
//! calendar timestamp. Resolution prefers future occurrences when a
//! bare weekday or year-less date is ambiguous.

use std::ops::Range;
use std::sync::LazyLock;

use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use regex::Regex;

/// Which pattern families matched a phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeParts {
    Both,
    Date,
    Time,
    None,
}

// An hour optionally followed by :MM and an am/pm marker. Bare one- and
// two-digit numbers intentionally count as time tokens, so "in 3 days"
// classifies as Both.
static TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\d{1,2}(:\d{2})?\s*(am|pm)?\b").unwrap());

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)today|tomorrow|day after tomorrow|in \d+ (days?|weeks?|months?)|next (monday|tuesday|wednesday|thursday|friday|saturday|sunday|week|month)|\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{1,2}",
    )
    .unwrap()
});

static DAY_AFTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"day after tomorrow").unwrap());
static TOMORROW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tomorrow").unwrap());
static TODAY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"today").unwrap());
static IN_OFFSET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"in (\d+) (days?|weeks?|months?)").unwrap());
static NEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"next (monday|tuesday|wednesday|thursday|friday|saturday|sunday|week|month)")
        .unwrap()
});
static MONTH_DAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(january|february|march|april|may|june|july|august|september|october|november|december)\s+(\d{1,2})\b",
    )
    .unwrap()
});
static WEEKDAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(monday|tuesday|wednesday|thursday|friday|saturday|sunday)\b").unwrap()
});
static TIME_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{1,2})(?::(\d{2}))?\s*(am|pm)?\b").unwrap());

/// Classify a phrase by its date and time pattern matches.
/// Date keywords match case-insensitively.
pub fn classify(phrase: &str) -> DateTimeParts {
    let has_time = TIME_RE.is_match(phrase);
    let has_date = DATE_RE.is_match(phrase);
    match (has_date, has_time) {
        (true, true) => DateTimeParts::Both,
        (true, false) => DateTimeParts::Date,
        (false, true) => DateTimeParts::Time,
        (false, false) => DateTimeParts::None,
    }
}

/// Pluggable natural-language timestamp resolution.
///
/// `resolve` returns `None` when the phrase cannot be parsed at all;
/// rejecting non-future results is the caller's responsibility so the
/// two conditions stay distinct user-facing messages.
pub trait ResolveDateTime: Send + Sync {
    fn resolve(&self, phrase: &str, now: NaiveDateTime) -> Option<NaiveDateTime>;
}

/// Resolver for the keyword grammar the classifier recognizes, plus
/// bare weekdays.
pub struct PhraseResolver;

enum DateAnchor {
    /// Explicitly anchored date, no future adjustment.
    Fixed(NaiveDate),
    /// Bare weekday: bumped a week forward if the time already passed.
    BareWeekday(NaiveDate),
    /// Year-less calendar date: bumped a year forward if already passed.
    MonthDay { month: u32, day: u32 },
}

enum TimeMatch {
    Found(NaiveTime),
    Absent,
    Invalid,
}

impl ResolveDateTime for PhraseResolver {
    fn resolve(&self, phrase: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let phrase = phrase.to_lowercase();
        let (anchor, span) = match_date(&phrase, now.date())?;

        // The day-of-month in "july 14" must not be read as a time.
        let remainder = format!("{} {}", &phrase[..span.start], &phrase[span.end..]);
        let time = match match_time(&remainder) {
            TimeMatch::Found(t) => t,
            TimeMatch::Absent => NaiveTime::MIN,
            TimeMatch::Invalid => return None,
        };

        match anchor {
            DateAnchor::Fixed(date) => Some(date.and_time(time)),
            DateAnchor::BareWeekday(date) => {
                let candidate = date.and_time(time);
                if candidate <= now {
                    Some(candidate + Duration::days(7))
                } else {
                    Some(candidate)
                }
            }
            DateAnchor::MonthDay { month, day } => {
                let candidate = NaiveDate::from_ymd_opt(now.year(), month, day)?.and_time(time);
                if candidate <= now {
                    Some(NaiveDate::from_ymd_opt(now.year() + 1, month, day)?.and_time(time))
                } else {
                    Some(candidate)
                }
            }
        }
    }
}

/// Extract the date component and the byte range it occupied.
fn match_date(phrase: &str, today: NaiveDate) -> Option<(DateAnchor, Range<usize>)> {
    if let Some(m) = DAY_AFTER_RE.find(phrase) {
        return Some((DateAnchor::Fixed(today + Duration::days(2)), m.range()));
    }
    if let Some(caps) = IN_OFFSET_RE.captures(phrase) {
        let n: u32 = caps[1].parse().ok()?;
        let date = match &caps[2][..1] {
            "d" => today.checked_add_signed(Duration::days(i64::from(n)))?,
            "w" => today.checked_add_signed(Duration::days(7 * i64::from(n)))?,
            _ => today.checked_add_months(Months::new(n))?,
        };
        return Some((DateAnchor::Fixed(date), caps.get(0).map(|m| m.range())?));
    }
    if let Some(caps) = NEXT_RE.captures(phrase) {
        let range = caps.get(0).map(|m| m.range())?;
        let date = match &caps[1] {
            "week" => today + Duration::days(7),
            "month" => today.checked_add_months(Months::new(1))?,
            weekday => {
                let target: Weekday = weekday.parse().ok()?;
                // "next monday" on a Monday means a week out, not today.
                let days = match days_until(today, target) {
                    0 => 7,
                    d => d,
                };
                today + Duration::days(i64::from(days))
            }
        };
        return Some((DateAnchor::Fixed(date), range));
    }
    if let Some(caps) = MONTH_DAY_RE.captures(phrase) {
        let month = month_number(&caps[1])?;
        let day: u32 = caps[2].parse().ok()?;
        return Some((
            DateAnchor::MonthDay { month, day },
            caps.get(0).map(|m| m.range())?,
        ));
    }
    if let Some(m) = TOMORROW_RE.find(phrase) {
        return Some((DateAnchor::Fixed(today + Duration::days(1)), m.range()));
    }
    if let Some(m) = TODAY_RE.find(phrase) {
        return Some((DateAnchor::Fixed(today), m.range()));
    }
    if let Some(caps) = WEEKDAY_RE.captures(phrase) {
        let target: Weekday = caps[1].parse().ok()?;
        let date = today + Duration::days(days_until(today, target) as i64);
        return Some((DateAnchor::BareWeekday(date), caps.get(0).map(|m| m.range())?));
    }
    None
}

/// Days from `today` to the next `target` weekday; 0 when today matches.
fn days_until(today: NaiveDate, target: Weekday) -> u32 {
    (target.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7
}

/// Extract the first time token from a phrase, if any.
fn match_time(phrase: &str) -> TimeMatch {
    let Some(caps) = TIME_TOKEN_RE.captures(phrase) else {
        return TimeMatch::Absent;
    };

    let hour: u32 = match caps[1].parse() {
        Ok(h) => h,
        Err(_) => return TimeMatch::Invalid,
    };
    let minute: u32 = match caps.get(2) {
        Some(m) => match m.as_str().parse() {
            Ok(m) => m,
            Err(_) => return TimeMatch::Invalid,
        },
        None => 0,
    };

    let hour = match caps.get(3).map(|m| m.as_str()) {
        Some("am") if hour == 12 => 0,
        Some("am" | "pm") if hour > 12 => return TimeMatch::Invalid,
        Some("pm") if hour < 12 => hour + 12,
        Some(_) | None => hour,
    };

    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(t) => TimeMatch::Found(t),
        None => TimeMatch::Invalid,
    }
}

fn month_number(name: &str) -> Option<u32> {
    let n = match name {
        "january" => 1,
        "february" => 2,
        "march" => 3,
        "april" => 4,
        "may" => 5,
        "june" => 6,
        "july" => 7,
        "august" => 8,
        "september" => 9,
        "october" => 10,
        "november" => 11,
        "december" => 12,
        _ => return None,
    };
    Some(n)
}
