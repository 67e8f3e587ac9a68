//! Date extraction for receipts.

use chrono::{Local, NaiveDate};
use regex::Regex;
use tracing::trace;

use super::patterns::{DATE_FULL_YEAR, DATE_LABELED, DATE_SHORT_YEAR, DATE_YEAR_FIRST};
use super::{ExtractionMatch, FieldExtractor};

/// Two-digit years that resolve below this year are moved forward a century.
pub const DEFAULT_YEAR_CUTOFF: i32 = 1950;

/// Position of the year, month and day fields in a date string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldOrder {
    MonthDayYear,
    DayMonthYear,
    YearMonthDay,
}

/// A strict date layout such as `MM/DD/YYYY`.
///
/// Month and day accept one or two digits; the year must have exactly
/// `year_digits` digits and the whole string must be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateFormat {
    order: FieldOrder,
    separator: char,
    year_digits: usize,
}

impl DateFormat {
    const fn new(order: FieldOrder, separator: char, year_digits: usize) -> Self {
        Self {
            order,
            separator,
            year_digits,
        }
    }

    /// Formats in trial order. Month-first wins over day-first when both parse.
    pub const ORDER: [DateFormat; 7] = [
        DateFormat::new(FieldOrder::MonthDayYear, '/', 4),
        DateFormat::new(FieldOrder::DayMonthYear, '/', 4),
        DateFormat::new(FieldOrder::YearMonthDay, '-', 4),
        DateFormat::new(FieldOrder::MonthDayYear, '-', 4),
        DateFormat::new(FieldOrder::DayMonthYear, '-', 4),
        DateFormat::new(FieldOrder::MonthDayYear, '/', 2),
        DateFormat::new(FieldOrder::DayMonthYear, '/', 2),
    ];

    /// Parse `s` with this layout, applying `year_cutoff` to two-digit years.
    pub fn parse(&self, s: &str, year_cutoff: i32) -> Option<NaiveDate> {
        let mut parts = s.split(self.separator);
        let fields = [parts.next()?, parts.next()?, parts.next()?];
        if parts.next().is_some() {
            return None;
        }

        let (year, month, day) = match self.order {
            FieldOrder::MonthDayYear => (fields[2], fields[0], fields[1]),
            FieldOrder::DayMonthYear => (fields[2], fields[1], fields[0]),
            FieldOrder::YearMonthDay => (fields[0], fields[1], fields[2]),
        };

        if !is_digits(year, self.year_digits..=self.year_digits)
            || !is_digits(month, 1..=2)
            || !is_digits(day, 1..=2)
        {
            return None;
        }

        let mut year: i32 = year.parse().ok()?;
        // Four-digit years are taken as written; only two-digit years move
        // across the cutoff.
        if self.year_digits == 2 {
            year += 1900;
            if year < year_cutoff {
                year += 100;
            }
        }

        NaiveDate::from_ymd_opt(year, month.parse().ok()?, day.parse().ok()?)
    }
}

impl std::fmt::Display for DateFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let year = if self.year_digits == 2 { "YY" } else { "YYYY" };
        let sep = self.separator;
        match self.order {
            FieldOrder::MonthDayYear => write!(f, "MM{sep}DD{sep}{year}"),
            FieldOrder::DayMonthYear => write!(f, "DD{sep}MM{sep}{year}"),
            FieldOrder::YearMonthDay => write!(f, "{year}{sep}MM{sep}DD"),
        }
    }
}

fn is_digits(s: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a captured date string with the first format that accepts it.
pub fn parse_date(s: &str, year_cutoff: i32) -> Option<NaiveDate> {
    DateFormat::ORDER.iter().find_map(|format| {
        let parsed = format.parse(s, year_cutoff);
        if parsed.is_some() {
            trace!("parsed {:?} as {}", s, format);
        }
        parsed
    })
}

/// Date field extractor.
pub struct DateExtractor {
    year_cutoff: i32,
}

impl DateExtractor {
    /// Search patterns in priority order.
    fn patterns() -> [&'static Regex; 4] {
        [
            &*DATE_FULL_YEAR,
            &*DATE_YEAR_FIRST,
            &*DATE_SHORT_YEAR,
            &*DATE_LABELED,
        ]
    }

    pub fn new() -> Self {
        Self {
            year_cutoff: DEFAULT_YEAR_CUTOFF,
        }
    }

    /// Set the two-digit year cutoff.
    pub fn with_year_cutoff(mut self, year_cutoff: i32) -> Self {
        self.year_cutoff = year_cutoff;
        self
    }
}

impl Default for DateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for DateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    /// One candidate per pattern: its first occurrence, if any format parses it.
    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for pattern in Self::patterns() {
            let Some(caps) = pattern.captures(text) else {
                continue;
            };
            let Some(found) = caps.get(1) else {
                continue;
            };

            if let Some(date) = parse_date(found.as_str(), self.year_cutoff) {
                results.push(
                    ExtractionMatch::new(date, 0.9, found.as_str())
                        .with_position(found.start(), found.end()),
                );
            }
        }

        results
    }
}

/// Extract a transaction date, falling back to `fallback`.
pub fn extract_date_or(text: &str, fallback: NaiveDate) -> NaiveDate {
    DateExtractor::new()
        .extract(text)
        .map(|m| m.value)
        .unwrap_or(fallback)
}

/// Extract a transaction date, falling back to today's local date.
pub fn extract_date(text: &str) -> NaiveDate {
    extract_date_or(text, Local::now().date_naive())
}
