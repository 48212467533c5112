use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Textual layout of every date the editor reads or writes.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// A calendar day with no time-of-day or timezone component.
///
/// Arithmetic works on whole days only, so daylight-saving transitions and
/// the host locale can never shift a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from its parts, `None` when the day does not exist.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Parse a `YYYY/MM/DD` string.
    ///
    /// Anything that is not exactly four digits, a slash, two digits, a slash
    /// and two digits is rejected, as is a day that does not exist in the
    /// calendar (`2023/02/30`, `2023/13/01`). Overflowing days are never
    /// rolled into the next month.
    pub fn parse(s: &str) -> Option<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'/' || bytes[7] != b'/' {
            return None;
        }
        let digits_ok = bytes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 4 && *i != 7)
            .all(|(_, b)| b.is_ascii_digit());
        if !digits_ok {
            return None;
        }
        let year: i32 = s[0..4].parse().ok()?;
        let month: u32 = s[5..7].parse().ok()?;
        let day: u32 = s[8..10].parse().ok()?;
        Self::from_ymd(year, month, day)
    }

    /// Format as `YYYY/MM/DD`, zero padded.
    pub fn format(&self) -> String {
        self.0.format(DATE_FORMAT).to_string()
    }

    /// Shift by `n` calendar days; `n` may be negative.
    pub fn add_days(self, n: i64) -> Self {
        self.0
            .checked_add_signed(Duration::days(n))
            .map(Self)
            .unwrap_or(self)
    }

    /// Signed number of calendar days from `other` to `self`.
    pub fn days_since(self, other: Self) -> i64 {
        (self.0 - other.0).num_days()
    }

    /// Weekday index, 0 = Sunday through 6 = Saturday.
    pub fn weekday_index(&self) -> u8 {
        self.0.weekday().num_days_from_sunday() as u8
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Today in the local timezone, truncated to a calendar day.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}', expected YYYY/MM/DD", s)))
    }
}

/// Every day from `start` to `end` inclusive, ascending.
///
/// Empty when `end` precedes `start`.
pub fn enumerate_range(start: CalendarDate, end: CalendarDate) -> Vec<CalendarDate> {
    let span = end.days_since(start);
    if span < 0 {
        return Vec::new();
    }
    (0..=span).map(|offset| start.add_days(offset)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::parse(s).unwrap()
    }

    #[test]
    fn parse_and_format_round_trip() {
        for s in ["2024/01/01", "2024/02/29", "1999/12/31", "2030/07/04"] {
            assert_eq!(d(s).format(), s);
        }
    }

    #[test]
    fn parse_rejects_wrong_shape() {
        for s in [
            "",
            "2024-01-01",
            "2024/1/01",
            "2024/01/1",
            "24/01/01",
            "2024/01/01 ",
            " 2024/01/01",
            "2024/0a/01",
            "+202/01/01",
        ] {
            assert!(CalendarDate::parse(s).is_none(), "{s:?} should be rejected");
        }
    }

    #[test]
    fn parse_rejects_overflowed_days() {
        assert!(CalendarDate::parse("2023/02/30").is_none());
        assert!(CalendarDate::parse("2023/02/29").is_none());
        assert!(CalendarDate::parse("2023/13/01").is_none());
        assert!(CalendarDate::parse("2023/00/10").is_none());
        assert!(CalendarDate::parse("2023/04/31").is_none());
        assert!(CalendarDate::parse("2024/02/29").is_some());
    }

    #[test]
    fn add_days_crosses_month_and_year() {
        assert_eq!(d("2023/12/31").add_days(1), d("2024/01/01"));
        assert_eq!(d("2024/03/01").add_days(-1), d("2024/02/29"));
        assert_eq!(d("2024/01/10").add_days(0), d("2024/01/10"));
    }

    #[test]
    fn weekday_index_is_sunday_based() {
        assert_eq!(d("2024/01/07").weekday_index(), 0); // Sunday
        assert_eq!(d("2024/01/01").weekday_index(), 1); // Monday
        assert_eq!(d("2024/01/06").weekday_index(), 6); // Saturday
    }

    #[test]
    fn enumerate_range_inclusive_and_empty_when_inverted() {
        let days = enumerate_range(d("2024/02/27"), d("2024/03/02"));
        let text: Vec<String> = days.iter().map(CalendarDate::format).collect();
        assert_eq!(
            text,
            ["2024/02/27", "2024/02/28", "2024/02/29", "2024/03/01", "2024/03/02"]
        );
        assert_eq!(enumerate_range(d("2024/01/05"), d("2024/01/05")).len(), 1);
        assert!(enumerate_range(d("2024/01/05"), d("2024/01/04")).is_empty());
    }

    #[test]
    fn serde_uses_slash_format() {
        let json = serde_json::to_string(&d("2024/05/09")).unwrap();
        assert_eq!(json, "\"2024/05/09\"");
        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, d("2024/05/09"));
        assert!(serde_json::from_str::<CalendarDate>("\"2024-05-09\"").is_err());
    }
}
