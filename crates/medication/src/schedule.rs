//! Reminder times and frequencies.

use core::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use medrem_core::{DomainError, ValueObject};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Local time of day a reminder is scheduled for ("HH:MM").
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReminderTime(NaiveTime);

impl ValueObject for ReminderTime {}

impl ReminderTime {
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }

    fn minute_of_day(&self) -> u32 {
        self.0.hour() * 60 + self.0.minute()
    }

    /// Whether `now` is within `window_minutes` of this time, either side.
    ///
    /// Only hour and minute are compared. The distance wraps at midnight, so
    /// 23:59 and 00:00 are one minute apart.
    pub fn is_due(&self, now: NaiveTime, window_minutes: u32) -> bool {
        let now = now.hour() * 60 + now.minute();
        let diff = self.minute_of_day().abs_diff(now);
        diff.min(MINUTES_PER_DAY - diff) <= window_minutes
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self(NaiveTime::MIN)
    }
}

impl core::fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0.format("%H:%M"))
    }
}

impl FromStr for ReminderTime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self)
            .map_err(|e| DomainError::validation(format!("time must be HH:MM ({e})")))
    }
}

impl TryFrom<String> for ReminderTime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ReminderTime> for String {
    fn from(value: ReminderTime) -> Self {
        value.to_string()
    }
}

/// How often the medicine is taken. Informational only: it never affects
/// when reminders fire.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    MorningEvening,
    AsNeeded,
}

impl ValueObject for Frequency {}

impl Frequency {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::MorningEvening => "morning-evening",
            Self::AsNeeded => "as-needed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::MorningEvening => "Morning & Evening",
            Self::AsNeeded => "As Needed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "morning-evening" => Some(Self::MorningEvening),
            "as-needed" => Some(Self::AsNeeded),
            _ => None,
        }
    }
}

impl core::fmt::Display for Frequency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_and_displays_hh_mm() {
        let t: ReminderTime = "08:05".parse().unwrap();
        assert_eq!(t.hour(), 8);
        assert_eq!(t.minute(), 5);
        assert_eq!(t.to_string(), "08:05");
    }

    #[test]
    fn rejects_bad_times() {
        for bad in ["", "25:00", "12:60", "noon", "12"] {
            let err = bad.parse::<ReminderTime>().unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)), "{bad}");
        }
    }

    #[test]
    fn due_within_window_either_side() {
        let t = ReminderTime::from_hm(9, 30).unwrap();
        assert!(t.is_due(at(9, 30), 1));
        assert!(t.is_due(at(9, 29), 1));
        assert!(t.is_due(at(9, 31), 1));
        assert!(!t.is_due(at(9, 32), 1));
        assert!(t.is_due(at(9, 35), 5));
        assert!(!t.is_due(at(9, 36), 5));
    }

    #[test]
    fn window_crosses_hour_and_midnight() {
        let t = ReminderTime::from_hm(10, 0).unwrap();
        assert!(t.is_due(at(9, 59), 1));

        let late = ReminderTime::from_hm(23, 59).unwrap();
        assert!(late.is_due(at(0, 0), 1));
        assert!(!late.is_due(at(0, 1), 1));
    }

    #[test]
    fn seconds_are_ignored() {
        let t = ReminderTime::from_hm(7, 0).unwrap();
        let now = NaiveTime::from_hms_opt(7, 1, 59).unwrap();
        assert!(t.is_due(now, 1));
    }

    #[test]
    fn serde_uses_hh_mm_strings() {
        let t = ReminderTime::from_hm(21, 15).unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"21:15\"");
        let back: ReminderTime = serde_json::from_str("\"21:15\"").unwrap();
        assert_eq!(back, t);
        assert!(serde_json::from_str::<ReminderTime>("\"99:99\"").is_err());
    }

    #[test]
    fn frequency_round_trips_through_names() {
        for f in [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::MorningEvening,
            Frequency::AsNeeded,
        ] {
            assert_eq!(Frequency::parse(f.as_str()), Some(f));
            assert_eq!(
                serde_json::to_string(&f).unwrap(),
                format!("\"{}\"", f.as_str())
            );
        }
        assert_eq!(Frequency::parse("hourly"), None);
        assert_eq!(Frequency::MorningEvening.label(), "Morning & Evening");
    }
}
