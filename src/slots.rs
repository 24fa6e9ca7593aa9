use crate::error::SlotError;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const SLOT_FORMAT: &str = "%Y-%m-%dT%H:00";
const SLOT_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M";
const MAX_YEAR: i32 = 9999;

/// One scheduled session: a nominal local start date plus start and end hours.
/// An `end_hour` at or before `start_hour` means the session runs past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDaySchedule")]
pub struct DaySchedule {
    date: NaiveDate,
    start_hour: u8,
    end_hour: u8,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDaySchedule {
    date: NaiveDate,
    start_hour: u8,
    end_hour: u8,
}

impl TryFrom<RawDaySchedule> for DaySchedule {
    type Error = SlotError;

    fn try_from(raw: RawDaySchedule) -> Result<Self, Self::Error> {
        DaySchedule::new(raw.date, raw.start_hour, raw.end_hour)
    }
}

impl DaySchedule {
    pub fn new(date: NaiveDate, start_hour: u8, end_hour: u8) -> Result<Self, SlotError> {
        for hour in [start_hour, end_hour] {
            if hour > 23 {
                return Err(SlotError::HourOutOfRange(hour));
            }
        }
        if !(0..=MAX_YEAR).contains(&date.year()) {
            return Err(SlotError::YearOutOfRange(date.year()));
        }
        // an overnight session must end on a date that still formats as YYYY
        let last_day = date.succ_opt().is_none_or(|next| next.year() > MAX_YEAR);
        if end_hour <= start_hour && last_day {
            return Err(SlotError::DateOutOfRange(date));
        }
        Ok(Self {
            date,
            start_hour,
            end_hour,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn start_hour(&self) -> u8 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u8 {
        self.end_hour
    }

    /// `start_hour == end_hour` counts as overnight and spans a full 24 hours.
    pub fn is_overnight(&self) -> bool {
        self.end_hour <= self.start_hour
    }

    pub fn slot_count(&self) -> usize {
        if self.is_overnight() {
            usize::from(24 - self.start_hour) + usize::from(self.end_hour)
        } else {
            usize::from(self.end_hour - self.start_hour)
        }
    }
}

/// A local wall-clock hour, written as `YYYY-MM-DDTHH:00`.
///
/// Ordering is chronological, so `2024-12-07T23:00` sorts before
/// `2024-12-08T00:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey(NaiveDateTime);

impl SlotKey {
    pub fn new(date: NaiveDate, hour: u8) -> Result<Self, SlotError> {
        date.and_hms_opt(u32::from(hour), 0, 0)
            .map(SlotKey)
            .ok_or(SlotError::HourOutOfRange(hour))
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn hour(&self) -> u8 {
        // hour() is always below 24
        self.0.hour() as u8
    }

    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(SLOT_FORMAT))
    }
}

impl FromStr for SlotKey {
    type Err = SlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SlotError::MalformedSlot(s.to_string());
        let parsed =
            NaiveDateTime::parse_from_str(s, SLOT_PARSE_FORMAT).map_err(|_| malformed())?;
        let key = SlotKey(parsed);
        // rejects unpadded fields and non-zero minutes
        if key.to_string() != s {
            return Err(malformed());
        }
        Ok(key)
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Expands each schedule into its hourly slots, in input order.
///
/// Schedules are not re-sorted against each other; within one schedule the
/// slots run from `start_hour` up to, but not including, `end_hour`.
pub fn generate_slots(schedules: &[DaySchedule]) -> Result<Vec<SlotKey>, SlotError> {
    let mut slots = Vec::with_capacity(schedules.iter().map(DaySchedule::slot_count).sum());

    for schedule in schedules {
        let overnight = schedule.is_overnight();
        let mut date = schedule.date;
        let mut hour = schedule.start_hour;
        let mut next_day = false;

        loop {
            slots.push(SlotKey::new(date, hour)?);

            hour += 1;
            if hour == 24 {
                hour = 0;
                date = date.succ_opt().ok_or(SlotError::DateOutOfRange(date))?;
                next_day = true;
            }

            let done = if overnight {
                next_day && hour >= schedule.end_hour
            } else {
                hour >= schedule.end_hour
            };
            if done {
                break;
            }
        }
    }

    Ok(slots)
}
