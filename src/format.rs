use crate::slots::SlotKey;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourOption {
    pub value: u8,
    pub label: String,
}

/// 12-hour clock label for a bare hour, e.g. `18 -> "6 PM"`.
pub fn format_hour(hour: u8) -> String {
    let hour12 = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    let meridiem = if hour < 12 { "AM" } else { "PM" };
    format!("{} {}", hour12, meridiem)
}

pub fn hour_options() -> Vec<HourOption> {
    (0..24)
        .map(|value| HourOption {
            value,
            label: format_hour(value),
        })
        .collect()
}

pub fn format_slot_time(slot: &SlotKey) -> String {
    slot.as_datetime().format("%-I:%M %p").to_string()
}

/// Display label for a night-key, e.g. `Friday, Dec 6`.
pub fn night_label(date: NaiveDate) -> String {
    date.format("%A, %b %-d").to_string()
}
