use crate::error::SlotError;
use crate::format::night_label;
use crate::slots::{DaySchedule, SlotKey};
use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

/// Slots before this hour may belong to the previous night's session.
const MORNING_CUTOFF: u8 = 12;

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct NightGroup {
    pub label: String,
    pub slots: Vec<SlotKey>,
}

/// Night groups keyed by session date, in the order each key was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NightGroups {
    groups: Vec<(NaiveDate, NightGroup)>,
}

impl NightGroups {
    pub fn get(&self, night: &NaiveDate) -> Option<&NightGroup> {
        self.groups.iter().find(|(key, _)| key == night).map(|(_, group)| group)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &NightGroup)> {
        self.groups.iter().map(|(key, group)| (key, group))
    }

    pub fn keys(&self) -> impl Iterator<Item = &NaiveDate> {
        self.groups.iter().map(|(key, _)| key)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl IntoIterator for NightGroups {
    type Item = (NaiveDate, NightGroup);
    type IntoIter = std::vec::IntoIter<(NaiveDate, NightGroup)>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl Serialize for NightGroups {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (night, group) in &self.groups {
            map.serialize_entry(&night.to_string(), group)?;
        }
        map.end()
    }
}

/// Resolves the session date a slot belongs to. A morning slot moves to the
/// previous date only when that date has an overnight schedule still running
/// at the slot's hour.
fn night_of(slot: &SlotKey, schedules: &HashMap<NaiveDate, &DaySchedule>) -> NaiveDate {
    let own = slot.date();
    if slot.hour() >= MORNING_CUTOFF {
        return own;
    }
    let Some(previous) = own.pred_opt() else {
        return own;
    };
    match schedules.get(&previous) {
        Some(schedule) if schedule.is_overnight() && slot.hour() < schedule.end_hour() => previous,
        _ => own,
    }
}

/// Partitions slot identifiers into nights. Every input slot lands in exactly
/// one group; groups are sorted chronologically inside, and appear in the
/// order their night was first encountered.
///
/// All identifiers are parsed before any grouping happens, so a single
/// malformed entry fails the whole call.
pub fn group_by_night<S: AsRef<str>>(
    slots: &[S],
    schedules: &[DaySchedule],
) -> Result<NightGroups, SlotError> {
    let keys = slots
        .iter()
        .map(|raw| raw.as_ref().parse::<SlotKey>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(group_slot_keys(keys, schedules))
}

pub fn group_slot_keys(
    slots: impl IntoIterator<Item = SlotKey>,
    schedules: &[DaySchedule],
) -> NightGroups {
    // later schedules win on a duplicated date
    let by_date: HashMap<NaiveDate, &DaySchedule> =
        schedules.iter().map(|s| (s.date(), s)).collect();

    let mut groups: Vec<(NaiveDate, NightGroup)> = Vec::new();
    let mut index: HashMap<NaiveDate, usize> = HashMap::new();

    for slot in slots {
        let night = night_of(&slot, &by_date);

        let position = *index.entry(night).or_insert_with(|| {
            groups.push((
                night,
                NightGroup {
                    label: night_label(night),
                    slots: Vec::new(),
                },
            ));
            groups.len() - 1
        });
        groups[position].1.slots.push(slot);
    }

    for (_, group) in &mut groups {
        group.slots.sort();
    }

    NightGroups { groups }
}
