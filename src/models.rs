use crate::slots::SlotKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotAvailability {
    Can,
    Maybe,
    Unavailable,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RatePreference {
    Preferred,
    Playable,
    WontPlay,
}

/// One player's answers for a game. Slot keys are kept as raw text here and
/// validated when tallied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub rate_preferences: HashMap<String, RatePreference>,
    #[serde(default)]
    pub time_slots: HashMap<String, SlotAvailability>,
}

impl PlayerResponse {
    pub fn can_play_any(&self) -> bool {
        self.time_slots.values().any(|a| *a == SlotAvailability::Can)
    }

    /// Nickname if set, otherwise `Player N` from the 1-based position.
    pub fn display_name(&self, position: usize) -> String {
        match self.nickname.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Player {}", position + 1),
        }
    }

    /// Unanswered slots read as unavailable.
    pub fn availability(&self, slot: &SlotKey) -> SlotAvailability {
        self.time_slots
            .get(&slot.to_string())
            .copied()
            .unwrap_or(SlotAvailability::Unavailable)
    }

    pub fn rate_preference(&self, rate: &str) -> Option<RatePreference> {
        self.rate_preferences.get(rate).copied()
    }
}
