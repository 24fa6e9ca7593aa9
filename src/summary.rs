use crate::error::SlotError;
use crate::format::format_slot_time;
use crate::models::{PlayerResponse, RatePreference, SlotAvailability};
use crate::nights::group_slot_keys;
use crate::slots::{DaySchedule, SlotKey, generate_slots};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotCount {
    pub can: u32,
    pub maybe: u32,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateCount {
    pub preferred: u32,
    pub playable: u32,
}

/// Anonymous per-slot counts across all responses. Every slot a player
/// answered gets an entry, even if nobody marked it `can` or `maybe`.
///
/// A stored key that is not a valid slot identifier fails the whole tally
/// instead of being counted under a key no night group can ever match.
pub fn tally_slots(
    responses: &[PlayerResponse],
) -> Result<BTreeMap<SlotKey, SlotCount>, SlotError> {
    let mut counts: BTreeMap<SlotKey, SlotCount> = BTreeMap::new();
    for response in responses {
        for (raw, availability) in &response.time_slots {
            let count = counts.entry(raw.parse()?).or_default();
            match availability {
                SlotAvailability::Can => count.can += 1,
                SlotAvailability::Maybe => count.maybe += 1,
                SlotAvailability::Unavailable => {}
            }
        }
    }
    Ok(counts)
}

pub fn tally_rates(responses: &[PlayerResponse]) -> BTreeMap<String, RateCount> {
    let mut counts: BTreeMap<String, RateCount> = BTreeMap::new();
    for response in responses {
        for (rate, preference) in &response.rate_preferences {
            let count = counts.entry(rate.clone()).or_default();
            match preference {
                RatePreference::Preferred => count.preferred += 1,
                RatePreference::Playable => count.playable += 1,
                RatePreference::WontPlay => {}
            }
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSummary {
    pub slot: SlotKey,
    pub time: String,
    pub can: u32,
    pub maybe: u32,
}

/// One player's answers for a night, aligned with `NightSummary::slots`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSlots {
    pub player: String,
    pub statuses: Vec<SlotAvailability>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NightSummary {
    pub date: NaiveDate,
    pub label: String,
    pub slots: Vec<SlotSummary>,
    pub players: Vec<PlayerSlots>,
}

/// One player's preferences in offered-rate order; `None` where unanswered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerRates {
    pub player: String,
    pub preferences: Vec<Option<RatePreference>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateSummary {
    pub rate: String,
    pub preferred: u32,
    pub playable: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub total_responses: usize,
    pub available_players: usize,
    pub total_slots: usize,
    pub nights: Vec<NightSummary>,
    pub rates: Vec<RateSummary>,
    pub player_rates: Vec<PlayerRates>,
}

/// Organizer view of a game: every generated slot grouped by night with its
/// counts and each player's answers, followed by the offered rates and any
/// extra rates players named.
pub fn summarize(
    schedules: &[DaySchedule],
    rate_options: &[String],
    responses: &[PlayerResponse],
) -> Result<ScheduleSummary, SlotError> {
    let slots = generate_slots(schedules)?;
    let total_slots = slots.len();
    let slot_counts = tally_slots(responses)?;
    let names: Vec<String> = responses
        .iter()
        .enumerate()
        .map(|(position, response)| response.display_name(position))
        .collect();

    let nights = group_slot_keys(slots, schedules)
        .into_iter()
        .map(|(date, group)| {
            let players: Vec<PlayerSlots> = responses
                .iter()
                .zip(&names)
                .map(|(response, name)| PlayerSlots {
                    player: name.clone(),
                    statuses: group.slots.iter().map(|s| response.availability(s)).collect(),
                })
                .collect();
            let slots: Vec<SlotSummary> = group
                .slots
                .into_iter()
                .map(|slot| {
                    let count = slot_counts.get(&slot).copied().unwrap_or_default();
                    SlotSummary {
                        slot,
                        time: format_slot_time(&slot),
                        can: count.can,
                        maybe: count.maybe,
                    }
                })
                .collect();
            NightSummary {
                date,
                label: group.label,
                slots,
                players,
            }
        })
        .collect();

    let player_rates: Vec<PlayerRates> = responses
        .iter()
        .zip(&names)
        .map(|(response, name)| PlayerRates {
            player: name.clone(),
            preferences: rate_options
                .iter()
                .map(|rate| response.rate_preference(rate))
                .collect(),
        })
        .collect();

    let mut rate_counts = tally_rates(responses);
    let mut rates: Vec<RateSummary> = rate_options
        .iter()
        .map(|rate| {
            let count = rate_counts.remove(rate).unwrap_or_default();
            RateSummary {
                rate: rate.clone(),
                preferred: count.preferred,
                playable: count.playable,
            }
        })
        .collect();
    rates.extend(rate_counts.into_iter().map(|(rate, count)| RateSummary {
        rate,
        preferred: count.preferred,
        playable: count.playable,
    }));

    Ok(ScheduleSummary {
        total_responses: responses.len(),
        available_players: responses.iter().filter(|r| r.can_play_any()).count(),
        total_slots,
        nights,
        rates,
        player_rates,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn schedule(date: &str, start: u8, end: u8) -> DaySchedule {
        DaySchedule::new(date.parse().unwrap(), start, end).unwrap()
    }

    fn response(
        nickname: Option<&str>,
        slots: &[(&str, SlotAvailability)],
        rates: &[(&str, RatePreference)],
    ) -> PlayerResponse {
        PlayerResponse {
            nickname: nickname.map(str::to_string),
            time_slots: slots.iter().map(|(s, a)| (s.to_string(), *a)).collect(),
            rate_preferences: rates.iter().map(|(r, p)| (r.to_string(), *p)).collect(),
        }
    }

    #[test]
    fn slot_tally_counts_can_and_maybe() {
        use SlotAvailability::*;
        let responses = [
            response(None, &[("2024-12-06T18:00", Can), ("2024-12-07T01:00", Maybe)], &[]),
            response(None, &[("2024-12-06T18:00", Can), ("2024-12-06T19:00", Unavailable)], &[]),
        ];
        let counts = tally_slots(&responses).unwrap();
        let key = |s: &str| s.parse::<SlotKey>().unwrap();
        assert_eq!(counts[&key("2024-12-06T18:00")], SlotCount { can: 2, maybe: 0 });
        assert_eq!(counts[&key("2024-12-07T01:00")], SlotCount { can: 0, maybe: 1 });
        assert_eq!(counts[&key("2024-12-06T19:00")], SlotCount::default());
    }

    #[test]
    fn slot_tally_rejects_malformed_keys() {
        let responses = [response(None, &[("2024-12-06T18:30", SlotAvailability::Can)], &[])];
        assert_eq!(
            tally_slots(&responses),
            Err(SlotError::MalformedSlot("2024-12-06T18:30".to_string()))
        );
    }

    #[test]
    fn rate_tally_ignores_wont_play() {
        use RatePreference::*;
        let responses = [
            response(None, &[], &[("1/2", Preferred), ("2/5", WontPlay)]),
            response(None, &[], &[("1/2", Playable), ("2/5", Preferred)]),
        ];
        let counts = tally_rates(&responses);
        assert_eq!(counts["1/2"], RateCount { preferred: 1, playable: 1 });
        assert_eq!(counts["2/5"], RateCount { preferred: 1, playable: 0 });
    }

    #[test]
    fn summary_groups_counts_by_night() {
        use SlotAvailability::*;
        let schedules = [schedule("2024-12-06", 22, 2)];
        let rate_options = vec!["1/2".to_string(), "1/3".to_string()];
        let responses = [
            response(
                Some("ace"),
                &[("2024-12-07T01:00", Can), ("2024-12-06T22:00", Maybe)],
                &[("1/2", RatePreference::Preferred), ("5/10", RatePreference::Playable)],
            ),
            response(None, &[("2024-12-06T23:00", Unavailable)], &[]),
        ];

        let summary = summarize(&schedules, &rate_options, &responses).unwrap();
        assert_eq!(summary.total_responses, 2);
        assert_eq!(summary.available_players, 1);
        assert_eq!(summary.total_slots, 4);
        assert_eq!(summary.nights.len(), 1);

        let night = &summary.nights[0];
        assert_eq!(night.label, "Friday, Dec 6");
        let rows: Vec<(String, &str, u32, u32)> = night
            .slots
            .iter()
            .map(|s| (s.slot.to_string(), s.time.as_str(), s.can, s.maybe))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("2024-12-06T22:00".to_string(), "10:00 PM", 0, 1),
                ("2024-12-06T23:00".to_string(), "11:00 PM", 0, 0),
                ("2024-12-07T00:00".to_string(), "12:00 AM", 0, 0),
                ("2024-12-07T01:00".to_string(), "1:00 AM", 1, 0),
            ]
        );

        let rates: HashMap<&str, (u32, u32)> = summary
            .rates
            .iter()
            .map(|r| (r.rate.as_str(), (r.preferred, r.playable)))
            .collect();
        assert_eq!(summary.rates[0].rate, "1/2");
        assert_eq!(summary.rates[1].rate, "1/3");
        assert_eq!(rates["1/2"], (1, 0));
        assert_eq!(rates["1/3"], (0, 0));
        assert_eq!(rates["5/10"], (0, 1));
    }

    #[test]
    fn summary_lists_each_player_per_night() {
        use SlotAvailability::*;
        let schedules = [schedule("2024-12-06", 23, 1), schedule("2024-12-08", 20, 21)];
        let rate_options = vec!["1/2".to_string(), "2/5".to_string()];
        let responses = [
            response(
                Some("ace"),
                &[("2024-12-07T00:00", Can), ("2024-12-08T20:00", Maybe)],
                &[("2/5", RatePreference::WontPlay)],
            ),
            response(
                Some("  "),
                &[("2024-12-06T23:00", Maybe)],
                &[("1/2", RatePreference::Preferred), ("2/5", RatePreference::Playable)],
            ),
        ];

        let summary = summarize(&schedules, &rate_options, &responses).unwrap();
        assert_eq!(summary.nights.len(), 2);

        assert_eq!(
            summary.nights[0].players,
            vec![
                PlayerSlots { player: "ace".to_string(), statuses: vec![Unavailable, Can] },
                PlayerSlots { player: "Player 2".to_string(), statuses: vec![Maybe, Unavailable] },
            ]
        );
        assert_eq!(
            summary.nights[1].players,
            vec![
                PlayerSlots { player: "ace".to_string(), statuses: vec![Maybe] },
                PlayerSlots { player: "Player 2".to_string(), statuses: vec![Unavailable] },
            ]
        );

        assert_eq!(
            summary.player_rates,
            vec![
                PlayerRates {
                    player: "ace".to_string(),
                    preferences: vec![None, Some(RatePreference::WontPlay)],
                },
                PlayerRates {
                    player: "Player 2".to_string(),
                    preferences: vec![
                        Some(RatePreference::Preferred),
                        Some(RatePreference::Playable),
                    ],
                },
            ]
        );
    }

    #[test]
    fn summary_without_responses_has_empty_rows() {
        let schedules = [schedule("2024-12-06", 20, 22)];
        let summary = summarize(&schedules, &["1/2".to_string()], &[]).unwrap();
        assert_eq!(summary.total_slots, 2);
        assert!(summary.nights[0].players.is_empty());
        assert!(summary.player_rates.is_empty());
        assert_eq!(summary.rates[0].preferred, 0);
    }
}
