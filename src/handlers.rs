use crate::{
    error::AppError,
    format::{HourOption, hour_options},
    models::PlayerResponse,
    nights::{NightGroups, group_by_night},
    slots::{DaySchedule, SlotKey, generate_slots},
    summary::{ScheduleSummary, summarize},
};
use axum::{Json, extract::rejection::JsonRejection};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::HashSet;
use tracing::debug;

fn ensure_distinct_dates(schedules: &[DaySchedule]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for schedule in schedules {
        if !seen.insert(schedule.date()) {
            return Err(AppError::BadRequest(format!(
                "date {} is scheduled more than once",
                schedule.date()
            )));
        }
    }
    Ok(())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn get_hours() -> Json<Vec<HourOption>> {
    Json(hour_options())
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotsPayload {
    day_schedules: Vec<DaySchedule>,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    slots: Vec<SlotKey>,
}

pub async fn generate_slots_handler(
    payload: Result<Json<SlotsPayload>, JsonRejection>,
) -> Result<Json<SlotsResponse>, AppError> {
    let Json(payload) = payload?;
    ensure_distinct_dates(&payload.day_schedules)?;
    let slots = generate_slots(&payload.day_schedules)?;
    debug!(
        schedules = payload.day_schedules.len(),
        slots = slots.len(),
        "generated slots"
    );
    Ok(Json(SlotsResponse { slots }))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NightsPayload {
    slots: Vec<String>,
    day_schedules: Vec<DaySchedule>,
}

pub async fn group_nights_handler(
    payload: Result<Json<NightsPayload>, JsonRejection>,
) -> Result<Json<NightGroups>, AppError> {
    let Json(payload) = payload?;
    ensure_distinct_dates(&payload.day_schedules)?;
    let groups = group_by_night(&payload.slots, &payload.day_schedules)?;
    debug!(slots = payload.slots.len(), nights = groups.len(), "grouped slots");
    Ok(Json(groups))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPayload {
    day_schedules: Vec<DaySchedule>,
    #[serde(default)]
    rate_options: Vec<String>,
    #[serde(default)]
    responses: Vec<PlayerResponse>,
}

pub async fn summary_handler(
    payload: Result<Json<SummaryPayload>, JsonRejection>,
) -> Result<Json<ScheduleSummary>, AppError> {
    let Json(payload) = payload?;
    if payload.day_schedules.is_empty() {
        return Err(AppError::BadRequest("a game needs at least one day".to_string()));
    }
    ensure_distinct_dates(&payload.day_schedules)?;
    let summary = summarize(&payload.day_schedules, &payload.rate_options, &payload.responses)?;
    debug!(
        responses = summary.total_responses,
        nights = summary.nights.len(),
        "built schedule summary"
    );
    Ok(Json(summary))
}
