use axum::{extract::State, Json};
use serde::Deserialize;

use crate::constants::{ERR_EMPTY_NAME, ERR_ZERO_POINT_CHANGE};
use crate::error::{AppError, Result};
use crate::models::{route_point_request, ItemKind, PointOutcome, PointRoute, TimerTicket};
use crate::routes::validation::{flag, required_int, AppJson, FormValue};
use crate::routes::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PointRequest {
    pub point_change: Option<FormValue>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub repeat: Option<FormValue>,
    #[serde(default)]
    pub time: Option<FormValue>,
    /// `"timer"` when the countdown page submits a finished round
    #[serde(default)]
    pub from: Option<String>,
    /// Explicit `"reward"` / `"task"`; must agree with the sign of the change
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TimerSubmitRequest {
    pub time: FormValue,
    #[serde(default)]
    pub name: String,
    pub value: FormValue,
    #[serde(default)]
    pub repeat: Option<FormValue>,
}

/// Settle the item kind of a point change.
///
/// Without an explicit kind the sign decides; with one, the two must agree.
fn resolve_kind(delta: i64, explicit: Option<&str>) -> Result<ItemKind> {
    let implied = ItemKind::from_delta(delta)
        .ok_or_else(|| AppError::InvalidArgument(ERR_ZERO_POINT_CHANGE.to_string()))?;

    let Some(explicit) = explicit else {
        return Ok(implied);
    };

    let kind: ItemKind = explicit.parse()?;
    if kind != implied {
        tracing::warn!(
            "Rejected point change {} submitted as {:?}",
            delta,
            kind
        );
        return Err(AppError::InvalidArgument(format!(
            "Point change {delta} does not match type {explicit:?}"
        )));
    }
    Ok(kind)
}

async fn rest_time_to_work_ratio(state: &AppState, username: &str) -> Result<i64> {
    let store = state.store.clone();
    let user = username.to_string();
    let ledger = tokio::task::spawn_blocking(move || store.load_ledger(&user)).await??;
    Ok(ledger.rest_to_work_ratio)
}

/// Redeem a reward or complete a task
///
/// Rewards and untimed tasks settle immediately. A timed task first comes
/// back armed; the client runs the countdown and resubmits with
/// `from = "timer"`, which applies the points.
pub async fn point(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    AppJson(payload): AppJson<PointRequest>,
) -> Result<Json<PointOutcome>> {
    let delta = required_int(payload.point_change.as_ref(), "point_change")?;
    let repeat = flag(payload.repeat.as_ref());
    let kind = resolve_kind(delta, payload.kind.as_deref())?;
    let name = payload.name;

    if name.trim().is_empty() {
        return Err(AppError::InvalidArgument(ERR_EMPTY_NAME.to_string()));
    }

    // Rewards ignore the time field entirely
    let time = match (kind, payload.time.as_ref()) {
        (ItemKind::Task, Some(time)) => time.to_int("time")?,
        _ => 0,
    };
    if time < 0 {
        return Err(AppError::InvalidArgument(
            "Time must not be negative".to_string(),
        ));
    }

    let route = route_point_request(kind, time, payload.from.as_deref());

    if route == PointRoute::Arm {
        let rest_time_to_work_ratio = rest_time_to_work_ratio(&state, &username).await?;
        tracing::info!("Timer armed for {:?} ({} min) by {}", name, time, username);
        return Ok(Json(PointOutcome::Armed(TimerTicket {
            name,
            value: delta,
            time,
            repeat,
            rest_time_to_work_ratio,
        })));
    }

    let store = state.store.clone();
    let user = username.clone();
    let item = name.clone();

    let result = tokio::task::spawn_blocking(move || {
        store.update_ledger(&user, |ledger| {
            ledger.apply_point_change(delta, &item, kind, repeat)
        })
    })
    .await??;

    tracing::info!(
        "Point change {} for {:?} by {}: {:?}, balance {}",
        delta,
        name,
        username,
        result.status,
        result.balance
    );

    let outcome = match route {
        PointRoute::Complete => PointOutcome::after_countdown(name, delta, time, repeat, result),
        _ => PointOutcome::Resolved { name, result },
    };

    Ok(Json(outcome))
}

/// Start another countdown round from a continuation form
///
/// Echoes the submitted fields back as an armed ticket; no points move.
pub async fn timer_submit(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    AppJson(payload): AppJson<TimerSubmitRequest>,
) -> Result<Json<PointOutcome>> {
    let time = payload.time.to_int("time")?;
    let value = payload.value.to_int("value")?;
    let repeat = flag(payload.repeat.as_ref());

    let rest_time_to_work_ratio = rest_time_to_work_ratio(&state, &username).await?;

    Ok(Json(PointOutcome::Armed(TimerTicket {
        name: payload.name,
        value,
        time,
        repeat,
        rest_time_to_work_ratio,
    })))
}
