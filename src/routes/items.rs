use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{Importance, ItemKind, TaskSubmission};
use crate::routes::validation::{flag, AppJson, FormValue};
use crate::routes::{AuthUser, LedgerView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct AddRewardRequest {
    #[serde(default)]
    pub name: String,
    pub points: FormValue,
}

#[derive(Debug, Deserialize)]
pub struct AddTaskRequest {
    #[serde(default)]
    pub name: String,
    pub points: FormValue,
    pub time: FormValue,
    pub importance: FormValue,
    pub value: FormValue,
    pub urgent: FormValue,
    #[serde(default)]
    pub repeat: Option<FormValue>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveRequest {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, alias = "names[]")]
    pub names: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemovableParams {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct RemovableResponse {
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub names: Vec<String>,
}

/// Add a reward (or replace the cost of an existing one)
pub async fn add_reward(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    AppJson(payload): AppJson<AddRewardRequest>,
) -> Result<Json<LedgerView>> {
    let cost = payload.points.to_int("points")?;
    let name = payload.name;
    let store = state.store.clone();

    let view = tokio::task::spawn_blocking(move || {
        store.update_ledger(&username, |ledger| {
            ledger.add_reward(&name, cost)?;
            Ok(LedgerView::new(&username, ledger))
        })
    })
    .await??;

    tracing::info!("Reward added for {} (cost {})", view.username, cost);

    Ok(Json(view))
}

/// Add a task; its priority is scored from importance, urgency, value and time
pub async fn add_task(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    AppJson(payload): AppJson<AddTaskRequest>,
) -> Result<Json<LedgerView>> {
    let submission = TaskSubmission {
        name: payload.name,
        points: payload.points.to_int("points")?,
        time: payload.time.to_int("time")?,
        importance: payload.importance.to_text().parse::<Importance>()?,
        value: payload.value.to_int("value")?,
        urgent: payload.urgent.to_int("urgent")?,
        repeat: flag(payload.repeat.as_ref()),
    };
    let (name, task) = submission.into_descriptor()?;
    let priority = task.priority;
    let store = state.store.clone();

    let view = tokio::task::spawn_blocking(move || {
        store.update_ledger(&username, |ledger| {
            ledger.add_task(&name, task)?;
            Ok(LedgerView::new(&username, ledger))
        })
    })
    .await??;

    tracing::info!("Task added for {} (priority {})", view.username, priority);

    Ok(Json(view))
}

/// Names that can be removed from the reward or task map
pub async fn list_removable(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    Query(params): Query<RemovableParams>,
) -> Result<Json<RemovableResponse>> {
    let kind: ItemKind = params.kind.parse()?;
    let store = state.store.clone();

    let ledger = tokio::task::spawn_blocking(move || store.load_ledger(&username)).await??;

    let names = match kind {
        ItemKind::Reward => ledger.rewards.into_keys().collect(),
        ItemKind::Task => ledger.tasks.into_keys().collect(),
    };

    Ok(Json(RemovableResponse { kind, names }))
}

/// Remove the selected rewards or tasks in one update
pub async fn remove_items(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    AppJson(payload): AppJson<RemoveRequest>,
) -> Result<Json<LedgerView>> {
    let kind: ItemKind = payload.kind.parse()?;
    let store = state.store.clone();

    let (removed, view) = tokio::task::spawn_blocking(move || {
        store.update_ledger(&username, |ledger| {
            let removed = ledger.remove_items(kind, &payload.names);
            Ok((removed, LedgerView::new(&username, ledger)))
        })
    })
    .await??;

    tracing::info!("Removed {} {:?} entries for {}", removed, kind, view.username);

    Ok(Json(view))
}
