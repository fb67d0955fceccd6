use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;
use crate::models::{sort_tasks, Ledger, Priority};
use crate::routes::AuthUser;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct RewardView {
    pub name: String,
    pub cost: i64,
}

#[derive(Debug, Serialize)]
pub struct TaskView {
    pub name: String,
    pub points: i64,
    pub time: i64,
    pub priority: Priority,
    pub repeat: bool,
}

/// Everything the index page shows; tasks are in display order
#[derive(Debug, Serialize)]
pub struct LedgerView {
    pub username: String,
    pub point: i64,
    pub rewards: Vec<RewardView>,
    pub tasks: Vec<TaskView>,
    pub rest_time_to_work_ratio: i64,
    pub favorite_quote_seed: String,
}

impl LedgerView {
    pub fn new(username: &str, ledger: &Ledger) -> Self {
        let rewards = ledger
            .rewards
            .iter()
            .map(|(name, cost)| RewardView {
                name: name.clone(),
                cost: *cost,
            })
            .collect();

        let tasks = sort_tasks(&ledger.tasks)
            .into_iter()
            .filter_map(|name| {
                let task = ledger.tasks.get(&name)?;
                Some(TaskView {
                    points: task.points,
                    time: task.time,
                    priority: task.priority,
                    repeat: task.repeat,
                    name,
                })
            })
            .collect();

        Self {
            username: username.to_string(),
            point: ledger.point,
            rewards,
            tasks,
            rest_time_to_work_ratio: ledger.rest_to_work_ratio,
            favorite_quote_seed: ledger.favorite_quote_seed.clone(),
        }
    }
}

/// Current balance, rewards and prioritized tasks
pub async fn index(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
) -> Result<Json<LedgerView>> {
    let store = state.store.clone();
    let user = username.clone();

    let ledger = tokio::task::spawn_blocking(move || store.load_ledger(&user)).await??;

    Ok(Json(LedgerView::new(&username, &ledger)))
}
