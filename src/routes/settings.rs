use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::Result;
use crate::routes::validation::{AppJson, FormValue};
use crate::routes::{AuthUser, LedgerView};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SettingsRequest {
    pub rest_time_to_work_ratio: FormValue,
}

#[derive(Debug, Deserialize)]
pub struct QuoteSeedRequest {
    #[serde(default)]
    pub favorite_quote_seed: String,
}

/// Update the timer's rest-to-work ratio
pub async fn update_settings(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    AppJson(payload): AppJson<SettingsRequest>,
) -> Result<Json<LedgerView>> {
    let ratio = payload
        .rest_time_to_work_ratio
        .to_int("rest_time_to_work_ratio")?;
    let store = state.store.clone();

    let view = tokio::task::spawn_blocking(move || {
        store.update_ledger(&username, |ledger| {
            ledger.set_rest_to_work_ratio(ratio)?;
            Ok(LedgerView::new(&username, ledger))
        })
    })
    .await??;

    Ok(Json(view))
}

/// Store the text used to bias quote lookups
pub async fn update_quote_seed(
    State(state): State<AppState>,
    AuthUser(username): AuthUser,
    AppJson(payload): AppJson<QuoteSeedRequest>,
) -> Result<Json<LedgerView>> {
    let store = state.store.clone();

    let view = tokio::task::spawn_blocking(move || {
        store.update_ledger(&username, |ledger| {
            ledger.set_favorite_quote_seed(payload.favorite_quote_seed)?;
            Ok(LedgerView::new(&username, ledger))
        })
    })
    .await??;

    Ok(Json(view))
}
