use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::sort_state;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::table::{sort_rows, MetagameColumn, SortDirection, SortState};
use crate::models::ArchetypeMetagameRow;

#[derive(Debug, Deserialize)]
pub struct MetagameParams {
    pub sort: Option<MetagameColumn>,
    pub dir: Option<SortDirection>,
}

#[derive(Debug, Serialize)]
pub struct MetagameResponse {
    pub archetypes: Vec<ArchetypeMetagameRow>,
    pub day1_players: u32,
    pub day2_players: u32,
    pub sort: SortState<MetagameColumn>,
}

pub async fn metagame(
    State(state): State<AppState>,
    Query(params): Query<MetagameParams>,
) -> Result<Json<MetagameResponse>, ApiError> {
    let snapshot = state.snapshot.read().await;

    let mut rows = snapshot.metagame();
    let sort = sort_state(params.sort, params.dir);
    sort_rows(&mut rows, &sort);

    Ok(Json(MetagameResponse {
        day1_players: rows.iter().map(|r| r.day1_players).sum(),
        day2_players: rows.iter().map(|r| r.day2_players).sum(),
        archetypes: rows,
        sort,
    }))
}
