use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::sort_state;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::table::{
    filter_rows, sort_rows, ArchetypeColumn, PlayerColumn, SortDirection, SortState,
};
use crate::calculate::{
    archetype_player_records, archetype_records, archetype_summaries, cards_in_archetype,
    MatchupView,
};
use crate::models::{ArchetypeSummaryRow, CardStat, PlayerRecord, RecordSummary};

// ── Archetype table ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ArchetypeListParams {
    pub search: Option<String>,
    pub sort: Option<ArchetypeColumn>,
    pub dir: Option<SortDirection>,
}

#[derive(Debug, Serialize)]
pub struct ArchetypeListResponse {
    pub archetypes: Vec<ArchetypeSummaryRow>,
    pub sort: SortState<ArchetypeColumn>,
}

pub async fn list_archetypes(
    State(state): State<AppState>,
    Query(params): Query<ArchetypeListParams>,
) -> Result<Json<ArchetypeListResponse>, ApiError> {
    let snapshot = state.snapshot.read().await;

    let rows = archetype_summaries(&snapshot.dataset.analysis);
    let mut rows = filter_rows(rows, params.search.as_deref().unwrap_or_default());
    let sort = sort_state(params.sort, params.dir);
    sort_rows(&mut rows, &sort);

    Ok(Json(ArchetypeListResponse {
        archetypes: rows,
        sort,
    }))
}

// ── Archetype detail ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ArchetypeDetail {
    pub archetype: String,
    /// Registered players per the analysis export
    pub players: u32,
    /// Precomputed record, when the analysis has one
    pub summary: Option<ArchetypeSummaryRow>,
    /// Constructed record from raw results, mirrors excluded
    pub constructed: RecordSummary,
    pub player_records: Vec<PlayerRecord>,
    pub cards: Vec<CardStat>,
    pub matchups: Vec<MatchupView>,
}

pub async fn archetype_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ArchetypeDetail>, ApiError> {
    let snapshot = state.snapshot.read().await;
    let dataset = &snapshot.dataset;

    let known = dataset.analysis.archetype_counts.contains_key(&name)
        || dataset.decklists.iter().any(|d| d.archetype == name);
    if !known {
        return Err(ApiError::NotFound(format!("Archetype '{}'", name)));
    }

    let summary = archetype_summaries(&dataset.analysis)
        .into_iter()
        .find(|row| row.archetype == name);
    let constructed = archetype_records(&snapshot.index, &dataset.results, &snapshot.classifier)
        .get(&name)
        .copied()
        .unwrap_or_default()
        .summary();

    let mut player_records = archetype_player_records(
        &snapshot.index,
        &dataset.results,
        &snapshot.classifier,
        &name,
    );
    sort_rows(
        &mut player_records,
        &SortState::new(PlayerColumn::WinRate, SortDirection::Desc),
    );

    Ok(Json(ArchetypeDetail {
        players: dataset.analysis.players_for(&name),
        summary,
        constructed,
        player_records,
        cards: cards_in_archetype(&dataset.decklists, &name)?,
        matchups: snapshot.grid.opponents_of(&name),
        archetype: name,
    }))
}
