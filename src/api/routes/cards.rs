use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::sort_state;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::table::{
    filter_rows, paginate, sort_rows, CardColumn, CardStatColumn, Pagination, PaginationMeta,
    SortDirection, SortState,
};
use crate::calculate::{card_across_archetypes, card_totals, card_usage};
use crate::models::{CardStat, CardUsage};

// ── Card table ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CardListParams {
    pub search: Option<String>,
    pub sort: Option<CardColumn>,
    pub dir: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct CardListResponse {
    pub cards: Vec<CardUsage>,
    pub pagination: PaginationMeta,
    pub sort: SortState<CardColumn>,
}

pub async fn list_cards(
    State(state): State<AppState>,
    Query(params): Query<CardListParams>,
) -> Result<Json<CardListResponse>, ApiError> {
    let snapshot = state.snapshot.read().await;

    let rows = card_usage(&snapshot.dataset.decklists);
    let mut rows = filter_rows(rows, params.search.as_deref().unwrap_or_default());
    let sort = sort_state(params.sort, params.dir);
    sort_rows(&mut rows, &sort);

    let pagination = Pagination::new(params.page, params.page_size);
    let (cards, meta) = paginate(rows, &pagination);

    Ok(Json(CardListResponse {
        cards,
        pagination: meta,
        sort,
    }))
}

// ── Card detail ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CardDetailParams {
    pub sort: Option<CardStatColumn>,
    pub dir: Option<SortDirection>,
}

#[derive(Debug, Serialize)]
pub struct CardDetail {
    /// The card across the whole field
    pub totals: CardStat,
    /// One row per archetype playing the card
    pub archetypes: Vec<CardStat>,
    pub sort: SortState<CardStatColumn>,
}

pub async fn card_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(params): Query<CardDetailParams>,
) -> Result<Json<CardDetail>, ApiError> {
    let snapshot = state.snapshot.read().await;
    let decklists = &snapshot.dataset.decklists;

    let totals = card_totals(decklists, &name)?;
    if totals.total_copies == 0 {
        return Err(ApiError::NotFound(format!("Card '{}'", name)));
    }

    let mut archetypes = card_across_archetypes(decklists, &name)?;
    let sort = sort_state(params.sort, params.dir);
    sort_rows(&mut archetypes, &sort);

    Ok(Json(CardDetail {
        totals,
        archetypes,
        sort,
    }))
}
