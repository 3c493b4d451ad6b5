use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::sort_state;
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::records::player_subject;
use crate::calculate::table::{
    filter_rows, paginate, sort_rows, Pagination, PaginationMeta, PlayerColumn, SortDirection,
    SortState,
};
use crate::calculate::{aggregate_partitioned, player_matches, player_records, UNKNOWN_ARCHETYPE};
use crate::models::{Decklist, PlayerMatchLine, PlayerRecord, RecordSummary};

// ── Player table ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PlayerListParams {
    pub search: Option<String>,
    pub sort: Option<PlayerColumn>,
    pub dir: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct PlayerListResponse {
    pub players: Vec<PlayerRecord>,
    pub pagination: PaginationMeta,
    pub sort: SortState<PlayerColumn>,
}

pub async fn list_players(
    State(state): State<AppState>,
    Query(params): Query<PlayerListParams>,
) -> Result<Json<PlayerListResponse>, ApiError> {
    let snapshot = state.snapshot.read().await;

    let rows = player_records(
        &snapshot.index,
        &snapshot.dataset.results,
        &snapshot.classifier,
    );
    let mut rows = filter_rows(rows, params.search.as_deref().unwrap_or_default());
    let sort = sort_state(params.sort, params.dir);
    sort_rows(&mut rows, &sort);

    let pagination = Pagination::new(params.page, params.page_size);
    let (players, meta) = paginate(rows, &pagination);

    Ok(Json(PlayerListResponse {
        players,
        pagination: meta,
        sort,
    }))
}

// ── Player detail ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct PlayerDetail {
    pub player: String,
    pub archetype: String,
    pub overall: RecordSummary,
    pub draft: RecordSummary,
    pub constructed: RecordSummary,
    pub matches: Vec<PlayerMatchLine>,
    pub decklist: Option<Decklist>,
    /// Decklist in the plain-text import format
    pub arena_export: Option<String>,
}

pub async fn player_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<PlayerDetail>, ApiError> {
    let snapshot = state.snapshot.read().await;
    let dataset = &snapshot.dataset;

    let decklist = snapshot.index.decklist(&dataset.decklists, &name).cloned();
    let matches = player_matches(
        &snapshot.index,
        &dataset.results,
        &snapshot.classifier,
        &name,
    );
    if decklist.is_none() && matches.is_empty() {
        return Err(ApiError::NotFound(format!("Player '{}'", name)));
    }

    let record = aggregate_partitioned(
        &dataset.results,
        player_subject(&name),
        &snapshot.classifier,
    );

    Ok(Json(PlayerDetail {
        player: decklist
            .as_ref()
            .map(|d| d.player.clone())
            .unwrap_or_else(|| name.clone()),
        archetype: decklist
            .as_ref()
            .map(|d| d.archetype.clone())
            .unwrap_or_else(|| UNKNOWN_ARCHETYPE.to_string()),
        overall: record.overall().summary(),
        draft: record.draft.summary(),
        constructed: record.constructed.summary(),
        matches,
        arena_export: decklist.as_ref().map(Decklist::to_arena_format),
        decklist,
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get_json, sample_state};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_list_players_sorted_by_win_rate() {
        let (_dir, state) = sample_state();
        let (status, json) = get_json(state, "/api/players").await;

        assert_eq!(status, StatusCode::OK);
        let players = json["players"].as_array().unwrap();
        let names: Vec<_> = players.iter().map(|p| p["player"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Jane Doe", "Smith, John", "Bob Ray"]);

        // constructed only: R4 loss, R5 and R11 wins
        assert_eq!(players[0]["wins"], 2);
        assert_eq!(players[0]["losses"], 1);
        assert_eq!(json["pagination"]["total_items"], 3);
    }

    #[tokio::test]
    async fn test_list_players_search_and_page() {
        let (_dir, state) = sample_state();
        let (_, json) = get_json(state.clone(), "/api/players?search=red%20deck").await;
        assert_eq!(json["players"].as_array().unwrap().len(), 2);

        let (_, json) = get_json(state, "/api/players?sort=player&dir=asc&page=2&page_size=2").await;
        let players = json["players"].as_array().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0]["player"], "Smith, John");
        assert_eq!(json["pagination"]["has_prev"], true);
        assert_eq!(json["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_list_players_page_far_past_the_end() {
        let (_dir, state) = sample_state();
        let (status, json) =
            get_json(state, "/api/players?page=4294967295&page_size=100").await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["players"].as_array().unwrap().is_empty());
        assert_eq!(json["pagination"]["total_items"], 3);
    }

    #[tokio::test]
    async fn test_player_detail_any_name_form() {
        let (_dir, state) = sample_state();
        let (status, json) = get_json(state, "/api/players/john%20smith").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["player"], "Smith, John");
        assert_eq!(json["archetype"], "Red Deck");

        // R1 draft win; R4 win, R6 draw, R11 loss constructed
        assert_eq!(json["draft"]["wins"], 1);
        assert_eq!(json["constructed"]["wins"], 1);
        assert_eq!(json["constructed"]["draws"], 1);
        assert_eq!(json["constructed"]["losses"], 1);
        assert_eq!(json["overall"]["total_matches"], 4);

        let matches = json["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 4);
        assert_eq!(matches[0]["phase"], "draft");
        assert_eq!(matches[2]["opponent_archetype"], "Red Deck");
        assert_eq!(matches[2]["outcome"], "draw");

        assert!(json["arena_export"]
            .as_str()
            .unwrap()
            .starts_with("4 Lightning Bolt"));
    }

    #[tokio::test]
    async fn test_player_detail_unknown() {
        let (_dir, state) = sample_state();
        let (status, _) = get_json(state, "/api/players/Nobody").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
