use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::calculate::{MatchupGridRow, MatchupView};

#[derive(Debug, Serialize)]
pub struct MatchupGridResponse {
    pub archetypes: Vec<String>,
    pub rows: Vec<MatchupGridRow>,
}

pub async fn matchup_grid(
    State(state): State<AppState>,
) -> Result<Json<MatchupGridResponse>, ApiError> {
    let snapshot = state.snapshot.read().await;
    Ok(Json(MatchupGridResponse {
        archetypes: snapshot.grid.archetypes().to_vec(),
        rows: snapshot.grid.grid(),
    }))
}

pub async fn matchup_detail(
    State(state): State<AppState>,
    Path((archetype, opponent)): Path<(String, String)>,
) -> Result<Json<MatchupView>, ApiError> {
    if archetype == opponent {
        return Err(ApiError::BadRequest(format!(
            "Mirror matchups are not tracked: {}",
            archetype
        )));
    }

    let snapshot = state.snapshot.read().await;
    for name in [&archetype, &opponent] {
        if !snapshot.grid.archetypes().contains(name) {
            return Err(ApiError::NotFound(format!("Archetype '{}'", name)));
        }
    }

    snapshot
        .grid
        .get(&archetype, &opponent)
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No matches recorded between {} and {}",
                archetype, opponent
            ))
        })
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get_json, sample_state};
    use axum::http::StatusCode;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_matchup_grid() {
        let (_dir, state) = sample_state();
        let (status, json) = get_json(state, "/api/matchups").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["archetypes"][0], "Blue Deck");
        assert_eq!(json["archetypes"][1], "Red Deck");

        let blue = &json["rows"][0];
        assert!(blue["cells"][0].is_null());
        assert_eq!(blue["cells"][1]["wins"], 2);
        assert_eq!(blue["cells"][1]["losses"], 1);
        assert_eq!(json["rows"][1]["cells"][0]["wins"], 1);
    }

    #[tokio::test]
    async fn test_matchup_detail_is_oriented() {
        let (_dir, state) = sample_state();
        let (status, json) = get_json(state, "/api/matchups/Red%20Deck/Blue%20Deck").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["archetype"], "Red Deck");
        assert_eq!(json["opponent"], "Blue Deck");
        assert_eq!(json["wins"], 1);
        assert_eq!(json["losses"], 2);
        assert_eq!(json["total_matches"], 3);
    }

    #[tokio::test]
    async fn test_matchup_detail_mirror_rejected() {
        let (_dir, state) = sample_state();
        let (status, _) = get_json(state, "/api/matchups/Red%20Deck/Red%20Deck").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_matchup_detail_unknown_archetype() {
        let (_dir, state) = sample_state();
        let (status, json) = get_json(state, "/api/matchups/Red%20Deck/Green%20Deck").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("Green Deck"));
    }
}
