use axum::extract::State;
use axum::Json;

use crate::api::state::{AppState, ReloadOutcome};
use crate::api::ApiError;

/// Re-read the exports from disk.
pub async fn reload(State(state): State<AppState>) -> Result<Json<ReloadOutcome>, ApiError> {
    let outcome = state.reload().await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{get_json, post_json, sample_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_reload_unchanged() {
        let (_dir, state) = sample_state();
        let (status, json) = post_json(state, "/api/reload").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "unchanged");
    }

    #[tokio::test]
    async fn test_reload_serves_new_data() {
        let (dir, state) = sample_state();
        std::fs::write(
            dir.path().join("results.json"),
            r#"[{"round": 4, "player1": "Bob Ray", "player2": "Jane Doe", "p1_wins": 2, "p2_wins": 0}]"#,
        )
        .unwrap();

        let (status, json) = post_json(state.clone(), "/api/reload").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "reloaded");

        let (_, json) = get_json(state, "/api/matchups/Red%20Deck/Blue%20Deck").await;
        assert_eq!(json["wins"], 1);
        assert_eq!(json["losses"], 0);
    }

    #[tokio::test]
    async fn test_reload_missing_export() {
        let (dir, state) = sample_state();
        std::fs::remove_file(dir.path().join("decklists.json")).unwrap();

        let (status, json) = post_json(state, "/api/reload").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"]["code"], "INTERNAL_ERROR");
    }
}
