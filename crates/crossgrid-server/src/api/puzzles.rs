use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use crossgrid_core::GridDocument;

use crate::error::AppError;
use crate::AppState;

/// List stored puzzle file names
async fn list_puzzles(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.store.list().await?))
}

/// Get a puzzle document by file name
async fn get_puzzle(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<GridDocument>, AppError> {
    let document = state
        .store
        .load(&name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Puzzle {} not found", name)))?;
    Ok(Json(document))
}

/// Store a puzzle document; the reply is a plain-text acknowledgement
async fn save_puzzle(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(document): Json<GridDocument>,
) -> Result<String, AppError> {
    state.store.save(&name, &document).await?;
    Ok(format!("Puzzle saved as {}", name))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/puzzle-options", get(list_puzzles))
        .route("/puzzles/{name}", get(get_puzzle).post(save_puzzle))
}
