//! Scene route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use cozyspot_core::DisplayProduct;
use tracing::instrument;

use crate::catalog::{Scene, SceneSummary};
use crate::error::{AppError, Result};
use crate::resolver::{ResolvedHotspot, ResolvedScene};
use crate::state::AppState;

fn find_scene<'a>(state: &'a AppState, key: &str) -> Result<&'a Scene> {
    state
        .site()
        .find_scene(key)
        .ok_or_else(|| AppError::NotFound("Scene not found".to_string()))
}

/// List scenes.
pub async fn index(State(state): State<AppState>) -> Json<Vec<SceneSummary>> {
    Json(
        state
            .site()
            .gallery_scenes
            .iter()
            .map(SceneSummary::from)
            .collect(),
    )
}

/// A scene with every hotspot resolved.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ResolvedScene>> {
    let scene = find_scene(&state, &key)?;
    Ok(Json(state.resolver().resolve_scene(scene).await))
}

/// Floating products for a scene.
#[instrument(skip(state))]
pub async fn showcase(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Vec<DisplayProduct>>> {
    let scene = find_scene(&state, &key)?;
    Ok(Json(state.resolver().scene_showcase(scene).await))
}

/// One hotspot of a scene, by position in the scene's hotspot list.
#[instrument(skip(state))]
pub async fn hotspot(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, usize)>,
) -> Result<Json<ResolvedHotspot>> {
    let scene = find_scene(&state, &key)?;
    let hotspot = scene
        .hotspots
        .get(index)
        .ok_or_else(|| AppError::NotFound("Hotspot not found".to_string()))?;
    Ok(Json(state.resolver().resolve_hotspot(hotspot).await))
}
