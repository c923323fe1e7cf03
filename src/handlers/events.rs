use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::models::event::{EventPatch, NewEvent};
use crate::routes::AppState;
use crate::utils::error::AppError;

const DEFAULT_RADIUS_KM: f64 = 10.0;

pub async fn list_events(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let events = state.events.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.get(id).await?;
    Ok(Json(event))
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.create(body).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<EventPatch>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.events.update(id, patch).await?;
    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.events.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lon: f64,
    #[serde(default = "default_radius_km")]
    pub radius_km: f64,
}

fn default_radius_km() -> f64 {
    DEFAULT_RADIUS_KM
}

pub async fn nearby_events(
    State(state): State<AppState>,
    Query(params): Query<NearbyParams>,
) -> Result<impl IntoResponse, AppError> {
    let events = state
        .events
        .find_near(params.lat, params.lon, params.radius_km)
        .await?;
    Ok(Json(events))
}

pub async fn category_stats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = state.events.category_stats().await?;
    Ok(Json(stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_radius_defaults_to_ten_km() {
        let params: NearbyParams =
            serde_urlencoded::from_str("lat=41.0&lon=29.0").unwrap();
        assert_eq!(params.radius_km, DEFAULT_RADIUS_KM);

        let params: NearbyParams =
            serde_urlencoded::from_str("lat=41.0&lon=29.0&radius_km=2.5").unwrap();
        assert_eq!(params.radius_km, 2.5);
    }

    #[test]
    fn nearby_params_require_both_coordinates() {
        assert!(serde_urlencoded::from_str::<NearbyParams>("lat=41.0").is_err());
    }
}
