use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

pub const MAX_TITLE_LENGTH: usize = 100;
pub const DEFAULT_CAPACITY: i32 = 100;

/// GeoJSON point embedded in every event. Coordinates are
/// `[longitude, latitude]` — longitude first, per the GeoJSON convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "geojson_point_type")]
    pub point_type: String,
    pub coordinates: [f64; 2],
}

fn geojson_point_type() -> String {
    "Point".to_string()
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            point_type: geojson_point_type(),
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub date: DateTime<Utc>,
    pub location: GeoPoint,
    pub price: f64,
    pub capacity: i32,
    pub sold_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Payload for event creation. Identity, sold counter and creation timestamp
/// are server-assigned.
#[derive(Debug, Clone, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub date: DateTime<Utc>,
    pub location: GeoPoint,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_capacity")]
    pub capacity: i32,
}

fn default_capacity() -> i32 {
    DEFAULT_CAPACITY
}

impl NewEvent {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_title(&self.title)?;
        if self.category.trim().is_empty() {
            return Err(AppError::ValidationError(
                "category must not be empty".to_string(),
            ));
        }
        validate_price(self.price)?;
        if self.capacity < 0 {
            return Err(AppError::ValidationError(
                "capacity must not be negative".to_string(),
            ));
        }
        validate_location(&self.location)?;
        Ok(())
    }
}

/// Partial update. Only supplied fields are applied; location, capacity and
/// the sold counter are not reachable from the generic update path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub date: Option<DateTime<Utc>>,
}

impl EventPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(category) = &self.category {
            if category.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "category must not be empty".to_string(),
                ));
            }
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.date.is_none()
    }
}

/// One row of the per-category aggregation: event count and average price.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CategoryStats {
    pub category: String,
    pub total_events: i64,
    pub average_price: f64,
}

fn validate_title(title: &str) -> Result<(), AppError> {
    if title.trim().is_empty() {
        return Err(AppError::ValidationError(
            "title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(AppError::ValidationError(format!(
            "title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::ValidationError(
            "price must be a non-negative number".to_string(),
        ));
    }
    Ok(())
}

fn validate_location(location: &GeoPoint) -> Result<(), AppError> {
    if location.point_type != "Point" {
        return Err(AppError::ValidationError(
            "location type must be 'Point'".to_string(),
        ));
    }
    let (lon, lat) = (location.longitude(), location.latitude());
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::ValidationError(
            "location coordinates must be [longitude, latitude] within range".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample() -> NewEvent {
        NewEvent {
            title: "Big Rust Meetup".to_string(),
            description: Some("Backend developers get together".to_string()),
            category: "tech".to_string(),
            date: Utc::now(),
            location: GeoPoint::new(28.9784, 41.0082),
            price: 150.0,
            capacity: 100,
        }
    }

    #[test]
    fn geo_point_serializes_longitude_first() {
        let point = GeoPoint::new(28.9784, 41.0082);
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], 28.9784);
        assert_eq!(json["coordinates"][1], 41.0082);
    }

    #[test]
    fn geo_point_type_defaults_to_point_on_deserialize() {
        let point: GeoPoint = serde_json::from_str(r#"{"coordinates": [2.35, 48.85]}"#).unwrap();
        assert_eq!(point.point_type, "Point");
        assert_eq!(point.longitude(), 2.35);
        assert_eq!(point.latitude(), 48.85);
    }

    #[test]
    fn new_event_defaults_capacity_and_price() {
        let event: NewEvent = serde_json::from_str(
            r#"{
                "title": "Concert",
                "category": "music",
                "date": "2026-12-25T20:00:00Z",
                "location": {"type": "Point", "coordinates": [28.9784, 41.0082]}
            }"#,
        )
        .unwrap();
        assert_eq!(event.capacity, DEFAULT_CAPACITY);
        assert_eq!(event.price, 0.0);
        assert!(event.description.is_none());
    }

    #[test]
    fn valid_event_passes_validation() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn overlong_title_is_rejected() {
        let mut event = sample();
        event.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(matches!(event.validate(), Err(AppError::ValidationError(_))));
    }

    #[test]
    fn negative_price_and_capacity_are_rejected() {
        let mut event = sample();
        event.price = -1.0;
        assert!(event.validate().is_err());

        let mut event = sample();
        event.capacity = -5;
        assert!(event.validate().is_err());
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut event = sample();
        event.location = GeoPoint::new(200.0, 10.0);
        assert!(event.validate().is_err());

        let mut event = sample();
        event.location = GeoPoint::new(10.0, 95.0);
        assert!(event.validate().is_err());
    }

    #[test]
    fn patch_validates_only_supplied_fields() {
        let patch = EventPatch {
            price: Some(20.0),
            ..Default::default()
        };
        assert!(patch.validate().is_ok());
        assert!(!patch.is_empty());

        let patch = EventPatch {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        assert!(EventPatch::default().is_empty());
    }
}
