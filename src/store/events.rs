use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::event::{CategoryStats, Event, EventPatch, GeoPoint, NewEvent};
use crate::utils::error::AppError;

const EVENT_COLUMNS: &str = "id, title, description, category, date, longitude, latitude, \
    price, capacity, sold_count, created_at";

const METERS_PER_KM: f64 = 1000.0;

/// Flat row shape; the API model nests the coordinates as a GeoJSON point.
#[derive(Debug, FromRow)]
struct EventRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    category: String,
    date: DateTime<Utc>,
    longitude: f64,
    latitude: f64,
    price: f64,
    capacity: i32,
    sold_count: i32,
    created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Event {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            date: row.date,
            location: GeoPoint::new(row.longitude, row.latitude),
            price: row.price,
            capacity: row.capacity,
            sold_count: row.sold_count,
            created_at: row.created_at,
        }
    }
}

/// Store for event records, backed by an injected connection pool.
#[derive(Clone)]
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewEvent) -> Result<Event, AppError> {
        new.validate()?;

        let sql = format!(
            "INSERT INTO events (title, description, category, date, longitude, latitude, price, capacity) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(&new.title)
            .bind(&new.description)
            .bind(&new.category)
            .bind(new.date)
            .bind(new.location.longitude())
            .bind(new.location.latitude())
            .bind(new.price)
            .bind(new.capacity)
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    pub async fn get(&self, id: Uuid) -> Result<Event, AppError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event with id '{id}' was not found")))?;

        Ok(row.into())
    }

    pub async fn list(&self) -> Result<Vec<Event>, AppError> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events");
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Applies only the supplied fields; everything else is left untouched.
    pub async fn update(&self, id: Uuid, patch: EventPatch) -> Result<Event, AppError> {
        patch.validate()?;

        let sql = format!(
            "UPDATE events SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                category = COALESCE($4, category), \
                price = COALESCE($5, price), \
                date = COALESCE($6, date) \
             WHERE id = $1 \
             RETURNING {EVENT_COLUMNS}"
        );
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .bind(&patch.title)
            .bind(&patch.description)
            .bind(&patch.category)
            .bind(patch.price)
            .bind(patch.date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event with id '{id}' was not found")))?;

        Ok(row.into())
    }

    /// No cascade: tickets referencing the event are left in place.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Event with id '{id}' was not found"
            )));
        }
        Ok(())
    }

    /// Events within `radius_km` of the query point, nearest first. The
    /// `earth_box` prefilter rides the GiST index over
    /// `ll_to_earth(latitude, longitude)`; `earth_distance` trims the box
    /// corners and provides the ordering.
    pub async fn find_near(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
    ) -> Result<Vec<Event>, AppError> {
        let radius_m = radius_km * METERS_PER_KM;

        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE earth_box(ll_to_earth($1, $2), $3) @> ll_to_earth(latitude, longitude) \
               AND earth_distance(ll_to_earth($1, $2), ll_to_earth(latitude, longitude)) <= $3 \
             ORDER BY earth_distance(ll_to_earth($1, $2), ll_to_earth(latitude, longitude))"
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(lat)
            .bind(lon)
            .bind(radius_m)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Per-category event count and average price, most events first. Ties
    /// are broken by category name so the order is stable.
    pub async fn category_stats(&self) -> Result<Vec<CategoryStats>, AppError> {
        let stats = sqlx::query_as::<_, CategoryStats>(
            "SELECT category, COUNT(*) AS total_events, AVG(price) AS average_price \
             FROM events \
             GROUP BY category \
             ORDER BY total_events DESC, category ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_row_nests_location_as_geojson() {
        let row = EventRow {
            id: Uuid::nil(),
            title: "Open air concert".to_string(),
            description: None,
            category: "music".to_string(),
            date: Utc::now(),
            longitude: 28.9784,
            latitude: 41.0082,
            price: 150.0,
            capacity: 100,
            sold_count: 0,
            created_at: Utc::now(),
        };

        let event: Event = row.into();
        assert_eq!(event.location, GeoPoint::new(28.9784, 41.0082));
        assert_eq!(event.location.coordinates, [28.9784, 41.0082]);
    }
}
