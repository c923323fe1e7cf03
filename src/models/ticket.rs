use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An issued ticket. Tickets are append-only: created by the issuance
/// coordinator, never updated or deleted. `price_paid` captures the event's
/// price at purchase time, independent of later price changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_name: String,
    pub seat_number: Option<String>,
    pub price_paid: f64,
    pub purchase_date: DateTime<Utc>,
}

/// Insert payload used inside the issuance transaction.
#[derive(Debug, Clone)]
pub struct NewTicket {
    pub event_id: Uuid,
    pub user_name: String,
    pub seat_number: Option<String>,
    pub price_paid: f64,
}

/// Purchase request body: which event, and who is buying.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketRequest {
    pub event_id: Uuid,
    pub user_name: String,
}
