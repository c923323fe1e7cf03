use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use crate::models::ticket::TicketRequest;
use crate::routes::AppState;
use crate::utils::error::AppError;

#[derive(Debug, Serialize)]
pub struct PurchaseReceipt {
    pub message: String,
    pub ticket_id: Uuid,
}

pub async fn buy_ticket(
    State(state): State<AppState>,
    Json(request): Json<TicketRequest>,
) -> Result<impl IntoResponse, AppError> {
    if request.user_name.trim().is_empty() {
        return Err(AppError::ValidationError(
            "user_name must not be empty".to_string(),
        ));
    }

    let ticket = state
        .issuer
        .purchase(request.event_id, &request.user_name)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseReceipt {
            message: "Ticket purchased successfully".to_string(),
            ticket_id: ticket.id,
        }),
    ))
}
