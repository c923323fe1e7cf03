use axum::routing::{get, post};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, set_security_headers};
use crate::handlers::{events, health_check, tickets};
use crate::store::{EventStore, TicketIssuer};

/// Shared handler state: one store per concern, all borrowing the same pool.
#[derive(Clone)]
pub struct AppState {
    pub events: EventStore,
    pub issuer: TicketIssuer,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        Self {
            events: EventStore::new(pool.clone()),
            issuer: TicketIssuer::new(pool),
        }
    }
}

pub fn create_routes(state: AppState) -> Router {
    let event_routes = Router::new()
        .route("/", get(events::list_events).post(events::create_event))
        .route("/nearby/", get(events::nearby_events))
        .route("/stats/categories", get(events::category_stats))
        .route(
            "/:id",
            get(events::get_event)
                .patch(events::update_event)
                .delete(events::delete_event),
        );

    Router::new()
        .route("/health", get(health_check))
        .nest("/events", event_routes)
        .route("/tickets/buy", post(tickets::buy_ticket))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(set_security_headers))
                .layer(create_cors_layer()),
        )
        .with_state(state)
}
