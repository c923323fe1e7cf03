use sqlx::{Postgres, Transaction};

use crate::models::ticket::{NewTicket, Ticket};

/// Store for issued tickets. The only exposed operation is `create`, and it
/// runs inside a caller-supplied transaction so the insert joins the
/// caller's atomic unit of work. Tickets have no update or delete path.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicketStore;

impl TicketStore {
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        new: NewTicket,
    ) -> Result<Ticket, sqlx::Error> {
        sqlx::query_as::<_, Ticket>(
            "INSERT INTO tickets (event_id, user_name, seat_number, price_paid) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, event_id, user_name, seat_number, price_paid, purchase_date",
        )
        .bind(new.event_id)
        .bind(&new.user_name)
        .bind(&new.seat_number)
        .bind(new.price_paid)
        .fetch_one(&mut **tx)
        .await
    }
}
