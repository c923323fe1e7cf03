use sqlx::PgPool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::models::ticket::{NewTicket, Ticket};
use crate::store::tickets::TicketStore;

/// Attempts per purchase, counting the first one. Only conflict-aborted
/// attempts are retried; an aborted attempt commits nothing, so retrying
/// cannot double-issue.
const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum IssueError {
    #[error("event not found")]
    EventNotFound,
    #[error("tickets are sold out")]
    SoldOut,
    #[error("purchase conflicted with a concurrent transaction")]
    Aborted,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Issues tickets against an event's capacity counter.
///
/// The check-then-act sequence (read sold_count, compare to capacity, write
/// ticket, bump the counter) spans four storage operations, so it runs as a
/// single transaction with the event row locked `FOR UPDATE`. Concurrent
/// purchases of the same event queue on the row lock and each sees the
/// previous buyer's committed counter, which is what keeps `sold_count`
/// from ever exceeding `capacity`.
#[derive(Clone)]
pub struct TicketIssuer {
    pool: PgPool,
    tickets: TicketStore,
}

impl TicketIssuer {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            tickets: TicketStore,
        }
    }

    /// Buys one ticket for `event_id`, capturing the event's current price.
    ///
    /// `EventNotFound` and `SoldOut` are terminal. Serialization or deadlock
    /// failures are retried with a fresh transaction up to `MAX_ATTEMPTS`
    /// times, then surfaced as `Aborted` so the caller may retry.
    pub async fn purchase(&self, event_id: Uuid, user_name: &str) -> Result<Ticket, IssueError> {
        let mut attempt = 1;
        loop {
            match self.try_purchase(event_id, user_name).await {
                Err(IssueError::Database(err)) if is_conflict(&err) => {
                    if attempt >= MAX_ATTEMPTS {
                        return Err(IssueError::Aborted);
                    }
                    warn!(%event_id, attempt, "purchase aborted by a concurrent commit, retrying");
                    attempt += 1;
                }
                outcome => return outcome,
            }
        }
    }

    /// One all-or-nothing attempt. Every statement runs on the same
    /// transaction; dropping `tx` on an early error path rolls it back.
    async fn try_purchase(&self, event_id: Uuid, user_name: &str) -> Result<Ticket, IssueError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i32, i32, f64)> = sqlx::query_as(
            "SELECT sold_count, capacity, price FROM events WHERE id = $1 FOR UPDATE",
        )
        .bind(event_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((sold_count, capacity, price)) = row else {
            tx.rollback().await?;
            return Err(IssueError::EventNotFound);
        };

        if sold_count >= capacity {
            tx.rollback().await?;
            return Err(IssueError::SoldOut);
        }

        let ticket = self
            .tickets
            .create(
                &mut tx,
                NewTicket {
                    event_id,
                    user_name: user_name.to_string(),
                    seat_number: None,
                    price_paid: price,
                },
            )
            .await?;

        sqlx::query("UPDATE events SET sold_count = sold_count + 1 WHERE id = $1")
            .bind(event_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(ticket)
    }
}

/// SQLSTATE 40001 is serialization_failure, 40P01 is deadlock_detected.
fn is_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => {
            matches!(db.code().as_deref(), Some("40001") | Some("40P01"))
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_are_not_conflicts() {
        assert!(!is_conflict(&sqlx::Error::RowNotFound));
        assert!(!is_conflict(&sqlx::Error::PoolTimedOut));
    }
}
