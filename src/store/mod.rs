pub mod events;
pub mod issuance;
pub mod tickets;

pub use events::EventStore;
pub use issuance::{IssueError, TicketIssuer};
pub use tickets::TicketStore;
