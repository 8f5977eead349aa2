pub mod audit_logs;
pub mod films;
pub mod payments;
pub mod seats;
pub mod showtimes;
pub mod studios;
pub mod ticket_prices;
pub mod tickets;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use films::Entity as Films;
pub use payments::Entity as Payments;
pub use seats::Entity as Seats;
pub use showtimes::Entity as Showtimes;
pub use studios::Entity as Studios;
pub use ticket_prices::Entity as TicketPrices;
pub use tickets::Entity as Tickets;
pub use users::Entity as Users;
