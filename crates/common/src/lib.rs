pub mod types;

pub use types::{EventId, OrderId, OrderNumber};
