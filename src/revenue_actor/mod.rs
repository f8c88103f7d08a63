//! Revenue ledger: accrual events for delivered orders, reduced on demand.

mod messages;
mod service;
pub mod error;

pub use error::*;
pub use messages::*;
pub use service::*;
