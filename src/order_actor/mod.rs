//! Order ledger: the order entity and its guarded status transitions.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
