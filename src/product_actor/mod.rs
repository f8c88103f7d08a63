//! Catalog store: the product entity, its stock actions and errors.

mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;
