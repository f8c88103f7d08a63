//! User directory: accounts and roles consumed by the access-control gate.

pub mod entity;
pub mod error;

pub use error::*;
