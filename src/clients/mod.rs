//! Typed clients over the actors. These are the only handles the HTTP layer holds.

#[macro_use]
mod macros;

mod order_client;
mod product_client;
mod revenue_client;
mod user_client;

pub use order_client::*;
pub use product_client::*;
pub use revenue_client::*;
pub use user_client::*;
