use thiserror::Error;

use crate::auth::AuthError;
use crate::product_actor::ProductError;
use crate::user_actor::UserError;

/// Failures while starting, seeding or stopping the system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Seeding users failed: {0}")]
    SeedUser(#[from] UserError),
    #[error("Seeding products failed: {0}")]
    SeedProduct(#[from] ProductError),
    #[error("Seeding admin credentials failed: {0}")]
    Auth(#[from] AuthError),
    #[error("Actor task failed: {0}")]
    ActorTask(String),
}
