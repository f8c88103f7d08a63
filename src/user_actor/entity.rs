use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate};
use super::error::UserError;

fn validate_email(email: &str) -> Result<(), UserError> {
    if email.trim().is_empty() {
        return Err(UserError::ValidationError("Email required".to_string()));
    }
    if !email.contains('@') {
        return Err(UserError::ValidationError(format!("Invalid email: {email}")));
    }
    Ok(())
}

impl Entity for User {
    type Id = String;
    type CreateParams = UserCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();
    type Error = UserError;

    fn id(&self) -> &String { &self.id }

    /// Creates a new User from creation parameters.
    ///
    /// # Arguments
    /// * `id` - Unique identifier for the user
    /// * `params` - Name, email and role
    fn from_create_params(id: String, params: UserCreate) -> Result<Self, UserError> {
        validate_email(&params.email)?;
        if params.name.trim().is_empty() {
            return Err(UserError::ValidationError("Name required".to_string()));
        }
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            email: params.email.trim().to_lowercase(),
            role: params.role,
            password_hash: params.password_hash,
        })
    }

    /// Accounts are not edited after creation.
    fn on_update(&mut self, _patch: ()) -> Result<(), UserError> {
        Ok(())
    }

    fn conflicts_with(&self, other: &Self) -> Option<UserError> {
        (self.email == other.email).then(|| UserError::AlreadyExists(self.email.clone()))
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), UserError> {
        Ok(())
    }
}
