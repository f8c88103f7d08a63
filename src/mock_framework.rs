//! # Mock Framework
//!
//! Utilities for testing clients in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver.
//! Then use helpers like [`expect_create`] or [`expect_action`] to assert behavior.

use crate::actor_framework::{Entity, Query, ResourceClient, ResourceRequest, Response};
use tokio::sync::mpsc;

/// Creates a mock client and a receiver for asserting requests.
///
/// The client sends to a channel the test controls, so the test plays the actor:
/// it inspects each request and answers with whatever success or failure the
/// scenario needs.
pub fn create_mock_client<T: Entity>(buffer_size: usize) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Response<T, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Response<Option<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a List request
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(Query<T>, Response<Vec<T>, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::Action, Response<T::ActionResult, T::Error>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action { id, action, respond_to }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::FrameworkError;
    use crate::domain::{Role, User, UserCreate};
    use crate::user_actor::UserError;

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<User>(10);

        let create_task = tokio::spawn(async move { client.create(UserCreate::customer("Test", "test@example.com")).await });

        let (payload, responder) = expect_create(&mut receiver).await.expect("Expected Create request");
        assert_eq!(payload.name, "Test");
        let user = User {
            id: "user_1".to_string(),
            name: payload.name,
            email: payload.email,
            role: Role::Customer,
            password_hash: None,
        };
        responder.send(Ok(user.clone())).unwrap();

        let result = create_task.await.unwrap();
        assert_eq!(result, Ok(user));
    }

    #[tokio::test]
    async fn test_mock_list_runs_query() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let admin = User { id: "u1".into(), name: "A".into(), email: "a@x.io".into(), role: Role::Admin, password_hash: None };
        let customer = User { id: "u2".into(), name: "C".into(), email: "c@x.io".into(), role: Role::Customer, password_hash: None };

        let list_task = tokio::spawn(async move { client.list(Query::new(|u: &User| u.is_admin())).await });

        let (query, responder) = expect_list(&mut receiver).await.expect("Expected List request");
        let matching: Vec<User> = [admin.clone(), customer].into_iter().filter(|u| query.matches(u)).collect();
        responder.send(Ok(matching)).unwrap();

        assert_eq!(list_task.await.unwrap(), Ok(vec![admin]));
    }

    #[tokio::test]
    async fn test_mock_error_passthrough() {
        let (client, mut receiver) = create_mock_client::<User>(10);
        let get_task = tokio::spawn(async move { client.get("u9".into()).await });

        let (id, responder) = expect_get(&mut receiver).await.expect("Expected Get request");
        responder
            .send(Err(FrameworkError::Entity(UserError::ValidationError(id))))
            .unwrap();

        let result = get_task.await.unwrap();
        assert_eq!(result, Err(FrameworkError::Entity(UserError::ValidationError("u9".into()))));
    }
}
