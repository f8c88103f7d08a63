use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

// =============================================================================
// 1. THE ABSTRACTION (Traits with Hooks, Params, and Actions)
// =============================================================================

/// Trait that any domain entity must implement to be managed by ResourceActor
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;
    type CreateParams: Send + Sync + Debug;
    type Patch: Send + Sync + Debug;

    // --- Custom Actions ---
    type Action: Send + Sync + Debug;
    type ActionResult: Send + Sync + Debug;

    /// Domain error raised by hooks and actions.
    type Error: std::error::Error + Clone + Send + Sync + 'static;

    /// Get the ID of the entity
    fn id(&self) -> &Self::Id;

    /// Construct the full Entity from the ID and creation params
    fn from_create_params(id: Self::Id, params: Self::CreateParams) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks ---

    fn on_create(&mut self) -> Result<(), Self::Error> { Ok(()) }
    fn on_update(&mut self, patch: Self::Patch) -> Result<(), Self::Error>;
    fn on_delete(&self) -> Result<(), Self::Error> { Ok(()) }

    /// Checked against every other stored entity on create and update.
    /// Returning an error rejects the write, which is how unique keys are kept.
    fn conflicts_with(&self, _other: &Self) -> Option<Self::Error> { None }

    // --- Action Handler ---

    /// Handle a custom domain-specific action
    fn handle_action(&mut self, action: Self::Action) -> Result<Self::ActionResult, Self::Error>;
}

/// Errors produced by the framework itself, wrapping the entity's own error type.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FrameworkError<E> {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Entity(E),
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped")]
    ActorDropped,
}

/// A read-side filter evaluated inside the actor.
pub struct Query<T>(Box<dyn Fn(&T) -> bool + Send + Sync>);

impl<T> Query<T> {
    pub fn new(predicate: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        Self(Box::new(predicate))
    }

    #[cfg(test)]
    pub fn all() -> Self {
        Self::new(|_| true)
    }

    pub fn matches(&self, item: &T) -> bool {
        (self.0)(item)
    }
}

impl<T> Debug for Query<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Query(..)")
    }
}

// =============================================================================
// 2. THE GENERIC MESSAGES
// =============================================================================

pub type Response<T, E> = oneshot::Sender<Result<T, FrameworkError<E>>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        params: T::CreateParams,
        respond_to: Response<T, T::Error>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>, T::Error>,
    },
    List {
        query: Query<T>,
        respond_to: Response<Vec<T>, T::Error>,
    },
    Update {
        id: T::Id,
        patch: T::Patch,
        respond_to: Response<T, T::Error>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<(), T::Error>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult, T::Error>,
    },
}

// =============================================================================
// 3. THE GENERIC ACTOR SERVER
// =============================================================================

pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: Entity> ResourceActor<T> {
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    pub async fn run(mut self) {
        let entity = std::any::type_name::<T>();
        info!(entity, "ResourceActor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    let _ = respond_to.send(self.handle_create(params));
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { query, respond_to } => {
                    let items: Vec<T> = self.store.values().filter(|item| query.matches(item)).cloned().collect();
                    debug!(entity, count = items.len(), "Listed items");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update { id, patch, respond_to } => {
                    let _ = respond_to.send(self.handle_update(id, patch));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = match self.store.get(&id) {
                        Some(item) => item.on_delete().map_err(FrameworkError::Entity),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    if result.is_ok() {
                        self.store.remove(&id);
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action { id, action, respond_to } => {
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item.handle_action(action).map_err(FrameworkError::Entity),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    let _ = respond_to.send(result);
                }
            }
        }
        info!(entity, "ResourceActor stopped");
    }

    fn handle_create(&mut self, params: T::CreateParams) -> Result<T, FrameworkError<T::Error>> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(FrameworkError::Entity)?;
        item.on_create().map_err(FrameworkError::Entity)?;
        self.check_conflicts(&item)?;
        self.store.insert(id, item.clone());
        Ok(item)
    }

    fn handle_update(&mut self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T::Error>> {
        let mut updated = self
            .store
            .get(&id)
            .cloned()
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        // Patch a copy so a rejected update leaves the stored item untouched.
        updated.on_update(patch).map_err(FrameworkError::Entity)?;
        self.check_conflicts(&updated)?;
        self.store.insert(id, updated.clone());
        Ok(updated)
    }

    fn check_conflicts(&self, candidate: &T) -> Result<(), FrameworkError<T::Error>> {
        for other in self.store.values().filter(|other| other.id() != candidate.id()) {
            if let Some(e) = candidate.conflicts_with(other) {
                return Err(FrameworkError::Entity(e));
            }
        }
        Ok(())
    }
}

// =============================================================================
// 4. THE GENERIC CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self { sender }
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R, T::Error>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError<T::Error>> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn create(&self, params: T::CreateParams) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to }).await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to }).await
    }

    pub async fn list(&self, query: Query<T>) -> Result<Vec<T>, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::List { query, respond_to }).await
    }

    pub async fn update(&self, id: T::Id, patch: T::Patch) -> Result<T, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Update { id, patch, respond_to }).await
    }

    #[allow(dead_code)]
    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to }).await
    }

    pub async fn perform_action(&self, id: T::Id, action: T::Action) -> Result<T::ActionResult, FrameworkError<T::Error>> {
        self.request(|respond_to| ResourceRequest::Action { id, action, respond_to }).await
    }
}

// =============================================================================
// 5. EXAMPLE USAGE (Test)
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    // --- Domain Definition ---

    #[derive(Clone, Debug, PartialEq)]
    struct Coupon {
        id: String,
        code: String,
        remaining: u32,
    }

    #[derive(Debug)]
    struct CouponCreate {
        code: String,
        remaining: u32,
    }

    #[derive(Debug)]
    struct CouponPatch {
        code: Option<String>,
    }

    #[derive(Debug)]
    enum CouponAction {
        Redeem,
    }

    #[derive(Debug, Clone, Error, PartialEq)]
    enum CouponError {
        #[error("Coupon exhausted")]
        Exhausted,
        #[error("Duplicate code: {0}")]
        DuplicateCode(String),
        #[error("Code required")]
        MissingCode,
    }

    impl Entity for Coupon {
        type Id = String;
        type CreateParams = CouponCreate;
        type Patch = CouponPatch;
        type Action = CouponAction;
        type ActionResult = u32;
        type Error = CouponError;

        fn id(&self) -> &String { &self.id }

        fn from_create_params(id: String, params: CouponCreate) -> Result<Self, CouponError> {
            if params.code.is_empty() {
                return Err(CouponError::MissingCode);
            }
            Ok(Self { id, code: params.code, remaining: params.remaining })
        }

        fn on_update(&mut self, patch: CouponPatch) -> Result<(), CouponError> {
            if let Some(code) = patch.code {
                self.code = code;
            }
            Ok(())
        }

        fn conflicts_with(&self, other: &Self) -> Option<CouponError> {
            (self.code == other.code).then(|| CouponError::DuplicateCode(self.code.clone()))
        }

        fn handle_action(&mut self, action: CouponAction) -> Result<u32, CouponError> {
            match action {
                CouponAction::Redeem => {
                    if self.remaining == 0 {
                        return Err(CouponError::Exhausted);
                    }
                    self.remaining -= 1;
                    Ok(self.remaining)
                }
            }
        }
    }

    fn spawn_coupons() -> ResourceClient<Coupon> {
        let counter = Arc::new(AtomicU64::new(1));
        let next_id = move || format!("coupon_{}", counter.fetch_add(1, Ordering::SeqCst));
        let (actor, client) = ResourceActor::new(10, next_id);
        tokio::spawn(actor.run());
        client
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_resource_actor_with_actions() {
        let client = spawn_coupons();

        let coupon = client.create(CouponCreate { code: "SPRING".into(), remaining: 1 }).await.unwrap();
        assert_eq!(coupon.id, "coupon_1");

        let left = client.perform_action(coupon.id.clone(), CouponAction::Redeem).await.unwrap();
        assert_eq!(left, 0);

        let again = client.perform_action(coupon.id.clone(), CouponAction::Redeem).await;
        assert_eq!(again, Err(FrameworkError::Entity(CouponError::Exhausted)));

        let missing = client.perform_action("nope".into(), CouponAction::Redeem).await;
        assert_eq!(missing, Err(FrameworkError::NotFound("nope".into())));
    }

    #[tokio::test]
    async fn test_conflicts_reject_create_and_update() {
        let client = spawn_coupons();

        let first = client.create(CouponCreate { code: "A".into(), remaining: 1 }).await.unwrap();
        client.create(CouponCreate { code: "B".into(), remaining: 1 }).await.unwrap();

        let dup = client.create(CouponCreate { code: "A".into(), remaining: 1 }).await;
        assert_eq!(dup, Err(FrameworkError::Entity(CouponError::DuplicateCode("A".into()))));

        let clash = client.update(first.id.clone(), CouponPatch { code: Some("B".into()) }).await;
        assert!(matches!(clash, Err(FrameworkError::Entity(CouponError::DuplicateCode(_)))));

        // Rejected update leaves the stored item unchanged; self-update is fine.
        let stored = client.get(first.id.clone()).await.unwrap().unwrap();
        assert_eq!(stored.code, "A");
        let same = client.update(first.id.clone(), CouponPatch { code: Some("A".into()) }).await;
        assert!(same.is_ok());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let client = spawn_coupons();
        client.create(CouponCreate { code: "X".into(), remaining: 0 }).await.unwrap();
        let live = client.create(CouponCreate { code: "Y".into(), remaining: 3 }).await.unwrap();

        let available = client.list(Query::new(|c: &Coupon| c.remaining > 0)).await.unwrap();
        assert_eq!(available, vec![live.clone()]);
        assert_eq!(client.list(Query::all()).await.unwrap().len(), 2);

        client.delete(live.id.clone()).await.unwrap();
        assert_eq!(client.get(live.id.clone()).await.unwrap(), None);
        assert_eq!(client.delete(live.id).await, Err(FrameworkError::NotFound("coupon_2".into())));
    }

    #[tokio::test]
    async fn test_create_validation_error() {
        let client = spawn_coupons();
        let result = client.create(CouponCreate { code: String::new(), remaining: 1 }).await;
        assert_eq!(result, Err(FrameworkError::Entity(CouponError::MissingCode)));
    }
}
