use tracing::{error, info};
use uuid::Uuid;

use crate::actor_framework::ResourceActor;
use crate::clients::{OrderClient, ProductClient, RevenueClient, UserClient};
use crate::domain::{Order, Product, User};
use crate::revenue_actor::RevenueService;

use super::SystemError;

fn next_id() -> String {
    Uuid::new_v4().to_string()
}

/// The main application system that orchestrates all actors.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct StoreSystem {
    pub order_client: OrderClient,
    pub user_client: UserClient,
    pub product_client: ProductClient,
    pub revenue_client: RevenueClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreSystem {
    pub fn new(buffer_size: usize) -> Self {
        let (user_actor, user_resource_client) = ResourceActor::<User>::new(buffer_size, next_id);
        let user_client = UserClient::new(user_resource_client);
        let user_handle = tokio::spawn(user_actor.run());

        let (product_actor, product_resource_client) = ResourceActor::<Product>::new(buffer_size, next_id);
        let product_client = ProductClient::new(product_resource_client);
        let product_handle = tokio::spawn(product_actor.run());

        let (revenue_service, revenue_client) = RevenueService::new(buffer_size);
        let revenue_handle = tokio::spawn(revenue_service.run());

        let (order_actor, order_resource_client) = ResourceActor::<Order>::new(buffer_size, next_id);
        let order_client = OrderClient::new(
            order_resource_client,
            user_client.clone(),
            product_client.clone(),
            revenue_client.clone(),
        );
        let order_handle = tokio::spawn(order_actor.run());

        info!(buffer_size, "Store system started");

        Self {
            order_client,
            user_client,
            product_client,
            revenue_client,
            handles: vec![user_handle, product_handle, revenue_handle, order_handle],
        }
    }

    /// Stops the revenue service and waits for every actor to drain.
    ///
    /// Resource actors stop once all their clients are dropped, so any clone
    /// handed out (for example to the HTTP state) must be gone by now.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");
        if let Err(e) = self.revenue_client.shutdown().await {
            error!(error = %e, "Revenue service already stopped");
        }

        drop(self.order_client);
        drop(self.user_client);
        drop(self.product_client);
        drop(self.revenue_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::ActorTask(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
