use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::revenue_actor::{Applied, RevenueError, RevenueEvent, RevenueRequest};

/// Client for the revenue ledger.
#[derive(Clone)]
pub struct RevenueClient {
    sender: mpsc::Sender<RevenueRequest>,
}

impl RevenueClient {
    pub fn new(sender: mpsc::Sender<RevenueRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), RevenueError> {
        debug!("Sending shutdown");
        self.sender
            .send(RevenueRequest::Shutdown)
            .await
            .map_err(|_| RevenueError::ActorCommunicationError("Actor closed".to_string()))
    }
}

client_method!(RevenueClient => fn accrue(order_id: String, amount: Decimal, revision: u64) -> Applied as RevenueRequest::Accrue, Error = RevenueError);
client_method!(RevenueClient => fn reverse(order_id: String, revision: u64) -> Applied as RevenueRequest::Reverse, Error = RevenueError);
client_method!(RevenueClient => fn total() -> Decimal as RevenueRequest::Total, Error = RevenueError);
client_method!(RevenueClient => fn events() -> Vec<RevenueEvent> as RevenueRequest::Events, Error = RevenueError);
