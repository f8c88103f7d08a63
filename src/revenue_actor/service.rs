use std::collections::HashMap;

use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

use crate::clients::RevenueClient;
use super::error::RevenueError;
use super::messages::{Applied, RevenueEvent, RevenueEventKind, RevenueRequest, ServiceResponse};

/// Where one order currently stands in the ledger.
#[derive(Debug, Default)]
struct Position {
    accrued: Option<Decimal>,
    revision: u64,
}

/// Revenue ledger actor.
///
/// Keeps an append-only list of accrual events and, per order, the latest
/// status revision it has seen. An event older than that revision is dropped,
/// so the total never depends on the order in which status updates arrive.
pub struct RevenueService {
    receiver: mpsc::Receiver<RevenueRequest>,
    positions: HashMap<String, Position>,
    events: Vec<RevenueEvent>,
}

impl RevenueService {
    pub fn new(buffer_size: usize) -> (Self, RevenueClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            positions: HashMap::new(),
            events: Vec::new(),
        };
        let client = RevenueClient::new(sender);
        (service, client)
    }

    #[instrument(name = "revenue_service", skip(self))]
    pub async fn run(mut self) {
        info!("RevenueService starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                RevenueRequest::Accrue { order_id, amount, revision, respond_to } => {
                    self.handle_accrue(order_id, amount, revision, respond_to);
                }
                RevenueRequest::Reverse { order_id, revision, respond_to } => {
                    self.handle_reverse(order_id, revision, respond_to);
                }
                RevenueRequest::Total { respond_to } => {
                    let _ = respond_to.send(Ok(self.total()));
                }
                RevenueRequest::Events { respond_to } => {
                    let _ = respond_to.send(Ok(self.events.clone()));
                }
                RevenueRequest::Shutdown => {
                    info!("RevenueService shutting down");
                    break;
                }
            }
        }
        info!("RevenueService stopped");
    }

    /// Returns the order's position after advancing it to `revision`, or `None`
    /// when the ledger has already seen a newer revision for this order.
    fn advance(&mut self, order_id: &str, revision: u64) -> Option<&mut Position> {
        let position = self.positions.entry(order_id.to_string()).or_default();
        if revision < position.revision {
            debug!(seen = position.revision, "Stale revenue event dropped");
            return None;
        }
        position.revision = revision;
        Some(position)
    }

    #[instrument(fields(order_id = %order_id, %amount, revision), skip(self, respond_to))]
    fn handle_accrue(
        &mut self,
        order_id: String,
        amount: Decimal,
        revision: u64,
        respond_to: ServiceResponse<Applied, RevenueError>,
    ) {
        let applied = match self.advance(&order_id, revision) {
            Some(position) if position.accrued.is_none() => {
                position.accrued = Some(amount);
                Applied::Recorded
            }
            _ => Applied::Ignored,
        };
        if applied == Applied::Recorded {
            self.record(order_id, RevenueEventKind::Accrued, amount, revision);
            info!("Revenue accrued");
        }
        let _ = respond_to.send(Ok(applied));
    }

    #[instrument(fields(order_id = %order_id, revision), skip(self, respond_to))]
    fn handle_reverse(&mut self, order_id: String, revision: u64, respond_to: ServiceResponse<Applied, RevenueError>) {
        let reversed = self
            .advance(&order_id, revision)
            .and_then(|position| position.accrued.take());
        let applied = match reversed {
            Some(amount) => {
                self.record(order_id, RevenueEventKind::Reversed, amount, revision);
                info!(%amount, "Revenue reversed");
                Applied::Recorded
            }
            None => Applied::Ignored,
        };
        let _ = respond_to.send(Ok(applied));
    }

    fn record(&mut self, order_id: String, kind: RevenueEventKind, amount: Decimal, revision: u64) {
        self.events.push(RevenueEvent {
            order_id,
            kind,
            amount,
            revision,
            recorded_at: Utc::now(),
        });
    }

    fn total(&self) -> Decimal {
        self.events
            .iter()
            .map(|event| match event.kind {
                RevenueEventKind::Accrued => event.amount,
                RevenueEventKind::Reversed => -event.amount,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn() -> RevenueClient {
        let (service, client) = RevenueService::new(10);
        tokio::spawn(service.run());
        client
    }

    #[tokio::test]
    async fn test_accrual_is_idempotent() -> Result<(), Box<dyn std::error::Error>> {
        let revenue = spawn();

        let first = revenue.accrue("order_1".into(), Decimal::from(200), 1).await?;
        let second = revenue.accrue("order_1".into(), Decimal::from(200), 2).await?;
        assert_eq!(first, Applied::Recorded);
        assert_eq!(second, Applied::Ignored);
        assert_eq!(revenue.total().await?, Decimal::from(200));

        revenue.shutdown().await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_reversal_removes_contribution() -> Result<(), Box<dyn std::error::Error>> {
        let revenue = spawn();
        revenue.accrue("order_1".into(), Decimal::from(200), 1).await?;
        revenue.accrue("order_2".into(), Decimal::new(4999, 2), 1).await?;

        assert_eq!(revenue.reverse("order_1".into(), 2).await?, Applied::Recorded);
        assert_eq!(revenue.reverse("order_1".into(), 3).await?, Applied::Ignored);
        assert_eq!(revenue.total().await?, Decimal::new(4999, 2));

        // Delivered again after the reversal.
        assert_eq!(revenue.accrue("order_1".into(), Decimal::from(200), 4).await?, Applied::Recorded);
        assert_eq!(revenue.total().await?, Decimal::new(24999, 2));

        let kinds: Vec<_> = revenue.events().await?.into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RevenueEventKind::Accrued,
                RevenueEventKind::Accrued,
                RevenueEventKind::Reversed,
                RevenueEventKind::Accrued
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_stale_events_are_dropped() -> Result<(), Box<dyn std::error::Error>> {
        let revenue = spawn();

        // Revision 2 (left Delivered) overtakes revision 1 (entered Delivered).
        assert_eq!(revenue.reverse("order_1".into(), 2).await?, Applied::Ignored);
        assert_eq!(revenue.accrue("order_1".into(), Decimal::from(200), 1).await?, Applied::Ignored);
        assert_eq!(revenue.total().await?, Decimal::ZERO);
        assert!(revenue.events().await?.is_empty());
        Ok(())
    }
}
