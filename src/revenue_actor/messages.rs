use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::oneshot;

use super::error::RevenueError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// What happened to one order's contribution to revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RevenueEventKind {
    Accrued,
    Reversed,
}

/// One entry in the append-only ledger.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueEvent {
    pub order_id: String,
    pub kind: RevenueEventKind,
    pub amount: Decimal,
    pub revision: u64,
    pub recorded_at: DateTime<Utc>,
}

/// Outcome of submitting an accrual or reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Recorded,
    /// Already in that state, or superseded by a newer revision of the order.
    Ignored,
}

#[derive(Debug)]
pub enum RevenueRequest {
    Accrue {
        order_id: String,
        amount: Decimal,
        revision: u64,
        respond_to: ServiceResponse<Applied, RevenueError>,
    },
    Reverse {
        order_id: String,
        revision: u64,
        respond_to: ServiceResponse<Applied, RevenueError>,
    },
    Total {
        respond_to: ServiceResponse<Decimal, RevenueError>,
    },
    Events {
        respond_to: ServiceResponse<Vec<RevenueEvent>, RevenueError>,
    },
    Shutdown,
}
