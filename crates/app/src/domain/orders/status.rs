//! Order Status

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of an order.
///
/// `pending` is the only state the service assigns on its own. Every other
/// state is driven by external workflows through a status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown order status \"{0}\"")]
pub struct UnknownOrderStatus(pub String);

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Cancelled,
        OrderStatus::Failed,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Failed => "failed",
        }
    }

    /// Whether downstream workflows treat this state as final.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Cancelled | OrderStatus::Failed)
    }

    /// Transition table followed by the payment and cancellation workflows.
    ///
    /// Status updates are not rejected when they fall outside this table; the
    /// service only reports them.
    #[must_use]
    pub const fn is_workflow_transition(self, next: OrderStatus) -> bool {
        match (self, next) {
            (
                OrderStatus::Pending,
                OrderStatus::Confirmed | OrderStatus::Cancelled | OrderStatus::Failed,
            )
            | (OrderStatus::Confirmed, OrderStatus::Cancelled | OrderStatus::Failed) => true,
            _ => false,
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = UnknownOrderStatus;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| UnknownOrderStatus(value.to_owned()))
    }
}
