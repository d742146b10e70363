use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle stage of a delivery. Stages only move forward.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// A driver has been assigned, the order has not left yet.
    Assigned,
    /// The driver is on the way.
    InTransit,
    /// Handed over to the customer. Terminal.
    Delivered,
}

impl DeliveryStatus {
    /// The stage that follows this one, if any.
    pub fn next(&self) -> Option<DeliveryStatus> {
        match self {
            DeliveryStatus::Assigned => Some(DeliveryStatus::InTransit),
            DeliveryStatus::InTransit => Some(DeliveryStatus::Delivered),
            DeliveryStatus::Delivered => None,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Assigned => write!(f, "ASSIGNED"),
            DeliveryStatus::InTransit => write!(f, "IN_TRANSIT"),
            DeliveryStatus::Delivered => write!(f, "DELIVERED"),
        }
    }
}
