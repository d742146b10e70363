use crate::types::delivery_status::DeliveryStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Emitted by the kitchen once an order can be picked up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReadyEvent {
    pub order_id: String,
    pub customer_name: String,
    pub address: String,
    /// Item description.
    pub pizza: String,
    pub quantity: i32,
}

/// Tracking state of one order, keyed by `order_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRecord {
    pub order_id: String,
    pub status: DeliveryStatus,
    pub driver_name: String,
    pub address: String,
    pub assigned_at: DateTime<Utc>,
    /// ETA shown to the customer. Transitions never look at it.
    pub estimated_delivery_time: DateTime<Utc>,
    /// Earliest moment the record may go IN_TRANSIT.
    pub target_in_transit_time: DateTime<Utc>,
    pub in_transit_at: Option<DateTime<Utc>>,
    /// Earliest moment the record may be DELIVERED. Set when leaving ASSIGNED.
    pub target_delivered_time: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl DeliveryRecord {
    /// Builds a freshly assigned record.
    pub fn assigned(
        event: &OrderReadyEvent,
        driver_name: impl Into<String>,
        assigned_at: DateTime<Utc>,
        estimated_delivery_time: DateTime<Utc>,
        target_in_transit_time: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id: event.order_id.clone(),
            status: DeliveryStatus::Assigned,
            driver_name: driver_name.into(),
            address: event.address.clone(),
            assigned_at,
            estimated_delivery_time,
            target_in_transit_time,
            in_transit_at: None,
            target_delivered_time: None,
            delivered_at: None,
        }
    }

    pub fn ready_for_transit(&self, now: DateTime<Utc>) -> bool {
        self.status == DeliveryStatus::Assigned && now >= self.target_in_transit_time
    }

    pub fn ready_for_delivery(&self, now: DateTime<Utc>) -> bool {
        match self.target_delivered_time {
            Some(target) => self.status == DeliveryStatus::InTransit && now >= target,
            None => false,
        }
    }

    /// ASSIGNED -> IN_TRANSIT. Returns false and leaves the record as it was
    /// when IN_TRANSIT is not the next stage.
    pub fn start_transit(&mut self, now: DateTime<Utc>, target_delivered_time: DateTime<Utc>) -> bool {
        if self.status.next() != Some(DeliveryStatus::InTransit) {
            return false;
        }
        self.status = DeliveryStatus::InTransit;
        self.in_transit_at = Some(now);
        self.target_delivered_time = Some(target_delivered_time);
        true
    }

    /// IN_TRANSIT -> DELIVERED. Returns false and leaves the record as it was
    /// when DELIVERED is not the next stage.
    pub fn mark_delivered(&mut self, now: DateTime<Utc>) -> bool {
        if self.status.next() != Some(DeliveryStatus::Delivered) {
            return false;
        }
        self.status = DeliveryStatus::Delivered;
        self.delivered_at = Some(now);
        true
    }
}
