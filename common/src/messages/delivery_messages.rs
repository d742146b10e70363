use crate::types::dtos::{DeliveryRecord, OrderReadyEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Requests accepted by the delivery service, one JSON object per line.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum DeliveryRequest {
    /// The kitchen finished an order; assign a driver.
    OrderReady(OrderReadyEvent),
    /// Current tracking state of one order.
    #[serde(rename_all = "camelCase")]
    GetDelivery { order_id: String },
    /// Tracking state of every known order.
    GetAllDeliveries,
    Health,
}

/// Responses written back by the delivery service, one per request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum DeliveryResponse {
    #[serde(rename_all = "camelCase")]
    Accepted {
        order_id: String,
        driver_name: String,
        estimated_delivery_time: DateTime<Utc>,
    },
    Delivery {
        record: DeliveryRecord,
    },
    #[serde(rename_all = "camelCase")]
    NotFound { order_id: String },
    AllDeliveries {
        deliveries: HashMap<String, DeliveryRecord>,
    },
    Health {
        message: String,
    },
    Error {
        message: String,
    },
}
