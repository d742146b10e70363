use crate::delivery_core::error::Result;
use chrono::{DateTime, Utc};
use common::logger::Logger;
use common::types::dtos::OrderReadyEvent;
use common::utils::display_time;

/// Tells the customer who is bringing the order and when to expect it.
pub trait Notifier: Send + Sync {
    fn notify(
        &self,
        event: &OrderReadyEvent,
        driver_name: &str,
        estimated_delivery_time: DateTime<Utc>,
    ) -> Result<()>;
}

/// Writes the customer notification to the service log.
pub struct LogNotifier {
    logger: Logger,
}

impl LogNotifier {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }
}

impl Notifier for LogNotifier {
    fn notify(
        &self,
        event: &OrderReadyEvent,
        driver_name: &str,
        estimated_delivery_time: DateTime<Utc>,
    ) -> Result<()> {
        self.logger.info("=== CUSTOMER NOTIFICATION ===");
        self.logger.info(format!(
            "Dear {}, your order is on its way!",
            event.customer_name
        ));
        self.logger.info(format!("Order ID: {}", event.order_id));
        self.logger
            .info(format!("Items: {} x {}", event.quantity, event.pizza));
        self.logger.info(format!("Driver: {}", driver_name));
        self.logger
            .info(format!("Delivery Address: {}", event.address));
        self.logger.info(format!(
            "Estimated Delivery Time: {}",
            display_time(&estimated_delivery_time)
        ));
        self.logger.info("=============================");
        Ok(())
    }
}
