use crate::delivery_core::clock::Clock;
use crate::delivery_core::error::{DeliveryError, Result};
use crate::delivery_core::notifier::Notifier;
use crate::delivery_core::store::DeliveryStore;
use chrono::{DateTime, TimeDelta, Utc};
use colored::Color;
use common::constants::{
    BASE_ETA_MINUTES, DRIVER_NAMES, MAX_DELIVERY_SECONDS, MAX_EXTRA_ETA_MINUTES,
    MAX_IN_TRANSIT_SECONDS, MIN_DELIVERY_SECONDS, MIN_IN_TRANSIT_SECONDS,
};
use common::logger::Logger;
use common::types::dtos::{DeliveryRecord, OrderReadyEvent};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

/// What a single [`LifecycleEngine::tick`] pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Another pass was already running, nothing was looked at.
    pub skipped: bool,
    pub in_transit: usize,
    pub delivered: usize,
    /// Records left untouched because their next target could not be computed.
    pub failed: usize,
}

impl TickReport {
    pub fn promoted(&self) -> usize {
        self.in_transit + self.delivered
    }
}

/// A stage change made under the store lock, with what the log line needs.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Promotion {
    InTransit { driver_name: String },
    Delivered { driver_name: String, address: String },
}

/// Drives every delivery from ASSIGNED through IN_TRANSIT to DELIVERED.
///
/// Records are created by [`ingest_assignment`](Self::ingest_assignment) with a
/// precomputed IN_TRANSIT target, and promoted by [`tick`](Self::tick) once the
/// injected clock reaches their target. A record moves at most one stage per
/// tick, and ticks never overlap.
pub struct LifecycleEngine {
    store: Arc<DeliveryStore>,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn Notifier>,
    rng: Mutex<StdRng>,
    drivers: Vec<String>,
    tick_guard: Mutex<()>,
    logger: Logger,
}

impl LifecycleEngine {
    pub fn new(
        store: Arc<DeliveryStore>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        rng: StdRng,
    ) -> Self {
        Self {
            store,
            clock,
            notifier,
            rng: Mutex::new(rng),
            drivers: DRIVER_NAMES.iter().map(|name| name.to_string()).collect(),
            tick_guard: Mutex::new(()),
            logger: Logger::new("Lifecycle", Color::Cyan),
        }
    }

    /// Replaces the default driver roster.
    pub fn with_drivers(mut self, drivers: Vec<String>) -> Result<Self> {
        if drivers.is_empty() {
            return Err(DeliveryError::EmptyRoster);
        }
        self.drivers = drivers;
        Ok(self)
    }

    pub fn store(&self) -> &Arc<DeliveryStore> {
        &self.store
    }

    /// Assigns a driver to a ready order and stores a fresh ASSIGNED record,
    /// replacing any earlier record with the same order id.
    ///
    /// The customer is notified afterwards; a failing notifier is logged and
    /// does not affect the stored record.
    pub fn ingest_assignment(&self, event: OrderReadyEvent) -> DeliveryRecord {
        self.logger.info(format!(
            "Received order.ready event for order {}",
            event.order_id
        ));

        let (driver_name, eta_minutes, in_transit_seconds) = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            let driver_name = self
                .drivers
                .choose(&mut *rng)
                .cloned()
                .unwrap_or_default();
            let eta_minutes = BASE_ETA_MINUTES + rng.gen_range(0..=MAX_EXTRA_ETA_MINUTES);
            let in_transit_seconds =
                rng.gen_range(MIN_IN_TRANSIT_SECONDS..=MAX_IN_TRANSIT_SECONDS);
            (driver_name, eta_minutes, in_transit_seconds)
        };

        let now = self.clock.now();
        let estimated_delivery_time =
            self.saturating_offset(now, TimeDelta::try_minutes(eta_minutes), &event.order_id);
        let target_in_transit_time = self.saturating_offset(
            now,
            TimeDelta::try_seconds(in_transit_seconds),
            &event.order_id,
        );

        let record = DeliveryRecord::assigned(
            &event,
            driver_name.clone(),
            now,
            estimated_delivery_time,
            target_in_transit_time,
        );
        self.store.put(event.order_id.clone(), record.clone());

        self.logger.info(format!(
            "Order {} assigned to driver {} for delivery to {}",
            event.order_id, driver_name, event.address
        ));

        self.notify_customer(&event, &driver_name, estimated_delivery_time);
        record
    }

    /// One status update pass over the records present when it starts.
    ///
    /// Returns immediately with `skipped` set if another pass is in progress.
    pub fn tick(&self) -> TickReport {
        let _guard = match self.tick_guard.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                self.logger
                    .warn("Previous status update still running, skipping this tick");
                return TickReport {
                    skipped: true,
                    ..TickReport::default()
                };
            }
        };

        let now = self.clock.now();
        let mut report = TickReport::default();

        for order_id in self.store.order_ids() {
            // Drawn before taking the store lock, unused if the record is not due.
            let delivery_target = self.draw_delivery_target(now);
            match self
                .store
                .update(&order_id, |record| advance(record, now, delivery_target))
            {
                Some(Ok(Some(Promotion::InTransit { driver_name }))) => {
                    report.in_transit += 1;
                    self.logger.info(format!(
                        "Order {} status changed to IN_TRANSIT (driver {} on the way)",
                        order_id, driver_name
                    ));
                }
                Some(Ok(Some(Promotion::Delivered {
                    driver_name,
                    address,
                }))) => {
                    report.delivered += 1;
                    self.logger.info(format!(
                        "Order {} has been DELIVERED to {} by {}",
                        order_id, address, driver_name
                    ));
                }
                Some(Ok(None)) | None => {}
                Some(Err(e)) => {
                    report.failed += 1;
                    self.logger
                        .error(format!("Could not advance order {}: {}", order_id, e));
                }
            }
        }

        report
    }

    /// `None` when the drawn delivery window does not fit in a timestamp.
    fn draw_delivery_target(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let delivery_seconds = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .gen_range(MIN_DELIVERY_SECONDS..=MAX_DELIVERY_SECONDS);
        TimeDelta::try_seconds(delivery_seconds).and_then(|delta| now.checked_add_signed(delta))
    }

    fn saturating_offset(
        &self,
        now: DateTime<Utc>,
        delta: Option<TimeDelta>,
        order_id: &str,
    ) -> DateTime<Utc> {
        offset(now, delta, order_id).unwrap_or_else(|e| {
            self.logger.warn(format!("{}, using the latest time instead", e));
            DateTime::<Utc>::MAX_UTC
        })
    }

    fn notify_customer(
        &self,
        event: &OrderReadyEvent,
        driver_name: &str,
        estimated_delivery_time: DateTime<Utc>,
    ) {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.notifier
                .notify(event, driver_name, estimated_delivery_time)
        }));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.logger.error(format!(
                "Customer of order {} was not notified: {}",
                event.order_id, e
            )),
            Err(_) => self.logger.error(format!(
                "Notifier panicked while handling order {}",
                event.order_id
            )),
        }
    }
}

// Runs under the store's write lock: no logging, no other locks. Every new
// value is known before the record is touched, so a failed promotion leaves
// the record exactly as it was.
fn advance(
    record: &mut DeliveryRecord,
    now: DateTime<Utc>,
    delivery_target: Option<DateTime<Utc>>,
) -> Result<Option<Promotion>> {
    if record.ready_for_transit(now) {
        let target_delivered_time =
            delivery_target.ok_or_else(|| DeliveryError::TimestampOverflow {
                order_id: record.order_id.clone(),
            })?;
        if !record.start_transit(now, target_delivered_time) {
            return Ok(None);
        }
        Ok(Some(Promotion::InTransit {
            driver_name: record.driver_name.clone(),
        }))
    } else if record.ready_for_delivery(now) {
        if !record.mark_delivered(now) {
            return Ok(None);
        }
        Ok(Some(Promotion::Delivered {
            driver_name: record.driver_name.clone(),
            address: record.address.clone(),
        }))
    } else {
        Ok(None)
    }
}

fn offset(now: DateTime<Utc>, delta: Option<TimeDelta>, order_id: &str) -> Result<DateTime<Utc>> {
    delta
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| DeliveryError::TimestampOverflow {
            order_id: order_id.to_string(),
        })
}
