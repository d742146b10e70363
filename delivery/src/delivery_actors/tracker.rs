use crate::delivery_core::engine::LifecycleEngine;
use crate::messages::internal_messages::{IngestOrder, RunTick};
use actix::prelude::*;
use colored::Color;
use common::logger::Logger;
use std::sync::Arc;
use std::time::Duration;

/// Owns the lifecycle engine and runs its status update pass on a fixed
/// interval. Ingests and ticks are handled one at a time by the actor.
pub struct DeliveryTracker {
    pub engine: Arc<LifecycleEngine>,
    pub tick_interval: Duration,
    pub logger: Logger,
}

impl DeliveryTracker {
    pub fn new(engine: Arc<LifecycleEngine>, tick_interval: Duration) -> Self {
        Self {
            engine,
            tick_interval,
            logger: Logger::new("Tracker", Color::Blue),
        }
    }

    fn start_status_updates(&self, ctx: &mut Context<Self>) {
        ctx.run_interval(self.tick_interval, |actor, _ctx| {
            let report = actor.engine.tick();
            if report.promoted() > 0 || report.failed > 0 {
                actor.logger.info(format!(
                    "Status update: {} in transit, {} delivered, {} failed",
                    report.in_transit, report.delivered, report.failed
                ));
            }
        });
    }
}

impl Actor for DeliveryTracker {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        self.logger.info(format!(
            "Tracker started, updating statuses every {:?}",
            self.tick_interval
        ));
        self.start_status_updates(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.logger.info("Tracker stopped.");
    }
}

impl Handler<IngestOrder> for DeliveryTracker {
    type Result = MessageResult<IngestOrder>;

    fn handle(&mut self, msg: IngestOrder, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.engine.ingest_assignment(msg.event))
    }
}

impl Handler<RunTick> for DeliveryTracker {
    type Result = MessageResult<RunTick>;

    fn handle(&mut self, _msg: RunTick, _ctx: &mut Self::Context) -> Self::Result {
        MessageResult(self.engine.tick())
    }
}
