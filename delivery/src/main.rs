use actix::prelude::*;
use colored::Color;
use common::logger::Logger;
use delivery::config::DeliveryConfig;
use delivery::delivery_actors::acceptor::Acceptor;
use delivery::delivery_actors::tracker::DeliveryTracker;
use delivery::delivery_core::clock::SystemClock;
use delivery::delivery_core::engine::LifecycleEngine;
use delivery::delivery_core::notifier::LogNotifier;
use delivery::delivery_core::store::DeliveryStore;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;

#[actix::main]
async fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();
    let config = match DeliveryConfig::from_sources(&args, |key| env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!(
                "Usage: {} [bind_addr]",
                args.first().map(String::as_str).unwrap_or("delivery")
            );
            std::process::exit(1);
        }
    };

    let logger = Logger::new("Delivery Service", Color::Green);
    logger.info(format!(
        "Starting on {} (status updates every {:?})",
        config.bind_addr, config.tick_interval
    ));

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let store = Arc::new(DeliveryStore::new());
    let engine = LifecycleEngine::new(
        store.clone(),
        Arc::new(SystemClock),
        Arc::new(LogNotifier::new(Logger::new("Notification", Color::Magenta))),
        rng,
    );

    let tracker = DeliveryTracker::new(Arc::new(engine), config.tick_interval).start();
    let listener = TcpListener::bind(config.bind_addr).await?;
    Acceptor::new(listener, tracker, store).start();

    tokio::select! {
        _ = ctrl_c() => {
            logger.info("Ctrl-C received, shutting down...");
        }
    }

    Ok(())
}
