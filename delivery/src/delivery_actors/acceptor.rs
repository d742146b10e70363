use crate::delivery_actors::connection::DeliveryConnection;
use crate::delivery_actors::tracker::DeliveryTracker;
use crate::delivery_core::store::DeliveryStore;
use crate::messages::internal_messages::HandleConnection;
use actix::prelude::*;
use colored::Color;
use common::constants::TIMEOUT_SECONDS;
use common::logger::Logger;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Accepts peers on an already bound listener and gives each one its own
/// [`DeliveryConnection`].
pub struct Acceptor {
    listener: Option<TcpListener>,
    tracker: Addr<DeliveryTracker>,
    store: Arc<DeliveryStore>,
    logger: Arc<Logger>,
}

impl Acceptor {
    pub fn new(
        listener: TcpListener,
        tracker: Addr<DeliveryTracker>,
        store: Arc<DeliveryStore>,
    ) -> Self {
        Self {
            listener: Some(listener),
            tracker,
            store,
            logger: Arc::new(Logger::new("Acceptor", Color::Green)),
        }
    }
}

impl Actor for Acceptor {
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let Some(listener) = self.listener.take() else {
            self.logger.error("Acceptor started without a listener");
            ctx.stop();
            return;
        };
        match listener.local_addr() {
            Ok(addr) => self.logger.info(format!("Delivery service listening on {}", addr)),
            Err(e) => self.logger.warn(format!("Listening on an unknown address: {}", e)),
        }

        let acceptor_addr = ctx.address();
        let logger = self.logger.clone();

        ctx.spawn(
            async move {
                loop {
                    match listener.accept().await {
                        Ok((stream, remote_addr)) => {
                            acceptor_addr.do_send(HandleConnection {
                                stream,
                                remote_addr,
                            });
                        }
                        Err(e) => {
                            logger.error(format!("Error accepting connection: {}", e));
                            tokio::time::sleep(Duration::from_secs(TIMEOUT_SECONDS)).await;
                        }
                    }
                }
            }
            .into_actor(self),
        );
    }
}

impl Handler<HandleConnection> for Acceptor {
    type Result = ();

    fn handle(&mut self, msg: HandleConnection, _ctx: &mut Context<Self>) {
        let HandleConnection {
            stream,
            remote_addr,
        } = msg;

        self.logger
            .info(format!("New connection from {}", remote_addr));
        DeliveryConnection::new(stream, remote_addr, self.tracker.clone(), self.store.clone());
    }
}
