use crate::delivery_actors::tracker::DeliveryTracker;
use crate::delivery_core::store::DeliveryStore;
use crate::messages::internal_messages::IngestOrder;
use actix::prelude::*;
use colored::Color;
use common::constants::HEALTH_MESSAGE;
use common::logger::Logger;
use common::messages::delivery_messages::{DeliveryRequest, DeliveryResponse};
use common::messages::socket_messages::{ConnectionClosed, IncomingLine, OutgoingLine, Shutdown};
use common::network::socket_reader::SocketReader;
use common::network::socket_writer::SocketWriter;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpStream;

/// Serves one peer: order-ready events go to the tracker, status queries
/// are answered straight from the store.
pub struct DeliveryConnection {
    remote_addr: SocketAddr,
    writer: Addr<SocketWriter>,
    tracker: Addr<DeliveryTracker>,
    store: Arc<DeliveryStore>,
    logger: Logger,
}

impl DeliveryConnection {
    pub fn new(
        stream: TcpStream,
        remote_addr: SocketAddr,
        tracker: Addr<DeliveryTracker>,
        store: Arc<DeliveryStore>,
    ) -> Addr<Self> {
        DeliveryConnection::create(move |ctx| {
            let (read_half, write_half) = tokio::io::split(stream);
            SocketReader::new(read_half, remote_addr, ctx.address()).start();
            let writer = SocketWriter::new(write_half, remote_addr).start();

            DeliveryConnection {
                remote_addr,
                writer,
                tracker,
                store,
                logger: Logger::new(format!("Connection {}", remote_addr), Color::BrightBlue),
            }
        })
    }

    fn reply(&self, response: &DeliveryResponse) {
        match serde_json::to_string(response) {
            Ok(json) => self.writer.do_send(OutgoingLine(json)),
            Err(e) => self
                .logger
                .error(format!("Failed to serialize response: {}", e)),
        }
    }
}

pub fn lookup_response(store: &DeliveryStore, order_id: String) -> DeliveryResponse {
    match store.get(&order_id) {
        Some(record) => DeliveryResponse::Delivery { record },
        None => DeliveryResponse::NotFound { order_id },
    }
}

pub fn all_deliveries_response(store: &DeliveryStore) -> DeliveryResponse {
    DeliveryResponse::AllDeliveries {
        deliveries: store.snapshot(),
    }
}

pub fn health_response() -> DeliveryResponse {
    DeliveryResponse::Health {
        message: HEALTH_MESSAGE.to_string(),
    }
}

impl Actor for DeliveryConnection {
    type Context = Context<Self>;

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.logger.info("Connection closed.");
    }
}

impl Handler<IncomingLine> for DeliveryConnection {
    type Result = ();

    fn handle(&mut self, msg: IncomingLine, ctx: &mut Self::Context) {
        match serde_json::from_str::<DeliveryRequest>(&msg.0) {
            Ok(DeliveryRequest::OrderReady(event)) => {
                // Hold further requests until the tracker answers so that
                // replies keep the order of the requests.
                ctx.wait(
                    self.tracker
                        .send(IngestOrder { event })
                        .into_actor(self)
                        .map(|res, act, _ctx| {
                            let response = match res {
                                Ok(record) => DeliveryResponse::Accepted {
                                    order_id: record.order_id,
                                    driver_name: record.driver_name,
                                    estimated_delivery_time: record.estimated_delivery_time,
                                },
                                Err(e) => {
                                    act.logger
                                        .error(format!("Tracker unavailable: {}", e));
                                    DeliveryResponse::Error {
                                        message: "An unexpected error occurred.".to_string(),
                                    }
                                }
                            };
                            act.reply(&response);
                        }),
                );
            }
            Ok(DeliveryRequest::GetDelivery { order_id }) => {
                self.logger
                    .info(format!("Checking delivery status for order {}", order_id));
                self.reply(&lookup_response(&self.store, order_id));
            }
            Ok(DeliveryRequest::GetAllDeliveries) => {
                self.logger.info("Fetching all deliveries");
                self.reply(&all_deliveries_response(&self.store));
            }
            Ok(DeliveryRequest::Health) => self.reply(&health_response()),
            Err(e) => {
                self.logger
                    .warn(format!("Malformed request from {}: {}", self.remote_addr, e));
                self.reply(&DeliveryResponse::Error {
                    message: format!("Malformed request: {}", e),
                });
            }
        }
    }
}

impl Handler<ConnectionClosed> for DeliveryConnection {
    type Result = ();

    fn handle(&mut self, msg: ConnectionClosed, ctx: &mut Self::Context) {
        self.logger
            .info(format!("Peer {} disconnected", msg.remote_addr));
        self.writer.do_send(Shutdown);
        ctx.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery_actors::acceptor::Acceptor;
    use crate::delivery_core::clock::ManualClock;
    use crate::delivery_core::engine::LifecycleEngine;
    use crate::delivery_core::notifier::LogNotifier;
    use crate::messages::internal_messages::RunTick;
    use chrono::{TimeZone, Utc};
    use common::constants::DRIVER_NAMES;
    use common::types::delivery_status::DeliveryStatus;
    use common::types::dtos::{DeliveryRecord, OrderReadyEvent};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
    use tokio::net::TcpListener;
    use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
    use tokio::time::timeout;

    fn stored_record(order_id: &str) -> DeliveryRecord {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let event = OrderReadyEvent {
            order_id: order_id.to_string(),
            customer_name: "Alice".to_string(),
            address: "1 Main St".to_string(),
            pizza: "Margherita".to_string(),
            quantity: 2,
        };
        DeliveryRecord::assigned(&event, "Lisa Weber", now, now, now)
    }

    #[test]
    fn test_lookup_distinguishes_absent_from_present() {
        let store = DeliveryStore::new();
        store.put("A1", stored_record("A1"));

        assert_eq!(
            lookup_response(&store, "A1".to_string()),
            DeliveryResponse::Delivery {
                record: stored_record("A1")
            }
        );
        assert_eq!(
            lookup_response(&store, "unknown-id".to_string()),
            DeliveryResponse::NotFound {
                order_id: "unknown-id".to_string()
            }
        );
    }

    #[test]
    fn test_all_deliveries_lists_every_record() {
        let store = DeliveryStore::new();
        store.put("A1", stored_record("A1"));
        store.put("B2", stored_record("B2"));

        match all_deliveries_response(&store) {
            DeliveryResponse::AllDeliveries { deliveries } => {
                assert_eq!(deliveries.len(), 2);
                assert_eq!(deliveries["B2"].order_id, "B2");
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    async fn request(
        writer: &mut OwnedWriteHalf,
        lines: &mut Lines<BufReader<OwnedReadHalf>>,
        line: &str,
    ) -> DeliveryResponse {
        writer
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .unwrap();
        let reply = timeout(Duration::from_secs(5), lines.next_line())
            .await
            .expect("no reply in time")
            .unwrap()
            .expect("connection closed");
        serde_json::from_str(&reply).unwrap()
    }

    struct RunningService {
        addr: SocketAddr,
        clock: Arc<ManualClock>,
        store: Arc<DeliveryStore>,
        tracker: Addr<DeliveryTracker>,
    }

    async fn start_service() -> RunningService {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        let store = Arc::new(DeliveryStore::new());
        let engine = LifecycleEngine::new(
            store.clone(),
            clock.clone(),
            Arc::new(LogNotifier::new(Logger::new("Notification", Color::Magenta))),
            StdRng::seed_from_u64(11),
        );
        let tracker =
            DeliveryTracker::new(Arc::new(engine), Duration::from_secs(3600)).start();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        Acceptor::new(listener, tracker.clone(), store.clone()).start();

        RunningService {
            addr,
            clock,
            store,
            tracker,
        }
    }

    #[actix_rt::test]
    async fn test_requests_over_tcp() {
        let RunningService {
            addr,
            clock,
            store,
            tracker,
        } = start_service().await;

        let (read_half, mut writer) = TcpStream::connect(addr).await.unwrap().into_split();
        let mut lines = BufReader::new(read_half).lines();

        assert_eq!(
            request(&mut writer, &mut lines, r#"{"type":"Health"}"#).await,
            health_response()
        );

        assert_eq!(
            request(&mut writer, &mut lines, r#"{"type":"GetDelivery","orderId":"X1"}"#).await,
            DeliveryResponse::NotFound {
                order_id: "X1".to_string()
            }
        );

        match request(&mut writer, &mut lines, "{not json").await {
            DeliveryResponse::Error { message } => assert!(message.starts_with("Malformed request")),
            other => panic!("unexpected response {:?}", other),
        }

        let order_ready = r#"{"type":"OrderReady","orderId":"X1","customerName":"Alice","address":"1 Main St","pizza":"Margherita","quantity":2}"#;
        match request(&mut writer, &mut lines, order_ready).await {
            DeliveryResponse::Accepted {
                order_id,
                driver_name,
                ..
            } => {
                assert_eq!(order_id, "X1");
                assert!(DRIVER_NAMES.contains(&driver_name.as_str()));
            }
            other => panic!("unexpected response {:?}", other),
        }

        let record = match request(&mut writer, &mut lines, r#"{"type":"GetDelivery","orderId":"X1"}"#).await {
            DeliveryResponse::Delivery { record } => record,
            other => panic!("unexpected response {:?}", other),
        };
        assert_eq!(record.status, DeliveryStatus::Assigned);
        assert_eq!(store.get("X1"), Some(record.clone()));

        clock.set(record.target_in_transit_time);
        tracker.send(RunTick).await.unwrap();

        match request(&mut writer, &mut lines, r#"{"type":"GetAllDeliveries"}"#).await {
            DeliveryResponse::AllDeliveries { deliveries } => {
                assert_eq!(deliveries.len(), 1);
                assert_eq!(deliveries["X1"].status, DeliveryStatus::InTransit);
            }
            other => panic!("unexpected response {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_invalid_utf8_line_gets_an_error_and_connection_stays_open() {
        let service = start_service().await;
        let (read_half, mut writer) = TcpStream::connect(service.addr)
            .await
            .unwrap()
            .into_split();
        let mut lines = BufReader::new(read_half).lines();

        writer.write_all(b"{\"type\":\"Health\xff\"}\n").await.unwrap();
        let reply = timeout(Duration::from_secs(5), lines.next_line())
            .await
            .expect("no reply in time")
            .unwrap()
            .expect("connection closed");
        match serde_json::from_str::<DeliveryResponse>(&reply).unwrap() {
            DeliveryResponse::Error { message } => assert!(message.starts_with("Malformed request")),
            other => panic!("unexpected response {:?}", other),
        }

        assert_eq!(
            request(&mut writer, &mut lines, r#"{"type":"Health"}"#).await,
            health_response()
        );
        assert!(service.store.is_empty());
    }
}
