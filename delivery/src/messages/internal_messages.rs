use crate::delivery_core::engine::TickReport;
use actix::Message;
use common::types::dtos::{DeliveryRecord, OrderReadyEvent};
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// Hands an order-ready event to the tracker. Answers with the stored record.
#[derive(Message, Debug, Clone)]
#[rtype(result = "DeliveryRecord")]
pub struct IngestOrder {
    pub event: OrderReadyEvent,
}

/// Runs one status update pass outside the regular interval.
#[derive(Message, Debug, Clone, Copy)]
#[rtype(result = "TickReport")]
pub struct RunTick;

#[derive(Message, Debug)]
#[rtype(result = "()")]
pub struct HandleConnection {
    pub stream: TcpStream,
    pub remote_addr: SocketAddr,
}
