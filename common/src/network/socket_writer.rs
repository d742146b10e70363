use crate::logger::Logger;
use crate::messages::socket_messages::{OutgoingLine, Shutdown};
use actix::prelude::*;
use colored::Color;
use std::collections::VecDeque;
use std::net::SocketAddr;
use tokio::io::{AsyncWriteExt, BufWriter, WriteHalf};
use tokio::net::TcpStream;

/// Writes [`OutgoingLine`]s to a peer in the order they were received.
pub struct SocketWriter {
    writer: Option<BufWriter<WriteHalf<TcpStream>>>,
    queue: VecDeque<String>,
    logger: Logger,
}

impl SocketWriter {
    pub fn new(write_half: WriteHalf<TcpStream>, remote_addr: SocketAddr) -> Self {
        Self {
            writer: Some(BufWriter::new(write_half)),
            queue: VecDeque::new(),
            logger: Logger::new(format!("Writer {}", remote_addr), Color::White),
        }
    }
}

impl Actor for SocketWriter {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result = "()")]
struct FlushQueue;

impl Handler<OutgoingLine> for SocketWriter {
    type Result = ();

    fn handle(&mut self, msg: OutgoingLine, ctx: &mut Self::Context) {
        self.queue.push_back(msg.0);
        if self.queue.len() == 1 {
            ctx.notify(FlushQueue);
        }
    }
}

impl Handler<FlushQueue> for SocketWriter {
    type Result = ResponseActFuture<Self, ()>;

    fn handle(&mut self, _msg: FlushQueue, _ctx: &mut Self::Context) -> Self::Result {
        match (self.writer.take(), self.queue.front().cloned()) {
            (Some(mut writer), Some(line)) => {
                let fut = async move {
                    writer.write_all(line.as_bytes()).await?;
                    writer.write_all(b"\n").await?;
                    writer.flush().await?;
                    Ok::<_, std::io::Error>(writer)
                };

                Box::pin(fut.into_actor(self).map(|res, act, ctx| match res {
                    Ok(writer) => {
                        act.writer = Some(writer);
                        act.queue.pop_front();
                        if !act.queue.is_empty() {
                            ctx.notify(FlushQueue);
                        }
                    }
                    Err(e) => {
                        act.logger
                            .error(format!("Dropping connection after write error: {}", e));
                        act.queue.clear();
                        ctx.stop();
                    }
                }))
            }
            (writer, _) => {
                self.writer = writer;
                Box::pin(async {}.into_actor(self))
            }
        }
    }
}

impl Handler<Shutdown> for SocketWriter {
    type Result = ();

    fn handle(&mut self, _msg: Shutdown, ctx: &mut Self::Context) {
        self.writer = None;
        self.queue.clear();
        ctx.stop();
    }
}
