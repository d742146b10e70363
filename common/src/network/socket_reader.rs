use crate::logger::Logger;
use crate::messages::socket_messages::{ConnectionClosed, IncomingLine};
use actix::dev::ToEnvelope;
use actix::{Actor, ActorContext, ActorFutureExt, Addr, AsyncContext, Context, Handler, WrapFuture};
use colored::Color;
use std::net::SocketAddr;
use tokio::io::{AsyncBufReadExt, BufReader, ReadHalf};
use tokio::net::TcpStream;
use tokio_stream::StreamExt as _;
use tokio_stream::wrappers::SplitStream;

/// Forwards every non-empty line read from a peer to `destination`, then a
/// single [`ConnectionClosed`] once the stream ends.
///
/// Lines are split on raw bytes, so a line that is not valid UTF-8 is still
/// forwarded (with replacement characters) instead of ending the stream.
pub struct SocketReader<A>
where
    A: Actor + Handler<IncomingLine> + Handler<ConnectionClosed>,
{
    remote_addr: SocketAddr,
    reader: Option<BufReader<ReadHalf<TcpStream>>>,
    destination: Addr<A>,
    logger: Logger,
}

impl<A> SocketReader<A>
where
    A: Actor + Handler<IncomingLine> + Handler<ConnectionClosed>,
{
    pub fn new(read_half: ReadHalf<TcpStream>, remote_addr: SocketAddr, destination: Addr<A>) -> Self {
        Self {
            remote_addr,
            reader: Some(BufReader::new(read_half)),
            destination,
            logger: Logger::new(format!("Reader {}", remote_addr), Color::White),
        }
    }
}

impl<A> Actor for SocketReader<A>
where
    A: Actor + Handler<IncomingLine> + Handler<ConnectionClosed> + 'static,
    A::Context: ToEnvelope<A, IncomingLine> + ToEnvelope<A, ConnectionClosed>,
{
    type Context = Context<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        let Some(reader) = self.reader.take() else {
            ctx.stop();
            return;
        };
        let destination = self.destination.clone();
        let remote_addr = self.remote_addr;
        let logger = self.logger.clone();

        ctx.spawn(
            async move {
                let mut lines = SplitStream::new(reader.split(b'\n'));
                while let Some(line) = lines.next().await {
                    match line {
                        Ok(bytes) => {
                            let line = String::from_utf8_lossy(&bytes);
                            let line = line.trim();
                            if !line.is_empty() {
                                destination.do_send(IncomingLine(line.to_string()));
                            }
                        }
                        Err(e) => {
                            logger.error(format!("Failed to read from {}: {}", remote_addr, e));
                            break;
                        }
                    }
                }
                destination.do_send(ConnectionClosed { remote_addr });
            }
            .into_actor(self)
            .map(|_, _act, ctx| ctx.stop()),
        );
    }
}
