use actix::prelude::*;
use std::net::SocketAddr;

/// One line read from a peer, without the trailing newline.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct IncomingLine(pub String);

/// One line to write to a peer. The writer appends the newline.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct OutgoingLine(pub String);

/// The peer closed its side or the read failed.
#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct ConnectionClosed {
    pub remote_addr: SocketAddr,
}

#[derive(Message, Debug, Clone)]
#[rtype(result = "()")]
pub struct Shutdown;
