pub mod acceptor;
pub mod connection;
pub mod tracker;
