pub mod delivery_messages;
pub mod socket_messages;

pub use delivery_messages::*;
pub use socket_messages::*;
