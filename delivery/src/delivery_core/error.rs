use thiserror::Error;

pub type Result<T> = std::result::Result<T, DeliveryError>;

#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The engine needs at least one driver to assign.
    #[error("driver roster is empty")]
    EmptyRoster,

    /// A target timestamp fell outside the representable range.
    #[error("timestamp overflow while scheduling order {order_id}")]
    TimestampOverflow { order_id: String },

    #[error("notification failed: {0}")]
    Notification(String),

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: String, value: String },
}
