pub const SERVER_IP_ADDRESS: &str = "127.0.0.1";
pub const DELIVERY_SERVICE_PORT: u16 = 8083;
pub const TIMEOUT_SECONDS: u64 = 2;

/// Period of the status update pass.
pub const TICK_INTERVAL_SECONDS: u64 = 5;

// Seconds after assignment until the order goes IN_TRANSIT.
pub const MIN_IN_TRANSIT_SECONDS: i64 = 10;
pub const MAX_IN_TRANSIT_SECONDS: i64 = 15;

// Seconds after IN_TRANSIT until the order is DELIVERED.
pub const MIN_DELIVERY_SECONDS: i64 = 15;
pub const MAX_DELIVERY_SECONDS: i64 = 25;

// Customer facing ETA: base plus up to the extra minutes.
pub const BASE_ETA_MINUTES: i64 = 20;
pub const MAX_EXTRA_ETA_MINUTES: i64 = 19;

pub const DRIVER_NAMES: [&str; 5] = [
    "Max Mustermann",
    "Anna Schmidt",
    "Peter Mueller",
    "Lisa Weber",
    "Tom Fischer",
];

pub const HEALTH_MESSAGE: &str = "Delivery Service is running";
