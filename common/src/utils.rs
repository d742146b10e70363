use crate::constants::{DELIVERY_SERVICE_PORT, SERVER_IP_ADDRESS};
use chrono::{DateTime, Local, Utc};

pub fn default_service_address() -> String {
    format!("{}:{}", SERVER_IP_ADDRESS, DELIVERY_SERVICE_PORT)
}

/// Renders a UTC timestamp in local time for humans.
pub fn display_time(time: &DateTime<Utc>) -> String {
    time.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

pub fn display_optional_time(time: &Option<DateTime<Utc>>) -> String {
    match time {
        Some(time) => display_time(time),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_service_address_uses_constants() {
        assert_eq!(default_service_address(), "127.0.0.1:8083");
    }

    #[test]
    fn test_missing_time_is_rendered_as_dash() {
        assert_eq!(display_optional_time(&None), "-");
        assert_ne!(display_optional_time(&Some(Utc::now())), "-");
    }
}
