use crate::delivery_core::error::{DeliveryError, Result};
use common::constants::TICK_INTERVAL_SECONDS;
use common::utils::default_service_address;
use std::net::SocketAddr;
use std::time::Duration;

pub const BIND_ADDR_VAR: &str = "DELIVERY_BIND_ADDR";
pub const TICK_SECONDS_VAR: &str = "DELIVERY_TICK_SECONDS";
pub const SEED_VAR: &str = "DELIVERY_SEED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryConfig {
    pub bind_addr: SocketAddr,
    pub tick_interval: Duration,
    /// Fixed seed for driver and timing draws. Entropy when absent.
    pub seed: Option<u64>,
}

impl DeliveryConfig {
    /// Builds the configuration from `delivery [bind_addr]` and the
    /// environment. The command line wins over the environment, which wins
    /// over the compiled-in defaults.
    pub fn from_sources<F>(args: &[String], env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = args
            .get(1)
            .cloned()
            .or_else(|| env(BIND_ADDR_VAR))
            .unwrap_or_else(default_service_address);
        let bind_addr = bind_addr
            .parse::<SocketAddr>()
            .map_err(|_| invalid(BIND_ADDR_VAR, &bind_addr))?;

        let tick_interval = match env(TICK_SECONDS_VAR) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(seconds) if seconds > 0 => Duration::from_secs(seconds),
                _ => return Err(invalid(TICK_SECONDS_VAR, &raw)),
            },
            None => Duration::from_secs(TICK_INTERVAL_SECONDS),
        };

        let seed = env(SEED_VAR)
            .map(|raw| raw.parse::<u64>().map_err(|_| invalid(SEED_VAR, &raw)))
            .transpose()?;

        Ok(Self {
            bind_addr,
            tick_interval,
            seed,
        })
    }
}

fn invalid(key: &str, value: &str) -> DeliveryError {
    DeliveryError::InvalidConfig {
        key: key.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(extra: &[&str]) -> Vec<String> {
        std::iter::once("delivery")
            .chain(extra.iter().copied())
            .map(String::from)
            .collect()
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_come_from_constants() {
        let config = DeliveryConfig::from_sources(&args(&[]), env_of(&[])).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:8083".parse().unwrap());
        assert_eq!(config.tick_interval, Duration::from_secs(5));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_command_line_wins_over_environment() {
        let env = env_of(&[(BIND_ADDR_VAR, "0.0.0.0:9000")]);
        let config = DeliveryConfig::from_sources(&args(&["127.0.0.1:7000"]), env).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:7000".parse().unwrap());
    }

    #[test]
    fn test_environment_overrides() {
        let env = env_of(&[
            (BIND_ADDR_VAR, "0.0.0.0:9000"),
            (TICK_SECONDS_VAR, "1"),
            (SEED_VAR, "1234"),
        ]);
        let config = DeliveryConfig::from_sources(&args(&[]), env).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:9000".parse().unwrap());
        assert_eq!(config.tick_interval, Duration::from_secs(1));
        assert_eq!(config.seed, Some(1234));
    }

    #[test]
    fn test_invalid_values_are_reported_with_their_key() {
        let err = DeliveryConfig::from_sources(&args(&["not-an-address"]), env_of(&[]))
            .unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidConfig { ref key, .. } if key == BIND_ADDR_VAR));

        let err = DeliveryConfig::from_sources(&args(&[]), env_of(&[(TICK_SECONDS_VAR, "0")]))
            .unwrap_err();
        assert!(matches!(err, DeliveryError::InvalidConfig { ref key, .. } if key == TICK_SECONDS_VAR));

        let err = DeliveryConfig::from_sources(&args(&[]), env_of(&[(SEED_VAR, "-1")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid value \"-1\" for DELIVERY_SEED");
    }
}
