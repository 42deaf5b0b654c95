// File: pinflow-core/src/config.rs

use std::env;
use std::time::Duration;

use dotenv::dotenv;

use pinflow_common::Error;

/// Runtime settings for the client engine, env-driven with the reference
/// defaults baked in.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the REST backend, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    /// Loopback port the OAuth redirect lands on.
    pub callback_port: u16,
    /// Cadence of status checks while a connection attempt is running.
    pub poll_interval: Duration,
    /// Wall-clock limit for one connection attempt.
    pub connect_deadline: Duration,
    /// How long cosmetic notices stay up before auto-clearing.
    pub notice_ttl: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:5000/api".to_string(),
            callback_port: 9876,
            poll_interval: Duration::from_secs(3),
            connect_deadline: Duration::from_secs(300),
            notice_ttl: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Reads `PINFLOW_*` variables, falling back to the defaults above.
    /// A `.env` file in the working directory is honored.
    pub fn from_env() -> Result<Self, Error> {
        dotenv().ok();

        let mut cfg = Self::default();
        if let Ok(v) = env::var("PINFLOW_API_BASE_URL") {
            cfg.api_base_url = v;
        }
        if let Ok(v) = env::var("PINFLOW_CALLBACK_PORT") {
            cfg.callback_port = v
                .parse()
                .map_err(|_| Error::Validation(format!("PINFLOW_CALLBACK_PORT is not a port: {v}")))?;
        }
        if let Ok(v) = env::var("PINFLOW_POLL_INTERVAL_SECS") {
            cfg.poll_interval = Duration::from_secs(parse_secs("PINFLOW_POLL_INTERVAL_SECS", &v)?);
        }
        if let Ok(v) = env::var("PINFLOW_CONNECT_DEADLINE_SECS") {
            cfg.connect_deadline =
                Duration::from_secs(parse_secs("PINFLOW_CONNECT_DEADLINE_SECS", &v)?);
        }
        Ok(cfg)
    }
}

fn parse_secs(name: &str, value: &str) -> Result<u64, Error> {
    value
        .parse()
        .map_err(|_| Error::Validation(format!("{name} is not a number of seconds: {value}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_behavior() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.poll_interval, Duration::from_secs(3));
        assert_eq!(cfg.connect_deadline, Duration::from_secs(300));
        assert_eq!(cfg.notice_ttl, Duration::from_secs(5));
        assert_eq!(cfg.callback_port, 9876);
    }

    #[test]
    fn parse_secs_rejects_garbage() {
        assert!(parse_secs("X", "12").is_ok());
        assert!(parse_secs("X", "soon").is_err());
    }
}
