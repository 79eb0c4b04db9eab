//! Redis liveness probe
//!
//! Only the host, port and password are taken from `REDIS_URL`. Scheme, username,
//! database path and query string are ignored, so `tcp://:pw@cache:6379` and
//! `redis://cache` are both accepted.

use std::time::Duration;

use ::redis::{Client, ConnectionAddr, ConnectionInfo, RedisConnectionInfo};
use async_trait::async_trait;
use percent_encoding::percent_decode_str;
use url::{Host, Url};

use super::{bounded, redact_url, Probe, ProbeOutcome};
use crate::constants::DEFAULT_REDIS_PORT;
use crate::error::ProbeError;

/// Connection details extracted from a Redis URL
#[derive(Clone, PartialEq, Eq)]
pub struct RedisAddress {
    pub host: String,
    pub port: u16,
    pub password: Option<String>,
}

impl std::fmt::Debug for RedisAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisAddress")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

impl RedisAddress {
    pub fn parse(redis_url: &str) -> Result<Self, ProbeError> {
        let url = Url::parse(redis_url).map_err(|e| {
            ProbeError::InvalidUrl(format!("{}: {}", redact_url(redis_url), e))
        })?;

        let host = match url.host() {
            Some(Host::Domain(domain)) if !domain.is_empty() => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            _ => {
                return Err(ProbeError::InvalidUrl(format!(
                    "{}: missing host",
                    redact_url(redis_url)
                )))
            }
        };

        let password = match url.password() {
            Some(raw) if !raw.is_empty() => Some(
                percent_decode_str(raw)
                    .decode_utf8()
                    .map_err(|e| {
                        ProbeError::InvalidUrl(format!("password is not UTF-8: {}", e))
                    })?
                    .into_owned(),
            ),
            _ => None,
        };

        Ok(Self {
            host,
            port: url.port().unwrap_or(DEFAULT_REDIS_PORT),
            password,
        })
    }

    fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            addr: ConnectionAddr::Tcp(self.host.clone(), self.port),
            redis: RedisConnectionInfo {
                password: self.password.clone(),
                ..Default::default()
            },
        }
    }
}

pub struct RedisProbe {
    redis_url: String,
    probe_timeout: Duration,
}

impl std::fmt::Debug for RedisProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisProbe")
            .field("redis_url", &redact_url(&self.redis_url))
            .field("probe_timeout", &self.probe_timeout)
            .finish()
    }
}

impl RedisProbe {
    pub fn new<S: Into<String>>(redis_url: S, probe_timeout: Duration) -> Self {
        Self {
            redis_url: redis_url.into(),
            probe_timeout,
        }
    }

    async fn ping(&self) -> Result<bool, ProbeError> {
        // Parsed per attempt so a bad URL surfaces as a retried probe failure
        let address = RedisAddress::parse(&self.redis_url)?;
        let client = Client::open(address.connection_info())?;
        let mut conn = client.get_multiplexed_async_connection().await?;

        let pong: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl Probe for RedisProbe {
    async fn probe(&self) -> ProbeOutcome {
        bounded(self.probe_timeout, self.ping()).await
    }

    fn kind(&self) -> &'static str {
        "redis"
    }
}
