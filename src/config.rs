use std::env;
use std::ops::Range;
use std::str::FromStr;
use std::time::Duration;

use crate::blockchain::{DEFAULT_DIFFICULTY, DEFAULT_MINING_REWARD, MAX_DIFFICULTY};
use crate::error::{ChainError, Result};

/// Node settings, read from the environment (`.env` is loaded first by `main`).
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Reward recipient. Empty means "generate a wallet at startup".
    pub miner_address: String,
    pub difficulty: usize,
    pub mining_reward: f64,
    pub mining_interval: Duration,
    /// Optional bound on a single proof-of-work search.
    pub mining_timeout: Option<Duration>,
    pub neighbours_sync_interval: Duration,
    pub peer_port_range: Range<u16>,
    pub peer_ip_offset_range: Range<u8>,
    pub peer_probe_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5100,
            miner_address: String::new(),
            difficulty: DEFAULT_DIFFICULTY,
            mining_reward: DEFAULT_MINING_REWARD,
            mining_interval: Duration::from_secs(20),
            mining_timeout: None,
            neighbours_sync_interval: Duration::from_secs(20),
            peer_port_range: 5100..5103,
            peer_ip_offset_range: 0..1,
            peer_probe_timeout: Duration::from_millis(100),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup("HOST") {
            cfg.host = host;
        }
        if let Some(raw) = lookup("PORT") {
            cfg.port = parse_value("PORT", &raw)?;
        }
        if let Some(address) = lookup("MINER_ADDRESS") {
            cfg.miner_address = address.trim().to_string();
        }
        if let Some(raw) = lookup("MINING_DIFFICULTY") {
            cfg.difficulty = parse_value("MINING_DIFFICULTY", &raw)?;
        }
        if let Some(raw) = lookup("MINING_REWARD") {
            cfg.mining_reward = parse_value("MINING_REWARD", &raw)?;
        }
        if let Some(raw) = lookup("MINING_INTERVAL_SECS") {
            cfg.mining_interval = Duration::from_secs(parse_value("MINING_INTERVAL_SECS", &raw)?);
        }
        if let Some(raw) = lookup("MINING_TIMEOUT_SECS") {
            cfg.mining_timeout = Some(Duration::from_secs(parse_value(
                "MINING_TIMEOUT_SECS",
                &raw,
            )?));
        }
        if let Some(raw) = lookup("NEIGHBOURS_SYNC_SECS") {
            cfg.neighbours_sync_interval =
                Duration::from_secs(parse_value("NEIGHBOURS_SYNC_SECS", &raw)?);
        }
        if let Some(raw) = lookup("PEER_PORT_RANGE") {
            cfg.peer_port_range = parse_range("PEER_PORT_RANGE", &raw)?;
        }
        if let Some(raw) = lookup("PEER_IP_OFFSET_RANGE") {
            cfg.peer_ip_offset_range = parse_range("PEER_IP_OFFSET_RANGE", &raw)?;
        }
        if let Some(raw) = lookup("PEER_PROBE_TIMEOUT_MS") {
            cfg.peer_probe_timeout =
                Duration::from_millis(parse_value("PEER_PROBE_TIMEOUT_MS", &raw)?);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.difficulty > MAX_DIFFICULTY {
            return Err(ChainError::Config(format!(
                "MINING_DIFFICULTY must be at most {MAX_DIFFICULTY}, got {}",
                self.difficulty
            )));
        }
        if !self.mining_reward.is_finite() || self.mining_reward < 0.0 {
            return Err(ChainError::Config(format!(
                "MINING_REWARD must be a non-negative number, got {}",
                self.mining_reward
            )));
        }
        if self.mining_interval.is_zero() || self.neighbours_sync_interval.is_zero() {
            return Err(ChainError::Config("intervals must be positive".to_string()));
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| ChainError::Config(format!("{key}: cannot parse {raw:?}")))
}

/// Half-open range written as `a..b` or `a-b`.
fn parse_range<T: FromStr + PartialOrd>(key: &str, raw: &str) -> Result<Range<T>> {
    let (start, end) = raw
        .split_once("..")
        .or_else(|| raw.split_once('-'))
        .ok_or_else(|| ChainError::Config(format!("{key}: expected `start..end`, got {raw:?}")))?;
    let range = parse_value(key, start)?..parse_value(key, end)?;
    if range.start >= range.end {
        return Err(ChainError::Config(format!("{key}: empty range {raw:?}")));
    }
    Ok(range)
}
