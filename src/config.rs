//! # config — Settings read from environment variables

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Address Axum listens on (`BIND_ADDR`).
    pub bind_addr: SocketAddr,
    /// JSON array of trades to serve (`TRADES_FILE`).  Unset = built-in sample set.
    pub trades_file: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`] but with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address, e.g. 0.0.0.0:3000")?;

        let trades_file = lookup("TRADES_FILE")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self { bind_addr, trades_file })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr, "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.trades_file, None);
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[("BIND_ADDR", "127.0.0.1:8080"), ("TRADES_FILE", "/tmp/trades.json")])
            .unwrap();
        assert_eq!(cfg.bind_addr, "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.trades_file, Some(PathBuf::from("/tmp/trades.json")));
    }

    #[test]
    fn test_blank_trades_file_means_sample_set() {
        assert_eq!(config(&[("TRADES_FILE", "  ")]).unwrap().trades_file, None);
    }

    #[test]
    fn test_bad_bind_addr() {
        assert!(config(&[("BIND_ADDR", "not-an-address")]).is_err());
    }
}
