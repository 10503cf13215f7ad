//! Process configuration read from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::{Context, Result};
use tasker_core::config::StorageSettings;

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub storage: StorageSettings,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = match lookup("HOST").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .with_context(|| format!("HOST is not an IP address: {}", raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match lookup("PORT").filter(|v| !v.trim().is_empty()) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {}", raw))?,
            None => DEFAULT_PORT,
        };
        let storage =
            StorageSettings::from_lookup(&lookup).context("invalid storage configuration")?;

        Ok(Self {
            addr: SocketAddr::new(host, port),
            storage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tasker_core::config::DeploymentMode;

    fn config_from(pairs: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_bind_all_interfaces_on_3000() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.addr, SocketAddr::from(([0, 0, 0, 0], 3000)));
        assert_eq!(config.storage.mode, DeploymentMode::Development);
    }

    #[test]
    fn reads_host_port_and_storage() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8081"),
            ("TASKER_ENV", "production"),
        ])
        .unwrap();
        assert_eq!(config.addr, SocketAddr::from(([127, 0, 0, 1], 8081)));
        assert!(config.storage.mode.is_production());
    }

    #[test]
    fn rejects_bad_port_and_mode() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("TASKER_ENV", "staging")]).is_err());
    }
}
