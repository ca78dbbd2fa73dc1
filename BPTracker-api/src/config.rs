use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a number: {0}")]
    Port(#[from] std::num::ParseIntError),

    #[error("HOST must be an IP address: {0}")]
    Host(#[from] std::net::AddrParseError),
}

/// Where the loopback API listens and where it keeps its files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Holds the database file and the `bp_images` directory
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 3000,
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ServerConfig {
    /// Read `HOST`, `PORT` and `DATA_DIR`, falling back to the defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: match env::var("HOST") {
                Ok(host) => host.parse()?,
                Err(_) => defaults.host,
            },
            port: match env::var("PORT") {
                Ok(port) => port.parse()?,
                Err(_) => defaults.port,
            },
            data_dir: env::var("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
