//! YAML configuration of a node daemon.
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::processor::ProcessorConfig;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

lazy_static::lazy_static! {
  static ref DEFAULT_DATA_DIR: String = "~/.chordfs/data".to_string();
}

pub const DEFAULT_CONFIG_PATH: &str = "~/.chordfs/config.yaml";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:50000";
pub const DEFAULT_ENDPOINT_URL: &str = "http://127.0.0.1:50000";
pub const DEFAULT_RPC_TIMEOUT: u64 = chordfs_core::consts::DEFAULT_RPC_TIMEOUT;

/// Where a node keeps the content of the files it owns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// One file per key under `<data_dir>/<node did>`.
    #[default]
    Fs,
    /// Lost when the process exits.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Address the JSON-RPC server listens on.
    pub bind_addr: String,
    /// Address advertised to other nodes. Its hash is the identifier of the node.
    /// Falls back to the bound address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_addr: Option<String>,
    /// Node the cli talks to.
    pub endpoint_url: String,
    pub data_dir: String,
    #[serde(default)]
    pub storage: StorageKind,
    /// Seconds before an outbound procedure gives up.
    #[serde(default = "default_rpc_timeout")]
    pub rpc_timeout: u64,
    /// Joined right after start-up when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub introducer: Option<String>,
    #[serde(default = "default_leave_on_shutdown")]
    pub leave_on_shutdown: bool,
}

fn default_rpc_timeout() -> u64 {
    DEFAULT_RPC_TIMEOUT
}

fn default_leave_on_shutdown() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            external_addr: None,
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            data_dir: DEFAULT_DATA_DIR.clone(),
            storage: StorageKind::default(),
            rpc_timeout: DEFAULT_RPC_TIMEOUT,
            introducer: None,
            leave_on_shutdown: true,
        }
    }
}

impl TryFrom<&Config> for ProcessorConfig {
    type Error = Error;
    fn try_from(config: &Config) -> Result<Self> {
        Ok(ProcessorConfig::new(
            config.storage,
            expand_home(&config.data_dir)?,
            Duration::from_secs(config.rpc_timeout),
        ))
    }
}

impl Config {
    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self)?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        Ok(serde_yaml::from_reader(f_rdr)?)
    }

    /// Like [Config::read_fs], but a missing file yields the defaults.
    pub fn read_fs_or_default<P>(path: P) -> Result<Config>
    where P: AsRef<Path> {
        let expanded = expand_home(&path)?;
        if !expanded.exists() {
            tracing::debug!("{:?} not found, use default config", expanded);
            return Ok(Config::default());
        }
        Self::read_fs(path)
    }
}
