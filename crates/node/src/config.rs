//! YAML configuration of the node.
use std::fs;
use std::io;
use std::sync::Arc;

use chordring_core::consts::DEFAULT_MAX_HOPS;
use chordring_core::dht::Node;
use chordring_core::dht::Ring;
use chordring_core::dht::RouterConfig;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Error;
use crate::error::Result;
use crate::logging::LogLevel;
use crate::util::ensure_parent_dir;
use crate::util::expand_home;

pub const DEFAULT_CONFIG_PATH: &str = "~/.chordring/config.yaml";

fn default_max_hops() -> usize {
    DEFAULT_MAX_HOPS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Logical names of the ring members. Each name is hashed into its did.
    #[serde(default)]
    pub nodes: Vec<String>,
    /// Hop ceiling of a decentralized lookup.
    #[serde(default = "default_max_hops")]
    pub max_hops: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nodes: vec!["node1".to_string(), "node2".to_string()],
            max_hops: DEFAULT_MAX_HOPS,
            log_level: None,
        }
    }
}

impl Config {
    pub fn router_config(&self) -> RouterConfig {
        RouterConfig {
            max_hops: self.max_hops,
        }
    }

    /// Build a ring from the configured names and populate every finger table.
    ///
    /// Two names hashing to the same did can't both join; the second one fails the
    /// whole build.
    pub fn build_ring(&self) -> Result<Ring> {
        if self.nodes.is_empty() {
            return Err(Error::NoNodeConfigured);
        }
        let ring = Ring::new();
        for name in self.nodes.iter() {
            ring.add_node(Node::new(name))?;
        }
        ring.stabilize_all()?;
        Ok(ring)
    }

    /// Find a configured member by its name.
    pub fn find_member(ring: &Ring, name: &str) -> Result<Arc<Node>> {
        ring.members()?
            .into_iter()
            .find(|n| n.name() == name)
            .ok_or_else(|| Error::UnknownNode(name.to_string()))
    }

    pub fn write_fs<P>(&self, path: P) -> Result<String>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        ensure_parent_dir(&path)?;
        let f =
            fs::File::create(path.as_path()).map_err(|e| Error::CreateFileError(e.to_string()))?;
        let f_writer = io::BufWriter::new(f);
        serde_yaml::to_writer(f_writer, self)?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn read_fs<P>(path: P) -> Result<Config>
    where P: AsRef<std::path::Path> {
        let path = expand_home(path)?;
        tracing::debug!("Read config from: {:?}", path);
        let f = fs::File::open(path).map_err(|e| Error::OpenFileError(e.to_string()))?;
        let f_rdr = io::BufReader::new(f);
        Ok(serde_yaml::from_reader(f_rdr)?)
    }

    /// Read the config file, or fall back to defaults when it doesn't exist.
    pub fn read_fs_or_default<P>(path: P) -> Result<Config>
    where P: AsRef<std::path::Path> {
        let expanded = expand_home(&path)?;
        if !expanded.exists() {
            tracing::info!("Config {:?} not found, use default config", expanded);
            return Ok(Config::default());
        }
        Self::read_fs(expanded)
    }
}
