use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_yaml::Error),
}

/// One `- key: value` overlay from a service's property list.
///
/// Every field is optional; a list entry usually carries exactly one of
/// them. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceSpec {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: Option<String>,
    pub icon: Option<String>,
    pub newtab: Option<bool>,
}

impl ServiceSpec {
    /// Merges a service's overlay list left-to-right into a single spec.
    /// Later entries win on conflicting keys.
    pub fn merged(overlays: &[ServiceSpec]) -> ServiceSpec {
        overlays.iter().fold(ServiceSpec::default(), |mut spec, overlay| {
            if overlay.host.is_some() {
                spec.host = overlay.host.clone();
            }
            if overlay.port.is_some() {
                spec.port = overlay.port;
            }
            if overlay.path.is_some() {
                spec.path = overlay.path.clone();
            }
            if overlay.icon.is_some() {
                spec.icon = overlay.icon.clone();
            }
            if overlay.newtab.is_some() {
                spec.newtab = overlay.newtab;
            }
            spec
        })
    }
}

// Configuration structure matching the portdeck.yaml format.
//
// Document order is semantic everywhere: host rules are tried first to
// last, and groups/services render in declaration order.
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    #[serde(rename = "host-resolution")]
    pub host_resolution: Vec<IndexMap<String, String>>,
    pub services: IndexMap<String, IndexMap<String, Vec<ServiceSpec>>>,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }
}
