use std::{
    collections::HashMap,
    fs::{self, File},
    io::prelude::*,
    path::Path,
};

use serde::{Deserialize, Serialize};

/// Top-level configuration for the server, loaded from a TOML file.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EmberConfig {
    /// Socket address to bind to, e.g. "0.0.0.0:25565".
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(flatten)]
    pub other_fields: HashMap<String, toml::Value>,
}

fn default_bind() -> String {
    "0.0.0.0:25565".to_string()
}

impl Default for EmberConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            other_fields: HashMap::new(),
        }
    }
}

impl EmberConfig {
    /// A config bound to a specific port, for embedders and tests.
    pub fn with_port(port: u16) -> Self {
        Self {
            bind: format!("0.0.0.0:{port}"),
            ..Self::default()
        }
    }

    pub fn load(path: &Path) -> Result<Self, EmberConfigLoadError> {
        let raw = fs::read_to_string(path).map_err(EmberConfigLoadError::Io)?;
        let config: Self = toml::from_str(&raw).map_err(EmberConfigLoadError::Parse)?;

        for field in &config.other_fields {
            println!(
                "Unknown configuration '{}' with value {:?}",
                field.0, field.1
            );
        }

        Ok(config)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let config_str = toml::to_string(&self)?;
        let mut file = File::create(path)?;
        file.write_all(config_str.as_bytes())?;
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmberConfigLoadError {
    #[error("Could not open config")]
    Io(#[from] std::io::Error),
    #[error("Could not parse")]
    Parse(#[from] toml::de::Error),
}
