//! Responder configuration
//!
//! Every field has a default, so an empty file (or no file) gives the stock
//! responder: `can0`, requests on 0x7DF, responses on 0x7E8.
//!
//! ```toml
//! [transport]
//! interface = "vcan0"
//!
//! [obd]
//! request_id = "0x7DF"
//! response_id = "0x7E8"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::frame::obd;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete responder configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EcuConfig {
    /// Transport configuration
    #[serde(default)]
    pub transport: TransportConfig,

    /// OBD-II addressing
    #[serde(default)]
    pub obd: ObdConfig,
}

impl EcuConfig {
    /// Load configuration from a file, YAML for `.yaml`/`.yml`, TOML otherwise
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let is_yaml = matches!(
            path.extension().and_then(|ext| ext.to_str()),
            Some("yaml") | Some("yml")
        );
        if is_yaml {
            Self::from_yaml_str(&content)
        } else {
            Self::from_toml_str(&content)
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transport.interface.trim().is_empty() {
            return Err(ConfigError::Invalid("interface name is empty".to_string()));
        }
        if self.transport.read_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "read_timeout_ms must be greater than 0".to_string(),
            ));
        }
        for (name, id) in [
            ("request_id", self.obd.request_id),
            ("response_id", self.obd.response_id),
        ] {
            if id > obd::MAX_STANDARD_ID {
                return Err(ConfigError::Invalid(format!(
                    "{} 0x{:X} is not an 11-bit CAN ID",
                    name, id
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Transport Configuration
// =============================================================================

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// CAN interface
    #[serde(default = "default_interface")]
    pub interface: String,

    /// How long a receive blocks before the shutdown flag is checked again
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

fn default_interface() -> String {
    "can0".to_string()
}

fn default_read_timeout_ms() -> u64 {
    100
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            interface: default_interface(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

// =============================================================================
// OBD Addressing
// =============================================================================

/// CAN IDs used for OBD-II requests and responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObdConfig {
    /// ID the responder listens on (standard: 0x7DF functional broadcast)
    #[serde(
        default = "default_request_id",
        deserialize_with = "deserialize_hex_u16"
    )]
    pub request_id: u16,

    /// ID the responder answers from (standard: 0x7E8, ECU #1)
    #[serde(
        default = "default_response_id",
        deserialize_with = "deserialize_hex_u16"
    )]
    pub response_id: u16,
}

fn default_request_id() -> u16 {
    obd::FUNCTIONAL_REQUEST_ID
}

fn default_response_id() -> u16 {
    obd::ECU_RESPONSE_ID
}

impl Default for ObdConfig {
    fn default() -> Self {
        Self {
            request_id: default_request_id(),
            response_id: default_response_id(),
        }
    }
}

// =============================================================================
// Hex Parsing Helpers
// =============================================================================

/// Parse a CAN ID string ("0x7DF", "0X7df" or "7DF")
pub fn parse_can_id(s: &str) -> Result<u16, ConfigError> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u16::from_str_radix(digits, 16)
        .map_err(|e| ConfigError::Invalid(format!("Invalid CAN ID '{}': {}", s, e)))
}

/// Deserialize a hex u16 (supports "0x7DF" or 2015)
fn deserialize_hex_u16<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Hex(String),
        Int(u16),
    }

    match HexOrInt::deserialize(deserializer)? {
        HexOrInt::Int(n) => Ok(n),
        HexOrInt::Hex(s) => parse_can_id(&s).map_err(|e| D::Error::custom(e.to_string())),
    }
}
