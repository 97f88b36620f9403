//! Configuration for the SMO client

use crate::record::Record;
use serde::{Deserialize, Serialize};

/// Production WSDL
pub const WSDL_PRODUCTION: &str = "http://wsdl.kennisnet.nl/smd/1.0/smd.wsdl";

/// Staging WSDL
pub const WSDL_STAGING: &str = "http://wsdl.kennisnet.nl/smd/1.0/smd-staging.wsdl";

/// Service environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Live service
    #[default]
    Production,
    /// Staging service
    Staging,
}

impl Environment {
    /// Default WSDL location of the environment
    pub fn wsdl(&self) -> &'static str {
        match self {
            Environment::Production => WSDL_PRODUCTION,
            Environment::Staging => WSDL_STAGING,
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "staging" => Ok(Environment::Staging),
            other => Err(crate::Error::Config(format!("Unknown environment: {}", other))),
        }
    }
}

/// SMO client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Whitelisted supplier id
    pub supplier_id: String,

    /// Explicit WSDL location (local file or url); overrides `environment`
    #[serde(default)]
    pub wsdl: Option<String>,

    /// Service environment
    #[serde(default)]
    pub environment: Environment,
}

impl ClientConfig {
    /// Configuration for a supplier against production
    pub fn new(supplier_id: impl Into<String>) -> Self {
        Self {
            supplier_id: supplier_id.into(),
            wsdl: None,
            environment: Environment::Production,
        }
    }

    /// WSDL location handed to the transport
    pub fn wsdl_location(&self) -> &str {
        match self.wsdl.as_deref() {
            Some(wsdl) if !wsdl.is_empty() => wsdl,
            _ => self.environment.wsdl(),
        }
    }

    /// Empty record for the configured supplier
    pub fn new_record(&self) -> crate::Result<Record> {
        Record::new(self.supplier_id.clone())
    }

    /// Parse from TOML text
    pub fn from_toml(content: &str) -> crate::Result<Self> {
        let config: ClientConfig = toml::from_str(content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from environment variables
    pub fn from_env() -> crate::Result<Self> {
        let supplier_id = std::env::var("SMO_SUPPLIER_ID")
            .map_err(|_| crate::Error::Config("SMO_SUPPLIER_ID is not set".to_string()))?;
        let mut config = ClientConfig::new(supplier_id);

        if let Ok(wsdl) = std::env::var("SMO_WSDL") {
            config.wsdl = Some(wsdl);
        }

        if let Ok(environment) = std::env::var("SMO_ENVIRONMENT") {
            config.environment = environment.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> crate::Result<()> {
        if self.supplier_id.trim().is_empty() {
            return Err(crate::Error::Config("supplier_id must not be empty".to_string()));
        }
        Ok(())
    }
}
