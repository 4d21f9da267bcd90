//! Router Configuration Module
//!
//! Loads the deployment parameters of a router: chain, contract addresses,
//! fee schedule, typed-data domain version and logging. Sources, lowest
//! precedence first: built-in defaults, an optional TOML file, then
//! `IXS__`-prefixed environment variables (`IXS__CHAIN__CHAIN_ID=5`).

use crate::constants::{addresses, fees, typed_data};
use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Main router configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct RouterConfig {
    pub chain: ChainConfig,
    pub contracts: ContractsConfig,
    pub fees: FeeConfig,
    pub authorization: AuthorizationConfig,
    pub logging: LoggingConfig,
}

/// Chain the router is deployed on
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ChainConfig {
    pub chain_id: u64,
}

/// Collaborator contracts
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ContractsConfig {
    pub factory: Address,
    pub weth: Address,
}

/// Fee tiers as `numerator / denominator`
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct FeeConfig {
    pub standard_numerator: u32,
    pub restricted_numerator: u32,
    pub denominator: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AuthorizationConfig {
    /// Version string of restricted-token typed-data domains
    pub domain_version: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: addresses::MAINNET_CHAIN_ID,
        }
    }
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            factory: addresses::FACTORY,
            weth: addresses::WETH,
        }
    }
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            standard_numerator: fees::STANDARD_NUMERATOR,
            restricted_numerator: fees::RESTRICTED_NUMERATOR,
            denominator: fees::DENOMINATOR,
        }
    }
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            domain_version: typed_data::DOMAIN_VERSION.to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl RouterConfig {
    /// Load configuration from an optional file with environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading router config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        }

        // Override with environment variables (IXS__ prefix)
        builder = builder.add_source(
            Environment::with_prefix("IXS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: RouterConfig = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config.validate()?;
        debug!(chain_id = config.chain.chain_id, factory = ?config.contracts.factory, "router config loaded");
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RouterConfig =
            toml::from_str(content).context("Failed to parse router config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the router cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chain.chain_id == 0 {
            bail!("chain.chain_id must be non-zero");
        }
        if self.contracts.factory.is_zero() {
            bail!("contracts.factory must be set");
        }
        if self.contracts.weth.is_zero() {
            bail!("contracts.weth must be set");
        }
        for (tier, numerator) in [
            ("standard", self.fees.standard_numerator),
            ("restricted", self.fees.restricted_numerator),
        ] {
            if numerator == 0 || numerator > self.fees.denominator {
                bail!(
                    "fees.{tier}_numerator {numerator} outside 1..={}",
                    self.fees.denominator
                );
            }
        }
        if self.authorization.domain_version.is_empty() {
            bail!("authorization.domain_version must not be empty");
        }
        tracing_subscriber::EnvFilter::try_new(&self.logging.level)
            .with_context(|| format!("invalid logging.level {:?}", self.logging.level))?;
        Ok(())
    }
}
