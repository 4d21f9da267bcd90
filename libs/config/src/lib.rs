//! # IXS Router Configuration
//!
//! Centralized configuration and constants for the router core, shared by
//! every crate in the workspace.
//!
//! ## Features
//!
//! - **Protocol Constants**: minimum liquidity, fee tiers, typed-data type
//!   strings and domain version, canonical deployment addresses
//! - **Router Configuration**: chain, contract addresses, fee schedule and
//!   logging, loaded from TOML with `IXS__` environment overrides
//! - **Logging**: one-call `tracing` subscriber setup
//!
//! ## Usage
//!
//! ```rust
//! use ixs_config::{constants, RouterConfig};
//!
//! let config = RouterConfig::default();
//! assert_eq!(config.contracts.factory, constants::addresses::FACTORY);
//! assert_eq!(constants::MINIMUM_LIQUIDITY, 1000);
//! ```

pub mod constants;
pub mod logging;
pub mod router_config;

// Re-export commonly used types
pub use logging::init_tracing;
pub use router_config::{
    AuthorizationConfig, ChainConfig, ContractsConfig, FeeConfig, LoggingConfig, RouterConfig,
};
