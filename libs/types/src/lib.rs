//! # IXS Router Types
//!
//! Shared vocabulary of the router core: the error taxonomy, swap paths,
//! pair snapshots, restricted-token authorizations and the collaborator
//! traits through which the core talks to pairs, tokens and the factory.
//!
//! ## Design Philosophy
//!
//! - **Exact integers**: every amount is an [`U256`]; nothing is scaled or
//!   floating point
//! - **Explicit collaborators**: registries and token metadata are read
//!   through [`ledger`] traits on each call, never cached in module state
//! - **Tagged authorizations**: [`SwapAuthorization`] is a sum type; the
//!   on-chain "empty" sentinel only exists at the wire boundary
//!   ([`RawAuthorization`])
//!
//! ## Quick Start
//!
//! ```rust
//! use ixs_types::{Address, SwapAuthorization, SwapPath};
//!
//! let path = SwapPath::new(vec![Address::from_low_u64_be(1), Address::from_low_u64_be(2)])?;
//! let authorizations = SwapAuthorization::none(path.len());
//! assert_eq!(authorizations.len(), 2);
//! # Ok::<(), ixs_types::RouterError>(())
//! ```

pub mod authorization;
pub mod context;
pub mod error;
pub mod ledger;
pub mod pair;
pub mod path;

pub use authorization::{
    AuthorizationGrant, Permit, RawAuthorization, SignedAuthorization, SwapAuthorization,
};
pub use context::{is_expired, CallContext};
pub use error::{Result, RouterError, SlippageKind};
pub use ledger::{
    ChainApi, FactoryApi, Ledger, PairApi, TokenApi, Transactional, WrappedNativeApi,
};
pub use pair::{sort_tokens, PairState};
pub use path::{Hop, SwapPath};

/// Ethereum primitives used throughout the workspace
pub use ethers::types::{Address, Signature, H256, U256};
