//! # IXS Router - Swap and Liquidity Orchestration
//!
//! ## Purpose
//!
//! The stateless front door of the IXS V2 DEX. Every public operation takes
//! the host [`Ledger`](ixs_types::Ledger) explicitly, validates the caller's
//! deadline and path, sizes the trade from a reserve snapshot, verifies
//! operator authorizations for restricted tokens, then moves tokens through
//! the pairs and checks the caller's slippage bound.
//!
//! ## Integration Points
//!
//! - **Pricing**: [`ixs_amm::PathResolver`] and [`ixs_amm::V2Math`]
//! - **Compliance**: [`ixs_authorization::AuthorizationVerifier`] for every
//!   restricted token on a swap path
//! - **Host**: pairs, tokens, factory, WETH and native value through the
//!   `ixs_types::ledger` traits
//! - **Configuration**: [`Router::from_config`] builds a router for a chain from an
//!   [`ixs_config::RouterConfig`]
//!
//! ## Architecture Role
//!
//! ```text
//! caller ──► Router ──► SwapPlan (snapshot: reserves, amounts, grants)
//!                         │
//!                         ▼
//!                  effects: consume nonces → transfer in → pair.swap × hops
//!                         │
//!                         ▼
//!                  bound check on fresh balances ──► commit / rollback
//! ```
//!
//! Each mutating call runs inside one ledger transaction; the first error
//! rolls back everything the call did, including consumed nonces and native
//! value received.
//!
//! ## Example
//!
//! ```rust
//! use ixs_router::Router;
//! use ixs_types::{Address, U256};
//!
//! let router = Router::new(
//!     Address::from_low_u64_be(0xbeef),
//!     Address::from_low_u64_be(0xfac),
//!     Address::from_low_u64_be(0xe7e),
//! );
//! assert_eq!(router.quote(U256::from(1), U256::from(100), U256::from(200))?, U256::from(2));
//! # Ok::<(), ixs_types::RouterError>(())
//! ```

pub mod liquidity;
pub mod native;
mod plan;
pub mod router;
pub mod swap;

pub use native::NativeAdapter;
pub use router::Router;
