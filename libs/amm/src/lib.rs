//! # IXS AMM - Exact Constant-Product Mathematics
//!
//! ## Purpose
//!
//! Pure pricing for the router core: single-pool `quote`, exact-input and
//! exact-output formulas under a pair's fee tier, multi-hop amount
//! resolution, and deposit sizing for liquidity operations. No state is held
//! and nothing is mutated; every function is a deterministic function of its
//! arguments plus, for path resolution, a read-only [`ReserveSource`].
//!
//! ## Integration Points
//!
//! - **Input Sources**: pair reserves via [`ReserveSource`] (a live ledger
//!   through [`LedgerReserves`], or a [`ReserveBook`] for offline quoting)
//! - **Output Destinations**: the router's swap planner and public quote
//!   queries
//! - **Fee Tiers**: 997/1000 for ordinary pairs, 990/1000 for pairs trading
//!   a restricted token ([`FeeSchedule`])
//!
//! ## Architecture Role
//!
//! Mathematical foundation of the router. All arithmetic is `U256` and
//! checked; overflow is reported, never wrapped. Outputs round down, required
//! inputs round up.
//!
//! ## Example
//!
//! ```rust
//! use ixs_amm::{FeeSchedule, V2Math};
//! use ixs_types::U256;
//!
//! let fee = FeeSchedule::default().standard;
//! let out = V2Math::get_amount_out(U256::from(2), U256::from(100), U256::from(100), fee)?;
//! assert_eq!(out, U256::from(1));
//! # Ok::<(), ixs_types::RouterError>(())
//! ```

pub mod fee;
pub mod liquidity;
pub mod path;
pub mod pool_traits;
pub mod v2_math;

pub use fee::{Fee, FeeError, FeeSchedule};
pub use liquidity::optimal_liquidity_amounts;
pub use path::PathResolver;
pub use pool_traits::{AmmPool, LedgerReserves, ReserveBook, ReserveSource};
pub use v2_math::{V2Math, V2PoolState};
