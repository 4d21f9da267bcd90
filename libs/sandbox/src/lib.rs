//! # IXS Sandbox - In-Memory Chain
//!
//! A single value that stands in for every contract the router talks to:
//! the factory, constant-product pairs with their LP tokens, ordinary,
//! fee-on-transfer and restricted ERC-20s, WETH and native balances.
//! [`InMemoryLedger`] implements every collaborator trait of
//! [`ixs_types::ledger`], so the router can be driven end to end without a
//! node.
//!
//! Effects are all-or-nothing: every pair call runs in its own nested
//! transaction, and callers can open outer ones through
//! [`ixs_types::Transactional`]. Per-token transfer hooks let tests act as a
//! hostile token that calls back into the router mid-transfer.

pub mod ledger;
pub mod pair;
pub mod token;

pub use ledger::{InMemoryLedger, TransferEvent, TransferHook};
pub use token::{TokenKind, FEE_ON_TRANSFER_DIVISOR};
