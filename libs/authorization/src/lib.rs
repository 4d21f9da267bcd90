//! # IXS Authorization - Restricted Token Swap Approvals
//!
//! ## Purpose
//!
//! Typed-data (EIP-712) signatures that let compliance-gated tokens trade
//! through the same router as ordinary tokens. A registered operator signs
//! `AuthorizeSwap(operator, spender, nonce, deadline)` under the token's own
//! domain; the [`AuthorizationVerifier`] checks it against the holder's
//! current nonce and hands back a grant the token consumes.
//!
//! ## Integration Points
//!
//! - **Input Sources**: token name/symbol, swap nonces and the operator
//!   registry through [`ixs_types::TokenApi`]; chain id and block time
//!   through [`ixs_types::ChainApi`]
//! - **Output Destinations**: the router's swap planner (grants) and token
//!   implementations verifying permits ([`PermitMessage`])
//! - **Off-chain**: [`ComplianceOperator`] produces authorizations from an
//!   ethers `LocalWallet`
//!
//! ## Architecture Role
//!
//! Stateless. Replay protection lives entirely in the token's nonce counter;
//! the verifier reads it on every call and never caches it.

pub mod domain;
pub mod signer;
pub mod typed_data;
pub mod verifier;

pub use domain::Eip712Domain;
pub use signer::{sign_permit, sign_typed, ComplianceOperator, SignerError};
pub use typed_data::{
    typed_data_digest, AuthorizeSwap, PermitMessage, TypedMessage, AUTHORIZE_SWAP_TYPEHASH,
    PERMIT_TYPEHASH,
};
pub use verifier::{AuthorizationVerifier, Verdict};
