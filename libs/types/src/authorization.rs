//! Swap authorizations for restricted (security) tokens
//!
//! A restricted token only moves through the router when a compliance
//! operator has signed off on it. The signed payload names the operator, the
//! spender, the holder's current swap nonce and a deadline. Callers supply one
//! [`SwapAuthorization`] per path token; tokens that are not restricted take
//! [`SwapAuthorization::NotRequired`].

use ethers::types::{Address, Signature, H256, U256};

/// Operator-signed approval for one restricted token transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignedAuthorization {
    /// Compliance operator that produced the signature
    pub operator: Address,
    /// Holder nonce the signature was made over
    pub nonce: U256,
    /// Authorization is void at or after this timestamp
    pub deadline: U256,
    /// Signature over the typed-data digest
    pub signature: Signature,
}

/// Per-path-token authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwapAuthorization {
    /// Token is not restricted; nothing to verify
    #[default]
    NotRequired,
    /// Token is restricted and this is the operator's approval
    Required(SignedAuthorization),
}

impl SwapAuthorization {
    /// `n` placeholders, for paths made only of ordinary tokens
    pub fn none(n: usize) -> Vec<SwapAuthorization> {
        vec![SwapAuthorization::NotRequired; n]
    }

    pub fn signed(&self) -> Option<&SignedAuthorization> {
        match self {
            SwapAuthorization::NotRequired => None,
            SwapAuthorization::Required(signed) => Some(signed),
        }
    }
}

/// Flat wire form of an authorization, as produced by off-chain tooling
///
/// The all-zero value with a `U256::MAX` deadline is the "empty" sentinel and
/// converts to [`SwapAuthorization::NotRequired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawAuthorization {
    pub operator: Address,
    pub nonce: U256,
    pub deadline: U256,
    pub v: u8,
    pub r: H256,
    pub s: H256,
}

impl RawAuthorization {
    /// The empty sentinel
    pub fn empty() -> Self {
        Self {
            operator: Address::zero(),
            nonce: U256::zero(),
            deadline: U256::MAX,
            v: 0,
            r: H256::zero(),
            s: H256::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::empty()
    }
}

impl From<RawAuthorization> for SwapAuthorization {
    fn from(raw: RawAuthorization) -> Self {
        if raw.is_empty() {
            return SwapAuthorization::NotRequired;
        }
        SwapAuthorization::Required(SignedAuthorization {
            operator: raw.operator,
            nonce: raw.nonce,
            deadline: raw.deadline,
            signature: Signature {
                r: U256::from_big_endian(raw.r.as_bytes()),
                s: U256::from_big_endian(raw.s.as_bytes()),
                v: u64::from(raw.v),
            },
        })
    }
}

/// Outcome of a successful verification: the token may consume `nonce`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizationGrant {
    pub token: Address,
    pub holder: Address,
    pub nonce: U256,
}

/// Standard (non-authorization) permit used to approve the router in the same
/// call that spends the allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Permit {
    /// Approve `U256::MAX` instead of the exact amount
    pub approve_max: bool,
    pub signature: Signature,
}
