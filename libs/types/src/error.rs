//! Error taxonomy for the router core
//!
//! Every failure is terminal for the call that produced it: the orchestrator
//! rolls back the ledger transaction and reports the first error it hit.
//! Collaborators (pairs, tokens, the factory) report through the same enum so
//! a failure deep inside a transfer surfaces unchanged to the caller.

use ethers::types::{Address, U256};
use thiserror::Error;

/// Result type alias for router operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Which caller-supplied bound a realized amount violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlippageKind {
    /// Exact-input swaps: received less than `amount_out_min`
    OutputBelowMinimum,
    /// Exact-output swaps: needed more than `amount_in_max` (or the ETH sent)
    InputAboveMaximum,
    /// Liquidity operations: token A amount below `amount_a_min`
    AmountABelowMinimum,
    /// Liquidity operations: token B amount below `amount_b_min`
    AmountBBelowMinimum,
}

impl std::fmt::Display for SlippageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            SlippageKind::OutputBelowMinimum => "output below minimum",
            SlippageKind::InputAboveMaximum => "input above maximum",
            SlippageKind::AmountABelowMinimum => "amount A below minimum",
            SlippageKind::AmountBBelowMinimum => "amount B below minimum",
        };
        f.write_str(label)
    }
}

/// Main error type for router operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// `quote` called with a zero amount
    #[error("insufficient amount")]
    InsufficientAmount,

    /// `get_amount_out` called with a zero input
    #[error("insufficient input amount")]
    InsufficientInputAmount,

    /// `get_amount_in` called with a zero output
    #[error("insufficient output amount")]
    InsufficientOutputAmount,

    /// A reserve is empty or the requested output drains the pool
    #[error("insufficient liquidity")]
    InsufficientLiquidity,

    /// Path shorter than two tokens, flags not covering every hop, or an
    /// ETH variant whose path does not start/end with WETH
    #[error("invalid path: {reason}")]
    InvalidPath {
        /// What was wrong with the path
        reason: String,
    },

    /// Both sides of a pair are the same token
    #[error("identical addresses")]
    IdenticalAddresses,

    /// The lower token of a pair is the zero address
    #[error("zero address")]
    ZeroAddress,

    /// No pair exists for the hop
    #[error("no pair for {token_a:?}/{token_b:?}")]
    PairNotFound {
        /// First token of the hop
        token_a: Address,
        /// Second token of the hop
        token_b: Address,
    },

    /// U256 arithmetic overflowed
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// The call was executed at or after its deadline
    #[error("expired: deadline {deadline} reached at {now}")]
    Expired {
        /// Caller-supplied deadline
        deadline: U256,
        /// Block time of execution
        now: U256,
    },

    /// Realized amount is worse than the caller's bound
    #[error("slippage exceeded ({kind}): limit {limit}, realized {realized}")]
    SlippageExceeded {
        /// Which bound was violated
        kind: SlippageKind,
        /// The caller's bound
        limit: U256,
        /// The realized amount
        realized: U256,
    },

    /// Authorizations supplied do not line up with the path tokens
    #[error("expected {expected} authorizations, got {supplied}")]
    AuthorizationCountMismatch {
        /// One per path token
        expected: usize,
        /// What the caller passed
        supplied: usize,
    },

    /// Signature missing, malformed, or not produced by the named operator
    #[error("invalid signature for restricted token {token:?}")]
    InvalidSignature {
        /// Restricted token whose transfer was being authorized
        token: Address,
    },

    /// The authorization's own deadline has passed
    #[error("authorization for {token:?} expired at {deadline}")]
    AuthorizationExpired {
        /// Restricted token
        token: Address,
        /// Authorization deadline
        deadline: U256,
    },

    /// Authorization was signed over a nonce other than the holder's current one
    #[error("nonce mismatch for {holder:?} on {token:?}: expected {expected}, supplied {supplied}")]
    NonceMismatch {
        /// Restricted token
        token: Address,
        /// Holder whose nonce is consulted
        holder: Address,
        /// Current nonce held by the token
        expected: U256,
        /// Nonce named in the authorization
        supplied: U256,
    },

    /// The signer is not a registered compliance operator of the token
    #[error("{operator:?} is not a swap operator of {token:?}")]
    UnauthorizedOperator {
        /// Restricted token
        token: Address,
        /// Recovered signer
        operator: Address,
    },

    /// A standard permit was refused by the token
    #[error("permit rejected by {token:?}: {reason}")]
    PermitRejected {
        /// Token (usually a pair's LP token) that verified the permit
        token: Address,
        /// Why it was refused
        reason: String,
    },

    /// Underlying token transfer failed
    #[error("transfer of {token:?} failed: {reason}")]
    TransferFailed {
        /// Token being moved
        token: Address,
        /// Why it failed
        reason: String,
    },

    /// A pair refused a swap, mint or burn
    #[error("pair {pair:?} rejected call: {reason}")]
    PairRejected {
        /// Pair address
        pair: Address,
        /// Why it refused
        reason: String,
    },

    /// Sending native value back to a caller failed
    #[error("native transfer of {amount} to {to:?} failed")]
    EthRefundFailed {
        /// Intended recipient
        to: Address,
        /// Amount that could not be delivered
        amount: U256,
    },
}

impl RouterError {
    /// Convenience constructor for path validation failures
    pub fn invalid_path(reason: impl Into<String>) -> Self {
        RouterError::InvalidPath {
            reason: reason.into(),
        }
    }

    /// Whether this error came out of the authorization protocol
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            RouterError::InvalidSignature { .. }
                | RouterError::AuthorizationExpired { .. }
                | RouterError::NonceMismatch { .. }
                | RouterError::UnauthorizedOperator { .. }
                | RouterError::AuthorizationCountMismatch { .. }
        )
    }
}
