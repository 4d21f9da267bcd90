//! Restricted-token swap authorization verifier
//!
//! Decides whether a restricted token may move through the router on behalf
//! of a holder. Token metadata (name, symbol), the holder's nonce, the
//! operator registry and the chain id are read from the ledger on every
//! call; nothing is cached between verifications.
//!
//! Checks run in a fixed order and the first failure is reported:
//! deadline, nonce, signer recovery, operator registration.

use crate::domain::Eip712Domain;
use crate::typed_data::{AuthorizeSwap, TypedMessage};
use ixs_config::constants::typed_data::DOMAIN_VERSION;
use ixs_types::{
    is_expired, Address, AuthorizationGrant, ChainApi, Result, RouterError, SwapAuthorization,
    TokenApi,
};
use tracing::{debug, warn};

/// Outcome of a successful verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Token is not restricted; the supplied value was not inspected
    Unrestricted,
    /// Operator approval checked; consuming the grant advances the nonce
    Granted(AuthorizationGrant),
}

impl Verdict {
    pub fn grant(&self) -> Option<&AuthorizationGrant> {
        match self {
            Verdict::Unrestricted => None,
            Verdict::Granted(grant) => Some(grant),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationVerifier {
    domain_version: String,
}

impl Default for AuthorizationVerifier {
    fn default() -> Self {
        Self::new(DOMAIN_VERSION)
    }
}

impl AuthorizationVerifier {
    pub fn new(domain_version: impl Into<String>) -> Self {
        Self {
            domain_version: domain_version.into(),
        }
    }

    pub fn domain_version(&self) -> &str {
        &self.domain_version
    }

    /// Signing domain of a restricted token, read fresh from the ledger
    pub fn domain_for<L>(&self, ledger: &L, token: Address) -> Result<Eip712Domain>
    where
        L: ChainApi + TokenApi + ?Sized,
    {
        Ok(Eip712Domain::new(
            ledger.name(token)?,
            self.domain_version.clone(),
            ledger.chain_id(),
            token,
        )
        .with_symbol(ledger.symbol(token)?))
    }

    /// Verify `authorization` for a transfer of `token` by `spender` on
    /// behalf of `holder`
    pub fn verify<L>(
        &self,
        ledger: &L,
        token: Address,
        spender: Address,
        holder: Address,
        authorization: &SwapAuthorization,
    ) -> Result<Verdict>
    where
        L: ChainApi + TokenApi + ?Sized,
    {
        if !ledger.is_restricted(token)? {
            return Ok(Verdict::Unrestricted);
        }

        let signed = match authorization {
            SwapAuthorization::Required(signed) => signed,
            SwapAuthorization::NotRequired => {
                warn!(?token, ?holder, "restricted token supplied without authorization");
                return Err(RouterError::InvalidSignature { token });
            }
        };

        let now = ledger.block_timestamp();
        if is_expired(signed.deadline, now) {
            return Err(RouterError::AuthorizationExpired {
                token,
                deadline: signed.deadline,
            });
        }

        let expected = ledger.swap_nonce(token, holder)?;
        if signed.nonce != expected {
            return Err(RouterError::NonceMismatch {
                token,
                holder,
                expected,
                supplied: signed.nonce,
            });
        }

        let message = AuthorizeSwap {
            operator: signed.operator,
            spender,
            nonce: expected,
            deadline: signed.deadline,
        };
        let digest = message.digest(&self.domain_for(ledger, token)?);
        let recovered = signed
            .signature
            .recover(digest)
            .map_err(|_| RouterError::InvalidSignature { token })?;
        if recovered != signed.operator {
            warn!(?token, ?recovered, operator = ?signed.operator, "signer does not match operator");
            return Err(RouterError::InvalidSignature { token });
        }

        if !ledger.is_swap_operator(token, signed.operator)? {
            return Err(RouterError::UnauthorizedOperator {
                token,
                operator: signed.operator,
            });
        }

        debug!(?token, ?holder, nonce = %expected, "swap authorization accepted");
        Ok(Verdict::Granted(AuthorizationGrant {
            token,
            holder,
            nonce: expected,
        }))
    }
}
