//! Off-chain half of the protocol: producing signatures
//!
//! A compliance operator holds a key registered with the restricted token and
//! signs `AuthorizeSwap` messages over the holder's current nonce. Permit
//! signing is the same mechanism for a token holder approving a spender.

use crate::domain::Eip712Domain;
use crate::typed_data::{AuthorizeSwap, PermitMessage, TypedMessage};
use crate::verifier::AuthorizationVerifier;
use ethers::signers::{LocalWallet, Signer, WalletError};
use ixs_types::{
    Address, ChainApi, RouterError, Signature, SignedAuthorization, SwapAuthorization, TokenApi,
    U256,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),

    /// Reading the domain or nonce from the ledger failed
    #[error(transparent)]
    Ledger(#[from] RouterError),
}

/// Sign `message` under `domain` with a raw hash signature (v = 27/28)
pub fn sign_typed<M: TypedMessage>(
    wallet: &LocalWallet,
    domain: &Eip712Domain,
    message: &M,
) -> Result<Signature, SignerError> {
    Ok(wallet.sign_hash(message.digest(domain))?)
}

/// Signature over a standard permit
pub fn sign_permit(
    wallet: &LocalWallet,
    domain: &Eip712Domain,
    message: &PermitMessage,
) -> Result<Signature, SignerError> {
    sign_typed(wallet, domain, message)
}

#[derive(Debug, Clone)]
pub struct ComplianceOperator {
    wallet: LocalWallet,
}

impl ComplianceOperator {
    pub fn new(wallet: LocalWallet) -> Self {
        Self { wallet }
    }

    /// Operator from a hex-encoded secp256k1 key
    pub fn from_private_key(key: &str) -> Result<Self, SignerError> {
        Ok(Self::new(key.parse::<LocalWallet>()?))
    }

    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    pub fn wallet(&self) -> &LocalWallet {
        &self.wallet
    }

    /// Sign an authorization for an explicit nonce
    pub fn sign_swap(
        &self,
        domain: &Eip712Domain,
        spender: Address,
        nonce: U256,
        deadline: U256,
    ) -> Result<SwapAuthorization, SignerError> {
        let message = AuthorizeSwap {
            operator: self.address(),
            spender,
            nonce,
            deadline,
        };
        let signature = sign_typed(&self.wallet, domain, &message)?;
        Ok(SwapAuthorization::Required(SignedAuthorization {
            operator: self.address(),
            nonce,
            deadline,
            signature,
        }))
    }

    /// Sign an authorization `nonces_ahead` swaps past the holder's current
    /// nonce, reading domain and nonce from the ledger
    ///
    /// `nonces_ahead = 0` authorizes the next swap; larger values pre-sign
    /// consecutive swaps.
    #[allow(clippy::too_many_arguments)]
    pub fn authorize<L>(
        &self,
        ledger: &L,
        verifier: &AuthorizationVerifier,
        token: Address,
        spender: Address,
        holder: Address,
        deadline: U256,
        nonces_ahead: u64,
    ) -> Result<SwapAuthorization, SignerError>
    where
        L: ChainApi + TokenApi + ?Sized,
    {
        let domain = verifier.domain_for(ledger, token)?;
        let nonce = ledger
            .swap_nonce(token, holder)?
            .checked_add(U256::from(nonces_ahead))
            .ok_or(RouterError::ArithmeticOverflow)?;
        self.sign_swap(&domain, spender, nonce, deadline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HARDHAT_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_operator_address_from_key() {
        let operator = ComplianceOperator::from_private_key(HARDHAT_KEY).unwrap();
        assert_eq!(
            operator.address(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse::<Address>().unwrap()
        );
        assert!(ComplianceOperator::from_private_key("not a key").is_err());
    }

    #[test]
    fn test_signature_recovers_to_operator() {
        let operator = ComplianceOperator::from_private_key(HARDHAT_KEY).unwrap();
        let domain =
            Eip712Domain::new("wLink2", "1", U256::one(), Address::repeat_byte(7)).with_symbol("wLink2");
        let auth = operator
            .sign_swap(&domain, Address::repeat_byte(8), U256::zero(), U256::MAX)
            .unwrap();
        let signed = auth.signed().unwrap();

        let digest = AuthorizeSwap {
            operator: operator.address(),
            spender: Address::repeat_byte(8),
            nonce: U256::zero(),
            deadline: U256::MAX,
        }
        .digest(&domain);
        assert_eq!(signed.signature.recover(digest).unwrap(), operator.address());
        assert!(signed.signature.v == 27 || signed.signature.v == 28);
    }
}
