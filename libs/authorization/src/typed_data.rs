//! Typed-data messages and the `0x1901` digest

use crate::domain::Eip712Domain;
use ethers::abi::{encode, Token};
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use ixs_config::constants::typed_data::{AUTHORIZE_SWAP, PERMIT};
use once_cell::sync::Lazy;

pub static AUTHORIZE_SWAP_TYPEHASH: Lazy<H256> = Lazy::new(|| H256(keccak256(AUTHORIZE_SWAP)));
pub static PERMIT_TYPEHASH: Lazy<H256> = Lazy::new(|| H256(keccak256(PERMIT)));

/// A struct that can be signed under a domain
pub trait TypedMessage {
    fn struct_hash(&self) -> H256;

    /// `keccak256(0x19 0x01 || domainSeparator || structHash)`
    fn digest(&self, domain: &Eip712Domain) -> H256 {
        typed_data_digest(domain.separator(), self.struct_hash())
    }
}

pub fn typed_data_digest(domain_separator: H256, struct_hash: H256) -> H256 {
    let mut preimage = [0u8; 66];
    preimage[0] = 0x19;
    preimage[1] = 0x01;
    preimage[2..34].copy_from_slice(domain_separator.as_bytes());
    preimage[34..66].copy_from_slice(struct_hash.as_bytes());
    H256(keccak256(preimage))
}

/// `AuthorizeSwap(address operator,address spender,uint256 nonce,uint256 deadline)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorizeSwap {
    pub operator: Address,
    pub spender: Address,
    pub nonce: U256,
    pub deadline: U256,
}

impl TypedMessage for AuthorizeSwap {
    fn struct_hash(&self) -> H256 {
        H256(keccak256(encode(&[
            Token::FixedBytes(AUTHORIZE_SWAP_TYPEHASH.as_bytes().to_vec()),
            Token::Address(self.operator),
            Token::Address(self.spender),
            Token::Uint(self.nonce),
            Token::Uint(self.deadline),
        ])))
    }
}

/// `Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitMessage {
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
    pub nonce: U256,
    pub deadline: U256,
}

impl TypedMessage for PermitMessage {
    fn struct_hash(&self) -> H256 {
        H256(keccak256(encode(&[
            Token::FixedBytes(PERMIT_TYPEHASH.as_bytes().to_vec()),
            Token::Address(self.owner),
            Token::Address(self.spender),
            Token::Uint(self.value),
            Token::Uint(self.nonce),
            Token::Uint(self.deadline),
        ])))
    }
}
